//! roster-runner: headless roster generator for the agency desk.
//!
//! Usage:
//!   roster-runner --db roster.db --from 2026-09-01 --to 2026-09-30
//!   roster-runner --db roster.db --policy policy.json --from ... --to ... --json
//!   roster-runner --seed-demo --from 2026-09-01 --to 2026-09-07

use anyhow::Result;
use chrono::NaiveDate;
use roster_core::{
    agent::{Agent, Role, Tier},
    policy::RosterPolicy,
    scheduler::Scheduler,
    store::RosterStore,
};
use std::collections::BTreeMap;
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = str_arg(&args, "--db", ":memory:");
    let from = date_arg(&args, "--from")?;
    let to = date_arg(&args, "--to")?;
    let seed_demo = args.iter().any(|a| a == "--seed-demo");
    let as_json = args.iter().any(|a| a == "--json");

    let policy = match args.windows(2).find(|w| w[0] == "--policy") {
        Some(w) => RosterPolicy::load(&w[1])?,
        None if seed_demo => demo_policy(),
        None => RosterPolicy::empty(),
    };

    let store = RosterStore::open(db)?;
    store.migrate()?;

    if seed_demo {
        seed_demo_agents(&store)?;
    }

    let scheduler = Scheduler::new(policy, store);
    let entries = scheduler.run(from, to)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("agency roster — roster-runner");
    println!("  db:      {db}");
    println!("  range:   {from} .. {to}");
    println!("  entries: {}", entries.len());
    println!();

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for entry in &entries {
        *per_day.entry(entry.date).or_default() += 1;
    }

    println!("=== DAY SUMMARY ===");
    for (date, count) in &per_day {
        println!("  {date}  {count} agents on shift");
    }

    println!();
    println!("=== ASSIGNMENTS ===");
    for entry in &entries {
        println!(
            "  {}  {:<12} {}  {}/{}",
            entry.date,
            entry.agent_id,
            entry.shift,
            entry.tasks.morning.as_str(),
            entry.tasks.afternoon.as_str(),
        );
    }

    Ok(())
}

/// Demo policy: one fixed weekend-capable agent and the two directors
/// on the admin allowlist.
fn demo_policy() -> RosterPolicy {
    use roster_core::entry::{DayTasks, Task, REGULAR_SHIFT};
    use roster_core::policy::SpecialAssignment;

    RosterPolicy {
        special_assignments: vec![SpecialAssignment {
            agent_id: "AGT-007".into(),
            tasks: DayTasks::new(Task::Call, Task::Crm),
            shift: REGULAR_SHIFT.into(),
        }],
        admin_allowlist: ["AGT-001".to_string(), "AGT-002".to_string()]
            .into_iter()
            .collect(),
    }
}

fn seed_demo_agents(store: &RosterStore) -> Result<()> {
    let demo = [
        ("AGT-001", "Dana Whitfield", Tier::Tier3, Role::Admin),
        ("AGT-002", "Marcus Okafor", Tier::Tier3, Role::Admin),
        ("AGT-003", "Priya Raman", Tier::Tier3, Role::User),
        ("AGT-004", "Jonas Keller", Tier::Tier3, Role::User),
        ("AGT-005", "Sofia Marchetti", Tier::Tier2, Role::User),
        ("AGT-006", "Lucas Ferreira", Tier::Tier2, Role::User),
        ("AGT-007", "Amara Diallo", Tier::Tier3, Role::User),
        ("AGT-008", "Theo Lindqvist", Tier::Tier1, Role::User),
        ("AGT-009", "Nadia Petrov", Tier::Tier1, Role::User),
        ("AGT-010", "Ines Vidal", Tier::Compliance, Role::User),
    ];
    for &(id, name, tier, role) in demo.iter() {
        store.insert_agent(&Agent::new(id, name, tier, role))?;
    }
    log::info!("seeded {} demo agents", demo.len());
    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .unwrap_or(default)
}

fn date_arg(args: &[String], flag: &str) -> Result<NaiveDate> {
    let raw = args
        .windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .ok_or_else(|| anyhow::anyhow!("missing required argument: {flag} YYYY-MM-DD"))?;
    raw.parse()
        .map_err(|e| anyhow::anyhow!("invalid {flag} date '{raw}': {e}"))
}
