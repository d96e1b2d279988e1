//! The shift generator — pure per-day and range computation, plus the
//! Scheduler service that snapshots the directory and persists a run.
//!
//! RULES:
//!   - Sunday produces no entries (agency closed).
//!   - Special assignments apply on every open day except Monday; agents
//!     named in them never enter the regular tier pools.
//!   - tier3 is claimed before tier2 before tier1; each eligible agent
//!     appears at most once per day.
//!   - Saturday schedules only the first unclaimed tier3 agent.
//!   - Within a tier, agents are taken in directory order; no sorting.
//!
//! Generation is pure. Persistence is a separate, explicit step so the
//! caller controls the (destructive) replace.

use crate::{
    agent::{Agent, Role, Tier},
    entry::ScheduleEntry,
    error::{RosterError, RosterResult},
    policy::{day_kind, saturday_assignment, weekday_assignment, DayKind, RosterPolicy},
    store::RosterStore,
};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Generate one day's entries. Pure: no store access, no clock access.
pub fn generate_day(
    date: NaiveDate,
    agents: &[Agent],
    policy: &RosterPolicy,
) -> Vec<ScheduleEntry> {
    let kind = day_kind(date);
    let mut entries = Vec::new();
    if kind == DayKind::Closed {
        return entries;
    }

    // Ids claimed so far today. Seeded by the special assignments,
    // then grown as tier pools are walked.
    let mut scheduled: HashSet<&str> = HashSet::new();

    // Fixed special assignments fire on every open day except Monday.
    if date.weekday() != Weekday::Mon {
        for special in &policy.special_assignments {
            if scheduled.insert(special.agent_id.as_str()) {
                entries.push(ScheduleEntry::new(
                    &special.agent_id,
                    date,
                    &special.shift,
                    special.tasks,
                ));
            }
        }
    }

    // Special agents stay out of the tier pools even on days where the
    // special rule itself did not fire (Monday).
    match kind {
        DayKind::Closed => {}
        DayKind::Saturday => {
            // Skeleton crew: the first tier3 agent in directory order.
            // No tier2 or tier1 agents work Saturdays.
            let duty = agents.iter().find(|&a| {
                a.tier == Tier::Tier3
                    && !policy.is_special(&a.id)
                    && !scheduled.contains(a.id.as_str())
            });
            if let Some(agent) = duty {
                let (tasks, shift) = saturday_assignment();
                scheduled.insert(agent.id.as_str());
                entries.push(ScheduleEntry::new(&agent.id, date, shift, tasks));
            }
        }
        DayKind::Weekday { early_start } => {
            for tier in [Tier::Tier3, Tier::Tier2, Tier::Tier1] {
                let Some((tasks, shift)) = weekday_assignment(tier, early_start) else {
                    continue;
                };
                for agent in agents.iter().filter(|a| a.tier == tier) {
                    if policy.is_special(&agent.id) || scheduled.contains(agent.id.as_str()) {
                        continue;
                    }
                    scheduled.insert(agent.id.as_str());
                    entries.push(ScheduleEntry::new(&agent.id, date, shift, tasks));
                }
            }
        }
    }

    entries
}

/// Generate entries for every day from `start` to `end` inclusive.
/// An inverted range yields an empty result, not an error.
pub fn generate_range(
    start: NaiveDate,
    end: NaiveDate,
    agents: &[Agent],
    policy: &RosterPolicy,
) -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();
    let mut day = start;
    while day <= end {
        entries.extend(generate_day(day, agents, policy));
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    entries
}

/// Drop administrators from the roster: allowlisted ids are excluded
/// regardless of the role field stored in the directory.
pub fn eligible_agents(agents: Vec<Agent>, policy: &RosterPolicy) -> Vec<Agent> {
    agents
        .into_iter()
        .filter(|a| a.role != Role::Admin && !policy.is_allowlisted_admin(&a.id))
        .collect()
}

/// The scheduling service: reads a snapshot of the agent directory,
/// generates the roster for a range, and persists it as a full replace.
pub struct Scheduler {
    policy: RosterPolicy,
    store: RosterStore,
    in_flight: AtomicBool,
}

impl Scheduler {
    pub fn new(policy: RosterPolicy, store: RosterStore) -> Self {
        Self {
            policy,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    /// Generate and persist the roster for `start..=end`.
    ///
    /// This is a destructive full-roster replace: EVERY stored entry is
    /// cleared, not just those in the range, before the new run is
    /// written. Clear and write happen in one transaction, so a crash
    /// mid-run cannot leave the store empty. Failures propagate to the
    /// caller without retry; the caller re-runs from scratch.
    ///
    /// The scheduler is shareable across threads (the store serializes
    /// connection access internally); a second invocation while one is
    /// in flight fails fast with GenerationInFlight rather than queueing
    /// behind the first run's clear.
    pub fn run(&self, start: NaiveDate, end: NaiveDate) -> RosterResult<Vec<ScheduleEntry>> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(RosterError::GenerationInFlight);
        }
        let result = self.run_locked(start, end);
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    fn run_locked(&self, start: NaiveDate, end: NaiveDate) -> RosterResult<Vec<ScheduleEntry>> {
        // One snapshot read; tier edits after this point are not seen
        // by this run (snapshot isolation, not linearizable).
        let agents = self.store.list_agents()?;
        let eligible = eligible_agents(agents, &self.policy);
        log::debug!(
            "generating roster {start}..={end} for {} eligible agents",
            eligible.len()
        );

        let entries = generate_range(start, end, &eligible, &self.policy);
        self.store.replace_all_entries(&entries)?;
        log::debug!("persisted {} entries", entries.len());
        Ok(entries)
    }
}
