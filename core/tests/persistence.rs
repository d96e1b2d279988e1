//! Integration tests for the schedule store and the persisted run.
//!
//! Tests verify:
//! 1. Round-trip: a generated run reads back field-for-field
//! 2. A run is a full replace — entries outside the range are destroyed
//! 3. Large runs land atomically in one transaction
//! 4. Ad-hoc single-entry edits (insert/update/delete) work outside the
//!    generator
//! 5. The in-flight guard resets between sequential runs, and concurrent
//!    runs from other threads are rejected rather than interleaved

use chrono::NaiveDate;
use roster_core::{
    agent::{Agent, Role, Tier},
    entry::{DayTasks, ScheduleEntry, Task, EARLY_SHIFT, REGULAR_SHIFT},
    error::RosterError,
    policy::RosterPolicy,
    scheduler::Scheduler,
    store::RosterStore,
};
use std::sync::Arc;
use std::thread;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory store with the test roster inserted.
fn seeded_store() -> RosterStore {
    let store = RosterStore::in_memory().expect("in_memory failed");
    store.migrate().expect("migrate failed");
    for (id, tier) in [
        ("special", Tier::Tier3),
        ("A", Tier::Tier3),
        ("B", Tier::Tier2),
        ("C", Tier::Tier1),
    ] {
        store
            .insert_agent(&Agent::new(id, id, tier, Role::User))
            .unwrap();
    }
    store
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: round-trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn persisted_run_reads_back_exactly() {
    let scheduler = Scheduler::new(RosterPolicy::default_test(), seeded_store());

    // Tue 1st .. Fri 4th Sep 2026.
    let generated = scheduler.run(date(2026, 9, 1), date(2026, 9, 4)).unwrap();
    assert_eq!(generated.len(), 16, "4 agents over 4 open days");

    let stored = scheduler.store().all_entries().unwrap();
    assert_eq!(stored.len(), generated.len());

    let key = |e: &ScheduleEntry| {
        (
            e.agent_id.clone(),
            e.date,
            e.shift.clone(),
            e.tasks.morning.as_str(),
            e.tasks.afternoon.as_str(),
        )
    };
    let mut expected: Vec<_> = generated.iter().map(key).collect();
    let mut actual: Vec<_> = stored.iter().map(key).collect();
    expected.sort();
    actual.sort();
    assert_eq!(expected, actual, "stored entries must match generated ones");
}

#[test]
fn range_query_scopes_by_date() {
    let scheduler = Scheduler::new(RosterPolicy::default_test(), seeded_store());
    // Mon 24th .. Sun 30th Aug 2026.
    scheduler.run(date(2026, 8, 24), date(2026, 8, 30)).unwrap();

    let midweek = scheduler
        .store()
        .entries_for_range(date(2026, 8, 26), date(2026, 8, 27))
        .unwrap();
    assert_eq!(midweek.len(), 8, "Wed + Thu with 4 agents each");
    assert!(midweek
        .iter()
        .all(|e| e.date >= date(2026, 8, 26) && e.date <= date(2026, 8, 27)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: full replace is destructive beyond the range
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn run_destroys_entries_outside_the_requested_range() {
    let store = seeded_store();

    // A previously generated entry from months earlier.
    let stale = ScheduleEntry::new(
        "A",
        date(2026, 3, 10),
        REGULAR_SHIFT,
        DayTasks::new(Task::Crm, Task::Call),
    );
    store.insert_entry(&stale).unwrap();

    let scheduler = Scheduler::new(RosterPolicy::default_test(), store);
    scheduler.run(date(2026, 9, 1), date(2026, 9, 1)).unwrap();

    let remaining = scheduler.store().all_entries().unwrap();
    assert!(
        remaining.iter().all(|e| e.id != stale.id),
        "clear is store-wide, not range-scoped"
    );
    assert_eq!(remaining.len(), 4, "only the new Tuesday run remains");
}

#[test]
fn clear_all_removes_every_entry() {
    let scheduler = Scheduler::new(RosterPolicy::default_test(), seeded_store());
    scheduler.run(date(2026, 9, 1), date(2026, 9, 4)).unwrap();

    let removed = scheduler.store().clear_all_entries().unwrap();
    assert_eq!(removed, 16);
    assert_eq!(scheduler.store().entry_count().unwrap(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: large batch lands atomically
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn large_run_is_written_in_full() {
    let store = RosterStore::in_memory().unwrap();
    store.migrate().unwrap();
    // 60 agents over a month-long range produces well over a thousand rows.
    for i in 0..60 {
        let tier = match i % 3 {
            0 => Tier::Tier3,
            1 => Tier::Tier2,
            _ => Tier::Tier1,
        };
        store
            .insert_agent(&Agent::new(format!("agent-{i}"), format!("Agent {i}"), tier, Role::User))
            .unwrap();
    }

    let scheduler = Scheduler::new(RosterPolicy::empty(), store);
    let entries = scheduler.run(date(2026, 9, 1), date(2026, 9, 30)).unwrap();
    assert!(entries.len() > 1000, "expected a large run (got {})", entries.len());

    let count = scheduler.store().entry_count().unwrap();
    assert_eq!(count as usize, entries.len());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: ad-hoc admin edits
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn single_entry_insert_and_delete_outside_the_generator() {
    let store = seeded_store();

    let manual = ScheduleEntry::new(
        "B",
        date(2026, 9, 2),
        REGULAR_SHIFT,
        DayTasks::new(Task::Call, Task::Call),
    );
    store.insert_entry(&manual).unwrap();
    assert_eq!(store.entry_count().unwrap(), 1);

    let stored = store.all_entries().unwrap();
    let fetched = &stored[0];
    assert_eq!(fetched.agent_id, "B");
    assert_eq!(fetched.tasks.morning, Task::Call);
    assert_eq!(fetched.tasks.afternoon, Task::Call);

    assert!(store.delete_entry(&manual.id).unwrap());
    assert!(!store.delete_entry(&manual.id).unwrap(), "second delete is a no-op");
    assert_eq!(store.entry_count().unwrap(), 0);
}

#[test]
fn single_entry_update_overwrites_in_place() {
    let store = seeded_store();

    let mut manual = ScheduleEntry::new(
        "B",
        date(2026, 9, 2),
        REGULAR_SHIFT,
        DayTasks::new(Task::Call, Task::Call),
    );
    store.insert_entry(&manual).unwrap();

    // Reassign the day to another agent with different hours and tasks.
    manual.agent_id = "C".to_string();
    manual.shift = EARLY_SHIFT.to_string();
    manual.tasks = DayTasks::new(Task::Crm, Task::Call);
    assert!(store.update_entry(&manual).unwrap());

    let stored = store.all_entries().unwrap();
    assert_eq!(stored.len(), 1, "update must not create a second row");
    assert_eq!(stored[0].agent_id, "C");
    assert_eq!(stored[0].shift, EARLY_SHIFT);
    assert_eq!(stored[0].tasks, DayTasks::new(Task::Crm, Task::Call));

    let phantom = ScheduleEntry::new(
        "A",
        date(2026, 9, 3),
        REGULAR_SHIFT,
        DayTasks::new(Task::Crm, Task::Crm),
    );
    assert!(
        !store.update_entry(&phantom).unwrap(),
        "updating an unknown id touches nothing"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: in-flight guard
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn sequential_runs_both_succeed() {
    let scheduler = Scheduler::new(RosterPolicy::default_test(), seeded_store());

    scheduler.run(date(2026, 9, 1), date(2026, 9, 4)).unwrap();
    // The guard must reset after completion; a second run replaces the first.
    let second = scheduler.run(date(2026, 9, 2), date(2026, 9, 2)).unwrap();
    assert_eq!(second.len(), 4);
    assert_eq!(scheduler.store().entry_count().unwrap(), 4);
}

#[test]
fn concurrent_runs_never_interleave() {
    let scheduler = Arc::new(Scheduler::new(RosterPolicy::default_test(), seeded_store()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scheduler = Arc::clone(&scheduler);
            thread::spawn(move || scheduler.run(date(2026, 9, 1), date(2026, 9, 4)))
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("run thread panicked"))
        .collect();

    // Every attempt either wins outright or is turned away at the door;
    // overlapping runs never race the destructive clear.
    assert!(results.iter().any(|r| r.is_ok()), "no run completed");
    for result in &results {
        match result {
            Ok(entries) => assert_eq!(entries.len(), 16),
            Err(e) => assert!(matches!(e, RosterError::GenerationInFlight)),
        }
    }
    assert_eq!(scheduler.store().entry_count().unwrap(), 16);
}
