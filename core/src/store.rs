//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The scheduler and tooling call store methods — they never execute
//! SQL directly.
//!
//! The connection sits behind a Mutex so the store (and the scheduler
//! owning it) can be shared across threads. Every method takes the lock
//! for the duration of its statement or transaction.

use crate::{
    agent::{Agent, Role, Tier},
    entry::{DayTasks, ScheduleEntry, Task},
    error::RosterResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Mutex, MutexGuard};

const DATE_FORMAT: &str = "%Y-%m-%d";

type EntryColumns = (String, String, String, String, String, String);

pub struct RosterStore {
    conn: Mutex<Connection>,
}

impl RosterStore {
    /// Open (or create) the roster database at `path`.
    pub fn open(path: &str) -> RosterResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RosterResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // A panicking lock holder cannot leave SQLite state half-written
    // (statements either ran or they did not), so poisoning carries no
    // information here; recover the guard.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RosterResult<()> {
        self.lock()
            .execute_batch(include_str!("../migrations/001_roster.sql"))?;
        Ok(())
    }

    // ── Agent directory ────────────────────────────────────────

    pub fn insert_agent(&self, agent: &Agent) -> RosterResult<()> {
        self.lock().execute(
            "INSERT INTO agent (agent_id, name, tier, role) VALUES (?1, ?2, ?3, ?4)",
            params![agent.id, agent.name, agent.tier.as_str(), agent.role.as_str()],
        )?;
        Ok(())
    }

    /// Full directory read, in insertion order. The scheduler relies on
    /// this order as its only tie-break within a tier.
    pub fn list_agents(&self) -> RosterResult<Vec<Agent>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT agent_id, name, tier, role FROM agent ORDER BY rowid ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows
            .into_iter()
            .map(|(id, name, tier, role)| Agent {
                id,
                name,
                tier: Tier::from_stored(tier.as_deref()),
                role: Role::from_stored(&role),
            })
            .collect())
    }

    // ── Schedule entries ───────────────────────────────────────

    /// Delete EVERY schedule entry, not just a date range. Returns the
    /// number of rows removed.
    pub fn clear_all_entries(&self) -> RosterResult<usize> {
        let n = self.lock().execute("DELETE FROM schedule_entry", [])?;
        Ok(n)
    }

    /// Clear-then-write as one atomic unit of work. Either the previous
    /// roster or the new one is visible; never an empty store from a
    /// crash between the two steps.
    pub fn replace_all_entries(&self, entries: &[ScheduleEntry]) -> RosterResult<()> {
        let conn = self.lock();
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM schedule_entry", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO schedule_entry
                 (entry_id, agent_id, date, shift, morning_task, afternoon_task)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.id,
                    entry.agent_id,
                    entry.date.format(DATE_FORMAT).to_string(),
                    entry.shift,
                    entry.tasks.morning.as_str(),
                    entry.tasks.afternoon.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Single-entry insert for ad-hoc admin edits outside the generator.
    pub fn insert_entry(&self, entry: &ScheduleEntry) -> RosterResult<()> {
        self.lock().execute(
            "INSERT INTO schedule_entry
             (entry_id, agent_id, date, shift, morning_task, afternoon_task)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id,
                entry.agent_id,
                entry.date.format(DATE_FORMAT).to_string(),
                entry.shift,
                entry.tasks.morning.as_str(),
                entry.tasks.afternoon.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Overwrite one entry in place, keyed by its id. Returns whether a
    /// row existed.
    pub fn update_entry(&self, entry: &ScheduleEntry) -> RosterResult<bool> {
        let n = self.lock().execute(
            "UPDATE schedule_entry
             SET agent_id = ?2, date = ?3, shift = ?4,
                 morning_task = ?5, afternoon_task = ?6
             WHERE entry_id = ?1",
            params![
                entry.id,
                entry.agent_id,
                entry.date.format(DATE_FORMAT).to_string(),
                entry.shift,
                entry.tasks.morning.as_str(),
                entry.tasks.afternoon.as_str(),
            ],
        )?;
        Ok(n > 0)
    }

    /// Remove one entry. Returns whether a row existed.
    pub fn delete_entry(&self, entry_id: &str) -> RosterResult<bool> {
        let n = self.lock().execute(
            "DELETE FROM schedule_entry WHERE entry_id = ?1",
            params![entry_id],
        )?;
        Ok(n > 0)
    }

    pub fn all_entries(&self) -> RosterResult<Vec<ScheduleEntry>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT entry_id, agent_id, date, shift, morning_task, afternoon_task
             FROM schedule_entry ORDER BY date ASC, rowid ASC",
        )?;
        let raw = stmt
            .query_map([], Self::read_entry_columns)?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(Self::entry_from_columns).collect()
    }

    pub fn entries_for_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RosterResult<Vec<ScheduleEntry>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT entry_id, agent_id, date, shift, morning_task, afternoon_task
             FROM schedule_entry WHERE date >= ?1 AND date <= ?2
             ORDER BY date ASC, rowid ASC",
        )?;
        let raw = stmt
            .query_map(
                params![
                    start.format(DATE_FORMAT).to_string(),
                    end.format(DATE_FORMAT).to_string()
                ],
                Self::read_entry_columns,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(Self::entry_from_columns).collect()
    }

    pub fn entry_count(&self) -> RosterResult<i64> {
        let count: i64 =
            self.lock()
                .query_row("SELECT COUNT(*) FROM schedule_entry", [], |row| row.get(0))?;
        Ok(count)
    }

    fn read_entry_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryColumns> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn entry_from_columns(
        (id, agent_id, date, shift, morning, afternoon): EntryColumns,
    ) -> RosterResult<ScheduleEntry> {
        Ok(ScheduleEntry {
            id,
            agent_id,
            date: NaiveDate::parse_from_str(&date, DATE_FORMAT)?,
            shift,
            tasks: DayTasks::new(Task::from_stored(&morning)?, Task::from_stored(&afternoon)?),
        })
    }
}
