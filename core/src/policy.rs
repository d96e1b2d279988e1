//! Scheduling policy — the data-driven rule set behind generation.
//!
//! Day classification, the tier-to-assignment table, fixed special
//! assignments, and the admin allowlist all live here so the generator
//! itself stays a mechanical walk over the eligible roster. Adding a
//! tier or moving the early-start day is a table change, not branch
//! surgery.

use crate::agent::Tier;
use crate::entry::{DayTasks, Task, EARLY_SHIFT, REGULAR_SHIFT};
use crate::types::AgentId;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the generator treats a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    /// Agency closed — the day produces no entries at all.
    Closed,
    /// Saturday skeleton crew: the first tier3 agent only.
    Saturday,
    /// Regular working day. `early_start` marks the tier3 early-shift day.
    Weekday { early_start: bool },
}

/// Classify a date. Time-of-day never enters the picture; callers pass
/// calendar days.
pub fn day_kind(date: NaiveDate) -> DayKind {
    match date.weekday() {
        Weekday::Sun => DayKind::Closed,
        Weekday::Sat => DayKind::Saturday,
        Weekday::Wed => DayKind::Weekday { early_start: true },
        _ => DayKind::Weekday { early_start: false },
    }
}

/// Per-tier assignment for a regular working day.
/// Returns None for tiers that are never scheduled automatically.
pub fn weekday_assignment(tier: Tier, early_start: bool) -> Option<(DayTasks, &'static str)> {
    match tier {
        Tier::Tier3 => Some((
            DayTasks::new(Task::Crm, Task::Call),
            if early_start { EARLY_SHIFT } else { REGULAR_SHIFT },
        )),
        Tier::Tier2 => Some((DayTasks::new(Task::Call, Task::Crm), REGULAR_SHIFT)),
        Tier::Tier1 => Some((DayTasks::new(Task::Crm, Task::Crm), REGULAR_SHIFT)),
        Tier::Compliance => None,
    }
}

/// Assignment for the single tier3 duty agent on a Saturday.
pub fn saturday_assignment() -> (DayTasks, &'static str) {
    (DayTasks::new(Task::Call, Task::Crm), REGULAR_SHIFT)
}

/// A guaranteed assignment for a named agent, applied on every open day
/// except Monday, independent of tier logic. Agents named here are
/// excluded from the regular tier pools entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialAssignment {
    pub agent_id: AgentId,
    pub tasks: DayTasks,
    pub shift: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPolicy {
    pub special_assignments: Vec<SpecialAssignment>,
    /// Agent ids excluded from automatic scheduling regardless of the
    /// role field stored in the directory.
    pub admin_allowlist: HashSet<AgentId>,
}

#[derive(Debug, Clone, Deserialize)]
struct PolicyFile {
    special_assignments: Vec<SpecialAssignment>,
    admin_allowlist: Vec<AgentId>,
}

impl RosterPolicy {
    /// A policy with no special assignments and an empty allowlist.
    pub fn empty() -> Self {
        Self {
            special_assignments: Vec::new(),
            admin_allowlist: HashSet::new(),
        }
    }

    /// Load from a JSON policy file.
    /// In tests, use RosterPolicy::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: PolicyFile = serde_json::from_str(&content)?;
        Ok(Self {
            special_assignments: file.special_assignments,
            admin_allowlist: file.admin_allowlist.into_iter().collect(),
        })
    }

    /// Policy with hardcoded defaults for use in tests: one special
    /// agent ("special", CALL mornings / CRM afternoons at regular
    /// hours) and an empty admin allowlist.
    pub fn default_test() -> Self {
        Self {
            special_assignments: vec![SpecialAssignment {
                agent_id: "special".into(),
                tasks: DayTasks::new(Task::Call, Task::Crm),
                shift: REGULAR_SHIFT.into(),
            }],
            admin_allowlist: HashSet::new(),
        }
    }

    pub fn is_allowlisted_admin(&self, id: &str) -> bool {
        self.admin_allowlist.contains(id)
    }

    pub fn is_special(&self, id: &str) -> bool {
        self.special_assignments.iter().any(|s| s.agent_id == id)
    }
}
