//! Schedule entries — one agent's assignment for one calendar day.

use crate::error::{RosterError, RosterResult};
use crate::types::{AgentId, EntryId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Regular agency hours.
pub const REGULAR_SHIFT: &str = "09:00-18:00";

/// Early start used by tier3 agents on Wednesdays.
pub const EARLY_SHIFT: &str = "08:00-18:00";

/// A half-day task slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Task {
    Call,
    Crm,
}

impl Task {
    pub fn from_stored(value: &str) -> RosterResult<Task> {
        match value {
            "CALL" => Ok(Task::Call),
            "CRM" => Ok(Task::Crm),
            other => Err(RosterError::UnknownTask(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Call => "CALL",
            Task::Crm => "CRM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTasks {
    pub morning: Task,
    pub afternoon: Task,
}

impl DayTasks {
    pub const fn new(morning: Task, afternoon: Task) -> Self {
        Self { morning, afternoon }
    }
}

/// One agent's assignment for one calendar day.
/// Invariant: at most one entry per (agent_id, date) per generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub agent_id: AgentId,
    pub date: NaiveDate,
    pub shift: String,
    pub tasks: DayTasks,
}

impl ScheduleEntry {
    /// Build a new entry with a freshly generated id.
    pub fn new(agent_id: &str, date: NaiveDate, shift: &str, tasks: DayTasks) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent_id.to_string(),
            date,
            shift: shift.to_string(),
            tasks,
        }
    }
}
