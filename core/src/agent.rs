//! Agent directory records.
//!
//! Tier is the sole driver of scheduling eligibility and task
//! assignment. The stored tier column may hold NULL or a value written
//! by an older directory version; both decode as tier2.

use crate::types::AgentId;
use serde::{Deserialize, Serialize};

/// Scheduling tier of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
    /// Compliance agents are never scheduled automatically.
    Compliance,
}

impl Tier {
    /// Decode a stored tier value. Unknown or missing values fall back
    /// to tier2 — the documented directory default, never an error.
    pub fn from_stored(value: Option<&str>) -> Tier {
        match value {
            Some("tier1") => Tier::Tier1,
            Some("tier3") => Tier::Tier3,
            Some("compliance") => Tier::Compliance,
            _ => Tier::Tier2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Tier1 => "tier1",
            Tier::Tier2 => "tier2",
            Tier::Tier3 => "tier3",
            Tier::Compliance => "compliance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn from_stored(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub tier: Tier,
    pub role: Role,
}

impl Agent {
    pub fn new(id: impl Into<AgentId>, name: impl Into<String>, tier: Tier, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            role,
        }
    }
}
