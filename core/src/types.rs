//! Shared primitive types used across the roster crate.

/// A stable, unique identifier for an agent in the directory.
pub type AgentId = String;

/// Store-generated identifier for a schedule entry.
pub type EntryId = String;
