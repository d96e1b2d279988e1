//! roster-core — deterministic shift scheduling for the agency desk.
//!
//! The generator assigns agents to CALL/CRM half-day tasks per calendar
//! day across a date range, driven by tier rules, day-of-week rules,
//! and policy-injected special assignments. Generation is a pure
//! function; persistence is a single clear-and-rewrite transaction
//! against the SQLite store.

pub mod agent;
pub mod entry;
pub mod error;
pub mod policy;
pub mod scheduler;
pub mod store;
pub mod types;
