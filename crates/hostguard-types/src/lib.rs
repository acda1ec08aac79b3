//! Stable DTOs and IDs used across the hostguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted run report
//! - the closed vocabularies shared by every layer (confidence, verdict, outcome)
//! - stable string keys of the policy file format

#![forbid(unsafe_code)]

pub mod ids;
pub mod receipt;

pub use receipt::{
    Confidence, Outcome, RuleRecord, RunMeta, RunReport, RunSettings, SCHEMA_RUN_REPORT_V1,
    TallyCounts, ToolMeta, UnresolvedEntry, Verdict,
};
