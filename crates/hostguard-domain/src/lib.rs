//! Pure rule evaluation (no IO).
//!
//! Input: a policy model constructed elsewhere, a run config, and the ports through which
//! commands run, questions are asked, and the transcript is written.
//! Output: a tally, one result per rule, and the list of rules left for manual remediation.

#![forbid(unsafe_code)]

pub mod matcher;
pub mod model;
pub mod policy;
pub mod ports;
pub mod prompt;
pub mod report;
pub mod tally;

mod engine;
mod escalate;
mod evaluate;

pub use engine::run;
pub use escalate::attempt_fix;
pub use evaluate::evaluate;
pub use matcher::{MatchError, matches};

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
