//! Use case orchestration for hostguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, policy,
//! settings and render layers, plus the system adapters (shell, terminal, log file) the domain
//! reaches through its ports.
//!
//! The CLI crate depends on this; it only handles argument parsing and process concerns.

#![deny(unsafe_code)]

mod audit;
mod console;
mod inspect;
mod logfile;
mod report;
mod shell;

pub use audit::{
    AuditInput, AuditOutput, audit_with, build_report, palette_for, resolve_settings, run_audit,
};
pub use console::{ConsolePrompter, ConsoleReporter};
pub use inspect::{
    RuleSummary, ValidateOutput, format_rule_list, format_validation, run_list, run_validate,
    summarize,
};
pub use logfile::LogFile;
pub use report::{
    parse_report_json, run_markdown, serialize_report, write_report, write_text,
};
pub use shell::{MAX_OUTPUT_BYTES, ShellRunner, terminate_running_command};
