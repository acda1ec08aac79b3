use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `hostguard.toml` schema v1.
///
/// This is a *user-facing* config model: every key is optional and falls back to a built-in
/// default, so an empty file is a valid config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HostguardConfigV1 {
    /// Optional schema string for tooling (`hostguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Attempt fixes for failing rules. `false` is report-only mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_fixes: Option<bool>,

    /// Ask before running each fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<bool>,

    /// Append the transcript to a log file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_log: Option<bool>,

    /// Directory for timestamped log files (default: working directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Fixed log file path; takes precedence over `log_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,

    /// Persist debug lines to the log file even at verbosity 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_debug_always: Option<bool>,

    /// Do not execute tests whose command needs elevated privileges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_privileged_checks: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<u8>,

    /// Default prompt answer for recommended fixes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_recommended_by_default: Option<bool>,

    /// Default prompt answer for experimental fixes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_experimental_by_default: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_for_recommended: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_for_experimental: Option<bool>,

    /// Shell used to run every command with `-c`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,

    /// Script sourced before every command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prelude: Option<String>,

    /// Command printing `0` when the user cannot run privileged commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege_probe: Option<String>,

    /// Kill commands running longer than this; `0` disables the limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,

    /// `auto` (default), `always` or `never`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
