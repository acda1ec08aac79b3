//! Stable identifiers for the policy file format and tool metadata.
//!
//! Policy keys are part of the on-disk contract: renaming one breaks every existing policy.

pub const TOOL_NAME: &str = "hostguard";

// Rule keys
pub const KEY_COMMENT: &str = "_comment";
pub const KEY_DESCRIPTION: &str = "description";
pub const KEY_CONFIDENCE: &str = "confidence";
pub const KEY_TESTS: &str = "tests";
pub const KEY_FIX: &str = "fix";

// Test keys
pub const KEY_TYPE: &str = "type";
pub const KEY_COMMAND: &str = "command";
pub const KEY_CASE_SENSITIVE: &str = "case_sensitive";
pub const KEY_COMMAND_PASS: &str = "command_pass";
pub const KEY_COMMAND_FAIL: &str = "command_fail";

// Fix keys (`command` is shared with tests)
pub const KEY_SUDO_COMMAND: &str = "sudo_command";
pub const KEY_MANUAL: &str = "manual";

// Top-level wrapper key for object-shaped policies (`{ "rules": [...] }`, TOML `[[rules]]`).
pub const KEY_RULES: &str = "rules";

// Confidence values
pub const CONFIDENCE_REQUIRED: &str = "required";
pub const CONFIDENCE_RECOMMENDED: &str = "recommended";
pub const CONFIDENCE_EXPERIMENTAL: &str = "experimental";

// Comparison types
pub const TYPE_EXACT_MATCH: &str = "exact match";
pub const TYPE_REGEX_MATCH: &str = "regex match";
