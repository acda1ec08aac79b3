use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for hostguard run reports.
pub const SCHEMA_RUN_REPORT_V1: &str = "hostguard.report.v1";

/// Likelihood that applying a rule's fix causes side effects elsewhere.
///
/// Ordered from least to most risky.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Required,
    Recommended,
    Experimental,
}

impl Confidence {
    pub fn parse(v: &str) -> Option<Self> {
        match v {
            ids::CONFIDENCE_REQUIRED => Some(Confidence::Required),
            ids::CONFIDENCE_RECOMMENDED => Some(Confidence::Recommended),
            ids::CONFIDENCE_EXPERIMENTAL => Some(Confidence::Experimental),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Required => ids::CONFIDENCE_REQUIRED,
            Confidence::Recommended => ids::CONFIDENCE_RECOMMENDED,
            Confidence::Experimental => ids::CONFIDENCE_EXPERIMENTAL,
        }
    }
}

/// Result of evaluating a single test, and by reduction a whole rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ExplicitPass,
    ExplicitFail,
    NoPass,
    AllSkipped,
}

impl Verdict {
    /// `NoPass` is handled exactly like an explicit failure downstream.
    pub fn is_failure(self) -> bool {
        matches!(self, Verdict::ExplicitFail | Verdict::NoPass)
    }
}

/// Terminal state of one rule within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PassedNoFix,
    PassedAfterFix,
    FixFailed,
    FixDeclined,
    /// Report-only mode: the rule failed and no fix was attempted.
    FixSkipped,
    /// Every test of the rule was skipped (privileged tests in skip mode).
    CheckSkipped,
    /// The rule failed and carries no fix command at all.
    NoFix,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

impl ToolMeta {
    pub fn hostguard(version: &str) -> Self {
        Self {
            name: ids::TOOL_NAME.to_string(),
            version: version.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Policy file the rules were loaded from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

/// Snapshot of the run-mode switches that shaped the outcomes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunSettings {
    pub apply_fixes: bool,
    pub prompt_before_fix: bool,
    pub skip_privileged_checks: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TallyCounts {
    pub checks: u32,
    pub pass_no_fix: u32,
    pub pass_after_fix: u32,
    pub fail_fix_fail: u32,
    pub fail_fix_skipped: u32,
    pub fail_fix_declined: u32,
    pub fail_no_fix: u32,
    pub check_skipped: u32,
    /// Sub-count of `fail_fix_fail`: privileged fixes not attempted for lack of privilege.
    pub fix_skipped_no_privilege: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleRecord {
    /// 1-based position of the rule in the policy (comment entries excluded).
    pub number: u32,
    pub description: String,
    pub confidence: Confidence,
    /// Verdict of the initial evaluation, before any fix.
    pub verdict: Verdict,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UnresolvedEntry {
    pub number: u32,
    pub description: String,
    pub manual: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    /// Versioned schema identifier for the report shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub settings: RunSettings,
    pub tally: TallyCounts,
    pub rules: Vec<RuleRecord>,
    #[serde(default)]
    pub unresolved: Vec<UnresolvedEntry>,
}
