use crate::PolicyFormat;
use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("read policy {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot tell the policy format of {path} (expected .json, .yml, .yaml or .toml)")]
    UnknownFormat { path: Utf8PathBuf },

    #[error("parse {format} policy: {message}")]
    Syntax {
        format: PolicyFormat,
        message: String,
    },

    #[error("policy must be a list of rules or a table with a `rules` list")]
    Shape,

    #[error("{} invalid rule(s):\n{}", .issues.len(), render_issues(.issues))]
    Invalid { issues: Vec<RuleIssue> },
}

impl PolicyError {
    /// Every validation problem, empty for IO and syntax errors.
    pub fn issues(&self) -> &[RuleIssue] {
        match self {
            PolicyError::Invalid { issues } => issues,
            _ => &[],
        }
    }
}

/// One problem with one policy entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleIssue {
    /// 1-based position of the entry in the file, comment entries included.
    pub entry: usize,
    /// Dotted path of the offending field, e.g. `tests[0].type`.
    pub field: String,
    pub message: String,
}

impl RuleIssue {
    pub(crate) fn new(entry: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entry,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "entry #{}: {}", self.entry, self.message)
        } else {
            write!(f, "entry #{}: {}: {}", self.entry, self.field, self.message)
        }
    }
}

fn render_issues(issues: &[RuleIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}
