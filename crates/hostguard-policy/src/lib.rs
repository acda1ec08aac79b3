//! Policy file adapters: read a policy from disk and validate it into the domain model.
//!
//! This crate is allowed to do filesystem IO. It never runs any of the commands it loads.

#![forbid(unsafe_code)]

mod error;
mod parse;

use camino::{Utf8Path, Utf8PathBuf};
use hostguard_domain::model::Policy;
use serde_json::Value;
use std::fmt;

pub use error::{PolicyError, RuleIssue};

/// File names tried, in order, when no policy path is given.
pub const DEFAULT_POLICY_FILES: [&str; 4] = [
    "hostguard-policy.yml",
    "hostguard-policy.yaml",
    "hostguard-policy.json",
    "hostguard-policy.toml",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyFormat {
    Json,
    Yaml,
    Toml,
}

impl PolicyFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Utf8Path) -> Result<Self, PolicyError> {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Ok(PolicyFormat::Json),
            Some("yml" | "yaml") => Ok(PolicyFormat::Yaml),
            Some("toml") => Ok(PolicyFormat::Toml),
            _ => Err(PolicyError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl fmt::Display for PolicyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PolicyFormat::Json => "JSON",
            PolicyFormat::Yaml => "YAML",
            PolicyFormat::Toml => "TOML",
        })
    }
}

/// Parse and validate policy text. Fails on the first syntax error, or with every
/// malformed rule at once.
pub fn parse_policy(text: &str, format: PolicyFormat) -> Result<Policy, PolicyError> {
    let syntax = |message: String| PolicyError::Syntax { format, message };
    let doc: Value = match format {
        PolicyFormat::Json => serde_json::from_str(text).map_err(|e| syntax(e.to_string()))?,
        PolicyFormat::Yaml => serde_yaml::from_str(text).map_err(|e| syntax(e.to_string()))?,
        PolicyFormat::Toml => toml::from_str(text).map_err(|e| syntax(e.to_string()))?,
    };
    parse::build_policy(&doc)
}

pub fn load_policy(path: &Utf8Path) -> Result<Policy, PolicyError> {
    let format = PolicyFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_policy(&text, format)
}

/// First of [`DEFAULT_POLICY_FILES`] that exists in `dir`.
pub fn find_default_policy(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    DEFAULT_POLICY_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}
