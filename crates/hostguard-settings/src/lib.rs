//! Config parsing and resolution into the run settings.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod defaults;
mod model;
mod resolve;

pub use model::HostguardConfigV1;
pub use resolve::{ColorChoice, OutputSettings, Overrides, ResolvedConfig, ShellSettings};

/// Default settings file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hostguard.toml";

/// Parse `hostguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<HostguardConfigV1> {
    let cfg: HostguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective settings: overrides, then the config file, then built-in defaults.
pub fn resolve_config(
    cfg: HostguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
