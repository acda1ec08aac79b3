use crate::{defaults, model::HostguardConfigV1};
use hostguard_domain::policy::RunConfig;
use std::time::Duration;

/// Values given on the command line or through the environment. They win over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub apply_fixes: Option<bool>,
    pub prompt: Option<bool>,
    pub write_log: Option<bool>,
    pub log_file: Option<String>,
    pub skip_privileged_checks: Option<bool>,
    pub verbosity: Option<u8>,
    pub command_timeout_secs: Option<u64>,
    pub color: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSettings {
    pub log_dir: String,
    pub log_file: Option<String>,
    pub log_debug_always: bool,
    pub color: ColorChoice,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellSettings {
    pub shell: String,
    pub prelude: Option<String>,
    pub privilege_probe: String,
    pub timeout: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub run: RunConfig,
    pub output: OutputSettings,
    pub shell: ShellSettings,
}

pub fn resolve_config(
    cfg: HostguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let builtin = RunConfig::default();

    let run = RunConfig {
        apply_fixes: overrides
            .apply_fixes
            .or(cfg.apply_fixes)
            .unwrap_or(builtin.apply_fixes),
        prompt_before_fix: overrides
            .prompt
            .or(cfg.prompt)
            .unwrap_or(builtin.prompt_before_fix),
        write_log: overrides
            .write_log
            .or(cfg.write_log)
            .unwrap_or(builtin.write_log),
        skip_privileged_checks: overrides
            .skip_privileged_checks
            .or(cfg.skip_privileged_checks)
            .unwrap_or(builtin.skip_privileged_checks),
        verbosity: overrides
            .verbosity
            .or(cfg.verbosity)
            .unwrap_or(builtin.verbosity),
        fix_recommended_by_default: cfg
            .fix_recommended_by_default
            .unwrap_or(builtin.fix_recommended_by_default),
        fix_experimental_by_default: cfg
            .fix_experimental_by_default
            .unwrap_or(builtin.fix_experimental_by_default),
        warn_for_recommended: cfg
            .warn_for_recommended
            .unwrap_or(builtin.warn_for_recommended),
        warn_for_experimental: cfg
            .warn_for_experimental
            .unwrap_or(builtin.warn_for_experimental),
    };

    let color = match overrides.color.as_deref().or(cfg.color.as_deref()) {
        Some(v) => parse_color(v)?,
        None => ColorChoice::default(),
    };
    let output = OutputSettings {
        log_dir: cfg.log_dir.unwrap_or_else(|| defaults::LOG_DIR.to_string()),
        log_file: overrides.log_file.or(cfg.log_file),
        log_debug_always: cfg.log_debug_always.unwrap_or(defaults::LOG_DEBUG_ALWAYS),
        color,
    };

    let shell = ShellSettings {
        shell: non_empty("shell", cfg.shell, defaults::SHELL)?,
        prelude: cfg.prelude.filter(|p| !p.trim().is_empty()),
        privilege_probe: non_empty("privilege_probe", cfg.privilege_probe, defaults::PRIVILEGE_PROBE)?,
        timeout: overrides
            .command_timeout_secs
            .or(cfg.command_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
    };

    Ok(ResolvedConfig { run, output, shell })
}

fn non_empty(key: &str, value: Option<String>, default: &str) -> anyhow::Result<String> {
    match value {
        None => Ok(default.to_string()),
        Some(v) if v.trim().is_empty() => anyhow::bail!("{key} must not be empty"),
        Some(v) => Ok(v),
    }
}

fn parse_color(v: &str) -> anyhow::Result<ColorChoice> {
    match v {
        "auto" => Ok(ColorChoice::Auto),
        "always" => Ok(ColorChoice::Always),
        "never" => Ok(ColorChoice::Never),
        other => anyhow::bail!("unknown color: {other} (expected auto|always|never)"),
    }
}
