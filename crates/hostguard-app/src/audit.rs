//! The `check` use case: audit the host against a policy and produce a report.

use crate::console::{ConsolePrompter, ConsoleReporter};
use crate::logfile::LogFile;
use crate::shell::ShellRunner;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use hostguard_domain::model::Policy;
use hostguard_domain::policy::RunConfig;
use hostguard_domain::ports::Ports;
use hostguard_domain::report::RunOutcome;
use hostguard_render::{Palette, banner, render_tally, render_unresolved};
use hostguard_settings::{ColorChoice, HostguardConfigV1, Overrides, ResolvedConfig};
use hostguard_types::{
    RuleRecord, RunMeta, RunReport, RunSettings, SCHEMA_RUN_REPORT_V1, ToolMeta,
    UnresolvedEntry,
};
use std::io::IsTerminal;
use time::OffsetDateTime;

/// Input for the audit use case.
#[derive(Clone, Debug)]
pub struct AuditInput<'a> {
    pub policy_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
}

/// Output from the audit use case.
#[derive(Clone, Debug)]
pub struct AuditOutput {
    pub report: RunReport,
    pub resolved_config: ResolvedConfig,
    /// Transcript file, when logging was on.
    pub log_path: Option<Utf8PathBuf>,
    pub palette: Palette,
}

/// Resolve settings from the config text and overrides.
pub fn resolve_settings(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        HostguardConfigV1::default()
    } else {
        hostguard_settings::parse_config_toml(config_text).context("parse config")?
    };
    hostguard_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Run the audit with the real shell, terminal and log file.
pub fn run_audit(input: AuditInput<'_>) -> anyhow::Result<AuditOutput> {
    let resolved = resolve_settings(input.config_text, input.overrides)?;
    let policy = hostguard_policy::load_policy(input.policy_path)
        .with_context(|| format!("load policy {}", input.policy_path))?;

    let palette = palette_for(resolved.output.color, std::io::stdout().is_terminal());
    let log = if resolved.run.write_log {
        let path = match &resolved.output.log_file {
            Some(file) => Utf8PathBuf::from(file),
            None => LogFile::timestamped_path(
                Utf8Path::new(&resolved.output.log_dir),
                OffsetDateTime::now_utc(),
            ),
        };
        Some(LogFile::open(&path)?)
    } else {
        None
    };
    let log_path = log.as_ref().map(|l| l.path().to_path_buf());
    let log_debug = resolved.run.verbosity > 0 || resolved.output.log_debug_always;

    let mut runner = ShellRunner::new(resolved.shell.clone());
    let mut prompter = ConsolePrompter::detect();
    let mut reporter = ConsoleReporter::new(std::io::stdout(), palette.clone(), log, log_debug);
    let mut ports = Ports {
        runner: &mut runner,
        prompter: &mut prompter,
        reporter: &mut reporter,
    };

    let report = audit_with(
        &policy,
        Some(input.policy_path.as_str()),
        &resolved.run,
        &palette,
        &mut ports,
    );

    Ok(AuditOutput {
        report,
        resolved_config: resolved,
        log_path,
        palette,
    })
}

/// Run the engine over `policy` through the given ports, printing the banner and closing
/// summary, and return the report.
pub fn audit_with(
    policy: &Policy,
    policy_label: Option<&str>,
    cfg: &RunConfig,
    palette: &Palette,
    ports: &mut Ports<'_>,
) -> RunReport {
    let started_at = OffsetDateTime::now_utc();

    ports.reporter.line(&banner(env!("CARGO_PKG_VERSION"), palette));
    ports.reporter.debug(&format!("VERBOSITY: {}", cfg.verbosity));
    ports.reporter.debug(&format!("LOG: {}", cfg.write_log));
    ports.reporter.debug(&format!("PROMPT: {}", cfg.prompt_before_fix));
    ports.reporter.debug(&format!("APPLY: {}", cfg.apply_fixes));
    ports
        .reporter
        .debug(&format!("SKIP PRIVILEGED: {}", cfg.skip_privileged_checks));

    let outcome = hostguard_domain::run(policy, cfg, ports);
    let finished_at = OffsetDateTime::now_utc();

    let report = build_report(policy, cfg, &outcome, policy_label, started_at, finished_at);

    ports.reporter.line("");
    ports.reporter.line(&render_tally(&report.tally, palette));
    if report.unresolved.is_empty() {
        ports.reporter.line("No rules need manual remediation.");
    } else {
        ports
            .reporter
            .line(&render_unresolved(&report.unresolved, palette));
    }

    report
}

pub fn build_report(
    policy: &Policy,
    cfg: &RunConfig,
    outcome: &RunOutcome,
    policy_label: Option<&str>,
    started_at: OffsetDateTime,
    finished_at: OffsetDateTime,
) -> RunReport {
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;

    let rules = outcome
        .results
        .iter()
        .filter_map(|r| {
            let rule = policy.rules.get(r.index)?;
            Some(RuleRecord {
                number: r.number() as u32,
                description: rule.description.clone(),
                confidence: rule.confidence,
                verdict: r.verdict,
                outcome: r.outcome,
            })
        })
        .collect();

    let unresolved = outcome
        .unresolved_rules(policy)
        .map(|(number, rule, manual)| UnresolvedEntry {
            number: number as u32,
            description: rule.description.clone(),
            manual: manual.to_string(),
        })
        .collect();

    RunReport {
        schema: SCHEMA_RUN_REPORT_V1.to_string(),
        tool: ToolMeta::hostguard(env!("CARGO_PKG_VERSION")),
        run: RunMeta {
            started_at,
            finished_at,
            duration_ms: Some(duration_ms),
            policy: policy_label.map(str::to_string),
        },
        settings: RunSettings {
            apply_fixes: cfg.apply_fixes,
            prompt_before_fix: cfg.prompt_before_fix,
            skip_privileged_checks: cfg.skip_privileged_checks,
        },
        tally: outcome.tally.counts(),
        rules,
        unresolved,
    }
}

pub fn palette_for(choice: ColorChoice, is_terminal: bool) -> Palette {
    match choice {
        ColorChoice::Always => Palette::ansi(),
        ColorChoice::Never => Palette::plain(),
        ColorChoice::Auto if is_terminal => Palette::ansi(),
        ColorChoice::Auto => Palette::plain(),
    }
}
