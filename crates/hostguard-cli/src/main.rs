//! CLI entry point for hostguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, signals and exit codes.
//! All business logic lives in the `hostguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use hostguard_app::{
    AuditInput, ValidateOutput, format_rule_list, format_validation, run_audit, run_list,
    run_markdown, run_validate, terminate_running_command, write_report, write_text,
};
use hostguard_render::log_note;
use hostguard_settings::Overrides;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hostguard",
    version,
    about = "Audit host configuration against a policy and apply fixes"
)]
struct Cli {
    /// Path to the hostguard settings TOML. A missing file means defaults.
    #[arg(
        long,
        global = true,
        env = "HOSTGUARD_CONFIG",
        default_value = hostguard_settings::DEFAULT_CONFIG_FILE
    )]
    config: Utf8PathBuf,

    /// Policy file (JSON, YAML or TOML). Defaults to hostguard-policy.{yml,yaml,json,toml}.
    #[arg(long, global = true, env = "HOSTGUARD_POLICY")]
    policy: Option<Utf8PathBuf>,

    /// Evaluate only; never run a fix.
    #[arg(long, global = true)]
    report_only: bool,

    /// Apply fixes without asking.
    #[arg(long, global = true)]
    no_prompt: bool,

    /// Write a transcript log file.
    #[arg(long, global = true)]
    write_log: bool,

    /// Transcript log path (implies --write-log).
    #[arg(long, global = true)]
    log_file: Option<Utf8PathBuf>,

    /// Skip tests whose command needs elevated privileges.
    #[arg(long, global = true)]
    skip_privileged: bool,

    /// Increase verbosity (debug lines on stderr and in the log).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Kill policy commands that run longer than this many seconds (0 disables).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Colorize output (auto|always|never).
    #[arg(long, global = true)]
    color: Option<String>,

    /// Where to write the JSON run report.
    #[arg(long, global = true)]
    report_out: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit the host against the policy (the default).
    Check,

    /// Load and validate the policy without running anything.
    Validate,

    /// List the policy's rules and the remediation each offers.
    List,

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.cmd {
        None | Some(Commands::Check) => cmd_check(&cli),
        Some(Commands::Validate) => cmd_validate(&cli),
        Some(Commands::List) => cmd_list(&cli),
        Some(Commands::Md { report, output }) => cmd_md(report, output.as_deref()),
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("hostguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` selects debug and the default is warnings only. Color codes
/// only go to a terminal.
fn init_tracing(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        apply_fixes: cli.report_only.then_some(false),
        prompt: cli.no_prompt.then_some(false),
        write_log: (cli.write_log || cli.log_file.is_some()).then_some(true),
        log_file: cli.log_file.as_ref().map(|p| p.to_string()),
        skip_privileged_checks: cli.skip_privileged.then_some(true),
        verbosity: (cli.verbose > 0).then_some(cli.verbose),
        command_timeout_secs: cli.timeout,
        color: cli.color.clone(),
    }
}

fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(%path, "no settings file; using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config {path}")),
    }
}

fn policy_path(cli: &Cli) -> anyhow::Result<Utf8PathBuf> {
    if let Some(path) = &cli.policy {
        return Ok(path.clone());
    }
    let cwd = std::env::current_dir().context("current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow::anyhow!("current directory is not UTF-8: {}", p.display()))?;
    hostguard_policy::find_default_policy(&cwd).with_context(|| {
        format!(
            "no --policy given and none of {} found in {cwd}",
            hostguard_policy::DEFAULT_POLICY_FILES.join(", ")
        )
    })
}

fn cmd_check(cli: &Cli) -> anyhow::Result<i32> {
    let config_text = read_config(&cli.config)?;
    let policy = policy_path(cli)?;

    install_interrupt_handler();

    let output = run_audit(AuditInput {
        policy_path: &policy,
        config_text: &config_text,
        overrides: overrides(cli),
    })?;

    if let Some(path) = &output.log_path {
        println!();
        println!("{}", log_note(path.as_str(), &output.palette));
    }
    if let Some(out) = &cli.report_out {
        write_report(out, &output.report).context("write report json")?;
    }
    Ok(0)
}

fn cmd_validate(cli: &Cli) -> anyhow::Result<i32> {
    let policy = policy_path(cli)?;
    let output = run_validate(&policy)?;
    print!("{}", format_validation(&policy, &output));
    Ok(match output {
        ValidateOutput::Valid { .. } => 0,
        ValidateOutput::Invalid { .. } => 1,
    })
}

fn cmd_list(cli: &Cli) -> anyhow::Result<i32> {
    let policy = policy_path(cli)?;
    let rules = run_list(&policy)?;
    print!("{}", format_rule_list(&rules));
    Ok(0)
}

fn cmd_md(report: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let md = run_markdown(report)?;
    match output {
        Some(out) => write_text(out, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(0)
}

/// SIGINT or SIGTERM ends the run at once: no summary, status 130. A command running in its
/// own process group is stopped first.
fn install_interrupt_handler() {
    let spawned = std::thread::Builder::new()
        .name("hostguard-signals".to_string())
        .spawn(|| {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(err) => {
                    tracing::warn!("signal handling unavailable: {err}");
                    return;
                }
            };
            runtime.block_on(wait_for_interrupt());
            terminate_running_command();
            println!();
            eprintln!("Exiting");
            std::process::exit(130);
        });
    if let Err(err) = spawned {
        tracing::warn!("signal handling unavailable: {err}");
    }
}

#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(err) => {
            tracing::warn!("cannot listen for SIGTERM: {err}");
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() {
    ctrl_c().await;
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl+C: {err}");
        std::future::pending::<()>().await;
    }
}
