use crate::evaluate::{Attempt, check};
use crate::model::Rule;
use crate::policy::RunConfig;
use crate::ports::Ports;
use crate::tally::Tally;
use hostguard_types::Verdict;

/// Try to remediate a failed rule; returns whether it passes afterwards.
///
/// Escalation order: the plain fix (re-checked quietly), then the privileged fix (re-checked
/// as the final attempt). The privileged fix only runs when the plain path did not end in an
/// explicit pass, and only when the user holds privilege; otherwise
/// `fix_skipped_no_privilege` is bumped and nothing runs.
pub fn attempt_fix(
    rule: &Rule,
    number: usize,
    cfg: &RunConfig,
    ports: &mut Ports<'_>,
    tally: &mut Tally,
) -> bool {
    ports
        .reporter
        .debug(&format!("Attempting fix for check #{number}"));

    if let Some(fix) = rule.fix.as_deref() {
        run_fix(ports, fix);
        if check(rule, number, cfg, ports, Attempt::AfterFix) == Verdict::ExplicitPass {
            return true;
        }
    }

    let Some(privileged_fix) = rule.privileged_fix.as_deref() else {
        return false;
    };

    ports.reporter.line(
        "\tAttempting configuration fix with elevated privileges; you may be prompted for \
         your password...",
    );
    if !ports.runner.has_privilege() {
        ports.reporter.line(&format!(
            "User lacks elevated privileges, and therefore need not attempt this fix: '{privileged_fix}'"
        ));
        tally.fix_skipped_no_privilege += 1;
        return false;
    }

    run_fix(ports, privileged_fix);
    check(rule, number, cfg, ports, Attempt::Final) == Verdict::ExplicitPass
}

fn run_fix(ports: &mut Ports<'_>, command: &str) {
    let output = ports.runner.run(command);
    ports
        .reporter
        .debug(&format!("Fix command executed: '{command}'"));
    ports
        .reporter
        .debug(&format!("Fix command output: '{}'", output.trim_end()));
}
