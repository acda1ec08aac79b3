use crate::model::{Rule, Test};
use crate::policy::RunConfig;
use crate::ports::{CommandRunner, Ports, Reporter};
use hostguard_types::Verdict;

/// Evaluate a rule's tests in declared order and reduce them to one verdict.
///
/// The first test to explicitly pass or fail decides the rule. Tests that need privilege are
/// skipped (not executed) when `skip_privileged` is set; if nothing ran at all the rule is
/// `AllSkipped`, otherwise it falls through to `NoPass`.
pub fn evaluate(
    rule: &Rule,
    runner: &mut dyn CommandRunner,
    skip_privileged: bool,
    reporter: &mut dyn Reporter,
) -> Verdict {
    let mut result = Verdict::AllSkipped;

    for test in rule.tests() {
        if test.requires_privilege() {
            if skip_privileged {
                reporter.debug(&format!(
                    "Skipping test because privileged checks are skipped: '{}'",
                    test.command
                ));
                continue;
            }
            reporter.line(&format!(
                "The next configuration check requires elevated privileges; you may be \
                 prompted for your password below. The command to be executed is: '{}'",
                test.command
            ));
        }

        result = execute_test(test, runner, reporter);
        match result {
            Verdict::ExplicitPass => {
                reporter.debug(&format!("Test passed explicitly for '{}'", test.command));
                break;
            }
            Verdict::ExplicitFail => {
                reporter.debug(&format!("Test failed explicitly for '{}'", test.command));
                break;
            }
            _ => reporter.debug(&format!("Test did not pass for '{}'", test.command)),
        }
    }

    result
}

fn execute_test(test: &Test, runner: &mut dyn CommandRunner, reporter: &mut dyn Reporter) -> Verdict {
    let raw = runner.run(&test.command);
    let output = raw.trim_end();

    reporter.debug(&format!("Result of command: '{output}'"));
    reporter.debug(&format!(
        "Explicit pass condition for command: '{}'",
        test.expected_on_pass().map(|e| e.as_str()).unwrap_or("None")
    ));
    reporter.debug(&format!(
        "Explicit fail condition for command: '{}'",
        test.expected_on_fail().map(|e| e.as_str()).unwrap_or("None")
    ));

    if test.expected_on_fail().is_some_and(|e| e.matches(output)) {
        return Verdict::ExplicitFail;
    }
    if test.expected_on_pass().is_some_and(|e| e.matches(output)) {
        return Verdict::ExplicitPass;
    }
    Verdict::NoPass
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Attempt {
    /// First look at the rule, before any fix.
    Initial,
    /// Re-check after the plain fix; a failure here is not reported since escalation follows.
    AfterFix,
    /// Re-check after the privileged fix; nothing else will be tried.
    Final,
}

/// Evaluate and report one rule. `number` is the 1-based rule number shown to the user.
pub(crate) fn check(
    rule: &Rule,
    number: usize,
    cfg: &RunConfig,
    ports: &mut Ports<'_>,
    attempt: Attempt,
) -> Verdict {
    let verdict = evaluate(
        rule,
        &mut *ports.runner,
        cfg.skip_privileged_checks,
        &mut *ports.reporter,
    );

    if verdict == Verdict::ExplicitPass || attempt != Attempt::AfterFix {
        ports
            .reporter
            .check_result(number, &rule.description, verdict);
    }

    if attempt == Attempt::Final && verdict.is_failure() && cfg.warns_for(rule.confidence) {
        ports.reporter.warning("Attempted fix FAILED!");
    }

    verdict
}
