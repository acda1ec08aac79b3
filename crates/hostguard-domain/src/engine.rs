use crate::escalate::attempt_fix;
use crate::evaluate::{Attempt, check};
use crate::model::{Policy, Rule};
use crate::policy::RunConfig;
use crate::ports::Ports;
use crate::prompt::prompt_request;
use crate::report::{RuleResult, RunOutcome};
use crate::tally::Tally;
use hostguard_types::{Outcome, Verdict};

/// Process every rule of `policy` in declared order, one at a time.
pub fn run(policy: &Policy, cfg: &RunConfig, ports: &mut Ports<'_>) -> RunOutcome {
    let mut out = RunOutcome::default();

    for (index, rule) in policy.rules.iter().enumerate() {
        let result = process_rule(index, rule, cfg, ports, &mut out.tally, &mut out.unresolved);
        out.tally.record(result.outcome);
        out.results.push(result);
    }

    if out.unresolved.is_empty() {
        ports
            .reporter
            .debug("List of rules needing manual remediation is empty.");
    }

    out
}

fn process_rule(
    index: usize,
    rule: &Rule,
    cfg: &RunConfig,
    ports: &mut Ports<'_>,
    tally: &mut Tally,
    unresolved: &mut Vec<usize>,
) -> RuleResult {
    let number = index + 1;
    let verdict = check(rule, number, cfg, ports, Attempt::Initial);
    let result = |outcome| RuleResult {
        index,
        verdict,
        outcome,
    };

    match verdict {
        Verdict::ExplicitPass => return result(Outcome::PassedNoFix),
        Verdict::AllSkipped => return result(Outcome::CheckSkipped),
        Verdict::ExplicitFail | Verdict::NoPass => {}
    }

    if !cfg.apply_fixes {
        return result(Outcome::FixSkipped);
    }

    if !rule.has_automatic_fix() {
        record_manual(index, rule, ports, unresolved);
        return result(Outcome::NoFix);
    }

    if cfg.prompt_before_fix
        && let Some(request) = prompt_request(rule, cfg)
        && !ports.prompter.confirm(&request.question(), request.default_yes)
    {
        ports
            .reporter
            .debug(&format!("User declined fix for check #{number}"));
        return result(Outcome::FixDeclined);
    }

    let fixed = attempt_fix(rule, number, cfg, ports, tally);
    ports
        .reporter
        .debug(&format!("Value of fixed is: {fixed}"));
    if fixed {
        return result(Outcome::PassedAfterFix);
    }

    record_manual(index, rule, ports, unresolved);
    result(Outcome::FixFailed)
}

fn record_manual(index: usize, rule: &Rule, ports: &mut Ports<'_>, unresolved: &mut Vec<usize>) {
    if rule.manual_instructions.is_some() {
        unresolved.push(index);
    } else {
        ports.reporter.debug(&format!(
            "Could not satisfy check #{} but no manual fix specified.",
            index + 1
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::ComparisonMode;
    use crate::model::Test;
    use crate::test_support::{
        FakeHost, RecordingReporter, ScriptedPrompter, exact, rule, rule_with,
    };
    use hostguard_types::Confidence;

    struct Harness {
        host: FakeHost,
        prompter: ScriptedPrompter,
        reporter: RecordingReporter,
    }

    impl Harness {
        fn new(host: FakeHost) -> Self {
            Self {
                host,
                prompter: ScriptedPrompter::default(),
                reporter: RecordingReporter::default(),
            }
        }

        fn run(&mut self, policy: &Policy, cfg: &RunConfig) -> RunOutcome {
            let mut ports = Ports {
                runner: &mut self.host,
                prompter: &mut self.prompter,
                reporter: &mut self.reporter,
            };
            run(policy, cfg, &mut ports)
        }
    }

    fn no_prompt() -> RunConfig {
        RunConfig {
            prompt_before_fix: false,
            ..RunConfig::default()
        }
    }

    #[test]
    fn scenario_a_case_insensitive_exact_pass() {
        let t = Test::new("defaults read x", ComparisonMode::ExactMatch, false, Some("1"), None)
            .unwrap();
        let policy = Policy {
            rules: vec![rule_with(Confidence::Required, vec![t])],
        };
        let mut h = Harness::new(FakeHost::default().output("defaults read x", "1"));

        let out = h.run(&policy, &RunConfig::default());

        assert_eq!(out.tally.pass_no_fix, 1);
        assert_eq!(out.tally.check_number, 1);
        assert!(out.unresolved.is_empty());
        assert_eq!(out.results[0].outcome, Outcome::PassedNoFix);
        assert_eq!(h.reporter.checks, vec![(1, Verdict::ExplicitPass)]);
    }

    #[test]
    fn scenario_b_manual_only_rule_is_unresolved() {
        let policy = Policy {
            rules: vec![
                rule(vec![exact("check", Some("on"), Some("off"))])
                    .with_manual_instructions("See https://example.com/howto"),
            ],
        };
        let mut h = Harness::new(FakeHost::default().output("check", "unknown"));

        let out = h.run(&policy, &RunConfig::default());

        assert_eq!(out.results[0].verdict, Verdict::NoPass);
        assert_eq!(out.unresolved, vec![0]);
        let listed: Vec<_> = out.unresolved_rules(&policy).map(|(n, _, m)| (n, m)).collect();
        assert_eq!(listed, vec![(1, "See https://example.com/howto")]);
        assert_eq!(out.tally.fail_no_fix, 1);
        assert_eq!(out.tally.check_number, 1);
    }

    #[test]
    fn scenario_c_declined_experimental_fix_never_escalates() {
        let policy = Policy {
            rules: vec![
                rule_with(Confidence::Experimental, vec![exact("check", Some("1"), None)])
                    .with_fix("fix")
                    .with_privileged_fix("sudo fix"),
            ],
        };
        let mut h = Harness::new(FakeHost::default().output("check", "0").privileged(true));
        h.prompter = ScriptedPrompter::answering(vec![false]);

        let out = h.run(&policy, &RunConfig::default());

        assert_eq!(out.tally.fail_fix_declined, 1);
        assert_eq!(out.tally.check_number, 1);
        assert_eq!(h.host.executed, vec!["check"]);
        assert_eq!(h.prompter.asked.len(), 1);
        assert!(!h.prompter.asked[0].1, "experimental default should be no");
        assert!(h.prompter.asked[0].0.contains("EXPERIMENTAL"));
    }

    #[test]
    fn report_only_mode_never_runs_fixes() {
        let policy = Policy {
            rules: vec![
                rule(vec![exact("check", Some("1"), Some("0"))])
                    .with_fix("fix")
                    .with_manual_instructions("manual"),
            ],
        };
        let mut h = Harness::new(FakeHost::default().output("check", "0"));
        let cfg = RunConfig {
            apply_fixes: false,
            ..RunConfig::default()
        };

        let out = h.run(&policy, &cfg);

        assert_eq!(out.tally.fail_fix_skipped, 1);
        assert_eq!(out.tally.check_number, 1);
        assert!(out.unresolved.is_empty());
        assert_eq!(h.host.executed, vec!["check"]);
        assert!(h.prompter.asked.is_empty());
    }

    #[test]
    fn fix_applied_without_prompt_passes_after_fix() {
        let policy = Policy {
            rules: vec![rule(vec![exact("check", Some("1"), Some("0"))]).with_fix("fix")],
        };
        let mut h = Harness::new(
            FakeHost::default()
                .output("check", "0")
                .effect("fix", "check", "1"),
        );

        let out = h.run(&policy, &no_prompt());

        assert_eq!(out.tally.pass_after_fix, 1);
        assert_eq!(out.results[0].outcome, Outcome::PassedAfterFix);
        assert_eq!(out.results[0].verdict, Verdict::ExplicitFail);
        assert_eq!(
            h.reporter.checks,
            vec![(1, Verdict::ExplicitFail), (1, Verdict::ExplicitPass)]
        );
    }

    #[test]
    fn accepted_prompt_uses_default_for_required_rules() {
        let policy = Policy {
            rules: vec![rule(vec![exact("check", Some("1"), None)]).with_fix("fix")],
        };
        let mut h = Harness::new(
            FakeHost::default()
                .output("check", "0")
                .effect("fix", "check", "1"),
        );

        let out = h.run(&policy, &RunConfig::default());

        assert_eq!(out.tally.pass_after_fix, 1);
        assert_eq!(h.prompter.asked.len(), 1);
        assert!(h.prompter.asked[0].1);
    }

    #[test]
    fn failed_fix_records_manual_instructions_when_present() {
        let policy = Policy {
            rules: vec![
                rule(vec![exact("a", Some("1"), None)])
                    .with_fix("fix-a")
                    .with_manual_instructions("fix a by hand"),
                rule(vec![exact("b", Some("1"), None)]).with_fix("fix-b"),
            ],
        };
        let mut h = Harness::new(FakeHost::default().output("a", "0").output("b", "0"));

        let out = h.run(&policy, &no_prompt());

        assert_eq!(out.tally.fail_fix_fail, 2);
        assert_eq!(out.unresolved, vec![0]);
        assert!(
            h.reporter
                .debug
                .iter()
                .any(|l| l.contains("check #2 but no manual fix specified"))
        );
    }

    #[test]
    fn privilege_fault_counts_as_fix_failure() {
        let policy = Policy {
            rules: vec![
                rule(vec![exact("check", Some("1"), None)])
                    .with_privileged_fix("sudo fix")
                    .with_manual_instructions("ask an admin"),
            ],
        };
        let mut h = Harness::new(FakeHost::default().output("check", "0").privileged(false));

        let out = h.run(&policy, &no_prompt());

        assert_eq!(out.tally.fail_fix_fail, 1);
        assert_eq!(out.tally.fix_skipped_no_privilege, 1);
        assert_eq!(out.unresolved, vec![0]);
    }

    #[test]
    fn all_skipped_rules_are_tallied_as_skipped() {
        let policy = Policy {
            rules: vec![rule(vec![exact("sudo check", Some("1"), None)]).with_fix("fix")],
        };
        let mut h = Harness::new(FakeHost::default());
        let cfg = RunConfig {
            skip_privileged_checks: true,
            ..RunConfig::default()
        };

        let out = h.run(&policy, &cfg);

        assert_eq!(out.tally.check_skipped, 1);
        assert!(h.host.executed.is_empty());
        assert_eq!(h.reporter.checks, vec![(1, Verdict::AllSkipped)]);
    }

    #[test]
    fn rules_are_processed_in_order_and_numbered_from_one() {
        let policy = Policy {
            rules: vec![
                rule(vec![exact("one", Some("1"), None)]),
                rule(vec![exact("two", Some("1"), None)]),
                rule(vec![exact("three", Some("1"), None)]),
            ],
        };
        let mut h = Harness::new(
            FakeHost::default()
                .output("one", "1")
                .output("two", "0")
                .output("three", "1"),
        );

        let out = h.run(&policy, &RunConfig::default());

        assert_eq!(h.host.executed, vec!["one", "two", "three"]);
        let numbers: Vec<_> = out.results.iter().map(|r| r.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(out.tally.check_number, 3);
        assert_eq!(out.tally.terminal_total(), 3);
    }
}
