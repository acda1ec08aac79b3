//! Property-based tests for the domain crate.
//!
//! Invariants covered:
//! - exact matching is equality modulo the case flag
//! - pattern matching never matches text that does not start with a literal pattern
//! - every processed rule lands in exactly one terminal counter

use crate::engine::run;
use crate::matcher::{ComparisonMode, matches};
use crate::model::Policy;
use crate::policy::RunConfig;
use crate::ports::Ports;
use crate::test_support::{FakeHost, RecordingReporter, ScriptedPrompter, exact, rule};
use proptest::prelude::*;

fn arb_word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9]{1,12}").unwrap()
}

/// One generated rule: what its check prints now, what it prints after the fix, and which
/// remediation paths it offers.
#[derive(Clone, Debug)]
struct RuleShape {
    initial: u8,
    after_fix: u8,
    has_fix: bool,
    has_privileged_fix: bool,
    has_manual: bool,
}

fn arb_shape() -> impl Strategy<Value = RuleShape> {
    (0u8..3, 0u8..3, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(initial, after_fix, has_fix, has_privileged_fix, has_manual)| RuleShape {
            initial,
            after_fix,
            has_fix,
            has_privileged_fix,
            has_manual,
        },
    )
}

fn arb_config() -> impl Strategy<Value = RunConfig> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(apply_fixes, prompt_before_fix, skip_privileged_checks)| RunConfig {
            apply_fixes,
            prompt_before_fix,
            skip_privileged_checks,
            ..RunConfig::default()
        },
    )
}

proptest! {
    #[test]
    fn exact_match_is_case_folded_equality(a in arb_word(), b in arb_word()) {
        let sensitive = matches(&a, &b, true, ComparisonMode::ExactMatch).unwrap();
        let insensitive = matches(&a, &b, false, ComparisonMode::ExactMatch).unwrap();
        prop_assert_eq!(sensitive, a == b);
        prop_assert_eq!(insensitive, a.to_lowercase() == b.to_lowercase());
    }

    #[test]
    fn literal_pattern_matches_exactly_its_prefixed_texts(p in arb_word(), rest in arb_word()) {
        let prefixed = format!("{p}{rest}");
        prop_assert!(matches(&p, &prefixed, true, ComparisonMode::PatternMatch).unwrap());

        let shifted = format!("#{p}");
        prop_assert!(!matches(&p, &shifted, true, ComparisonMode::PatternMatch).unwrap());
    }

    #[test]
    fn matching_is_deterministic(p in arb_word(), t in arb_word(), cs in any::<bool>()) {
        for mode in [ComparisonMode::ExactMatch, ComparisonMode::PatternMatch] {
            let first = matches(&p, &t, cs, mode).unwrap();
            let second = matches(&p, &t, cs, mode).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn every_rule_lands_in_one_terminal_counter(
        shapes in prop::collection::vec(arb_shape(), 0..12),
        cfg in arb_config(),
        privileged in any::<bool>(),
        answers in prop::collection::vec(any::<bool>(), 0..12),
    ) {
        // Output 1 passes, 0 fails explicitly, anything else is inconclusive.
        let mut host = FakeHost::default().privileged(privileged);
        let mut rules = Vec::new();
        for (i, shape) in shapes.iter().enumerate() {
            let check = format!("check-{i}");
            let fix = format!("fix-{i}");
            let sudo_fix = format!("sudo fix-{i}");
            host = host
                .output(&check, &shape.initial.to_string())
                .effect(&fix, &check, &shape.after_fix.to_string())
                .effect(&sudo_fix, &check, "1");

            let mut r = rule(vec![exact(&check, Some("1"), Some("0"))]);
            if shape.has_fix {
                r = r.with_fix(fix);
            }
            if shape.has_privileged_fix {
                r = r.with_privileged_fix(sudo_fix);
            }
            if shape.has_manual {
                r = r.with_manual_instructions("by hand");
            }
            rules.push(r);
        }
        let policy = Policy { rules };

        let mut prompter = ScriptedPrompter::answering(answers);
        let mut reporter = RecordingReporter::default();
        let mut ports = Ports {
            runner: &mut host,
            prompter: &mut prompter,
            reporter: &mut reporter,
        };
        let out = run(&policy, &cfg, &mut ports);

        prop_assert_eq!(out.tally.check_number as usize, shapes.len());
        prop_assert_eq!(out.tally.terminal_total(), out.tally.check_number);
        prop_assert!(out.tally.fix_skipped_no_privilege <= out.tally.fail_fix_fail);
        prop_assert_eq!(out.results.len(), shapes.len());
        prop_assert!(out.unresolved.windows(2).all(|w| w[0] < w[1]));
        for &i in &out.unresolved {
            prop_assert!(policy.rules[i].manual_instructions.is_some());
        }
        if !cfg.apply_fixes {
            prop_assert!(host.executed.iter().all(|c| c.starts_with("check-")));
        }
    }
}
