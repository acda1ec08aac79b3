use hostguard_types::{Outcome, RunReport, Verdict};

pub fn render_markdown(report: &RunReport) -> String {
    let mut out = String::new();
    let t = &report.tally;

    out.push_str("# Hostguard report\n\n");
    out.push_str(&format!(
        "- Tool: {} {}\n",
        report.tool.name, report.tool.version
    ));
    if let Some(policy) = &report.run.policy {
        out.push_str(&format!("- Policy: `{}`\n", policy));
    }
    let mode = if !report.settings.apply_fixes {
        "report only"
    } else if report.settings.prompt_before_fix {
        "fix with confirmation"
    } else {
        "fix without confirmation"
    };
    out.push_str(&format!("- Mode: {}\n", mode));
    out.push_str(&format!(
        "- Rules: {} checked, {} passed, {} failed or skipped\n\n",
        t.checks,
        t.pass_no_fix + t.pass_after_fix,
        t.checks - (t.pass_no_fix + t.pass_after_fix).min(t.checks)
    ));

    if report.rules.is_empty() {
        out.push_str("No rules.\n");
        return out;
    }

    out.push_str("## Rules\n\n");
    out.push_str("| # | Rule | Confidence | Initial | Outcome |\n");
    out.push_str("|---|------|------------|---------|---------|\n");
    for r in &report.rules {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            r.number,
            escape_cell(&r.description),
            r.confidence.as_str(),
            verdict_text(r.verdict),
            outcome_text(r.outcome)
        ));
    }

    if !report.unresolved.is_empty() {
        out.push_str("\n## Manual remediation\n\n");
        for u in &report.unresolved {
            out.push_str(&format!("### Rule #{}: {}\n\n", u.number, u.description));
            out.push_str(&format!("{}\n\n", u.manual.trim_end()));
        }
    }

    out
}

fn verdict_text(v: Verdict) -> &'static str {
    match v {
        Verdict::ExplicitPass => "PASS",
        Verdict::ExplicitFail => "FAIL",
        Verdict::NoPass => "NO PASS",
        Verdict::AllSkipped => "SKIP",
    }
}

fn outcome_text(o: Outcome) -> &'static str {
    match o {
        Outcome::PassedNoFix => "passed",
        Outcome::PassedAfterFix => "fixed",
        Outcome::FixFailed => "fix failed",
        Outcome::FixDeclined => "fix declined",
        Outcome::FixSkipped => "fix skipped",
        Outcome::CheckSkipped => "check skipped",
        Outcome::NoFix => "no automatic fix",
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostguard_types::{
        Confidence, RuleRecord, RunMeta, RunSettings, SCHEMA_RUN_REPORT_V1, TallyCounts,
        ToolMeta, UnresolvedEntry,
    };
    use time::macros::datetime;

    fn report(rules: Vec<RuleRecord>, unresolved: Vec<UnresolvedEntry>) -> RunReport {
        let passed = rules
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::PassedNoFix))
            .count() as u32;
        RunReport {
            schema: SCHEMA_RUN_REPORT_V1.to_string(),
            tool: ToolMeta::hostguard("0.1.0"),
            run: RunMeta {
                started_at: datetime!(2026-01-01 00:00 UTC),
                finished_at: datetime!(2026-01-01 00:01 UTC),
                duration_ms: Some(60_000),
                policy: Some("policy.json".to_string()),
            },
            settings: RunSettings {
                apply_fixes: true,
                prompt_before_fix: false,
                skip_privileged_checks: false,
            },
            tally: TallyCounts {
                checks: rules.len() as u32,
                pass_no_fix: passed,
                ..TallyCounts::default()
            },
            rules,
            unresolved,
        }
    }

    #[test]
    fn renders_empty_report() {
        let md = render_markdown(&report(Vec::new(), Vec::new()));
        assert!(md.contains("- Policy: `policy.json`"));
        assert!(md.contains("- Mode: fix without confirmation"));
        assert!(md.contains("No rules."));
    }

    #[test]
    fn renders_rules_table_and_manual_section() {
        let md = render_markdown(&report(
            vec![
                RuleRecord {
                    number: 1,
                    description: "Firewall | on".to_string(),
                    confidence: Confidence::Required,
                    verdict: Verdict::ExplicitPass,
                    outcome: Outcome::PassedNoFix,
                },
                RuleRecord {
                    number: 2,
                    description: "Disk encryption".to_string(),
                    confidence: Confidence::Experimental,
                    verdict: Verdict::NoPass,
                    outcome: Outcome::NoFix,
                },
            ],
            vec![UnresolvedEntry {
                number: 2,
                description: "Disk encryption".to_string(),
                manual: "Turn it on.\n".to_string(),
            }],
        ));

        assert!(md.contains("- Rules: 2 checked, 1 passed, 1 failed or skipped"));
        assert!(md.contains("| 1 | Firewall \\| on | required | PASS | passed |"));
        assert!(md.contains("| 2 | Disk encryption | experimental | NO PASS | no automatic fix |"));
        assert!(md.contains("### Rule #2: Disk encryption\n\nTurn it on.\n"));
    }
}
