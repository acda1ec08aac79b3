//! The `validate` and `list` use cases: look at a policy without running it.

use camino::Utf8Path;
use hostguard_domain::model::Policy;
use hostguard_policy::{PolicyError, RuleIssue};
use hostguard_types::Confidence;

/// Output from the validate use case.
#[derive(Clone, Debug)]
pub enum ValidateOutput {
    Valid { rules: usize },
    Invalid { issues: Vec<RuleIssue> },
}

/// Load and validate a policy. IO and syntax problems are errors; rule problems are output.
pub fn run_validate(policy_path: &Utf8Path) -> anyhow::Result<ValidateOutput> {
    match hostguard_policy::load_policy(policy_path) {
        Ok(policy) => Ok(ValidateOutput::Valid {
            rules: policy.rules.len(),
        }),
        Err(PolicyError::Invalid { issues }) => Ok(ValidateOutput::Invalid { issues }),
        Err(err) => Err(anyhow::Error::new(err).context(format!("load policy {policy_path}"))),
    }
}

pub fn format_validation(path: &Utf8Path, output: &ValidateOutput) -> String {
    match output {
        ValidateOutput::Valid { rules } => format!("{path}: ok ({rules} rules)\n"),
        ValidateOutput::Invalid { issues } => {
            let mut out = format!("{path}: {} problem(s)\n", issues.len());
            for issue in issues {
                out.push_str(&format!("  - {issue}\n"));
            }
            out
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSummary {
    pub number: usize,
    pub description: String,
    pub confidence: Confidence,
    pub tests: usize,
    /// Remediation kinds the rule offers: `fix`, `privileged fix`, `manual`.
    pub remediation: Vec<&'static str>,
}

pub fn run_list(policy_path: &Utf8Path) -> anyhow::Result<Vec<RuleSummary>> {
    let policy = hostguard_policy::load_policy(policy_path)
        .map_err(|e| anyhow::Error::new(e).context(format!("load policy {policy_path}")))?;
    Ok(summarize(&policy))
}

pub fn summarize(policy: &Policy) -> Vec<RuleSummary> {
    policy
        .rules
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let mut remediation = Vec::new();
            if rule.fix.is_some() {
                remediation.push("fix");
            }
            if rule.privileged_fix.is_some() {
                remediation.push("privileged fix");
            }
            if rule.manual_instructions.is_some() {
                remediation.push("manual");
            }
            RuleSummary {
                number: i + 1,
                description: rule.description.clone(),
                confidence: rule.confidence,
                tests: rule.tests().len(),
                remediation,
            }
        })
        .collect()
}

pub fn format_rule_list(rules: &[RuleSummary]) -> String {
    if rules.is_empty() {
        return "No rules.\n".to_string();
    }
    let mut out = String::new();
    for r in rules {
        out.push_str(&format!(
            "#{:<3} [{}] {} ({} test{}; {})\n",
            r.number,
            r.confidence.as_str(),
            r.description,
            r.tests,
            if r.tests == 1 { "" } else { "s" },
            r.remediation.join(", ")
        ));
    }
    out
}
