use crate::model::{Policy, Rule};
use crate::tally::Tally;
use hostguard_types::{Outcome, Verdict};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleResult {
    /// 0-based index into the policy's rules.
    pub index: usize,
    /// Verdict of the initial evaluation.
    pub verdict: Verdict,
    pub outcome: Outcome,
}

impl RuleResult {
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunOutcome {
    pub tally: Tally,
    pub results: Vec<RuleResult>,
    /// Indices of rules that still fail and carry manual instructions, in policy order.
    pub unresolved: Vec<usize>,
}

impl RunOutcome {
    /// Unresolved rules with their 1-based number and instructions.
    pub fn unresolved_rules<'a>(
        &'a self,
        policy: &'a Policy,
    ) -> impl Iterator<Item = (usize, &'a Rule, &'a str)> + 'a {
        self.unresolved.iter().filter_map(move |&i| {
            let rule = policy.rules.get(i)?;
            let manual = rule.manual_instructions.as_deref()?;
            Some((i + 1, rule, manual))
        })
    }
}
