use crate::model::Rule;
use crate::policy::RunConfig;
use hostguard_types::Confidence;

pub const RECOMMENDED_DESCRIPTOR: &str = "RECOMMENDED";
pub const EXPERIMENTAL_DESCRIPTOR: &str = "EXPERIMENTAL";

/// What to ask the user before remediating a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptRequest<'a> {
    /// Answer taken when the user just presses enter.
    pub default_yes: bool,
    /// Empty for required rules.
    pub descriptor: &'static str,
    /// The first command the fix will execute.
    pub command: &'a str,
}

impl PromptRequest<'_> {
    pub fn question(&self) -> String {
        let descriptor = if self.descriptor.is_empty() {
            String::new()
        } else {
            format!("{} ", self.descriptor)
        };
        format!(
            "\tApply the following {descriptor}fix? This will execute this command:\n\t\t'{}'",
            self.command
        )
    }
}

/// Build the confirmation prompt for a rule, or `None` when it has no fix command to confirm.
///
/// Riskier confidence tiers default to the configured answer for that tier.
pub fn prompt_request<'a>(rule: &'a Rule, cfg: &RunConfig) -> Option<PromptRequest<'a>> {
    let command = rule.first_fix_command()?;
    let (default_yes, descriptor) = match rule.confidence {
        Confidence::Required => (true, ""),
        Confidence::Recommended => (cfg.fix_recommended_by_default, RECOMMENDED_DESCRIPTOR),
        Confidence::Experimental => (cfg.fix_experimental_by_default, EXPERIMENTAL_DESCRIPTOR),
    };
    Some(PromptRequest {
        default_yes,
        descriptor,
        command,
    })
}
