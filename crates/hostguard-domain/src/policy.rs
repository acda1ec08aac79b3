use hostguard_types::Confidence;

/// Effective run settings. Resolved once before the run and never mutated during it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// `false` is report-only mode: failures are tallied, no fix ever runs.
    pub apply_fixes: bool,
    pub prompt_before_fix: bool,
    pub write_log: bool,
    /// Tests whose command needs elevated privilege are not executed.
    pub skip_privileged_checks: bool,
    pub verbosity: u8,
    pub fix_recommended_by_default: bool,
    pub fix_experimental_by_default: bool,
    pub warn_for_recommended: bool,
    pub warn_for_experimental: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            apply_fixes: true,
            prompt_before_fix: true,
            write_log: false,
            skip_privileged_checks: false,
            verbosity: 0,
            fix_recommended_by_default: true,
            fix_experimental_by_default: false,
            warn_for_recommended: true,
            warn_for_experimental: true,
        }
    }
}

impl RunConfig {
    /// Whether a failed final fix attempt deserves a warning for a rule of this confidence.
    pub fn warns_for(&self, confidence: Confidence) -> bool {
        match confidence {
            Confidence::Required => true,
            Confidence::Recommended => self.warn_for_recommended,
            Confidence::Experimental => self.warn_for_experimental,
        }
    }
}
