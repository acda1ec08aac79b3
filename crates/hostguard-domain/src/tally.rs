use hostguard_types::{Outcome, TallyCounts};

/// Run-scoped outcome counters.
///
/// Owned by the orchestrator for the duration of one run. Every rule lands in exactly one
/// terminal counter; `fix_skipped_no_privilege` is a sub-count of `fail_fix_fail`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Rules processed so far.
    pub check_number: u32,
    pub pass_no_fix: u32,
    pub pass_after_fix: u32,
    pub fail_fix_fail: u32,
    pub fail_fix_skipped: u32,
    pub fail_fix_declined: u32,
    pub fail_no_fix: u32,
    pub check_skipped: u32,
    pub fix_skipped_no_privilege: u32,
}

impl Tally {
    /// Count a rule's terminal outcome, then advance `check_number`.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PassedNoFix => self.pass_no_fix += 1,
            Outcome::PassedAfterFix => self.pass_after_fix += 1,
            Outcome::FixFailed => self.fail_fix_fail += 1,
            Outcome::FixDeclined => self.fail_fix_declined += 1,
            Outcome::FixSkipped => self.fail_fix_skipped += 1,
            Outcome::CheckSkipped => self.check_skipped += 1,
            Outcome::NoFix => self.fail_no_fix += 1,
        }
        self.check_number += 1;
    }

    pub fn passed_total(&self) -> u32 {
        self.pass_no_fix + self.pass_after_fix
    }

    pub fn failed_or_skipped_total(&self) -> u32 {
        self.fail_fix_fail
            + self.fail_fix_skipped
            + self.fail_fix_declined
            + self.fail_no_fix
            + self.check_skipped
    }

    /// Sum of the terminal counters; equals `check_number` after every `record`.
    pub fn terminal_total(&self) -> u32 {
        self.passed_total() + self.failed_or_skipped_total()
    }

    pub fn counts(&self) -> TallyCounts {
        TallyCounts {
            checks: self.check_number,
            pass_no_fix: self.pass_no_fix,
            pass_after_fix: self.pass_after_fix,
            fail_fix_fail: self.fail_fix_fail,
            fail_fix_skipped: self.fail_fix_skipped,
            fail_fix_declined: self.fail_fix_declined,
            fail_no_fix: self.fail_no_fix,
            check_skipped: self.check_skipped,
            fix_skipped_no_privilege: self.fix_skipped_no_privilege,
        }
    }
}
