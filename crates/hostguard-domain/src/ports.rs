//! The seams through which the engine touches the outside world.
//!
//! The domain never spawns processes, reads the terminal, or writes files itself; callers
//! supply implementations of these traits (a shell and a console in the app crate, scripted
//! fakes in tests).

use hostguard_types::Verdict;

pub trait CommandRunner {
    /// Execute `command` and return its combined stdout/stderr.
    ///
    /// Execution faults (spawn failure, timeout, non-zero exit) are not errors here: whatever
    /// text was captured is returned and gets matched like any other output.
    fn run(&mut self, command: &str) -> String;

    /// Whether the invoking user can run privileged commands.
    fn has_privilege(&mut self) -> bool;
}

pub trait Prompter {
    /// Ask a yes/no question; `default` is the answer taken on a bare enter.
    fn confirm(&mut self, question: &str, default: bool) -> bool;
}

/// Line-oriented transcript sink.
pub trait Reporter {
    fn line(&mut self, msg: &str);

    /// Diagnostic detail; only shown or persisted when verbosity allows.
    fn debug(&mut self, msg: &str);

    /// Result line for one evaluation of a rule. `number` is 1-based.
    fn check_result(&mut self, number: usize, description: &str, verdict: Verdict);

    fn warning(&mut self, msg: &str) {
        self.line(msg);
    }
}

/// The three ports bundled for one run.
pub struct Ports<'a> {
    pub runner: &'a mut dyn CommandRunner,
    pub prompter: &'a mut dyn Prompter,
    pub reporter: &'a mut dyn Reporter,
}
