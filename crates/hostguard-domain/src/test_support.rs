use crate::matcher::ComparisonMode;
use crate::model::{Rule, Test};
use crate::ports::{CommandRunner, Prompter, Reporter};
use hostguard_types::{Confidence, Verdict};
use std::collections::{HashMap, VecDeque};

/// Scripted host: fixed command outputs, plus fixes that rewrite the output of another command.
#[derive(Debug, Default)]
pub struct FakeHost {
    outputs: HashMap<String, String>,
    effects: HashMap<String, Vec<(String, String)>>,
    privileged: bool,
    pub executed: Vec<String>,
    pub probes: usize,
}

impl FakeHost {
    pub fn output(mut self, command: &str, output: &str) -> Self {
        self.outputs.insert(command.to_string(), output.to_string());
        self
    }

    /// Running `fix` makes `target` print `output` from then on.
    pub fn effect(mut self, fix: &str, target: &str, output: &str) -> Self {
        self.effects
            .entry(fix.to_string())
            .or_default()
            .push((target.to_string(), output.to_string()));
        self
    }

    pub fn privileged(mut self, privileged: bool) -> Self {
        self.privileged = privileged;
        self
    }
}

impl CommandRunner for FakeHost {
    fn run(&mut self, command: &str) -> String {
        self.executed.push(command.to_string());
        if let Some(effects) = self.effects.get(command) {
            for (target, output) in effects.clone() {
                self.outputs.insert(target, output);
            }
        }
        self.outputs.get(command).cloned().unwrap_or_default()
    }

    fn has_privilege(&mut self) -> bool {
        self.probes += 1;
        self.privileged
    }
}

/// Answers questions from a queue; falls back to the offered default once it runs dry.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    /// Every question asked, with the default that was offered.
    pub asked: Vec<(String, bool)>,
}

impl ScriptedPrompter {
    pub fn answering(answers: Vec<bool>) -> Self {
        Self {
            answers: answers.into(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str, default: bool) -> bool {
        self.asked.push((question.to_string(), default));
        self.answers.pop_front().unwrap_or(default)
    }
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub lines: Vec<String>,
    pub debug: Vec<String>,
    pub checks: Vec<(usize, Verdict)>,
    pub warnings: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn line(&mut self, msg: &str) {
        self.lines.push(msg.to_string());
    }

    fn debug(&mut self, msg: &str) {
        self.debug.push(msg.to_string());
    }

    fn check_result(&mut self, number: usize, _description: &str, verdict: Verdict) {
        self.checks.push((number, verdict));
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }
}

/// Case-sensitive exact-match test.
pub fn exact(command: &str, pass: Option<&str>, fail: Option<&str>) -> Test {
    Test::new(command, ComparisonMode::ExactMatch, true, pass, fail).expect("valid test")
}

pub fn rule(tests: Vec<Test>) -> Rule {
    rule_with(Confidence::Required, tests)
}

pub fn rule_with(confidence: Confidence, tests: Vec<Test>) -> Rule {
    Rule::new("test rule", confidence, tests).expect("valid rule")
}
