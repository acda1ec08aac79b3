use crate::matcher::{ComparisonMode, Expectation, MatchError};
use hostguard_types::Confidence;
use thiserror::Error;

/// Commands containing this token ask the OS for elevated privileges.
pub const PRIVILEGE_MARKER: &str = "sudo ";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("a rule needs at least one test")]
    NoTests,
    #[error("test `{command}` has neither a pass nor a fail expectation")]
    NoExpectation { command: String },
    #[error(transparent)]
    Pattern(#[from] MatchError),
}

/// All rules in scope, in declared order.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    pub rules: Vec<Rule>,
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub description: String,
    pub confidence: Confidence,
    tests: Vec<Test>,
    pub fix: Option<String>,
    pub privileged_fix: Option<String>,
    pub manual_instructions: Option<String>,
}

impl Rule {
    pub fn new(
        description: impl Into<String>,
        confidence: Confidence,
        tests: Vec<Test>,
    ) -> Result<Self, ModelError> {
        if tests.is_empty() {
            return Err(ModelError::NoTests);
        }
        Ok(Self {
            description: description.into(),
            confidence,
            tests,
            fix: None,
            privileged_fix: None,
            manual_instructions: None,
        })
    }

    pub fn with_fix(mut self, command: impl Into<String>) -> Self {
        self.fix = Some(command.into());
        self
    }

    pub fn with_privileged_fix(mut self, command: impl Into<String>) -> Self {
        self.privileged_fix = Some(command.into());
        self
    }

    pub fn with_manual_instructions(mut self, text: impl Into<String>) -> Self {
        self.manual_instructions = Some(text.into());
        self
    }

    /// Tests in declared order; never empty.
    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn has_automatic_fix(&self) -> bool {
        self.fix.is_some() || self.privileged_fix.is_some()
    }

    /// The command a confirmation prompt should show: the plain fix if any, else the privileged one.
    pub fn first_fix_command(&self) -> Option<&str> {
        self.fix.as_deref().or(self.privileged_fix.as_deref())
    }
}

#[derive(Clone, Debug)]
pub struct Test {
    pub command: String,
    pub mode: ComparisonMode,
    pub case_sensitive: bool,
    expected_on_pass: Option<Expectation>,
    expected_on_fail: Option<Expectation>,
}

impl Test {
    pub fn new(
        command: impl Into<String>,
        mode: ComparisonMode,
        case_sensitive: bool,
        expected_on_pass: Option<&str>,
        expected_on_fail: Option<&str>,
    ) -> Result<Self, ModelError> {
        let command = command.into();
        if expected_on_pass.is_none() && expected_on_fail.is_none() {
            return Err(ModelError::NoExpectation { command });
        }
        let compile = |p: Option<&str>| {
            p.map(|p| Expectation::compile(p, mode, case_sensitive))
                .transpose()
        };
        Ok(Self {
            expected_on_pass: compile(expected_on_pass)?,
            expected_on_fail: compile(expected_on_fail)?,
            command,
            mode,
            case_sensitive,
        })
    }

    pub fn expected_on_pass(&self) -> Option<&Expectation> {
        self.expected_on_pass.as_ref()
    }

    pub fn expected_on_fail(&self) -> Option<&Expectation> {
        self.expected_on_fail.as_ref()
    }

    pub fn requires_privilege(&self) -> bool {
        self.command.contains(PRIVILEGE_MARKER)
    }
}
