//! Output comparison for test expectations.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonMode {
    ExactMatch,
    PatternMatch,
}

#[derive(Debug, Error)]
#[error("invalid regular expression `{pattern}`: {source}")]
pub struct MatchError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Compare `text` against `pattern`.
///
/// Exact comparison is whole-string equality (both sides lowercased when case-insensitive).
/// Pattern comparison anchors the regex at the start of `text` only, and `.` also matches
/// newlines so multi-line command output can be matched.
pub fn matches(
    pattern: &str,
    text: &str,
    case_sensitive: bool,
    mode: ComparisonMode,
) -> Result<bool, MatchError> {
    Ok(Expectation::compile(pattern, mode, case_sensitive)?.matches(text))
}

/// An expected output, compiled once at policy load time.
#[derive(Clone, Debug)]
pub struct Expectation {
    raw: String,
    compiled: Compiled,
}

#[derive(Clone, Debug)]
enum Compiled {
    Exact { expected: String, case_sensitive: bool },
    Pattern(Regex),
}

impl Expectation {
    pub fn compile(
        pattern: &str,
        mode: ComparisonMode,
        case_sensitive: bool,
    ) -> Result<Self, MatchError> {
        let compiled = match mode {
            ComparisonMode::ExactMatch => Compiled::Exact {
                expected: if case_sensitive {
                    pattern.to_string()
                } else {
                    pattern.to_lowercase()
                },
                case_sensitive,
            },
            ComparisonMode::PatternMatch => Compiled::Pattern(anchored_regex(pattern, case_sensitive)?),
        };
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.compiled {
            Compiled::Exact {
                expected,
                case_sensitive: true,
            } => text == expected,
            Compiled::Exact {
                expected,
                case_sensitive: false,
            } => text.to_lowercase() == *expected,
            Compiled::Pattern(re) => re.is_match(text),
        }
    }
}

fn anchored_regex(pattern: &str, case_sensitive: bool) -> Result<Regex, MatchError> {
    let err = |source| MatchError {
        pattern: pattern.to_string(),
        source,
    };

    // Validate the pattern on its own first: wrapping it in a group could otherwise turn
    // unbalanced input like `a)(b` into something that compiles.
    Regex::new(pattern).map_err(err)?;

    RegexBuilder::new(&format!("^(?:{pattern})"))
        .case_insensitive(!case_sensitive)
        .dot_matches_new_line(true)
        .build()
        .map_err(err)
}
