//! Fuzz target for expectation matching.
//!
//! Goal: any pattern either compiles or yields `MatchError`, and matching never panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_matcher
//! ```

#![no_main]

use arbitrary::Arbitrary;
use hostguard_domain::matcher::ComparisonMode;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct MatchInput {
    pattern: String,
    text: String,
    case_sensitive: bool,
    regex: bool,
}

fuzz_target!(|input: MatchInput| {
    // Keep regex compilation cheap
    if input.pattern.len() > 256 || input.text.len() > 4096 {
        return;
    }
    let mode = if input.regex {
        ComparisonMode::PatternMatch
    } else {
        ComparisonMode::ExactMatch
    };

    let first = hostguard_domain::matches(&input.pattern, &input.text, input.case_sensitive, mode);
    if let Ok(hit) = first {
        let again =
            hostguard_domain::matches(&input.pattern, &input.text, input.case_sensitive, mode);
        assert_eq!(again.ok(), Some(hit));
    }
    if mode == ComparisonMode::ExactMatch {
        assert!(first.is_ok(), "exact comparison never fails");
    }
});
