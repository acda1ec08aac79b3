//! Fuzz target for policy file parsing.
//!
//! Goal: loading a policy should **never panic** on any input, in any format.
//! Malformed documents must come back as `PolicyError`.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_parser
//! ```

#![no_main]

use hostguard_policy::{PolicyFormat, parse_policy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for format in [PolicyFormat::Json, PolicyFormat::Yaml, PolicyFormat::Toml] {
        let _ = parse_policy(text, format);
    }
});
