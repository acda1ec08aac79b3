use crate::Palette;
use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn hyperlink_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)https?://[^ ]+").expect("valid regex"))
}

/// Underline every `http(s)://` link up to the next space.
pub fn underline_hyperlinks(text: &str, palette: &Palette) -> String {
    if !palette.is_styled() {
        return text.to_string();
    }
    hyperlink_regex()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            palette.paint(&palette.underline, &caps[0])
        })
        .into_owned()
}
