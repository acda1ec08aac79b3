//! Rendering utilities for the console transcript and saved run reports.
//!
//! Every renderer returns plain strings; callers decide where they go.

#![forbid(unsafe_code)]

mod console;
mod markdown;
mod palette;
mod text;

pub use console::{
    SEPARATOR, banner, check_line, log_note, render_tally, render_unresolved, verdict_label,
};
pub use markdown::render_markdown;
pub use palette::Palette;
pub use text::underline_hyperlinks;
