use crate::{Palette, underline_hyperlinks};
use hostguard_types::{TallyCounts, UnresolvedEntry, Verdict};

pub const SEPARATOR: &str = "==========================";

pub fn banner(version: &str, palette: &Palette) -> String {
    let title = palette.paint(&palette.bold, &format!("hostguard {version}"));
    format!("{title}\nAuditing host configuration against policy.")
}

pub fn verdict_label(verdict: Verdict, palette: &Palette) -> String {
    match verdict {
        Verdict::ExplicitPass => palette.paint(&palette.pass, "PASSED!"),
        Verdict::ExplicitFail | Verdict::NoPass => palette.paint(&palette.fail, "FAILED!"),
        Verdict::AllSkipped => palette.paint(&palette.skip, "SKIPPED!"),
    }
}

/// `CHECK #n: <description>... PASSED!`
pub fn check_line(number: usize, description: &str, verdict: Verdict, palette: &Palette) -> String {
    format!(
        "CHECK #{number}: {description}... {}",
        verdict_label(verdict, palette)
    )
}

#[derive(Clone, Copy)]
enum Tone {
    Pass,
    Fail,
    Skip,
}

/// Summary of a run, one counter per line with its share of all rules.
pub fn render_tally(tally: &TallyCounts, palette: &Palette) -> String {
    let total = tally.checks;
    let passed = tally.pass_no_fix + tally.pass_after_fix;
    let failed = tally.fail_fix_fail
        + tally.fail_fix_skipped
        + tally.fail_fix_declined
        + tally.fail_no_fix
        + tally.check_skipped;

    let rows = [
        ("Rules passed total:", passed, Tone::Pass),
        ("Rules failed or skipped total:", failed, Tone::Fail),
        ("Rules passed without applying fix:", tally.pass_no_fix, Tone::Pass),
        ("Rules passed after applying fix:", tally.pass_after_fix, Tone::Pass),
        ("Rules failed and fix failed:", tally.fail_fix_fail, Tone::Fail),
        ("Rules failed and fix skipped:", tally.fail_fix_skipped, Tone::Fail),
        ("Rules failed and fix declined:", tally.fail_fix_declined, Tone::Fail),
        (
            "Rules failed and fix failed for unprivileged user:",
            tally.fix_skipped_no_privilege,
            Tone::Fail,
        ),
        ("Rules failed with no automatic fix:", tally.fail_no_fix, Tone::Fail),
        ("Rule checks skipped:", tally.check_skipped, Tone::Skip),
    ];

    rows.iter()
        .map(|(label, count, tone)| {
            let style = match tone {
                Tone::Pass => &palette.pass,
                Tone::Fail => &palette.fail,
                Tone::Skip => &palette.skip,
            };
            let value = format!("{count} ({})", percent(*count, total));
            format!("{label:<52}{}", palette.paint(style, &value))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn percent(count: u32, total: u32) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", 100.0 * f64::from(count) / f64::from(total))
}

/// Rules that still need a human, with their instructions. Empty input renders nothing.
pub fn render_unresolved(entries: &[UnresolvedEntry], palette: &Palette) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str(&palette.paint(
        &palette.bold,
        &format!(
            "{} rules could not be automatically fixed, but manual instructions are available. \
             Please manually remediate these problems and re-run the tool:",
            entries.len()
        ),
    ));
    out.push('\n');
    for e in entries {
        out.push_str(&format!("RULE #{}: {}\n", e.number, e.description));
        out.push_str(&underline_hyperlinks(&e.manual, palette));
        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn log_note(path: &str, palette: &Palette) -> String {
    format!(
        "Wrote results to {}. Please review the contents before submitting them to third \
         parties, as they may contain sensitive information about your system.",
        palette.paint(&palette.bold, &format!("'{path}'"))
    )
}
