//! Terminal adapters: the transcript sink and the yes/no prompt.

use crate::logfile::LogFile;
use dialoguer::Confirm;
use hostguard_domain::ports::{Prompter, Reporter};
use hostguard_render::{Palette, check_line};
use hostguard_types::Verdict;
use std::io::{IsTerminal, Write};

/// Writes the transcript to a console stream and, optionally, to a log file.
pub struct ConsoleReporter<W: Write> {
    out: W,
    palette: Palette,
    log: Option<LogFile>,
    log_debug: bool,
    /// Set after the first failed console write; later lines go to the log only.
    console_lost: bool,
}

impl<W: Write> ConsoleReporter<W> {
    /// `log_debug` decides whether debug lines are persisted to the log file.
    pub fn new(out: W, palette: Palette, log: Option<LogFile>, log_debug: bool) -> Self {
        Self {
            out,
            palette,
            log,
            log_debug,
            console_lost: false,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn into_inner(self) -> (W, Option<LogFile>) {
        (self.out, self.log)
    }

    fn write_log(&mut self, text: &str) {
        let Some(log) = self.log.as_mut() else {
            return;
        };
        if let Err(err) = log.append_line(text) {
            tracing::warn!(path = %log.path(), "log file disabled after write failure: {err}");
            self.log = None;
        }
    }

    fn write_console(&mut self, text: &str) {
        if self.console_lost {
            return;
        }
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::warn!("console output lost: {err}");
            self.console_lost = true;
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn line(&mut self, msg: &str) {
        self.write_console(msg);
        self.write_log(msg);
    }

    fn debug(&mut self, msg: &str) {
        tracing::debug!("{msg}");
        if self.log_debug {
            self.write_log(&format!("DEBUG: {msg}"));
        }
    }

    fn check_result(&mut self, number: usize, description: &str, verdict: Verdict) {
        let text = check_line(number, description, verdict, &self.palette);
        self.line("");
        self.line(&text);
    }

    fn warning(&mut self, msg: &str) {
        let text = self.palette.paint(&self.palette.warn, &format!("WARNING: {msg}"));
        self.line(&text);
    }
}

/// Asks on the terminal. Anything short of an explicit answer declines: no terminal, a failed
/// read, or an interrupted prompt never counts as consent.
#[derive(Debug)]
pub struct ConsolePrompter {
    interactive: bool,
    warned: bool,
}

impl ConsolePrompter {
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            warned: false,
        }
    }

    /// Interactive only when both stdin and stderr, where the prompt is drawn, are terminals.
    pub fn detect() -> Self {
        Self::new(std::io::stdin().is_terminal() && std::io::stderr().is_terminal())
    }

    fn decline(&mut self, reason: &str) -> bool {
        if !self.warned {
            tracing::warn!("cannot ask for confirmation ({reason}); declining fixes");
            self.warned = true;
        }
        false
    }
}

impl Prompter for ConsolePrompter {
    fn confirm(&mut self, question: &str, default: bool) -> bool {
        if !self.interactive {
            return self.decline("no terminal");
        }
        let answer = Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact();
        self.settle(answer)
    }
}

impl ConsolePrompter {
    fn settle(&mut self, answer: dialoguer::Result<bool>) -> bool {
        match answer {
            Ok(answer) => answer,
            Err(err) => self.decline(&err.to_string()),
        }
    }
}
