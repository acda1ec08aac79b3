//! Runs policy commands through the system shell.

use hostguard_domain::ports::CommandRunner;
use hostguard_settings::ShellSettings;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// How long to keep draining output after a timed-out command was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(200);
/// Output past this many bytes is read and discarded.
pub const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Process group of the command currently running under a timeout, or 0.
static ACTIVE_GROUP: AtomicU32 = AtomicU32::new(0);

/// [`CommandRunner`] backed by `<shell> -c`, with stderr folded into stdout.
///
/// With a timeout configured each command runs in its own process group, so a timeout takes
/// down pipelines and background children along with the shell.
#[derive(Debug)]
pub struct ShellRunner {
    settings: ShellSettings,
    privileged: Option<bool>,
}

impl ShellRunner {
    pub fn new(settings: ShellSettings) -> Self {
        Self {
            settings,
            privileged: None,
        }
    }

    /// The script handed to `-c` for `command`.
    pub fn script(&self, command: &str) -> String {
        match &self.settings.prelude {
            Some(prelude) => format!("exec 2>&1; . {}; {command}", shell_quote(prelude)),
            None => format!("exec 2>&1; {command}"),
        }
    }

    /// Run `command` and return everything it printed. Never fails: a command that cannot be
    /// started yields empty output, one that times out yields whatever it printed so far.
    pub fn execute(&self, command: &str) -> String {
        let started = Instant::now();
        let grouped = self.settings.timeout.is_some();

        let mut cmd = Command::new(&self.settings.shell);
        cmd.arg("-c")
            .arg(self.script(command))
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if grouped {
            own_process_group(&mut cmd);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                tracing::warn!(shell = %self.settings.shell, command, "failed to start command: {err}");
                return String::new();
            }
        };
        if grouped {
            ACTIVE_GROUP.store(child.id(), Ordering::SeqCst);
        }

        let Some(capture) = spawn_reader(&mut child) else {
            let _ = child.wait();
            ACTIVE_GROUP.store(0, Ordering::SeqCst);
            return String::new();
        };

        let timed_out = wait_with_timeout(&mut child, self.settings.timeout);
        ACTIVE_GROUP.store(0, Ordering::SeqCst);
        let bytes = if timed_out {
            tracing::warn!(
                command,
                timeout_secs = self.settings.timeout.map(|t| t.as_secs()),
                "command timed out and was killed"
            );
            capture.finish(Some(DRAIN_GRACE))
        } else {
            capture.finish(None)
        };

        let output = String::from_utf8_lossy(&bytes).into_owned();
        tracing::debug!(
            command,
            elapsed_ms = started.elapsed().as_millis() as u64,
            output = %output.trim_end(),
            "command finished"
        );
        output
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str) -> String {
        self.execute(command)
    }

    /// The probe prints `0` for users without privilege. Asked once per run.
    fn has_privilege(&mut self) -> bool {
        if let Some(cached) = self.privileged {
            return cached;
        }
        let answer = self.execute(&self.settings.privilege_probe);
        let privileged = answer.trim() != "0";
        tracing::debug!(probe_output = %answer.trim(), privileged, "privilege probe");
        self.privileged = Some(privileged);
        privileged
    }
}

/// Stop the command group started under a timeout, if one is running. Called on interrupt,
/// since a separate process group does not see the terminal's Ctrl+C.
pub fn terminate_running_command() {
    let pgid = ACTIVE_GROUP.swap(0, Ordering::SeqCst);
    if pgid != 0 {
        signal_group(pgid, Signal::Terminate);
    }
}

/// Output read so far by the reader thread.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl Capture {
    /// Wait for end of output, or at most `limit` when given, and take what was read.
    fn finish(self, limit: Option<Duration>) -> Vec<u8> {
        match limit {
            None => {
                let _ = self.done.recv();
            }
            Some(limit) => {
                let _ = self.done.recv_timeout(limit);
            }
        }
        self.buf
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }
}

/// Read the child's stdout on a separate thread so a chatty command never blocks on a full pipe.
fn spawn_reader(child: &mut Child) -> Option<Capture> {
    let mut stdout = child.stdout.take()?;
    let buf = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buf);
    let (done_tx, done) = mpsc::channel();
    thread::spawn(move || {
        let mut chunk = [0u8; 8192];
        let mut truncated = false;
        loop {
            match stdout.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let Ok(mut out) = sink.lock() else { break };
                    let room = MAX_OUTPUT_BYTES.saturating_sub(out.len());
                    out.extend_from_slice(&chunk[..n.min(room)]);
                    if n > room && !truncated {
                        truncated = true;
                        tracing::warn!(limit = MAX_OUTPUT_BYTES, "command output truncated");
                    }
                }
            }
        }
        let _ = done_tx.send(());
    });
    Some(Capture { buf, done })
}

/// Wait for the child to exit; returns `true` if it had to be killed.
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> bool {
    let Some(timeout) = timeout else {
        let _ = child.wait();
        return false;
    };

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => {
                // The shell is gone; stragglers it left in the group go with it.
                signal_group(child.id(), Signal::Kill);
                return false;
            }
            Ok(None) if start.elapsed() >= timeout => {
                kill_group(child);
                return true;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(err) => {
                tracing::warn!("error waiting for command: {err}");
                kill_group(child);
                return false;
            }
        }
    }
}

fn kill_group(child: &mut Child) {
    if !signal_group(child.id(), Signal::Kill) {
        let _ = child.kill();
    }
    let _ = child.wait();
}

#[derive(Clone, Copy, Debug)]
enum Signal {
    Kill,
    Terminate,
}

#[cfg(unix)]
fn own_process_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_cmd: &mut Command) {}

/// Send `signal` to every process in group `pgid`. Returns `false` if nothing was signalled.
#[cfg(unix)]
#[allow(unsafe_code)]
fn signal_group(pgid: u32, signal: Signal) -> bool {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return false;
    };
    if pgid <= 1 {
        return false;
    }
    let signo = match signal {
        Signal::Kill => libc::SIGKILL,
        Signal::Terminate => libc::SIGTERM,
    };
    // SAFETY: kill(2) takes plain integers and touches no memory of ours.
    unsafe { libc::kill(-pgid, signo) == 0 }
}

#[cfg(not(unix))]
fn signal_group(_pgid: u32, _signal: Signal) -> bool {
    false
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
