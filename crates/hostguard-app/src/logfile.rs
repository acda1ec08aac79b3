use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{File, OpenOptions};
use std::io::Write;
use time::OffsetDateTime;
use time::macros::format_description;

/// Append-only transcript file. Color codes never reach the disk.
#[derive(Debug)]
pub struct LogFile {
    path: Utf8PathBuf,
    file: File,
}

impl LogFile {
    pub fn open(path: &Utf8Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {path}"))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// `hostguard_<YYYY-MM-DD_HH-MM-SS>.log` inside `dir`.
    pub fn timestamped_path(dir: &Utf8Path, at: OffsetDateTime) -> Utf8PathBuf {
        let stamp = at
            .format(format_description!(
                "[year]-[month]-[day]_[hour]-[minute]-[second]"
            ))
            .unwrap_or_else(|_| at.unix_timestamp().to_string());
        dir.join(format!("hostguard_{stamp}.log"))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn append_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.file, "{}", console::strip_ansi_codes(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamped_name_is_sortable() {
        let path = LogFile::timestamped_path(
            Utf8Path::new("logs"),
            datetime!(2026-03-04 05:06:07 UTC),
        );
        assert_eq!(path, Utf8PathBuf::from("logs/hostguard_2026-03-04_05-06-07.log"));
    }

    #[test]
    fn appends_without_color_codes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8 path");
        let path = root.join("nested").join("run.log");

        let mut log = LogFile::open(&path).expect("open");
        log.append_line("\x1b[92mPASSED!\x1b[0m").expect("append");
        drop(log);

        let mut log = LogFile::open(&path).expect("reopen");
        log.append_line("second").expect("append");

        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text, "PASSED!\nsecond\n");
    }
}
