//! Daily run history logs.
//!
//! Logs live in `<logs_parent>/.bdd-run-logs/` as one `YYYY-MM-DD.log` file
//! per day. Entries are appended and separated by a blank line; only the
//! newest files are kept.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::error::TrackerError;

/// Name of the history directory under the logs parent.
pub const LOGS_DIR: &str = ".bdd-run-logs";

const LOG_EXTENSION: &str = ".log";

/// The history directory of one test package.
#[derive(Debug)]
pub struct HistoryLog {
    path: Utf8PathBuf,
    dir: Dir,
    max_length: usize,
}

impl HistoryLog {
    /// Opens (creating if needed) the history directory under `logs_parent`
    /// and prunes it to `max_length` files.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] when the directory cannot be created or
    /// pruned.
    pub fn open(logs_parent: &Utf8Path, max_length: usize) -> Result<Self, TrackerError> {
        let path = logs_parent.join(LOGS_DIR);
        Dir::create_ambient_dir_all(&path, ambient_authority())
            .map_err(|source| TrackerError::io(&path, source))?;
        let dir = Dir::open_ambient_dir(&path, ambient_authority())
            .map_err(|source| TrackerError::io(&path, source))?;
        let log = Self {
            path,
            dir,
            max_length,
        };
        log.prune()?;
        Ok(log)
    }

    /// The history directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Log file names, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] when the directory cannot be listed.
    pub fn log_files(&self) -> Result<Vec<String>, TrackerError> {
        list_logs(&self.dir, &self.path)
    }

    /// Removes the oldest files beyond the configured maximum and returns
    /// their names.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] when a file cannot be removed.
    pub fn prune(&self) -> Result<Vec<String>, TrackerError> {
        let files = self.log_files()?;
        let excess = files.len().saturating_sub(self.max_length);
        let removed: Vec<String> = files.into_iter().take(excess).collect();
        for name in &removed {
            self.dir
                .remove_file(name)
                .map_err(|source| TrackerError::io(&self.path.join(name), source))?;
            debug!(file = %name, "pruned run log");
        }
        Ok(removed)
    }

    /// Appends an entry to the log of `date`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] when the file cannot be written.
    pub fn append_on(&self, date: NaiveDate, text: &str) -> Result<(), TrackerError> {
        let name = log_file_name(date);
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        let mut file = self
            .dir
            .open_with(&name, &options)
            .map_err(|source| TrackerError::io(&self.path.join(&name), source))?;
        file.write_all(format!("{text}\n\n").as_bytes())
            .map_err(|source| TrackerError::io(&self.path.join(&name), source))
    }

    /// Appends an entry to today's log (UTC).
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] when the file cannot be written.
    pub fn append(&self, text: &str) -> Result<(), TrackerError> {
        self.append_on(Utc::now().date_naive(), text)
    }

    /// The content of the newest log, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Io`] when the directory or file cannot be
    /// read.
    pub fn latest(&self) -> Result<Option<String>, TrackerError> {
        latest_log(&self.dir, &self.path)
    }
}

/// File name of the log of `date`.
#[must_use]
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{}{LOG_EXTENSION}", date.format("%Y-%m-%d"))
}

fn list_logs(dir: &Dir, path: &Utf8Path) -> Result<Vec<String>, TrackerError> {
    let mut names = Vec::new();
    for entry in dir.entries().map_err(|source| TrackerError::io(path, source))? {
        let name = entry
            .and_then(|found| found.file_name())
            .map_err(|source| TrackerError::io(path, source))?;
        if name.ends_with(LOG_EXTENSION) {
            names.push(name);
        }
    }
    names.sort_unstable();
    Ok(names)
}

fn latest_log(dir: &Dir, path: &Utf8Path) -> Result<Option<String>, TrackerError> {
    let Some(name) = list_logs(dir, path)?.pop() else {
        return Ok(None);
    };
    dir.read_to_string(&name)
        .map(Some)
        .map_err(|source| TrackerError::io(&path.join(&name), source))
}

/// Reads the newest log under `logs_parent` without creating anything.
pub(crate) fn read_latest(logs_parent: &Utf8Path) -> Result<Option<String>, TrackerError> {
    let path = logs_parent.join(LOGS_DIR);
    let Ok(dir) = Dir::open_ambient_dir(&path, ambient_authority()) else {
        return Ok(None);
    };
    latest_log(&dir, &path)
}
