//! Job log sinks.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Append-only destination for job log records.
pub trait JobLogSink: Send + Sync {
    /// Append `text` to the log named `file` as one write.
    fn append(&self, file: &str, text: &str) -> io::Result<()>;
}

/// Writes each job log as a text file under one directory.
#[derive(Debug, Clone)]
pub struct FileJobLog {
    dir: PathBuf,
}

impl FileJobLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

impl JobLogSink for FileJobLog {
    fn append(&self, file: &str, text: &str) -> io::Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_of(file))?;
        f.write_all(text.as_bytes())
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct MemoryJobLog {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryJobLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended to `file` so far.
    pub fn contents(&self, file: &str) -> String {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(file)
            .cloned()
            .unwrap_or_default()
    }

    pub fn lines(&self, file: &str) -> Vec<String> {
        self.contents(file).lines().map(str::to_string).collect()
    }
}

impl JobLogSink for MemoryJobLog {
    fn append(&self, file: &str, text: &str) -> io::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(file.to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }
}
