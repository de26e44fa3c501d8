//! Command scripts on disk and the replay driver.
//!
//! A script is plain text, one raw command per line, no header. Blank lines
//! are skipped on read and never written.

use crate::error::{IoError, ProtocolError, TurtleError};
use crate::parser::{CommandName, parse_line};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The non-empty, trimmed lines of a script file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub lines: Vec<String>,
}

impl Script {
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        Ok(Self { lines })
    }

    pub fn load(path: &Path) -> Result<Self, IoError> {
        let read_failed = |source| IoError::ReadFailed {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(read_failed)?;
        Self::from_reader(BufReader::new(file)).map_err(read_failed)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Writes `lines` one per line, skipping blanks.
pub fn write_script<'a, W, I>(mut writer: W, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Saves `lines` to `path`, replacing any existing file.
pub fn save<'a, I>(path: &Path, lines: I) -> Result<(), IoError>
where
    I: IntoIterator<Item = &'a str>,
{
    let write_failed = |source| IoError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_failed)?;
    write_script(BufWriter::new(file), lines).map_err(write_failed)
}

/// Adds `ext` when `path` has no extension at all.
pub fn with_default_extension(path: &Path, ext: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(ext)
    }
}

/// True when `line` would trigger another load.
pub fn is_load_line(line: &str) -> bool {
    matches!(parse_line(line), Ok(Some(parsed)) if parsed.name == CommandName::Load)
}

/// Cooperative cancellation for an in-flight replay, checked between lines.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Where replayed lines go.
pub trait ReplaySink {
    /// Runs one line through the full parse/validate/execute pipeline.
    fn execute(&mut self, line: &str) -> Result<(), TurtleError>;

    /// Non-fatal notice about a skipped line.
    fn advise(&mut self, message: &str);

    fn progress(&mut self, current: usize, total: usize);
}

/// Outcome counts for one replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub total: usize,
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

/// Feeds every line of `script` into `sink`, in order.
///
/// Nested loads are skipped with an advisory; failing lines are counted and
/// replay continues. Cancellation stops before the next line and keeps what
/// was already applied.
pub fn replay(script: &Script, sink: &mut dyn ReplaySink, cancel: &CancelFlag) -> ReplaySummary {
    let total = script.len();
    let mut summary = ReplaySummary {
        total,
        ..Default::default()
    };

    for (i, line) in script.lines.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(line = i + 1, total, "replay cancelled");
            summary.cancelled = true;
            break;
        }
        sink.progress(i + 1, total);

        if is_load_line(line) {
            let err = ProtocolError::NestedLoadRejected(line.clone());
            tracing::warn!(line = i + 1, "{err}");
            sink.advise(&err.to_string());
            summary.skipped += 1;
            continue;
        }

        tracing::debug!(line = i + 1, total, command = %line, "replaying");
        match sink.execute(line) {
            Ok(_) => summary.applied += 1,
            Err(_) => summary.failed += 1,
        }
    }

    summary
}
