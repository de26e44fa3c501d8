//! Session controller: owns the turtle, the history and both collaborators,
//! and routes every raw line through parse, validate, execute and record.
//!
//! All input sources feed one [`Session`] through a single queue, so there is
//! exactly one writer and a total order over commands.

use crate::command::{Command, FileTarget, TurtleCommand};
use crate::config::TurtleConfig;
use crate::error::{ExecutionError, IoError, ProtocolError, Result};
use crate::history::{HistoryLog, RecordKind};
use crate::interpreter::Interpreter;
use crate::parser::parse_line;
use crate::script::{self, CancelFlag, ReplaySink, Script};
use crate::turtle::{Canvas, TurtleState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

/// Answer to the unsaved-changes prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confirmation {
    /// Drop unsaved work and continue.
    Discard,
    /// Save the history first; continue only if that succeeds.
    SaveFirst,
    /// Abandon the triggering operation.
    Cancel,
}

/// The user-facing collaborator: messages, prompts and progress.
pub trait UserInterface {
    fn display_message(&mut self, text: &str);

    /// Blocks until the user decides.
    fn confirm(&mut self, prompt: &str) -> Confirmation;

    fn report_progress(&mut self, current: usize, total: usize);

    /// Asked before replacing an existing file.
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        true
    }

    /// Where to save when the user picked [`Confirmation::SaveFirst`].
    fn choose_save_path(&mut self, suggested: &Path) -> Option<PathBuf> {
        Some(suggested.to_path_buf())
    }
}

pub struct Session<C: Canvas, U: UserInterface> {
    interpreter: Interpreter,
    turtle: TurtleState,
    history: HistoryLog,
    canvas: C,
    ui: U,
    cancel: CancelFlag,
}

impl<C: Canvas, U: UserInterface> Session<C, U> {
    pub fn new(config: TurtleConfig, canvas: C, ui: U) -> Self {
        let interpreter = Interpreter::new(config);
        let turtle = interpreter.initial_state(&canvas);
        Self {
            interpreter,
            turtle,
            history: HistoryLog::new(),
            canvas,
            ui,
            cancel: CancelFlag::new(),
        }
    }

    pub fn config(&self) -> &TurtleConfig {
        self.interpreter.config()
    }

    pub fn turtle(&self) -> &TurtleState {
        &self.turtle
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    /// Handle that cancels a running `load commands` between lines.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Consumes lines until every sender is dropped.
    pub fn run(&mut self, inbox: &Receiver<String>) {
        for line in inbox.iter() {
            self.submit(&line).ok();
        }
        tracing::info!(dirty = self.history.is_dirty(), "input closed");
    }

    /// Processes one raw line and reports the outcome to the UI.
    ///
    /// Returns the success message, `None` for a blank line, or the error
    /// that rejected the line. A rejected line leaves no trace in the
    /// turtle, the canvas or the history.
    pub fn submit(&mut self, line: &str) -> Result<Option<String>> {
        match self.process(line) {
            Ok(Some(message)) => {
                self.ui.display_message(&message);
                Ok(Some(message))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                tracing::warn!(line = line.trim(), %err, "command rejected");
                self.ui.display_message(&format!("Error: {err}"));
                Err(err)
            }
        }
    }

    fn process(&mut self, line: &str) -> Result<Option<String>> {
        let Some(parsed) = parse_line(line)? else {
            return Ok(None);
        };
        if let Some(notice) = parsed.correction_notice() {
            self.ui.display_message(&notice);
        }
        let cmd = Command::from_parsed(&parsed)?;
        let line = line.trim();

        let message = match cmd {
            Command::Save(FileTarget::Commands, path) => self.save_commands(path)?,
            Command::Save(FileTarget::Image, path) => self.save_image(path)?,
            Command::Load(..) if self.history.is_replaying() => {
                return Err(ProtocolError::NestedLoadRejected(line.to_string()).into());
            }
            Command::Load(FileTarget::Commands, path) => self.load_commands(path)?,
            Command::Load(FileTarget::Image, path) => self.load_image(path)?,
            Command::Turtle(TurtleCommand::Reset) => {
                let message =
                    self.interpreter
                        .execute(&TurtleCommand::Reset, &mut self.turtle, &mut self.canvas)?;
                self.history.clear();
                tracing::info!("turtle reset");
                message
            }
            Command::Turtle(cmd) => {
                let kind = if cmd.is_informational() {
                    RecordKind::Informational
                } else {
                    RecordKind::Replayable
                };
                self.history.record(line, kind);
                match self
                    .interpreter
                    .execute(&cmd, &mut self.turtle, &mut self.canvas)
                {
                    Ok(message) => message,
                    Err(err) => {
                        self.history.undo_last();
                        return Err(err);
                    }
                }
            }
        };
        Ok(Some(message))
    }

    /// Runs the unsaved-changes protocol. Returns whether to proceed.
    fn confirm_discard(&mut self, action: &str) -> bool {
        if !self.history.is_dirty() {
            return true;
        }

        match self
            .ui
            .confirm(&format!("Discard unsaved changes and {action}?"))
        {
            Confirmation::Discard => true,
            Confirmation::Cancel => false,
            Confirmation::SaveFirst => {
                let suggested = self.config().default_script_path.clone();
                let Some(path) = self.ui.choose_save_path(&suggested) else {
                    return false;
                };
                let path = script::with_default_extension(&path, "txt");
                match self.write_history(&path) {
                    Ok(true) => {
                        self.ui
                            .display_message(&format!("Commands saved to {}", path.display()));
                        true
                    }
                    Ok(false) => false,
                    Err(err) => {
                        self.ui.display_message(&format!("Error: {err}"));
                        false
                    }
                }
            }
        }
    }

    /// Writes the replayable history to `path`. `Ok(false)` means the user
    /// declined to overwrite.
    fn write_history(&mut self, path: &Path) -> Result<bool> {
        if path.exists() && !self.history.is_replaying() && !self.ui.confirm_overwrite(path) {
            return Ok(false);
        }
        script::save(path, self.history.replayable_lines())?;
        self.history.mark_clean();
        tracing::info!(path = %path.display(), "commands saved");
        Ok(true)
    }

    fn save_commands(&mut self, path: Option<PathBuf>) -> Result<String> {
        let path = path.unwrap_or_else(|| self.config().default_script_path.clone());
        let path = script::with_default_extension(&path, "txt");
        if !self.write_history(&path)? {
            return Ok("Save cancelled.".to_string());
        }
        Ok(format!("Commands saved to {}", path.display()))
    }

    fn save_image(&mut self, path: Option<PathBuf>) -> Result<String> {
        let path = path.unwrap_or_else(|| self.config().default_image_path.clone());
        let path = script::with_default_extension(&path, "png");
        let bytes = self
            .canvas
            .export_image()
            .ok_or(ExecutionError::ImageExportUnsupported)?;

        if path.exists() && !self.history.is_replaying() && !self.ui.confirm_overwrite(&path) {
            return Ok("Image save cancelled.".to_string());
        }
        std::fs::write(&path, bytes).map_err(|source| IoError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        self.history.mark_clean();
        tracing::info!(path = %path.display(), "image saved");
        Ok(format!("Image saved as {}", path.display()))
    }

    fn load_commands(&mut self, path: Option<PathBuf>) -> Result<String> {
        if !self.confirm_discard("load commands") {
            return Ok("Load commands cancelled.".to_string());
        }
        let path = path.unwrap_or_else(|| self.config().default_script_path.clone());
        // Read everything up front: a missing file leaves the session as is.
        let script = Script::load(&path)?;

        self.ui
            .display_message(&format!("Loading commands from {}...", path.display()));
        self.interpreter.reset(&mut self.turtle, &self.canvas);
        self.canvas.clear_canvas();
        self.history.begin_replay();
        self.cancel.reset();

        let cancel = self.cancel.clone();
        let summary = script::replay(&script, &mut *self, &cancel);
        self.history.end_replay(!summary.cancelled);
        tracing::info!(path = %path.display(), ?summary, "script loaded");

        if summary.cancelled {
            return Ok(format!(
                "Load cancelled after {} of {} lines.",
                summary.applied + summary.failed + summary.skipped,
                summary.total
            ));
        }
        Ok(format!(
            "Finished executing commands from {} ({} applied, {} failed, {} skipped).",
            path.display(),
            summary.applied,
            summary.failed,
            summary.skipped
        ))
    }

    fn load_image(&mut self, path: Option<PathBuf>) -> Result<String> {
        if !self.confirm_discard("load image") {
            return Ok("Load image cancelled.".to_string());
        }
        let path = path.unwrap_or_else(|| self.config().default_image_path.clone());
        let bytes = std::fs::read(&path).map_err(|source| IoError::ReadFailed {
            path: path.clone(),
            source,
        })?;

        self.canvas.clear_canvas();
        self.interpreter.reset(&mut self.turtle, &self.canvas);
        self.canvas.set_background_image(bytes);
        self.history.clear();
        tracing::info!(path = %path.display(), "background image loaded");
        Ok(format!("Loaded image '{}' as background.", path.display()))
    }
}

impl<C: Canvas, U: UserInterface> ReplaySink for Session<C, U> {
    fn execute(&mut self, line: &str) -> Result<()> {
        self.submit(line).map(|_| ())
    }

    fn advise(&mut self, message: &str) {
        self.ui.display_message(message);
    }

    fn progress(&mut self, current: usize, total: usize) {
        self.ui.report_progress(current, total);
    }
}
