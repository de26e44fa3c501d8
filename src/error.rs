//! Error taxonomy for the interpreter.
//!
//! Every family is recovered at the session boundary: a failing line is
//! reported to the user and rolled back, the interpreter loop keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// The raw line could not be mapped to a command.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'about' for help.")]
    UnknownCommand(String),
}

/// A command was recognised but its arguments were rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid parameter for '{command}'. Expected a number, but got '{value}'.")]
    NotANumber { command: &'static str, value: String },

    #[error("Invalid parameter for '{command}'. Value must be positive, but got '{value}'.")]
    MustBePositive { command: &'static str, value: String },

    #[error("Wrong number of parameters for '{command}'. Expected {expected}, but got {found}.")]
    ArityMismatch {
        command: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("Invalid parameter for '{command}'. Value '{value}' is out of range.")]
    OutOfRange { command: &'static str, value: String },

    #[error("Colour channel {channel} must be between 0 and 255, but got {value}.")]
    ChannelOutOfRange { channel: char, value: i64 },

    #[error("Sides {a}, {b}, {c} violate the triangle inequality.")]
    DegenerateTriangle { a: f64, b: f64, c: f64 },

    #[error("Invalid argument for '{command}'. Use {expected}, but got '{found}'.")]
    InvalidChoice {
        command: &'static str,
        expected: &'static str,
        found: String,
    },
}

/// A valid command could not be applied to the current state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Move would leave the canvas at ({x:.1}, {y:.1}).")]
    OutOfBounds { x: f64, y: f64 },

    #[error("The canvas cannot export an image.")]
    ImageExportUnsupported,
}

/// File access failed during save or load.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Could not read '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The command is valid on its own but not in the current session phase.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Skipped nested '{0}' while loading a script.")]
    NestedLoadRejected(String),
}

/// Any failure a submitted line can produce.
#[derive(Debug, Error)]
pub enum TurtleError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

pub type Result<T, E = TurtleError> = std::result::Result<T, E>;
