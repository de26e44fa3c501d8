//! # turtle-interp
//!
//! A line-oriented command interpreter for a 2D pen-plotter turtle.
//!
//! Raw text such as `move 50` or `triangle 3,4,5` is parsed, validated and
//! applied to a [`TurtleState`]; shapes are derived by the pure functions in
//! [`geometry`]. Every accepted line is kept in a [`HistoryLog`] that can be
//! saved as a plain-text script and replayed later through the very same
//! pipeline. Rendering and user prompts stay behind the [`Canvas`] and
//! [`UserInterface`] traits, so the whole core runs headless.

pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod interpreter;
pub mod parser;
pub mod script;
pub mod session;
pub mod turtle;

pub use command::*;
pub use config::*;
pub use error::{ExecutionError, IoError, ParseError, ProtocolError, TurtleError, ValidationError};
pub use history::*;
pub use interpreter::*;
pub use parser::*;
pub use script::*;
pub use session::*;
pub use turtle::*;
