//! Splits a raw line into a canonical command name and its argument text.
//!
//! Only the command word is lowercased; the argument remainder keeps its
//! casing and inner structure (`255, 0 ,10`, file paths, ...).

use crate::error::ParseError;
use serde::{Deserialize, Serialize};

/// Every command the dispatcher knows, after alias resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandName {
    PenUp,
    PenDown,
    Left,
    Right,
    Move,
    Reverse,
    Black,
    Green,
    Red,
    White,
    Blue,
    Yellow,
    PenColour,
    PenWidth,
    Reset,
    Clear,
    About,
    Square,
    Triangle,
    Star,
    Hexagon,
    Circle,
    Save,
    Load,
}

impl CommandName {
    pub const ALL: [CommandName; 24] = [
        CommandName::PenUp,
        CommandName::PenDown,
        CommandName::Left,
        CommandName::Right,
        CommandName::Move,
        CommandName::Reverse,
        CommandName::Black,
        CommandName::Green,
        CommandName::Red,
        CommandName::White,
        CommandName::Blue,
        CommandName::Yellow,
        CommandName::PenColour,
        CommandName::PenWidth,
        CommandName::Reset,
        CommandName::Clear,
        CommandName::About,
        CommandName::Square,
        CommandName::Triangle,
        CommandName::Star,
        CommandName::Hexagon,
        CommandName::Circle,
        CommandName::Save,
        CommandName::Load,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::PenUp => "penup",
            CommandName::PenDown => "pendown",
            CommandName::Left => "left",
            CommandName::Right => "right",
            CommandName::Move => "move",
            CommandName::Reverse => "reverse",
            CommandName::Black => "black",
            CommandName::Green => "green",
            CommandName::Red => "red",
            CommandName::White => "white",
            CommandName::Blue => "blue",
            CommandName::Yellow => "yellow",
            CommandName::PenColour => "pencolour",
            CommandName::PenWidth => "penwidth",
            CommandName::Reset => "reset",
            CommandName::Clear => "clear",
            CommandName::About => "about",
            CommandName::Square => "square",
            CommandName::Triangle => "triangle",
            CommandName::Star => "star",
            CommandName::Hexagon => "hexagon",
            CommandName::Circle => "circle",
            CommandName::Save => "save",
            CommandName::Load => "load",
        }
    }

    /// Exact lookup of a lowercase canonical name.
    pub fn from_canonical(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == word)
    }
}

/// Common shorthands and misspellings, consulted only after an exact
/// canonical lookup fails.
const ALIASES: &[(&str, CommandName)] = &[
    ("fwd", CommandName::Move),
    ("forward", CommandName::Move),
    ("fd", CommandName::Move),
    ("mvoe", CommandName::Move),
    ("back", CommandName::Reverse),
    ("backward", CommandName::Reverse),
    ("bk", CommandName::Reverse),
    ("lt", CommandName::Left),
    ("rt", CommandName::Right),
    ("pu", CommandName::PenUp),
    ("pd", CommandName::PenDown),
    ("pencolor", CommandName::PenColour),
    ("colour", CommandName::PenColour),
    ("color", CommandName::PenColour),
    ("width", CommandName::PenWidth),
    ("pensize", CommandName::PenWidth),
    ("tri", CommandName::Triangle),
    ("traingle", CommandName::Triangle),
    ("trinagle", CommandName::Triangle),
    ("sqaure", CommandName::Square),
    ("sqare", CommandName::Square),
    ("hex", CommandName::Hexagon),
    ("cls", CommandName::Clear),
    ("help", CommandName::About),
];

pub fn resolve_alias(word: &str) -> Option<CommandName> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == word)
        .map(|(_, name)| *name)
}

/// One tokenized input line.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedLine<'a> {
    pub name: CommandName,
    /// Trimmed remainder after the command word, if any.
    pub args: Option<&'a str>,
    /// The word the user actually typed, when an alias was substituted.
    pub corrected_from: Option<String>,
}

impl ParsedLine<'_> {
    /// Advisory for the user when an alias was applied.
    pub fn correction_notice(&self) -> Option<String> {
        self.corrected_from
            .as_ref()
            .map(|typed| format!("Interpreted '{typed}' as '{}'.", self.name.as_str()))
    }
}

/// Tokenizes `line`. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ParsedLine<'_>>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.find(char::is_whitespace) {
        Some(split) => (&trimmed[..split], Some(trimmed[split..].trim_start())),
        None => (trimmed, None),
    };
    let word = word.to_lowercase();
    let args = rest.filter(|r| !r.is_empty());

    if let Some(name) = CommandName::from_canonical(&word) {
        return Ok(Some(ParsedLine {
            name,
            args,
            corrected_from: None,
        }));
    }

    match resolve_alias(&word) {
        Some(name) => Ok(Some(ParsedLine {
            name,
            args,
            corrected_from: Some(word),
        })),
        None => Err(ParseError::UnknownCommand(word)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_noops() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   \t "), Ok(None));
    }

    #[test]
    fn splits_name_from_arguments() {
        let parsed = parse_line("  PenColour   255, 0 ,10  ").unwrap().unwrap();
        assert_eq!(parsed.name, CommandName::PenColour);
        assert_eq!(parsed.args, Some("255, 0 ,10"));
        assert_eq!(parsed.corrected_from, None);
    }

    #[test]
    fn argument_casing_is_preserved() {
        let parsed = parse_line("SAVE commands My Drawing.TXT").unwrap().unwrap();
        assert_eq!(parsed.name, CommandName::Save);
        assert_eq!(parsed.args, Some("commands My Drawing.TXT"));
    }

    #[test]
    fn aliases_are_flagged() {
        let parsed = parse_line("fwd 10").unwrap().unwrap();
        assert_eq!(parsed.name, CommandName::Move);
        assert_eq!(parsed.corrected_from.as_deref(), Some("fwd"));
        assert_eq!(
            parsed.correction_notice().as_deref(),
            Some("Interpreted 'fwd' as 'move'.")
        );

        let parsed = parse_line("Tri 3,4,5").unwrap().unwrap();
        assert_eq!(parsed.name, CommandName::Triangle);
    }

    #[test]
    fn unknown_word_is_an_error() {
        assert_eq!(
            parse_line("jump 10"),
            Err(ParseError::UnknownCommand("jump".to_string()))
        );
    }

    #[test]
    fn every_canonical_name_round_trips() {
        for name in CommandName::ALL {
            assert_eq!(CommandName::from_canonical(name.as_str()), Some(name));
            assert!(resolve_alias(name.as_str()).is_none());
        }
    }
}
