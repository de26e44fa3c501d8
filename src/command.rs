//! Typed commands and their argument contracts.
//!
//! [`Command::from_parsed`] is the only place argument text is interpreted.
//! It either yields a fully validated command or an error, so handlers never
//! see out-of-range input and never mutate state before validation.

use crate::error::ValidationError;
use crate::geometry;
use crate::parser::{CommandName, ParsedLine};
use crate::turtle::Rgb;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shape of a `triangle` argument.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TriangleArgs {
    /// `triangle 50`
    Equilateral(i64),
    /// `triangle 3,4,5`
    Sides(f64, f64, f64),
}

/// What a `save`/`load` acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileTarget {
    Commands,
    Image,
}

/// A command that acts on the turtle or canvas only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleCommand {
    PenUp,
    PenDown,
    /// Signed degrees; positive turns clockwise (right).
    Turn(i64),
    /// Signed distance; `reverse n` becomes `Move(-n)`.
    Move(i64),
    Colour(Rgb),
    PenWidth(u32),
    Reset,
    Clear,
    About,
    Square(i64),
    Triangle(TriangleArgs),
    Star(i64),
    Hexagon(i64),
    Circle(i64),
}

impl TurtleCommand {
    /// Commands that leave nothing to replay; kept for audit only.
    pub fn is_informational(&self) -> bool {
        matches!(self, TurtleCommand::About)
    }
}

/// A fully validated input line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Turtle(TurtleCommand),
    Save(FileTarget, Option<PathBuf>),
    Load(FileTarget, Option<PathBuf>),
}

impl Command {
    /// Validates the argument text of `parsed` against its command's contract.
    pub fn from_parsed(parsed: &ParsedLine<'_>) -> Result<Self, ValidationError> {
        use TurtleCommand as T;

        let name = parsed.name;
        let args = parsed.args;
        let cmd = match name {
            CommandName::Save => {
                let (target, path) = file_args(name, args)?;
                return Ok(Command::Save(target, path));
            }
            CommandName::Load => {
                let (target, path) = file_args(name, args)?;
                return Ok(Command::Load(target, path));
            }
            CommandName::PenUp => no_args(name, args, T::PenUp)?,
            CommandName::PenDown => no_args(name, args, T::PenDown)?,
            CommandName::Left => {
                let degrees = integer(name, args)?;
                let degrees = degrees.checked_neg().ok_or_else(|| ValidationError::OutOfRange {
                    command: name.as_str(),
                    value: degrees.to_string(),
                })?;
                T::Turn(degrees)
            }
            CommandName::Right => T::Turn(integer(name, args)?),
            CommandName::Move => T::Move(positive(name, args)?),
            CommandName::Reverse => T::Move(-positive(name, args)?),
            CommandName::Black => no_args(name, args, T::Colour(Rgb::BLACK))?,
            CommandName::Green => no_args(name, args, T::Colour(Rgb::GREEN))?,
            CommandName::Red => no_args(name, args, T::Colour(Rgb::RED))?,
            CommandName::White => no_args(name, args, T::Colour(Rgb::WHITE))?,
            CommandName::Blue => no_args(name, args, T::Colour(Rgb::BLUE))?,
            CommandName::Yellow => no_args(name, args, T::Colour(Rgb::YELLOW))?,
            CommandName::PenColour => T::Colour(rgb(name, args)?),
            CommandName::PenWidth => {
                let width = positive(name, args)?;
                let width = u32::try_from(width).map_err(|_| ValidationError::OutOfRange {
                    command: name.as_str(),
                    value: width.to_string(),
                })?;
                T::PenWidth(width)
            }
            CommandName::Reset => no_args(name, args, T::Reset)?,
            CommandName::Clear => no_args(name, args, T::Clear)?,
            CommandName::About => no_args(name, args, T::About)?,
            CommandName::Square => T::Square(positive(name, args)?),
            CommandName::Triangle => T::Triangle(triangle(name, args)?),
            CommandName::Star => T::Star(positive(name, args)?),
            CommandName::Hexagon => T::Hexagon(positive(name, args)?),
            CommandName::Circle => T::Circle(positive(name, args)?),
        };
        Ok(Command::Turtle(cmd))
    }
}

fn no_args<T>(name: CommandName, args: Option<&str>, cmd: T) -> Result<T, ValidationError> {
    match args {
        None => Ok(cmd),
        Some(rest) => Err(ValidationError::ArityMismatch {
            command: name.as_str(),
            expected: "no parameters",
            found: rest.split_whitespace().count(),
        }),
    }
}

fn single<'a>(name: CommandName, args: Option<&'a str>) -> Result<&'a str, ValidationError> {
    let found = args.map_or(0, |a| a.split_whitespace().count());
    match args {
        Some(value) if found == 1 => Ok(value),
        _ => Err(ValidationError::ArityMismatch {
            command: name.as_str(),
            expected: "one parameter",
            found,
        }),
    }
}

fn parse_int(name: CommandName, value: &str) -> Result<i64, ValidationError> {
    let value = value.trim();
    value.parse().map_err(|_| ValidationError::NotANumber {
        command: name.as_str(),
        value: value.to_string(),
    })
}

fn integer(name: CommandName, args: Option<&str>) -> Result<i64, ValidationError> {
    parse_int(name, single(name, args)?)
}

fn positive(name: CommandName, args: Option<&str>) -> Result<i64, ValidationError> {
    let value = integer(name, args)?;
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            command: name.as_str(),
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Splits a comma list, requiring exactly three entries.
fn triple(name: CommandName, args: Option<&str>) -> Result<[&str; 3], ValidationError> {
    let parts: Vec<&str> = args.map_or_else(Vec::new, |a| a.split(',').map(str::trim).collect());
    match parts.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(ValidationError::ArityMismatch {
            command: name.as_str(),
            expected: "three comma-separated values",
            found: parts.len(),
        }),
    }
}

fn rgb(name: CommandName, args: Option<&str>) -> Result<Rgb, ValidationError> {
    let [r, g, b] = triple(name, args)?;
    Rgb::from_channels(parse_int(name, r)?, parse_int(name, g)?, parse_int(name, b)?)
}

fn triangle(name: CommandName, args: Option<&str>) -> Result<TriangleArgs, ValidationError> {
    if !args.is_some_and(|a| a.contains(',')) {
        return Ok(TriangleArgs::Equilateral(positive(name, args)?));
    }

    let sides = triple(name, args)?;
    let mut parsed = [0.0; 3];
    for (slot, text) in parsed.iter_mut().zip(sides) {
        let value: f64 = text.parse().map_err(|_| ValidationError::NotANumber {
            command: name.as_str(),
            value: text.to_string(),
        })?;
        if !value.is_finite() {
            return Err(ValidationError::NotANumber {
                command: name.as_str(),
                value: text.to_string(),
            });
        }
        if value <= 0.0 {
            return Err(ValidationError::MustBePositive {
                command: name.as_str(),
                value: text.to_string(),
            });
        }
        *slot = value;
    }

    let [a, b, c] = parsed;
    if !geometry::is_valid_triangle(a, b, c) {
        return Err(ValidationError::DegenerateTriangle { a, b, c });
    }
    Ok(TriangleArgs::Sides(a, b, c))
}

fn file_args(
    name: CommandName,
    args: Option<&str>,
) -> Result<(FileTarget, Option<PathBuf>), ValidationError> {
    let invalid = |found: &str| ValidationError::InvalidChoice {
        command: name.as_str(),
        expected: "'commands' or 'image'",
        found: found.to_string(),
    };

    let args = args.ok_or_else(|| invalid(""))?;
    let (kind, path) = match args.find(char::is_whitespace) {
        Some(split) => (&args[..split], Some(args[split..].trim())),
        None => (args, None),
    };
    let target = match kind.to_lowercase().as_str() {
        "commands" => FileTarget::Commands,
        "image" => FileTarget::Image,
        _ => return Err(invalid(kind)),
    };
    Ok((target, path.filter(|p| !p.is_empty()).map(PathBuf::from)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn cmd(line: &str) -> Result<Command, ValidationError> {
        let parsed = parse_line(line).unwrap().unwrap();
        Command::from_parsed(&parsed)
    }

    fn turtle(line: &str) -> Result<TurtleCommand, ValidationError> {
        cmd(line).map(|c| match c {
            Command::Turtle(t) => t,
            other => panic!("expected a turtle command, got {other:?}"),
        })
    }

    #[test]
    fn turns_are_unrestricted_integers() {
        assert_eq!(turtle("left 90"), Ok(TurtleCommand::Turn(-90)));
        assert_eq!(turtle("right -720"), Ok(TurtleCommand::Turn(-720)));
        assert_eq!(turtle("right 400"), Ok(TurtleCommand::Turn(400)));
        assert_eq!(turtle(&format!("right {}", i64::MIN)), Ok(TurtleCommand::Turn(i64::MIN)));
        assert_eq!(turtle(&format!("left {}", i64::MAX)), Ok(TurtleCommand::Turn(-i64::MAX)));
    }

    #[test]
    fn left_turn_without_a_negation_is_out_of_range() {
        assert!(matches!(
            turtle(&format!("left {}", i64::MIN)),
            Err(ValidationError::OutOfRange { command: "left", .. })
        ));
    }

    #[test]
    fn oversized_pen_width_is_out_of_range() {
        assert_eq!(turtle("penwidth 7"), Ok(TurtleCommand::PenWidth(7)));
        assert!(matches!(
            turtle("penwidth 5000000000"),
            Err(ValidationError::OutOfRange { command: "penwidth", .. })
        ));
    }

    #[test]
    fn distances_must_be_positive_integers() {
        assert_eq!(turtle("move 10"), Ok(TurtleCommand::Move(10)));
        assert_eq!(turtle("reverse 10"), Ok(TurtleCommand::Move(-10)));
        assert!(matches!(turtle("move 0"), Err(ValidationError::MustBePositive { .. })));
        assert!(matches!(turtle("move -5"), Err(ValidationError::MustBePositive { .. })));
        assert!(matches!(turtle("move ten"), Err(ValidationError::NotANumber { .. })));
        assert!(matches!(turtle("move 1.5"), Err(ValidationError::NotANumber { .. })));
        assert!(matches!(turtle("move"), Err(ValidationError::ArityMismatch { found: 0, .. })));
        assert!(matches!(turtle("move 1 2"), Err(ValidationError::ArityMismatch { found: 2, .. })));
    }

    #[test]
    fn pencolour_contract() {
        assert_eq!(turtle("pencolour 10, 20 ,30"), Ok(TurtleCommand::Colour(Rgb::new(10, 20, 30))));
        assert!(matches!(
            turtle("pencolour 999,0,0"),
            Err(ValidationError::ChannelOutOfRange { channel: 'R', value: 999 })
        ));
        assert!(matches!(turtle("pencolour 1,2"), Err(ValidationError::ArityMismatch { found: 2, .. })));
        assert!(matches!(turtle("pencolour 1,x,2"), Err(ValidationError::NotANumber { .. })));
        assert_eq!(turtle("red"), Ok(TurtleCommand::Colour(Rgb::RED)));
    }

    #[test]
    fn triangle_union() {
        assert_eq!(turtle("triangle 50"), Ok(TurtleCommand::Triangle(TriangleArgs::Equilateral(50))));
        assert_eq!(
            turtle("triangle 3,4,5"),
            Ok(TurtleCommand::Triangle(TriangleArgs::Sides(3.0, 4.0, 5.0)))
        );
        assert!(matches!(turtle("triangle 1,1,5"), Err(ValidationError::DegenerateTriangle { .. })));
        assert!(matches!(turtle("triangle 1,1"), Err(ValidationError::ArityMismatch { .. })));
        assert!(matches!(turtle("triangle 0,1,1"), Err(ValidationError::MustBePositive { .. })));
        assert!(matches!(turtle("triangle NaN,1,1"), Err(ValidationError::NotANumber { .. })));
    }

    #[test]
    fn file_commands() {
        assert_eq!(cmd("save commands"), Ok(Command::Save(FileTarget::Commands, None)));
        assert_eq!(
            cmd("load Image Some Dir/Pic.png"),
            Ok(Command::Load(FileTarget::Image, Some(PathBuf::from("Some Dir/Pic.png"))))
        );
        assert!(matches!(cmd("save"), Err(ValidationError::InvalidChoice { .. })));
        assert!(matches!(cmd("load stuff"), Err(ValidationError::InvalidChoice { .. })));
    }

    #[test]
    fn bare_commands_reject_arguments() {
        assert_eq!(turtle("penup"), Ok(TurtleCommand::PenUp));
        assert!(matches!(turtle("penup now"), Err(ValidationError::ArityMismatch { .. })));
    }
}
