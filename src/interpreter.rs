//! Dispatcher that applies a validated [`TurtleCommand`] to a [`TurtleState`].
//!
//! The entry point is [`Interpreter`]. Configure it with a [`TurtleConfig`],
//! then call [`Interpreter::execute`] once per command. Arguments are
//! already validated by [`Command::from_parsed`](crate::command::Command::from_parsed);
//! the only failure left here is a move that would leave the canvas.

use crate::command::{TriangleArgs, TurtleCommand};
use crate::config::{BoundsPolicy, TurtleConfig};
use crate::error::{ExecutionError, Result};
use crate::geometry::{self, ShapeSpec};
use crate::turtle::{Bounds, Canvas, NullCanvas, TurtleState};

/// Help text shown by `about`.
pub const ABOUT_TEXT: &str = "\
Turtle Graphics Interpreter
  penup | pendown                 lift or lower the pen
  left n | right n                turn by n degrees
  move n | reverse n              move n units
  black | green | red | white | blue | yellow
  pencolour r,g,b | penwidth n    pen colour and stroke width
  square n | star n | hexagon n | circle r
  triangle n | triangle a,b,c     equilateral or by side lengths
  reset | clear                   reset the turtle | wipe the canvas
  save commands|image [path]      write history or canvas
  load commands|image [path]      replay a script or set a background";

/// Applies turtle commands against a turtle and a rendering collaborator.
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    config: TurtleConfig,
}

impl Interpreter {
    pub fn new(config: TurtleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    /// Default turtle at the centre of `canvas`.
    pub fn initial_state(&self, canvas: &dyn Canvas) -> TurtleState {
        TurtleState::new(
            canvas.bounds().center(),
            self.config.default_heading,
            self.config.default_color,
            self.config.default_stroke_width,
        )
    }

    pub fn reset(&self, turtle: &mut TurtleState, canvas: &dyn Canvas) {
        turtle.reset_to_center(
            canvas.bounds().center(),
            self.config.default_heading,
            self.config.default_color,
            self.config.default_stroke_width,
        );
    }

    /// Canvas bounds as sampled right now, when the policy enforces them.
    fn bounds(&self, canvas: &dyn Canvas) -> Option<Bounds> {
        match self.config.bounds_policy {
            BoundsPolicy::Reject => Some(canvas.bounds()),
            BoundsPolicy::Unbounded => None,
        }
    }

    /// Executes `cmd` and returns the message to show the user.
    ///
    /// On error neither `turtle` nor `canvas` has been touched.
    pub fn execute(
        &self,
        cmd: &TurtleCommand,
        turtle: &mut TurtleState,
        canvas: &mut dyn Canvas,
    ) -> Result<String> {
        let message = match cmd {
            TurtleCommand::PenUp => {
                turtle.set_pen(false);
                "Pen is UP.".to_string()
            }
            TurtleCommand::PenDown => {
                turtle.set_pen(true);
                "Pen is DOWN.".to_string()
            }
            TurtleCommand::Turn(degrees) => {
                turtle.turn(*degrees as f64);
                let side = if *degrees < 0 { "left" } else { "right" };
                format!("Turned {side} by {} degrees.", degrees.unsigned_abs())
            }
            TurtleCommand::Move(distance) => {
                let bounds = self.bounds(canvas);
                turtle.move_forward(*distance as f64, bounds, canvas)?;
                if *distance < 0 {
                    format!("Reversed by {} units.", distance.unsigned_abs())
                } else {
                    format!("Moved forward by {distance} units.")
                }
            }
            TurtleCommand::Colour(rgb) => {
                turtle.set_color(*rgb);
                format!("Pen colour set to RGB({},{},{}).", rgb.r, rgb.g, rgb.b)
            }
            TurtleCommand::PenWidth(width) => {
                turtle.set_stroke(*width)?;
                format!("Pen width set to {width}.")
            }
            TurtleCommand::Reset => {
                self.reset(turtle, canvas);
                "Turtle state reset (position, direction, pen). Canvas not cleared.".to_string()
            }
            TurtleCommand::Clear => {
                canvas.clear_canvas();
                "Canvas cleared.".to_string()
            }
            TurtleCommand::About => ABOUT_TEXT.to_string(),
            TurtleCommand::Square(size) => {
                self.draw_in_place(geometry::square(*size as f64), turtle, canvas)?;
                format!("Drew a square with side length {size}.")
            }
            TurtleCommand::Triangle(TriangleArgs::Equilateral(size)) => {
                self.draw_in_place(geometry::equilateral_triangle(*size as f64), turtle, canvas)?;
                format!("Drew an equilateral triangle with side length {size}.")
            }
            TurtleCommand::Triangle(TriangleArgs::Sides(a, b, c)) => {
                self.draw_in_place(geometry::arbitrary_triangle(*a, *b, *c), turtle, canvas)?;
                format!("Drew a triangle with sides {a}, {b}, {c}.")
            }
            TurtleCommand::Star(size) => {
                self.draw_in_place(geometry::star(*size as f64), turtle, canvas)?;
                format!("Drew a star with side length {size}.")
            }
            TurtleCommand::Hexagon(size) => {
                self.draw_in_place(geometry::hexagon(*size as f64), turtle, canvas)?;
                format!("Drew a hexagon with side length {size}.")
            }
            TurtleCommand::Circle(radius) => {
                let arc = geometry::circle(*radius as f64);
                let center = turtle.position;
                if let Some(bounds) = self.bounds(canvas) {
                    for edge in [
                        center + glam::DVec2::new(arc.radius, arc.radius),
                        center - glam::DVec2::new(arc.radius, arc.radius),
                    ] {
                        if !bounds.contains(edge) {
                            return Err(ExecutionError::OutOfBounds {
                                x: edge.x,
                                y: edge.y,
                            }
                            .into());
                        }
                    }
                }
                turtle.set_pen(true);
                canvas.draw_arc(center, arc.radius, turtle.color(), turtle.stroke_width());
                format!("Drew a circle with radius {radius}.")
            }
        };

        tracing::debug!(?cmd, position = ?turtle.position, heading = turtle.heading(), "executed");
        Ok(message)
    }

    /// Draws `spec` with the pen down, then returns the turtle to where it
    /// started without drawing.
    ///
    /// A dry run against the bounds comes first so a shape that would leave
    /// the canvas draws nothing at all.
    fn draw_in_place(
        &self,
        spec: ShapeSpec,
        turtle: &mut TurtleState,
        canvas: &mut dyn Canvas,
    ) -> std::result::Result<(), ExecutionError> {
        let bounds = self.bounds(canvas);
        if let Some(b) = bounds {
            let mut probe = turtle.clone();
            let mut sink = NullCanvas(b);
            spec.clone()
                .try_for_each(|step| probe.apply(step, bounds, &mut sink))?;
        }

        let (home, heading) = (turtle.position, turtle.heading());
        turtle.set_pen(true);
        let drawn = spec.into_iter().try_for_each(|step| turtle.apply(step, bounds, canvas));
        turtle.teleport(home, heading);
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turtle::RecordingCanvas;
    use glam::DVec2;

    fn setup() -> (Interpreter, TurtleState, RecordingCanvas) {
        let interpreter = Interpreter::new(TurtleConfig::default());
        let canvas = RecordingCanvas::new(400.0, 400.0);
        let turtle = interpreter.initial_state(&canvas);
        (interpreter, turtle, canvas)
    }

    #[test]
    fn square_is_drawn_in_place() {
        let (interpreter, mut turtle, mut canvas) = setup();
        interpreter
            .execute(&TurtleCommand::Square(100), &mut turtle, &mut canvas)
            .unwrap();

        assert_eq!(turtle.position, DVec2::new(200.0, 200.0));
        assert_eq!(turtle.heading(), 270.0);
        let segments: Vec<_> = canvas.segments().collect();
        assert_eq!(segments.len(), 4);
        for s in segments {
            assert!((s.length() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn oversized_shape_draws_nothing() {
        let (interpreter, mut turtle, mut canvas) = setup();
        let before = turtle.clone();
        let err = interpreter
            .execute(&TurtleCommand::Hexagon(300), &mut turtle, &mut canvas)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::TurtleError::Execution(ExecutionError::OutOfBounds { .. })
        ));
        assert_eq!(turtle, before);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn shapes_leave_pen_down() {
        let (interpreter, mut turtle, mut canvas) = setup();
        turtle.set_pen(false);
        interpreter
            .execute(&TurtleCommand::Star(50), &mut turtle, &mut canvas)
            .unwrap();
        assert!(turtle.pen_down);
        assert_eq!(canvas.segments().count(), 5);
    }

    #[test]
    fn unbounded_policy_allows_leaving_canvas() {
        let interpreter = Interpreter::new(TurtleConfig {
            bounds_policy: BoundsPolicy::Unbounded,
            ..Default::default()
        });
        let mut canvas = RecordingCanvas::new(400.0, 400.0);
        let mut turtle = interpreter.initial_state(&canvas);
        interpreter
            .execute(&TurtleCommand::Move(1000), &mut turtle, &mut canvas)
            .unwrap();
        assert!((turtle.position.y + 800.0).abs() < 1e-6);
    }

    #[test]
    fn circle_passes_radius_through() {
        let (interpreter, mut turtle, mut canvas) = setup();
        interpreter
            .execute(&TurtleCommand::Circle(30), &mut turtle, &mut canvas)
            .unwrap();
        assert!(matches!(
            canvas.ops.as_slice(),
            [crate::turtle::CanvasOp::Arc { radius, .. }] if *radius == 30.0
        ));
        assert!(interpreter
            .execute(&TurtleCommand::Circle(250), &mut turtle, &mut canvas)
            .is_err());
    }
}
