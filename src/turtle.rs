//! Turtle state, its primitive transitions, and the rendering seam.

use crate::error::{ExecutionError, ValidationError};
use crate::geometry::Step;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// An RGB pen colour. Channels are range-checked on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from untrusted integer channels.
    pub fn from_channels(r: i64, g: i64, b: i64) -> Result<Self, ValidationError> {
        let channel = |name: char, value: i64| {
            u8::try_from(value).map_err(|_| ValidationError::ChannelOutOfRange {
                channel: name,
                value,
            })
        };
        Ok(Self::new(channel('R', r)?, channel('G', g)?, channel('B', b)?))
    }
}

/// Canvas rectangle `[0, width] x [0, height]`, y increasing downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, p: DVec2) -> bool {
        // Tolerate float noise from sin/cos on axis-aligned moves.
        const EPS: f64 = 1e-9;
        p.x >= -EPS && p.y >= -EPS && p.x <= self.width + EPS && p.y <= self.height + EPS
    }
}

/// A visible line segment produced by a pen-down move.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: DVec2,
    pub to: DVec2,
    pub color: Rgb,
    pub width: u32,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// The rendering collaborator.
///
/// Pixel output, windowing and image codecs live behind this trait; the
/// interpreter only tells it what to draw.
pub trait Canvas {
    fn draw_segment(&mut self, segment: Segment);

    fn draw_arc(&mut self, center: DVec2, radius: f64, color: Rgb, width: u32);

    /// Removes all drawn content and any background image.
    fn clear_canvas(&mut self);

    fn set_background_image(&mut self, bytes: Vec<u8>);

    fn bounds(&self) -> Bounds;

    /// Encoded image of the current canvas, if this renderer supports it.
    fn export_image(&self) -> Option<Vec<u8>> {
        None
    }
}

/// Everything a [`RecordingCanvas`] was asked to do, in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CanvasOp {
    Segment(Segment),
    Arc {
        center: DVec2,
        radius: f64,
        color: Rgb,
        width: u32,
    },
    Clear,
    Background(usize),
}

/// Headless canvas that keeps a log of draw calls.
#[derive(Clone, Debug)]
pub struct RecordingCanvas {
    pub bounds: Bounds,
    pub ops: Vec<CanvasOp>,
    pub background: Option<Vec<u8>>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            bounds: Bounds::new(width, height),
            ops: Vec::new(),
            background: None,
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.ops.iter().filter_map(|op| match op {
            CanvasOp::Segment(s) => Some(s),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn draw_segment(&mut self, segment: Segment) {
        tracing::trace!(from = ?segment.from, to = ?segment.to, "segment");
        self.ops.push(CanvasOp::Segment(segment));
    }

    fn draw_arc(&mut self, center: DVec2, radius: f64, color: Rgb, width: u32) {
        self.ops.push(CanvasOp::Arc {
            center,
            radius,
            color,
            width,
        });
    }

    fn clear_canvas(&mut self) {
        self.ops.push(CanvasOp::Clear);
        self.background = None;
    }

    fn set_background_image(&mut self, bytes: Vec<u8>) {
        self.ops.push(CanvasOp::Background(bytes.len()));
        self.background = Some(bytes);
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// The state of the plotter turtle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Canvas coordinates, origin top-left.
    pub position: DVec2,

    /// Degrees in `[0, 360)`; 0 faces +x, 90 faces +y (down).
    heading: f64,

    pub pen_down: bool,

    color: Rgb,

    /// Always > 0.
    stroke_width: u32,
}

impl TurtleState {
    pub fn new(position: DVec2, heading: f64, color: Rgb, stroke_width: NonZeroU32) -> Self {
        Self {
            position,
            heading: normalize_degrees(heading),
            pen_down: true,
            color,
            stroke_width: stroke_width.get(),
        }
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    /// Unit vector along the current heading.
    pub fn direction(&self) -> DVec2 {
        let (s, c) = self.heading.to_radians().sin_cos();
        DVec2::new(c, s)
    }

    /// Where a move of `distance` would end, without committing it.
    pub fn destination(&self, distance: f64) -> DVec2 {
        self.position + self.direction() * distance
    }

    pub fn turn(&mut self, delta_degrees: f64) {
        self.heading = normalize_degrees(self.heading + delta_degrees);
    }

    /// Moves along the heading; negative `distance` reverses.
    ///
    /// With `bounds` set, a destination outside the canvas is rejected and
    /// the state is left untouched. A pen-down move is reported to `canvas`.
    pub fn move_forward(
        &mut self,
        distance: f64,
        bounds: Option<Bounds>,
        canvas: &mut dyn Canvas,
    ) -> Result<(), ExecutionError> {
        let to = self.destination(distance);
        if let Some(bounds) = bounds
            && !bounds.contains(to)
        {
            return Err(ExecutionError::OutOfBounds { x: to.x, y: to.y });
        }

        if self.pen_down {
            canvas.draw_segment(Segment {
                from: self.position,
                to,
                color: self.color,
                width: self.stroke_width,
            });
        }
        self.position = to;
        Ok(())
    }

    /// Applies one geometry step.
    pub fn apply(
        &mut self,
        step: Step,
        bounds: Option<Bounds>,
        canvas: &mut dyn Canvas,
    ) -> Result<(), ExecutionError> {
        match step {
            Step::Forward(distance) => self.move_forward(distance, bounds, canvas),
            Step::Turn(degrees) => {
                self.turn(degrees);
                Ok(())
            }
        }
    }

    /// Pen-up reposition: never draws.
    pub fn teleport(&mut self, position: DVec2, heading: f64) {
        self.position = position;
        self.heading = normalize_degrees(heading);
    }

    pub fn set_pen(&mut self, down: bool) {
        self.pen_down = down;
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn set_stroke(&mut self, width: u32) -> Result<(), ValidationError> {
        if width == 0 {
            return Err(ValidationError::MustBePositive {
                command: "penwidth",
                value: width.to_string(),
            });
        }
        self.stroke_width = width;
        Ok(())
    }

    /// Back to `center` with the given defaults. Drawn content is untouched.
    pub fn reset_to_center(
        &mut self,
        center: DVec2,
        heading: f64,
        color: Rgb,
        stroke_width: NonZeroU32,
    ) {
        *self = Self::new(center, heading, color, stroke_width);
    }
}

/// Maps any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Canvas that discards everything; used to dry-run motion.
pub(crate) struct NullCanvas(pub Bounds);

impl Canvas for NullCanvas {
    fn draw_segment(&mut self, _segment: Segment) {}
    fn draw_arc(&mut self, _center: DVec2, _radius: f64, _color: Rgb, _width: u32) {}
    fn clear_canvas(&mut self) {}
    fn set_background_image(&mut self, _bytes: Vec<u8>) {}
    fn bounds(&self) -> Bounds {
        self.0
    }
}
