//! Session configuration.

use crate::turtle::Rgb;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::PathBuf;

/// What happens when a move would leave the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Reject the move with `OutOfBounds`.
    #[default]
    Reject,
    /// Allow the turtle to wander off-canvas.
    Unbounded,
}

/// Defaults applied at session start and on every `reset`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Heading after reset, in degrees. 270 faces up on a y-down canvas.
    pub default_heading: f64,
    pub default_color: Rgb,
    /// Zero is rejected when the config is deserialized.
    pub default_stroke_width: NonZeroU32,
    pub bounds_policy: BoundsPolicy,
    /// Used by `save commands` / `load commands` when no path is given.
    pub default_script_path: PathBuf,
    /// Used by `save image` / `load image` when no path is given.
    pub default_image_path: PathBuf,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            default_heading: 270.0,
            default_color: Rgb::BLACK,
            default_stroke_width: NonZeroU32::MIN,
            bounds_policy: BoundsPolicy::Reject,
            default_script_path: PathBuf::from("turtle_commands.txt"),
            default_image_path: PathBuf::from("turtle_drawing.png"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: TurtleConfig =
            serde_json::from_str(r#"{ "default_heading": 0.0, "bounds_policy": "unbounded" }"#)
                .unwrap();
        assert_eq!(config.default_heading, 0.0);
        assert_eq!(config.bounds_policy, BoundsPolicy::Unbounded);
        assert_eq!(config.default_stroke_width.get(), 1);
        assert_eq!(config.default_script_path, PathBuf::from("turtle_commands.txt"));
    }

    #[test]
    fn zero_stroke_width_is_rejected_on_load() {
        let err = serde_json::from_str::<TurtleConfig>(r#"{ "default_stroke_width": 0 }"#);
        assert!(err.is_err());

        let config: TurtleConfig =
            serde_json::from_str(r#"{ "default_stroke_width": 3 }"#).unwrap();
        assert_eq!(config.default_stroke_width.get(), 3);
    }
}
