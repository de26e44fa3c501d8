//! Pure shape derivations.
//!
//! Each derivation returns a [`ShapeSpec`]: a lazy, finite sequence of
//! [`Step`]s that the interpreter streams through the turtle. Nothing here
//! validates input; callers check ranges and the triangle inequality first.
//!
//! Turns are in degrees, positive = clockwise on a y-down canvas (the same
//! sign convention as [`TurtleState::turn`](crate::turtle::TurtleState::turn)).

use serde::{Deserialize, Serialize};

/// A primitive motion step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Advance along the current heading.
    Forward(f64),
    /// Rotate the heading by a signed number of degrees.
    Turn(f64),
}

#[derive(Clone, Debug)]
enum Pattern {
    /// `repeats` x (Forward(side), Turn(turn)).
    Regular { repeats: usize, side: f64, turn: f64 },
    /// One Forward/Turn pair per side.
    Explicit { sides: [f64; 3], turns: [f64; 3] },
}

/// Ordered motion steps describing one shape.
#[derive(Clone, Debug)]
pub struct ShapeSpec {
    pattern: Pattern,
    next: usize,
}

impl ShapeSpec {
    fn new(pattern: Pattern) -> Self {
        Self { pattern, next: 0 }
    }

    fn total(&self) -> usize {
        match self.pattern {
            Pattern::Regular { repeats, .. } => repeats * 2,
            Pattern::Explicit { .. } => 6,
        }
    }

    /// Sum of all turns in the shape, in degrees.
    pub fn total_turn(&self) -> f64 {
        self.clone()
            .map(|step| match step {
                Step::Turn(deg) => deg,
                Step::Forward(_) => 0.0,
            })
            .sum()
    }
}

impl Iterator for ShapeSpec {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.next >= self.total() {
            return None;
        }
        let i = self.next;
        self.next += 1;

        let step = match &self.pattern {
            Pattern::Regular { side, turn, .. } => {
                if i % 2 == 0 {
                    Step::Forward(*side)
                } else {
                    Step::Turn(*turn)
                }
            }
            Pattern::Explicit { sides, turns } => {
                if i % 2 == 0 {
                    Step::Forward(sides[i / 2])
                } else {
                    Step::Turn(turns[i / 2])
                }
            }
        };
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ShapeSpec {}

/// `sides` repetitions of `Forward(side_length), Turn(360 / sides)`.
pub fn regular_polygon(sides: usize, side_length: f64) -> ShapeSpec {
    ShapeSpec::new(Pattern::Regular {
        repeats: sides,
        side: side_length,
        turn: 360.0 / sides as f64,
    })
}

pub fn square(size: f64) -> ShapeSpec {
    regular_polygon(4, size)
}

pub fn hexagon(size: f64) -> ShapeSpec {
    regular_polygon(6, size)
}

pub fn equilateral_triangle(size: f64) -> ShapeSpec {
    ShapeSpec::new(Pattern::Regular {
        repeats: 3,
        side: size,
        turn: 120.0,
    })
}

/// Five-pointed star: 5 x `Forward(size), Turn(144)`.
pub fn star(size: f64) -> ShapeSpec {
    ShapeSpec::new(Pattern::Regular {
        repeats: 5,
        side: size,
        turn: 144.0,
    })
}

/// Strict triangle inequality on all three pairs.
pub fn is_valid_triangle(a: f64, b: f64, c: f64) -> bool {
    a > 0.0 && b > 0.0 && c > 0.0 && a + b > c && a + c > b && b + c > a
}

/// Interior angles (degrees) of a triangle, each opposite the side of the
/// same name.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleAngles {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Law of Cosines. `B` is closed off as `180 - A - C` so the three angles
/// always sum to exactly 180.
///
/// Sides are scaled to the longest one first; squaring very large sides
/// would otherwise overflow.
pub fn triangle_angles(a: f64, b: f64, c: f64) -> TriangleAngles {
    let longest = a.max(b).max(c);
    let (a, b, c) = (a / longest, b / longest, c / longest);
    let angle_a = opposite_angle(a, b, c);
    let angle_c = opposite_angle(c, a, b);
    TriangleAngles {
        a: angle_a,
        b: 180.0 - angle_a - angle_c,
        c: angle_c,
    }
}

/// Angle opposite `x`, given the two adjacent sides `y` and `z`.
fn opposite_angle(x: f64, y: f64, z: f64) -> f64 {
    let cos = (y * y + z * z - x * x) / (2.0 * y * z);
    // Nearly-degenerate inputs can round just past +/-1.
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// `Forward(a), Turn(180-C), Forward(b), Turn(180-A), Forward(c), Turn(180-B)`.
pub fn arbitrary_triangle(a: f64, b: f64, c: f64) -> ShapeSpec {
    let angles = triangle_angles(a, b, c);
    ShapeSpec::new(Pattern::Explicit {
        sides: [a, b, c],
        turns: [180.0 - angles.c, 180.0 - angles.a, 180.0 - angles.b],
    })
}

/// Arc primitive handed straight to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    pub radius: f64,
}

pub fn circle(radius: f64) -> ArcSpec {
    ArcSpec { radius }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) {
        assert!(
            (a - b).abs() <= 1e-6,
            "expected {b:.6}, got {a:.6} (|diff|={:.6})",
            (a - b).abs()
        );
    }

    #[test]
    fn square_alternates_forward_and_right_angle() {
        let steps: Vec<Step> = square(100.0).collect();
        assert_eq!(steps.len(), 8);
        for pair in steps.chunks(2) {
            assert_eq!(pair[0], Step::Forward(100.0));
            assert_eq!(pair[1], Step::Turn(90.0));
        }
    }

    #[test]
    fn regular_shapes_close() {
        approx_eq(square(10.0).total_turn(), 360.0);
        approx_eq(hexagon(10.0).total_turn(), 360.0);
        approx_eq(equilateral_triangle(10.0).total_turn(), 360.0);
        approx_eq(regular_polygon(7, 3.0).total_turn(), 360.0);
        // A pentagram winds twice.
        approx_eq(star(10.0).total_turn(), 720.0);
    }

    #[test]
    fn right_triangle_angles() {
        let angles = triangle_angles(3.0, 4.0, 5.0);
        approx_eq(angles.c, 90.0);
        approx_eq(angles.b, 53.130102);
        approx_eq(angles.a, 36.869898);
    }

    #[test]
    fn arbitrary_triangle_turns_sum_to_full_circle() {
        let cases = [
            (3.0, 4.0, 5.0),
            (7.0, 7.5, 2.1),
            (1.0, 1.0, 1.9999),
            (10.0, 6.0, 5.0),
            (1e200, 1e200, 1e200),
            (3e307, 4e307, 5e307),
            (3e-300, 4e-300, 5e-300),
        ];
        for (a, b, c) in cases {
            let spec = arbitrary_triangle(a, b, c);
            assert_eq!(spec.len(), 6);
            approx_eq(spec.total_turn(), 360.0);
        }
    }

    #[test]
    fn huge_sides_keep_finite_angles() {
        let angles = triangle_angles(1e200, 1e200, 1e200);
        approx_eq(angles.a, 60.0);
        approx_eq(angles.b, 60.0);
        approx_eq(angles.c, 60.0);

        let angles = triangle_angles(3e300, 4e300, 5e300);
        approx_eq(angles.c, 90.0);
        approx_eq(angles.a, 36.869898);
    }

    #[test]
    fn arbitrary_triangle_step_order() {
        let steps: Vec<Step> = arbitrary_triangle(3.0, 4.0, 5.0).collect();
        assert_eq!(steps[0], Step::Forward(3.0));
        assert_eq!(steps[2], Step::Forward(4.0));
        assert_eq!(steps[4], Step::Forward(5.0));
        match steps[1] {
            Step::Turn(deg) => approx_eq(deg, 90.0),
            other => panic!("expected turn, got {other:?}"),
        }
    }

    #[test]
    fn triangle_inequality_is_strict() {
        assert!(is_valid_triangle(3.0, 4.0, 5.0));
        assert!(!is_valid_triangle(1.0, 1.0, 5.0));
        assert!(!is_valid_triangle(1.0, 1.0, 2.0));
        assert!(!is_valid_triangle(0.0, 1.0, 1.0));
    }
}
