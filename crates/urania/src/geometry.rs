use serde::{Deserialize, Serialize};

/// Full circle in degrees
pub const DEG_360: f64 = 360.0;

/// Point in 2D space (screen coordinates, y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point2,
    pub to: Point2,
}

impl Segment {
    pub fn new(from: Point2, to: Point2) -> Self {
        Self { from, to }
    }

    /// Segment along a ray from `radius_from` to `radius_to`
    pub fn radial(center: Point2, radius_from: f64, radius_to: f64, angle: f64, shift: f64) -> Self {
        Self {
            from: project_on_circle(center, radius_from, angle, shift),
            to: project_on_circle(center, radius_to, angle, shift),
        }
    }
}

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Normalize an angle into [0, 360)
pub fn normalize(degrees: f64) -> f64 {
    let angle = degrees.rem_euclid(DEG_360);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if angle >= DEG_360 {
        0.0
    } else {
        angle
    }
}

/// Shorter distance between two angles on the circle, in [0, 180]
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = (normalize(a) - normalize(b)).abs();
    if diff > 180.0 {
        DEG_360 - diff
    } else {
        diff
    }
}

/// Shortest signed arc from `from` to `to`, in (-180, 180]
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let mut delta = normalize(to) - normalize(from);
    if delta > 180.0 {
        delta -= DEG_360;
    } else if delta <= -180.0 {
        delta += DEG_360;
    }
    delta
}

/// Project a chart angle onto a circle.
///
/// The chart angle is rotated by `shift` and mirrored so that, with y growing
/// downwards, angles increase counter-clockwise on screen. With a shift of 180
/// degrees, 0 sits on the left of the center.
pub fn project_on_circle(center: Point2, radius: f64, angle: f64, shift: f64) -> Point2 {
    let theta = to_radians(shift - angle);
    Point2 {
        x: center.x + radius * theta.cos(),
        y: center.y + radius * theta.sin(),
    }
}

/// Minimum angular distance at which two round symbols of `collision_radius`
/// placed on a circle of `circle_radius` stop overlapping.
pub fn collision_separation(collision_radius: f64, circle_radius: f64) -> f64 {
    if circle_radius <= 0.0 {
        return 180.0;
    }
    let ratio = collision_radius / circle_radius;
    if ratio >= 1.0 {
        180.0
    } else {
        to_degrees(2.0 * ratio.max(0.0).asin())
    }
}
