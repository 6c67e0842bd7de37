use crate::geometry::Point2;
use crate::points::Point;
use serde::{Deserialize, Serialize};

/// Circle the points are laid out on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
    /// Rotation passed through to `project_on_circle`
    #[serde(default = "default_shift")]
    pub shift: f64,
}

fn default_shift() -> f64 {
    180.0
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius,
            shift: default_shift(),
        }
    }

    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }
}

/// A point with its collision-free angle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedPoint {
    pub point: Point,
    /// Resolved angle in [0, 360)
    pub angle: f64,
    /// Shortest signed arc from the raw angle to the resolved angle
    pub displacement: f64,
    /// Resolved position on the layout circle
    pub position: Point2,
}

impl LocatedPoint {
    pub fn id(&self) -> &str {
        &self.point.id
    }

    pub fn is_displaced(&self) -> bool {
        self.displacement.abs() > f64::EPSILON
    }
}

/// Warning attached to a layout when the minimum separation could not be met
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegenerateGeometry {
    pub point_count: usize,
    pub requested_separation: f64,
    /// Spacing actually used (360 / point_count)
    pub applied_separation: f64,
}

/// Result of a resolver run, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub points: Vec<LocatedPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<DegenerateGeometry>,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<&LocatedPoint> {
        self.points.iter().find(|p| p.point.id == id)
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
