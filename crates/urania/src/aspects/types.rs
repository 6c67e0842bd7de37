use serde::{Deserialize, Serialize};

/// Catalog entry for a named angular relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    /// Aspect id: "conjunction", "trine", etc.
    pub id: String,
    /// Display name
    pub name: String,
    /// Target separation in degrees (0-180)
    pub degree: f64,
    /// Tolerance window around `degree`
    pub orb: f64,
    /// Line color, presentation only
    #[serde(default = "default_color")]
    pub color: String,
    /// Precedence; lower rank wins exact ties
    #[serde(default)]
    pub rank: u32,
    /// Whether this is one of the five Ptolemaic aspects
    #[serde(default = "default_major")]
    pub major: bool,
}

fn default_color() -> String {
    "#888888".to_string()
}

fn default_major() -> bool {
    true
}

impl Aspect {
    pub fn new(id: &str, name: &str, degree: f64, orb: f64, color: &str, rank: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            degree,
            orb,
            color: color.to_string(),
            rank,
            major: true,
        }
    }

    pub fn minor(mut self) -> Self {
        self.major = false;
        self
    }

    /// Distance of `separation` from this aspect's exact angle
    pub fn deviation(&self, separation: f64) -> f64 {
        (separation - self.degree).abs()
    }
}

/// An aspect found between two points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectMatch {
    /// Source point id
    pub source: String,
    /// Target point id
    pub target: String,
    pub aspect: Aspect,
    /// Actual angular separation (0-180)
    pub separation: f64,
    /// |separation - aspect.degree|
    pub deviation: f64,
    /// 1.0 = exact, approaches 0 at the orb boundary
    pub precision: f64,
    /// Whether the aspect is approaching exact; None without both speeds
    pub applying: Option<bool>,
    /// Tooltip text, e.g. "Square (90) Sun <> Moon"
    pub label: String,
}

impl AspectMatch {
    pub fn is_exact(&self) -> bool {
        self.deviation < 0.1
    }

    /// Whether this match connects `a` and `b` in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}
