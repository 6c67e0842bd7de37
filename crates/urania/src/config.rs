use crate::aspects::{Aspect, AspectCatalog};
use crate::dignities::{default_exact_exaltations, ExactExaltation};
use crate::error::{ConfigError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    // Layout
    pub margin: f64,
    pub padding: f64,
    pub symbol_scale: f64,
    /// Radius of a planet symbol, before scaling
    pub collision_radius: f64,
    /// Overrides the separation derived from `collision_radius`
    pub min_separation: Option<f64>,

    // Radii Ratios
    pub indoor_circle_radius_ratio: f64,
    pub inner_circle_radius_ratio: f64,
    pub ruler_radius: f64,

    // Options
    pub shift_in_degrees: f64,
    pub stroke_only: bool,

    // Theme Colors
    pub color_background: String,
    pub color_points: String,
    pub color_circles: String,
    pub color_lines: String,
    pub color_axis: String,
    pub color_cusps: String,
    pub sign_colors: Vec<String>,

    // Stroke Widths
    pub stroke_points: f64,
    pub stroke_circles: f64,
    pub stroke_axis: f64,
    pub stroke_cusps: f64,

    /// Exact exaltation degrees marked in the dignity descriptions
    pub exact_exaltations: Vec<ExactExaltation>,

    pub aspects: AspectSettings,
}

/// Settings for aspect detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectSettings {
    /// Add the minor aspects to the built-in table
    pub include_minor: bool,
    /// Orb overrides per aspect id
    pub orbs: BTreeMap<String, f64>,
    /// Color overrides per aspect id
    pub colors: BTreeMap<String, String>,
    /// Additional aspects appended to the table
    pub extra: Vec<Aspect>,
}

impl AspectSettings {
    /// Build the catalog these settings describe
    pub fn catalog(&self) -> Result<AspectCatalog, ValidationError> {
        let base = if self.include_minor {
            AspectCatalog::with_minor()
        } else {
            AspectCatalog::major()
        };

        for id in self.orbs.keys().chain(self.colors.keys()) {
            if base.get(id).is_none() && !self.extra.iter().any(|a| &a.id == id) {
                return Err(ValidationError::InvalidAspect(format!(
                    "override for unknown aspect '{}'",
                    id
                )));
            }
        }

        let aspects = base
            .iter()
            .cloned()
            .chain(self.extra.iter().cloned())
            .map(|mut aspect| {
                if let Some(orb) = self.orbs.get(&aspect.id) {
                    aspect.orb = *orb;
                }
                if let Some(color) = self.colors.get(&aspect.id) {
                    aspect.color = color.clone();
                }
                aspect
            })
            .collect();

        AspectCatalog::new(aspects)
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            margin: 50.0,
            padding: 18.0,
            symbol_scale: 1.0,
            collision_radius: 10.0,
            min_separation: None,

            indoor_circle_radius_ratio: 2.0,
            inner_circle_radius_ratio: 8.0,
            ruler_radius: 4.0,

            shift_in_degrees: 180.0, // 0 is West
            stroke_only: false,

            color_background: "#fff".to_string(),
            color_points: "#000".to_string(),
            color_circles: "#333".to_string(),
            color_lines: "#333".to_string(),
            color_axis: "#333".to_string(),
            color_cusps: "#000".to_string(),
            sign_colors: vec![
                "#FF4500".to_string(), // Aries
                "#8B4513".to_string(), // Taurus
                "#87CEEB".to_string(), // Gemini
                "#27AE60".to_string(), // Cancer
                "#FF4500".to_string(), // Leo
                "#8B4513".to_string(), // Virgo
                "#87CEEB".to_string(), // Libra
                "#27AE60".to_string(), // Scorpio
                "#FF4500".to_string(), // Sagittarius
                "#8B4513".to_string(), // Capricorn
                "#87CEEB".to_string(), // Aquarius
                "#27AE60".to_string(), // Pisces
            ],

            stroke_points: 1.8,
            stroke_circles: 2.0,
            stroke_axis: 1.6,
            stroke_cusps: 1.0,

            exact_exaltations: default_exact_exaltations(),

            aspects: AspectSettings::default(),
        }
    }
}

impl ChartSettings {
    /// Parse settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: ChartSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("symbol_scale", self.symbol_scale),
            ("indoor_circle_radius_ratio", self.indoor_circle_radius_ratio),
            ("inner_circle_radius_ratio", self.inner_circle_radius_ratio),
            ("ruler_radius", self.ruler_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("margin", self.margin),
            ("padding", self.padding),
            ("collision_radius", self.collision_radius),
            ("stroke_points", self.stroke_points),
            ("stroke_circles", self.stroke_circles),
            ("stroke_axis", self.stroke_axis),
            ("stroke_cusps", self.stroke_cusps),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if let Some(separation) = self.min_separation {
            if !separation.is_finite() || separation < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "min_separation must be a non-negative number, got {}",
                    separation
                )));
            }
        }

        if !self.shift_in_degrees.is_finite() {
            return Err(ConfigError::Invalid(
                "shift_in_degrees must be finite".to_string(),
            ));
        }

        if self.sign_colors.len() != 12 {
            return Err(ConfigError::Invalid(format!(
                "sign_colors must have 12 entries, got {}",
                self.sign_colors.len()
            )));
        }

        for exact in &self.exact_exaltations {
            if !exact.position.is_finite() || !exact.orbit.is_finite() || exact.orbit < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "exact exaltation for '{}' needs a finite position and orbit",
                    exact.planet_id
                )));
            }
        }

        self.aspects
            .catalog()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Collision radius after applying the symbol scale
    pub fn scaled_collision_radius(&self) -> f64 {
        self.collision_radius * self.symbol_scale
    }

    /// Padding after applying the symbol scale
    pub fn scaled_padding(&self) -> f64 {
        self.padding * self.symbol_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ChartSettings::default().validate().is_ok());
    }

    #[test]
    fn orb_override_applies() {
        let mut settings = AspectSettings::default();
        settings.orbs.insert("square".to_string(), 3.0);
        let catalog = settings.catalog().unwrap();
        assert_eq!(catalog.get("square").map(|a| a.orb), Some(3.0));
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn unknown_override_is_rejected() {
        let mut settings = AspectSettings::default();
        settings.orbs.insert("quincunx".to_string(), 3.0);
        assert!(settings.catalog().is_err());
        settings.include_minor = true;
        assert!(settings.catalog().is_ok());
    }
}
