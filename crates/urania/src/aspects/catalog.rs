use crate::aspects::types::Aspect;
use crate::error::ValidationError;
use std::collections::HashSet;

/// Immutable table of aspects, kept in precedence order
#[derive(Debug, Clone, PartialEq)]
pub struct AspectCatalog {
    aspects: Vec<Aspect>,
}

impl AspectCatalog {
    /// Build a catalog, validating each entry. Entries are reordered by rank;
    /// equal ranks keep the given order.
    pub fn new(mut aspects: Vec<Aspect>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for aspect in &aspects {
            if aspect.id.is_empty() {
                return Err(ValidationError::InvalidAspect(
                    "aspect id must be a non-empty string".to_string(),
                ));
            }
            if !seen.insert(aspect.id.as_str()) {
                return Err(ValidationError::InvalidAspect(format!(
                    "duplicate aspect id '{}'",
                    aspect.id
                )));
            }
            if !aspect.degree.is_finite() || !(0.0..=180.0).contains(&aspect.degree) {
                return Err(ValidationError::InvalidAspect(format!(
                    "'{}' degree must be within 0..=180, got {}",
                    aspect.id, aspect.degree
                )));
            }
            if !aspect.orb.is_finite() || aspect.orb < 0.0 {
                return Err(ValidationError::InvalidAspect(format!(
                    "'{}' orb must be finite and non-negative, got {}",
                    aspect.id, aspect.orb
                )));
            }
        }
        aspects.sort_by_key(|a| a.rank);
        Ok(Self { aspects })
    }

    /// Conjunction, sextile, square, trine, opposition
    pub fn major() -> Self {
        Self {
            aspects: major_aspects(),
        }
    }

    /// Major aspects followed by the common minor ones
    pub fn with_minor() -> Self {
        let mut aspects = major_aspects();
        aspects.extend(minor_aspects());
        Self { aspects }
    }

    /// Iterate in precedence order
    pub fn iter(&self) -> std::slice::Iter<'_, Aspect> {
        self.aspects.iter()
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Aspect> {
        self.aspects.iter().find(|a| a.id == id)
    }

    /// All entries whose orb window contains `separation`
    pub fn matching(&self, separation: f64) -> impl Iterator<Item = &Aspect> + '_ {
        self.aspects
            .iter()
            .filter(move |a| a.deviation(separation) <= a.orb)
    }

    /// Closest entry whose orb window contains `separation`; exact ties go to
    /// the lower rank
    pub fn best_match(&self, separation: f64) -> Option<&Aspect> {
        let mut best: Option<&Aspect> = None;
        for candidate in self.matching(separation) {
            match best {
                Some(current) if candidate.deviation(separation) >= current.deviation(separation) => {}
                _ => best = Some(candidate),
            }
        }
        best
    }
}

impl Default for AspectCatalog {
    fn default() -> Self {
        Self::major()
    }
}

/// 1 - deviation / orb, clamped into (0, 1]
pub fn precision(deviation: f64, orb: f64) -> f64 {
    if orb <= 0.0 {
        return if deviation <= 0.0 { 1.0 } else { f64::EPSILON };
    }
    (1.0 - deviation / orb).clamp(f64::EPSILON, 1.0)
}

fn major_aspects() -> Vec<Aspect> {
    vec![
        Aspect::new("conjunction", "Conjunction", 0.0, 10.0, "transparent", 0),
        Aspect::new("sextile", "Sextile", 60.0, 6.0, "#1E90FF", 1),
        Aspect::new("square", "Square", 90.0, 8.0, "#FF4500", 2),
        Aspect::new("trine", "Trine", 120.0, 8.0, "#27AE60", 3),
        Aspect::new("opposition", "Opposition", 180.0, 10.0, "#27AE60", 4),
    ]
}

fn minor_aspects() -> Vec<Aspect> {
    vec![
        Aspect::new("semisextile", "Semi-sextile", 30.0, 2.0, "#9ACD32", 5).minor(),
        Aspect::new("semisquare", "Semi-square", 45.0, 2.0, "#FF8C00", 6).minor(),
        Aspect::new("quintile", "Quintile", 72.0, 2.0, "#8A2BE2", 7).minor(),
        Aspect::new("sesquiquadrate", "Sesquiquadrate", 135.0, 2.0, "#FF8C00", 8).minor(),
        Aspect::new("biquintile", "Biquintile", 144.0, 2.0, "#8A2BE2", 9).minor(),
        Aspect::new("quincunx", "Quincunx", 150.0, 3.0, "#708090", 10).minor(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_catalog_is_in_precedence_order() {
        let catalog = AspectCatalog::major();
        let ids: Vec<&str> = catalog.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["conjunction", "sextile", "square", "trine", "opposition"]);
    }

    #[test]
    fn closest_entry_wins_overlapping_orbs() {
        // 65 falls inside both windows, sextile is closer
        let catalog = AspectCatalog::new(vec![
            Aspect::new("sextile", "Sextile", 60.0, 6.0, "", 0),
            Aspect::new("quintile", "Quintile", 72.0, 10.0, "", 1),
        ])
        .unwrap();
        assert_eq!(catalog.matching(65.0).count(), 2);
        assert_eq!(catalog.best_match(65.0).map(|a| a.id.as_str()), Some("sextile"));
        assert_eq!(catalog.best_match(70.0).map(|a| a.id.as_str()), Some("quintile"));
    }

    #[test]
    fn exact_tie_goes_to_lower_rank() {
        let catalog = AspectCatalog::new(vec![
            Aspect::new("b", "B", 70.0, 5.0, "", 1),
            Aspect::new("a", "A", 60.0, 5.0, "", 0),
        ])
        .unwrap();
        assert_eq!(catalog.iter().next().map(|a| a.id.as_str()), Some("a"));
        assert_eq!(catalog.best_match(65.0).map(|a| a.id.as_str()), Some("a"));
    }

    #[test]
    fn invalid_entries_are_rejected() {
        assert!(AspectCatalog::new(vec![Aspect::new("x", "X", 200.0, 1.0, "", 0)]).is_err());
        assert!(AspectCatalog::new(vec![Aspect::new("x", "X", 90.0, -1.0, "", 0)]).is_err());
        assert!(AspectCatalog::new(vec![
            Aspect::new("x", "X", 90.0, 1.0, "", 0),
            Aspect::new("x", "X2", 60.0, 1.0, "", 1),
        ])
        .is_err());
    }

    #[test]
    fn precision_bounds() {
        assert_eq!(precision(0.0, 8.0), 1.0);
        assert!((precision(4.0, 8.0) - 0.5).abs() < 1e-12);
        assert!(precision(8.0, 8.0) > 0.0);
        assert_eq!(precision(0.0, 0.0), 1.0);
    }
}
