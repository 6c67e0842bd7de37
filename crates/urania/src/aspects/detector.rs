use crate::aspects::catalog::{precision, AspectCatalog};
use crate::aspects::types::AspectMatch;
use crate::error::ValidationError;
use crate::geometry::{angular_separation, signed_delta};
use crate::points::{Point, PointSet};
use std::collections::HashSet;

/// Time step (days) used to project speeds when deciding applying/separating
const APPLYING_TIME_STEP: f64 = 0.1;

/// Relative speeds below this are treated as stationary
const MIN_RELATIVE_SPEED: f64 = 0.01;

/// Aspect detector
#[derive(Debug, Clone, Default)]
pub struct AspectDetector {
    catalog: AspectCatalog,
}

impl AspectDetector {
    pub fn new(catalog: AspectCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &AspectCatalog {
        &self.catalog
    }

    /// Find the best aspect for every (source, target) pair.
    ///
    /// Output is ordered by source insertion order, then target insertion
    /// order. A reversed pair is dropped when both points are shared by the
    /// two sets at the same positions, so self-aspects within one chart are
    /// reported once.
    pub fn detect(
        &self,
        sources: &PointSet,
        targets: &PointSet,
    ) -> Result<Vec<AspectMatch>, ValidationError> {
        sources.validate()?;
        targets.validate()?;

        let mut emitted: HashSet<(&str, &str)> = HashSet::new();
        let mut matches = Vec::new();

        for source in sources {
            for target in targets {
                if source.id == target.id {
                    continue;
                }
                if emitted.contains(&(target.id.as_str(), source.id.as_str()))
                    && is_shared(source, targets)
                    && is_shared(target, sources)
                {
                    continue;
                }
                if let Some(found) = self.score(source, target) {
                    emitted.insert((source.id.as_str(), target.id.as_str()));
                    matches.push(found);
                }
            }
        }

        log::debug!(
            "Detected {} aspects across {} sources x {} targets",
            matches.len(),
            sources.len(),
            targets.len()
        );

        Ok(matches)
    }

    /// Self-aspects within a single chart
    pub fn detect_within(&self, points: &PointSet) -> Result<Vec<AspectMatch>, ValidationError> {
        self.detect(points, points)
    }

    /// Score one pair against the catalog
    pub fn score(&self, source: &Point, target: &Point) -> Option<AspectMatch> {
        let separation = angular_separation(source.angle, target.angle);
        let aspect = self.catalog.best_match(separation)?;
        let deviation = aspect.deviation(separation);

        let applying = match (source.speed, target.speed) {
            (Some(speed1), Some(speed2)) => is_applying(
                source.angle,
                target.angle,
                speed1,
                speed2,
                aspect.degree,
            ),
            _ => None,
        };

        Some(AspectMatch {
            source: source.id.clone(),
            target: target.id.clone(),
            label: format!(
                "{} ({}) {} <> {}",
                aspect.name, aspect.degree, source.id, target.id
            ),
            aspect: aspect.clone(),
            separation,
            deviation,
            precision: precision(deviation, aspect.orb),
            applying,
        })
    }
}

/// Whether `point` appears in `set` at the same position
fn is_shared(point: &Point, set: &PointSet) -> bool {
    set.get(&point.id).is_some_and(|p| p.same_position(point))
}

/// Determine if an aspect is applying (approaching exact) or separating
fn is_applying(lon1: f64, lon2: f64, speed1: f64, speed2: f64, aspect_angle: f64) -> Option<bool> {
    let relative_speed = speed1 - speed2;
    if relative_speed.abs() < MIN_RELATIVE_SPEED {
        return None;
    }

    let signed_diff = signed_delta(lon2, lon1);
    let current_distance = (signed_diff.abs() - aspect_angle).abs();

    // Project forward a small amount to see if we're getting closer to exact
    let future_diff = signed_delta(0.0, signed_diff + relative_speed * APPLYING_TIME_STEP);
    let future_distance = (future_diff.abs() - aspect_angle).abs();

    Some(future_distance < current_distance)
}
