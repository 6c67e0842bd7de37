use crate::aspects::{AspectDetector, AspectMatch};
use crate::chart::data::{ChartData, AS};
use crate::chart::frame::{
    aspect_chords, axis_marks, cusp_lines, point_symbols, ring, ruler_ticks, sign_sectors,
    ChartFrame, Projector, RadixMetrics,
};
use crate::chart::transit::TransitChart;
use crate::config::ChartSettings;
use crate::error::ValidationError;
use crate::geometry::{collision_separation, normalize, Point2, DEG_360};
use crate::layout::{Circle, CollisionResolver, Layout};
use crate::points::PointSet;

/// Natal (radix) chart: planets, optional houses and the aspects between
/// them, ready to be laid out at any size.
#[derive(Debug, Clone)]
pub struct RadixChart {
    data: ChartData,
    settings: ChartSettings,
    detector: AspectDetector,
    points_of_interest: PointSet,
}

impl RadixChart {
    pub fn new(data: ChartData, settings: ChartSettings) -> Result<Self, ValidationError> {
        data.validate()?;
        if let Some(points) = &data.points_of_interest {
            check_distinct(&data.planets, points)?;
        }
        let detector = AspectDetector::new(settings.aspects.catalog()?);
        let points_of_interest = data.points_of_interest.clone().unwrap_or_default();

        Ok(Self {
            data,
            settings,
            detector,
            points_of_interest,
        })
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn detector(&self) -> &AspectDetector {
        &self.detector
    }

    /// Rotation that puts the ascendant at the reference direction
    pub fn shift(&self) -> f64 {
        match &self.data.cusps {
            Some(cusps) => normalize(DEG_360 - cusps[AS]),
            None => 0.0,
        }
    }

    pub fn metrics(&self, radius: f64) -> RadixMetrics {
        RadixMetrics::new(radius, &self.settings)
    }

    /// Extra aspect targets (angles, lots, nodes...). A point of interest
    /// added twice is replaced; one named like a planet is rejected.
    pub fn add_points_of_interest(&mut self, points: PointSet) -> Result<(), ValidationError> {
        points.validate()?;
        check_distinct(&self.data.planets, &points)?;
        self.points_of_interest = self.points_of_interest.merged(&points);
        Ok(())
    }

    pub fn points_of_interest(&self) -> &PointSet {
        &self.points_of_interest
    }

    /// Planets aspecting planets and points of interest
    pub fn aspects(&self) -> Result<Vec<AspectMatch>, ValidationError> {
        let targets = self.data.planets.merged(&self.points_of_interest);
        self.detector.detect(&self.data.planets, &targets)
    }

    /// Angular separation the resolver enforces on a circle of `point_radius`
    pub fn min_separation(&self, point_radius: f64) -> f64 {
        self.settings.min_separation.unwrap_or_else(|| {
            collision_separation(self.settings.scaled_collision_radius(), point_radius)
        })
    }

    pub(crate) fn projector(&self, center: Point2) -> Projector {
        Projector {
            center,
            shift: self.settings.shift_in_degrees - self.shift(),
        }
    }

    /// Collision-free planet positions on the point circle
    pub fn layout(&self, center: Point2, radius: f64) -> Result<Layout, ValidationError> {
        check_radius(radius)?;
        let metrics = self.metrics(radius);
        let projector = self.projector(center);
        let circle = Circle::new(center, metrics.point).with_shift(projector.shift);

        if self.data.planets.is_empty() {
            return Ok(Layout {
                points: Vec::new(),
                degraded: None,
            });
        }

        let layout = CollisionResolver::new(self.min_separation(metrics.point))?
            .resolve(&self.data.planets, &circle)?;
        log::debug!(
            "Located {} points ({} displaced)",
            layout.len(),
            layout.points.iter().filter(|p| p.is_displaced()).count()
        );
        Ok(layout)
    }

    /// Every drawable piece of the chart for a wheel of `radius` around `center`
    pub fn frame(&self, center: Point2, radius: f64) -> Result<ChartFrame, ValidationError> {
        let layout = self.layout(center, radius)?;
        let metrics = self.metrics(radius);
        let projector = self.projector(center);
        let settings = &self.settings;

        let points = point_symbols(
            &layout,
            &projector,
            (metrics.pointer, metrics.pointer - metrics.ruler / 2.0),
            metrics.point + settings.scaled_collision_radius(),
            settings,
        );

        let (cusps, axis) = match &self.data.cusps {
            Some(cusps) => (
                cusp_lines(cusps, &projector, &metrics, &layout.points, settings),
                axis_marks(cusps, &projector, &metrics, settings),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let targets = self.data.planets.merged(&self.points_of_interest);
        let aspects = aspect_chords(
            self.aspects()?,
            |found| Some((targets.get(&found.source)?.angle, targets.get(&found.target)?.angle)),
            &projector,
            metrics.indoor,
            settings,
        );

        Ok(ChartFrame {
            center,
            shift: self.shift(),
            metrics,
            background: (!settings.stroke_only).then(|| settings.color_background.clone()),
            rings: vec![
                ring(metrics.radius, settings),
                ring(metrics.inner, settings),
                ring(metrics.indoor, settings),
            ],
            signs: sign_sectors(&projector, &metrics, settings),
            ruler: ruler_ticks(&projector, metrics.pointer, metrics.inner, settings),
            points,
            degraded: layout.degraded,
            cusps,
            axis,
            aspects,
        })
    }

    /// Transit chart drawn around this one
    pub fn transit(&self, data: ChartData) -> Result<TransitChart<'_>, ValidationError> {
        TransitChart::new(self, data)
    }
}

/// Points of interest must not reuse a planet id
fn check_distinct(planets: &PointSet, points: &PointSet) -> Result<(), ValidationError> {
    match points.iter().find(|p| planets.get(&p.id).is_some()) {
        Some(point) => Err(ValidationError::DuplicateId(point.id.clone())),
        None => Ok(()),
    }
}

pub(crate) fn check_radius(radius: f64) -> Result<(), ValidationError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(ValidationError::InvalidRadius(radius));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(cusps: Option<Vec<f64>>) -> RadixChart {
        let planets = PointSet::from_angles([("Sun", 10.0), ("Moon", 12.0), ("Mars", 190.0)]).unwrap();
        let mut data = ChartData::new(planets);
        data.cusps = cusps;
        RadixChart::new(data, ChartSettings::default()).unwrap()
    }

    #[test]
    fn shift_puts_ascendant_first() {
        let cusps = vec![300.0, 330.0, 0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0];
        assert_eq!(chart(Some(cusps)).shift(), 60.0);
        assert_eq!(chart(None).shift(), 0.0);
    }

    #[test]
    fn ascendant_projects_to_reference_direction() {
        let cusps = vec![300.0, 330.0, 0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0];
        let chart = chart(Some(cusps));
        let center = Point2::new(0.0, 0.0);
        let projector = chart.projector(center);
        let asc = projector.at(100.0, 300.0);
        // default shift_in_degrees of 180 puts the ascendant on the left
        assert!((asc.x + 100.0).abs() < 1e-9);
        assert!(asc.y.abs() < 1e-9);
    }

    #[test]
    fn invalid_radius_is_rejected() {
        assert!(matches!(
            chart(None).layout(Point2::new(0.0, 0.0), 0.0),
            Err(ValidationError::InvalidRadius(_))
        ));
    }

    #[test]
    fn point_of_interest_cannot_shadow_planet() {
        let planets = PointSet::from_angles([("Sun", 0.0), ("Moon", 90.0)]).unwrap();
        let mut chart =
            RadixChart::new(ChartData::new(planets.clone()), ChartSettings::default()).unwrap();

        let moon = PointSet::from_angles([("Moon", 90.5)]).unwrap();
        assert_eq!(
            chart.add_points_of_interest(moon.clone()),
            Err(ValidationError::DuplicateId("Moon".to_string()))
        );
        assert!(chart.points_of_interest().is_empty());

        // Sun square Moon is reported once
        let aspects = chart.aspects().unwrap();
        assert_eq!(aspects.len(), 1);
        assert_eq!((aspects[0].source.as_str(), aspects[0].target.as_str()), ("Sun", "Moon"));

        let mut data = ChartData::new(planets);
        data.points_of_interest = Some(moon);
        assert!(matches!(
            RadixChart::new(data, ChartSettings::default()),
            Err(ValidationError::DuplicateId(id)) if id == "Moon"
        ));
    }

    #[test]
    fn min_separation_override() {
        let mut settings = ChartSettings::default();
        settings.min_separation = Some(3.0);
        let chart = RadixChart::new(ChartData::default(), settings).unwrap();
        assert_eq!(chart.min_separation(100.0), 3.0);
    }
}
