use crate::aspects::AspectMatch;
use crate::chart::data::ChartData;
use crate::chart::frame::{
    aspect_chords, cusp_stroke, house_midpoint, point_symbols, ring, ruler_ticks, AspectChord,
    CuspLine, PointSymbol, Projector, Ring, Ruler,
};
use crate::config::ChartSettings;
use crate::chart::radix::{check_radius, RadixChart};
use crate::error::ValidationError;
use crate::geometry::{collision_separation, normalize, Point2};
use crate::layout::{Circle, CollisionResolver, DegenerateGeometry, Layout};
use serde::Serialize;

/// Radii of the transit ring, outside the radix wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitMetrics {
    pub radius: f64,
    /// Outer edge of the radix zodiac ring
    pub outer: f64,
    pub ruler: f64,
    pub pointer: f64,
    pub point: f64,
}

/// Drawable transit ring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitFrame {
    pub center: Point2,
    pub metrics: TransitMetrics,
    /// Outer edge of the transit ruler
    pub rings: Vec<Ring>,
    pub ruler: Ruler,
    pub points: Vec<PointSymbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<DegenerateGeometry>,
    pub cusps: Vec<CuspLine>,
    pub aspects: Vec<AspectChord>,
}

/// Transit positions around a radix chart. Shares the radix rotation,
/// settings and aspect catalog.
#[derive(Debug, Clone)]
pub struct TransitChart<'a> {
    radix: &'a RadixChart,
    data: ChartData,
}

impl<'a> TransitChart<'a> {
    pub fn new(radix: &'a RadixChart, data: ChartData) -> Result<Self, ValidationError> {
        data.validate()?;
        Ok(Self { radix, data })
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    pub fn metrics(&self, radius: f64) -> TransitMetrics {
        let settings = self.radix.settings();
        let zodiac_width = radius / settings.inner_circle_radius_ratio;
        let outer = radius + zodiac_width;
        TransitMetrics {
            radius,
            outer,
            ruler: zodiac_width / settings.ruler_radius,
            pointer: outer,
            point: outer + settings.scaled_padding(),
        }
    }

    /// Transit planets against the radix planets and points of interest.
    ///
    /// Transit Sun to natal Moon and transit Moon to natal Sun are both
    /// reported since the bodies sit at different positions in each chart.
    pub fn aspects(&self) -> Result<Vec<AspectMatch>, ValidationError> {
        let targets = self.radix.data().planets.merged(self.radix.points_of_interest());
        self.radix.detector().detect(&self.data.planets, &targets)
    }

    pub fn layout(&self, center: Point2, radius: f64) -> Result<Layout, ValidationError> {
        check_radius(radius)?;
        let metrics = self.metrics(radius);
        let projector = self.radix.projector(center);
        let circle = Circle::new(center, metrics.point).with_shift(projector.shift);

        if self.data.planets.is_empty() {
            return Ok(Layout {
                points: Vec::new(),
                degraded: None,
            });
        }

        let settings = self.radix.settings();
        let separation = settings.min_separation.unwrap_or_else(|| {
            collision_separation(settings.scaled_collision_radius(), metrics.point)
        });
        CollisionResolver::new(separation)?.resolve(&self.data.planets, &circle)
    }

    /// Transit ring for a radix wheel of `radius` around `center`
    pub fn frame(&self, center: Point2, radius: f64) -> Result<TransitFrame, ValidationError> {
        let layout = self.layout(center, radius)?;
        let metrics = self.metrics(radius);
        let projector = self.radix.projector(center);
        let settings = self.radix.settings();

        let points = point_symbols(
            &layout,
            &projector,
            (metrics.pointer, metrics.pointer + metrics.ruler / 2.0),
            metrics.point - settings.scaled_collision_radius(),
            settings,
        );

        let cusps = match &self.data.cusps {
            Some(cusps) => transit_cusps(cusps, &projector, &metrics, settings),
            None => Vec::new(),
        };

        let radix_targets = self
            .radix
            .data()
            .planets
            .merged(self.radix.points_of_interest());
        let indoor = self.radix.metrics(radius).indoor;
        let aspects = aspect_chords(
            self.aspects()?,
            |found| {
                Some((
                    self.data.planets.get(&found.source)?.angle,
                    radix_targets.get(&found.target)?.angle,
                ))
            },
            &projector,
            indoor,
            settings,
        );

        Ok(TransitFrame {
            center,
            metrics,
            rings: vec![ring(metrics.pointer + metrics.ruler, settings)],
            ruler: ruler_ticks(
                &projector,
                metrics.pointer,
                metrics.pointer + metrics.ruler,
                settings,
            ),
            points,
            degraded: layout.degraded,
            cusps,
            aspects,
        })
    }
}

/// Transit cusps run across the radix zodiac ring, short of the ruler
fn transit_cusps(
    cusps: &[f64],
    projector: &Projector,
    metrics: &TransitMetrics,
    settings: &ChartSettings,
) -> Vec<CuspLine> {
    let end = metrics.outer - metrics.ruler;
    let numbers_radius = metrics.radius + (end - metrics.radius) / 2.0;
    cusps
        .iter()
        .enumerate()
        .map(|(i, &cusp)| {
            let next = cusps[(i + 1) % cusps.len()];
            let main_axis = i % 3 == 0;
            CuspLine {
                house: (i + 1) as u8,
                angle: normalize(cusp),
                main_axis,
                segments: vec![projector.ray(metrics.radius, end, cusp)],
                stroke: cusp_stroke(main_axis, settings),
                number_position: projector.at(numbers_radius, house_midpoint(cusp, next)),
            }
        })
        .collect()
}
