use crate::aspects::AspectMatch;
use crate::config::ChartSettings;
use crate::dignities::dignity_text;
use crate::geometry::{
    angular_separation, collision_separation, normalize, project_on_circle, Point2, Segment,
    DEG_360,
};
use crate::layout::{DegenerateGeometry, Layout, LocatedPoint};
use serde::Serialize;

/// Sign names in zodiac order
pub const SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// Vertical step between stacked description lines, relative to the
/// collision radius
const DESCRIPTION_RATIO: f64 = 1.4;

/// Get sign index (0-11) from longitude
pub fn sign_index(longitude: f64) -> usize {
    ((normalize(longitude) / 30.0).floor() as usize).min(11)
}

/// Whole degrees within the sign, as printed next to a symbol
pub fn degree_in_sign(longitude: f64) -> u32 {
    (normalize(longitude).round() as u32) % 30
}

/// Line color and width
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
        }
    }
}

/// Piece of text placed on the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub text: String,
    pub position: Point2,
}

/// A laid-out planet with everything needed to draw it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSymbol {
    pub id: String,
    pub raw_angle: f64,
    pub angle: f64,
    pub position: Point2,
    pub retrograde: bool,
    /// Symbol outline
    pub stroke: Stroke,
    /// Short tick at the raw position
    pub pointer: Segment,
    /// Line from the tick to a displaced symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector: Option<Segment>,
    /// Pointer and connector style
    pub line: Stroke,
    pub descriptions: Vec<TextLabel>,
    pub tooltip: String,
}

/// House cusp line, split around symbols in its way
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuspLine {
    pub house: u8,
    pub angle: f64,
    pub main_axis: bool,
    pub segments: Vec<Segment>,
    pub stroke: Stroke,
    pub number_position: Point2,
}

/// One of As, Ic, Ds, Mc drawn outside the wheel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisMark {
    pub label: String,
    pub angle: f64,
    pub segment: Segment,
    pub label_position: Point2,
    pub stroke: Stroke,
}

/// Zodiac sector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignSector {
    pub index: u8,
    pub name: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub radius_inner: f64,
    pub radius_outer: f64,
    pub fill: String,
    pub label_position: Point2,
}

/// Ruler ticks along the inner edge of the zodiac ring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ruler {
    pub ticks: Vec<Segment>,
    pub stroke: Stroke,
}

/// Full circle around the chart center
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring {
    pub radius: f64,
    pub stroke: Stroke,
}

/// Aspect line across the indoor circle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectChord {
    pub aspect: AspectMatch,
    pub chord: Segment,
    pub color: String,
}

/// Radii derived from the outer radius and the settings ratios
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadixMetrics {
    pub radius: f64,
    /// Circle the aspect chords end on
    pub indoor: f64,
    /// Inner edge of the zodiac ring
    pub inner: f64,
    /// Length of a full ruler tick
    pub ruler: f64,
    /// Circle the planet symbols sit on
    pub point: f64,
    /// Start of the pointer ticks (inner edge of the ruler)
    pub pointer: f64,
}

impl RadixMetrics {
    pub fn new(radius: f64, settings: &ChartSettings) -> Self {
        let zodiac_width = radius / settings.inner_circle_radius_ratio;
        let ruler = zodiac_width / settings.ruler_radius;
        Self {
            radius,
            indoor: radius / settings.indoor_circle_radius_ratio,
            inner: radius - zodiac_width,
            ruler,
            point: radius - (zodiac_width + 2.0 * ruler + settings.scaled_padding()),
            pointer: radius - (zodiac_width + ruler),
        }
    }
}

/// Everything a renderer needs to draw a radix chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub center: Point2,
    pub shift: f64,
    pub metrics: RadixMetrics,
    /// Fill of the disc under the wheel, absent when drawing strokes only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Outer, inner and indoor circles
    pub rings: Vec<Ring>,
    pub signs: Vec<SignSector>,
    pub ruler: Ruler,
    pub points: Vec<PointSymbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<DegenerateGeometry>,
    pub cusps: Vec<CuspLine>,
    pub axis: Vec<AxisMark>,
    pub aspects: Vec<AspectChord>,
}

/// Projection helper bound to one center and rotation
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    pub center: Point2,
    pub shift: f64,
}

impl Projector {
    pub fn at(&self, radius: f64, angle: f64) -> Point2 {
        project_on_circle(self.center, radius, angle, self.shift)
    }

    pub fn ray(&self, from: f64, to: f64, angle: f64) -> Segment {
        Segment::radial(self.center, from, to, angle, self.shift)
    }
}

/// Description lines stacked to the right of a symbol
pub fn description_positions(
    symbol: Point2,
    texts: &[String],
    settings: &ChartSettings,
) -> Vec<TextLabel> {
    let collision = settings.scaled_collision_radius();
    let step = collision / DESCRIPTION_RATIO;
    let x = symbol.x + step;
    let mut y = symbol.y - collision;
    texts
        .iter()
        .filter(|t| !t.is_empty())
        .map(|text| {
            let label = TextLabel {
                text: text.clone(),
                position: Point2::new(x, y),
            };
            y += step;
            label
        })
        .collect()
}

/// Symbols with their pointer ticks, connectors and descriptions.
///
/// `pointer` runs from `pointer.0` to `pointer.1` at the raw angle;
/// a connector joins the tick end to `connector_radius` at the resolved angle
/// when the symbol was displaced.
pub fn point_symbols(
    layout: &Layout,
    projector: &Projector,
    pointer: (f64, f64),
    connector_radius: f64,
    settings: &ChartSettings,
) -> Vec<PointSymbol> {
    layout
        .points
        .iter()
        .map(|located| {
            let raw_angle = normalize(located.point.angle);
            let tick = projector.ray(pointer.0, pointer.1, raw_angle);
            let connector = (located.is_displaced() && !settings.stroke_only)
                .then(|| Segment::new(tick.to, projector.at(connector_radius, located.angle)));

            let retrograde = located.point.is_retrograde();
            let texts = vec![
                degree_in_sign(raw_angle).to_string(),
                if retrograde { "R".to_string() } else { String::new() },
                dignity_text(&located.point.id, raw_angle, &settings.exact_exaltations),
            ];

            PointSymbol {
                id: located.point.id.clone(),
                raw_angle,
                angle: located.angle,
                position: located.position,
                retrograde,
                stroke: Stroke::new(&settings.color_points, settings.stroke_points),
                pointer: tick,
                connector,
                line: Stroke::new(&settings.color_lines, settings.stroke_cusps),
                descriptions: description_positions(located.position, &texts, settings),
                tooltip: format!(
                    "{} {}° {}{}",
                    located.point.id,
                    degree_in_sign(raw_angle),
                    SIGNS[sign_index(raw_angle)],
                    if retrograde { " (R)" } else { "" }
                ),
            }
        })
        .collect()
}

/// Segments for a radial line from `start` to `end`, leaving a gap around
/// any located symbol sitting on `obstacle_radius` across the line's angle
pub fn dashed_line(
    projector: &Projector,
    angle: f64,
    start: f64,
    end: f64,
    obstacle_radius: f64,
    obstacles: &[LocatedPoint],
    settings: &ChartSettings,
) -> Vec<Segment> {
    let collision = settings.scaled_collision_radius();
    let half_width = collision_separation(collision, obstacle_radius) / 2.0;
    let blocked = obstacles
        .iter()
        .any(|p| angular_separation(p.angle, angle) <= half_width);

    if !blocked {
        return vec![projector.ray(start, end, angle)];
    }

    let mut segments = Vec::with_capacity(2);
    if obstacle_radius - collision > start {
        segments.push(projector.ray(start, obstacle_radius - collision, angle));
    }
    if obstacle_radius + collision < end {
        segments.push(projector.ray(obstacle_radius + collision, end, angle));
    }
    segments
}

/// 72 ticks every 5 degrees, alternating full and half length
pub fn ruler_ticks(
    projector: &Projector,
    start: f64,
    end: f64,
    settings: &ChartSettings,
) -> Ruler {
    let half = start + (end - start) / 2.0;
    let ticks = (0..72)
        .map(|i| {
            let angle = i as f64 * 5.0;
            let tip = if i % 2 == 0 { end } else { half };
            projector.ray(start, tip, angle)
        })
        .collect();
    Ruler {
        ticks,
        stroke: Stroke::new(&settings.color_circles, settings.stroke_cusps),
    }
}

/// Ring drawn with the circle color and width
pub fn ring(radius: f64, settings: &ChartSettings) -> Ring {
    Ring {
        radius,
        stroke: Stroke::new(&settings.color_circles, settings.stroke_circles),
    }
}

/// Main axis cusps use the axis style, the others the cusp style
pub fn cusp_stroke(main_axis: bool, settings: &ChartSettings) -> Stroke {
    if main_axis {
        Stroke::new(&settings.color_axis, settings.stroke_axis)
    } else {
        Stroke::new(&settings.color_cusps, settings.stroke_cusps)
    }
}

/// Angle halfway between a cusp and the next one, going forwards
pub fn house_midpoint(cusp: f64, next: f64) -> f64 {
    let gap = next - cusp;
    let gap = if gap > 0.0 { gap } else { gap + DEG_360 };
    normalize(cusp + gap / 2.0)
}

/// Cusp lines split around the located symbols, with house numbers
pub fn cusp_lines(
    cusps: &[f64],
    projector: &Projector,
    metrics: &RadixMetrics,
    located: &[LocatedPoint],
    settings: &ChartSettings,
) -> Vec<CuspLine> {
    let numbers_radius = metrics.indoor + settings.scaled_collision_radius();
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
                segments: dashed_line(
                    projector,
                    cusp,
                    metrics.indoor,
                    metrics.pointer,
                    metrics.point,
                    located,
                    settings,
                ),
                stroke: cusp_stroke(main_axis, settings),
                number_position: projector.at(numbers_radius, house_midpoint(cusp, next)),
            }
        })
        .collect()
}

/// As, Ic, Ds, Mc marks beyond the outer circle
pub fn axis_marks(
    cusps: &[f64],
    projector: &Projector,
    metrics: &RadixMetrics,
    settings: &ChartSettings,
) -> Vec<AxisMark> {
    use crate::chart::data::{AS, DS, IC, MC};

    let scale = settings.symbol_scale;
    let axis_radius = metrics.radius + (metrics.radius - metrics.inner) / 4.0;
    // (cusp index, label, label offset, angle nudge)
    let marks = [
        (AS, "As", 20.0, 0.0),
        (IC, "Ic", 10.0, -2.0),
        (DS, "Ds", 2.0, 0.0),
        (MC, "Mc", 10.0, 2.0),
    ];
    marks
        .iter()
        .map(|&(index, label, offset, nudge)| {
            let angle = normalize(cusps[index]);
            AxisMark {
                label: label.to_string(),
                angle,
                segment: projector.ray(metrics.radius, axis_radius, angle),
                label_position: projector.at(axis_radius + offset * scale, angle + nudge),
                stroke: Stroke::new(&settings.color_axis, settings.stroke_axis),
            }
        })
        .collect()
}

/// The twelve zodiac sectors between the inner and outer circle
pub fn sign_sectors(
    projector: &Projector,
    metrics: &RadixMetrics,
    settings: &ChartSettings,
) -> Vec<SignSector> {
    let label_radius = metrics.radius - (metrics.radius - metrics.inner) / 2.0;
    SIGNS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let start_angle = i as f64 * 30.0;
            SignSector {
                index: i as u8,
                name: name.to_string(),
                start_angle,
                end_angle: start_angle + 30.0,
                radius_inner: metrics.inner,
                radius_outer: metrics.radius,
                fill: if settings.stroke_only {
                    "none".to_string()
                } else {
                    settings
                        .sign_colors
                        .get(i)
                        .unwrap_or(&settings.color_background)
                        .clone()
                },
                label_position: projector.at(label_radius, start_angle + 15.0),
            }
        })
        .collect()
}

/// Chords on `radius` joining the two points of each aspect.
///
/// `angles` returns the (source, target) angles of a match; each chord
/// runs from the target to the source.
pub fn aspect_chords(
    matches: Vec<AspectMatch>,
    angles: impl Fn(&AspectMatch) -> Option<(f64, f64)>,
    projector: &Projector,
    radius: f64,
    settings: &ChartSettings,
) -> Vec<AspectChord> {
    matches
        .into_iter()
        .filter_map(|found| {
            let (source, target) = angles(&found)?;
            let color = if settings.stroke_only {
                settings.color_lines.clone()
            } else {
                found.aspect.color.clone()
            };
            Some(AspectChord {
                chord: Segment::new(projector.at(radius, target), projector.at(radius, source)),
                color,
                aspect: found,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_midpoint_wraps() {
        assert!((house_midpoint(350.0, 20.0) - 5.0).abs() < 1e-9);
        assert!((house_midpoint(30.0, 60.0) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn sign_helpers() {
        assert_eq!(sign_index(0.0), 0);
        assert_eq!(sign_index(359.9), 11);
        assert_eq!(sign_index(-15.0), 11);
        assert_eq!(degree_in_sign(45.4), 15);
        assert_eq!(degree_in_sign(359.6), 0);
    }

    #[test]
    fn metrics_follow_ratios() {
        let metrics = RadixMetrics::new(400.0, &ChartSettings::default());
        assert_eq!(metrics.indoor, 200.0);
        assert_eq!(metrics.inner, 350.0);
        assert_eq!(metrics.ruler, 12.5);
        assert_eq!(metrics.pointer, 337.5);
        assert_eq!(metrics.point, 400.0 - (50.0 + 25.0 + 18.0));
    }

    #[test]
    fn ruler_alternates_tick_length() {
        let projector = Projector {
            center: Point2::new(0.0, 0.0),
            shift: 180.0,
        };
        let settings = ChartSettings::default();
        let ruler = ruler_ticks(&projector, 100.0, 110.0, &settings);
        let ticks = &ruler.ticks;
        assert_eq!(ticks.len(), 72);
        assert_eq!(ruler.stroke, Stroke::new("#333", 1.0));
        let full = ticks[0].from.distance(&ticks[0].to);
        let half = ticks[1].from.distance(&ticks[1].to);
        assert!((full - 10.0).abs() < 1e-9);
        assert!((half - 5.0).abs() < 1e-9);
    }

    #[test]
    fn main_axis_cusps_use_axis_style() {
        let mut settings = ChartSettings::default();
        settings.color_axis = "#f00".to_string();
        settings.stroke_axis = 3.0;
        assert_eq!(cusp_stroke(true, &settings), Stroke::new("#f00", 3.0));
        assert_eq!(cusp_stroke(false, &settings), Stroke::new("#000", 1.0));
    }

    #[test]
    fn chords_run_from_target_to_source() {
        use crate::aspects::{AspectCatalog, AspectDetector};
        use crate::points::PointSet;

        let projector = Projector {
            center: Point2::new(0.0, 0.0),
            shift: 180.0,
        };
        let source = PointSet::from_angles([("Sun", 0.0)]).unwrap();
        let target = PointSet::from_angles([("Moon", 90.0)]).unwrap();
        let matches = AspectDetector::new(AspectCatalog::major())
            .detect(&source, &target)
            .unwrap();
        let chords = aspect_chords(
            matches,
            |_| Some((0.0, 90.0)),
            &projector,
            100.0,
            &ChartSettings::default(),
        );
        assert_eq!(chords.len(), 1);
        let chord = &chords[0].chord;
        assert!(chord.from.distance(&projector.at(100.0, 90.0)) < 1e-9);
        assert!(chord.to.distance(&projector.at(100.0, 0.0)) < 1e-9);
    }

    #[test]
    fn descriptions_skip_empty_lines() {
        let texts = vec!["12".to_string(), String::new()];
        let labels = description_positions(Point2::new(0.0, 0.0), &texts, &ChartSettings::default());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].position.y, -10.0);
    }
}
