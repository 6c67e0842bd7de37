use urania::aspects::{precision, Aspect, AspectCatalog, AspectDetector};
use urania::points::{Point, PointSet};
use urania::ValidationError;

#[test]
fn test_exact_opposition_has_full_precision() {
    let detector = AspectDetector::default();
    let set = PointSet::from_angles([("A", 0.0), ("B", 180.0)]).unwrap();

    let matches = detector.detect_within(&set).unwrap();

    assert_eq!(matches.len(), 1);
    let found = &matches[0];
    assert_eq!(found.aspect.id, "opposition");
    assert_eq!(found.source, "A");
    assert_eq!(found.target, "B");
    assert_eq!(found.precision, 1.0);
    assert!(found.is_exact());
    assert!(found.connects("B", "A"));
}

#[test]
fn test_gap_between_orbs_yields_nothing() {
    let detector = AspectDetector::default();
    let set = PointSet::from_angles([("A", 0.0), ("B", 47.0)]).unwrap();
    assert!(detector.detect_within(&set).unwrap().is_empty());
}

#[test]
fn test_self_aspects_reported_once_in_source_order() {
    let detector = AspectDetector::default();
    let set = PointSet::from_angles([("Sun", 0.0), ("Moon", 90.0), ("Mars", 120.0), ("Venus", 2.0)])
        .unwrap();

    let matches = detector.detect_within(&set).unwrap();
    let pairs: Vec<(&str, &str)> = matches
        .iter()
        .map(|m| (m.source.as_str(), m.target.as_str()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("Sun", "Moon"),
            ("Sun", "Mars"),
            ("Sun", "Venus"),
            ("Moon", "Venus"),
            ("Mars", "Venus"),
        ]
    );
}

#[test]
fn test_points_of_interest_are_targets_only() {
    let detector = AspectDetector::default();
    let planets = PointSet::from_angles([("Sun", 10.0), ("Moon", 45.0)]).unwrap();
    let poi = PointSet::from_angles([("As", 190.0)]).unwrap();
    let targets = planets.merged(&poi);

    let matches = detector.detect(&planets, &targets).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].source, "Sun");
    assert_eq!(matches[0].target, "As");
    assert_eq!(matches[0].aspect.id, "opposition");
}

#[test]
fn test_transit_keeps_distinct_reversed_pairs() {
    let detector = AspectDetector::default();
    let transit = PointSet::from_angles([("Sun", 0.0), ("Moon", 60.0)]).unwrap();
    let natal = PointSet::from_angles([("Sun", 120.0), ("Moon", 180.0)]).unwrap();

    let matches = detector.detect(&transit, &natal).unwrap();
    let pairs: Vec<(&str, &str, &str)> = matches
        .iter()
        .map(|m| (m.source.as_str(), m.target.as_str(), m.aspect.id.as_str()))
        .collect();

    assert_eq!(pairs, vec![("Sun", "Moon", "opposition"), ("Moon", "Sun", "sextile")]);
}

#[test]
fn test_non_finite_angle_is_rejected() {
    let detector = AspectDetector::default();
    let set = PointSet::try_from(vec![Point::new("A", f64::NAN), Point::new("B", 10.0)]).unwrap();
    assert_eq!(
        detector.detect_within(&set).unwrap_err(),
        ValidationError::NonFiniteAngle { id: "A".to_string() }
    );
}

#[test]
fn test_orb_boundary_keeps_positive_precision() {
    let detector = AspectDetector::default();
    // square orb is 8
    let set = PointSet::from_angles([("A", 0.0), ("B", 98.0)]).unwrap();
    let matches = detector.detect_within(&set).unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].precision > 0.0);
    assert!(matches[0].precision <= 1.0);
}

#[test]
fn test_applying_uses_speeds() {
    let detector = AspectDetector::default();
    let set = PointSet::try_from(vec![
        Point::with_speed("Sun", 0.0, 1.0),
        Point::with_speed("Moon", 85.0, 13.0),
        Point::new("Node", 180.0),
    ])
    .unwrap();

    let matches = detector.detect_within(&set).unwrap();
    let square = matches.iter().find(|m| m.connects("Sun", "Moon")).unwrap();
    assert_eq!(square.applying, Some(true));

    let opposition = matches.iter().find(|m| m.connects("Sun", "Node")).unwrap();
    assert_eq!(opposition.applying, None);
}

#[test]
fn test_minor_catalog_finds_quincunx() {
    let detector = AspectDetector::new(AspectCatalog::with_minor());
    let set = PointSet::from_angles([("A", 0.0), ("B", 151.0)]).unwrap();
    let matches = detector.detect_within(&set).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].aspect.id, "quincunx");
    assert!(!matches[0].aspect.major);
}

#[test]
fn test_custom_catalog_is_used() {
    let catalog = AspectCatalog::new(vec![Aspect::new("septile", "Septile", 51.43, 1.0, "#000", 0)]).unwrap();
    let detector = AspectDetector::new(catalog);
    let set = PointSet::from_angles([("A", 0.0), ("B", 52.0)]).unwrap();
    let matches = detector.detect_within(&set).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].label, "Septile (51.43) A <> B");
}

#[test]
fn test_precision_is_linear_in_deviation() {
    assert_eq!(precision(0.0, 10.0), 1.0);
    assert!((precision(2.5, 10.0) - 0.75).abs() < 1e-12);
    assert_eq!(precision(10.0, 10.0), f64::EPSILON);
}
