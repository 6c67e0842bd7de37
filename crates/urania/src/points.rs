use crate::error::ValidationError;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A named position on the chart circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Identifier: "Sun", "Moon", "As", ...
    pub id: String,
    /// Position in degrees
    pub angle: f64,
    /// Speed in degrees per day; negative means retrograde
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl Point {
    pub fn new(id: impl Into<String>, angle: f64) -> Self {
        Self {
            id: id.into(),
            angle,
            speed: None,
        }
    }

    pub fn with_speed(id: impl Into<String>, angle: f64, speed: f64) -> Self {
        Self {
            id: id.into(),
            angle,
            speed: Some(speed),
        }
    }

    pub fn is_retrograde(&self) -> bool {
        self.speed.is_some_and(|s| s < 0.0)
    }

    /// Same id and same position
    pub fn same_position(&self, other: &Point) -> bool {
        self.id == other.id && self.angle == other.angle
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.angle.is_finite() {
            return Err(ValidationError::NonFiniteAngle {
                id: self.id.clone(),
            });
        }
        if self.speed.is_some_and(|s| !s.is_finite()) {
            return Err(ValidationError::NonFiniteSpeed {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Ordered id -> point mapping.
///
/// Insertion order is significant: it is the tie-break for points at equal
/// angles and the output order of both the resolver and the detector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Point>,
    index: HashMap<String, usize>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from `(id, angle)` pairs
    pub fn from_angles<I, S>(angles: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        angles
            .into_iter()
            .map(|(id, angle)| Point::new(id, angle))
            .collect::<Vec<_>>()
            .try_into()
    }

    pub fn insert(&mut self, point: Point) -> Result<(), ValidationError> {
        if self.index.contains_key(&point.id) {
            return Err(ValidationError::DuplicateId(point.id));
        }
        self.index.insert(point.id.clone(), self.points.len());
        self.points.push(point);
        Ok(())
    }

    /// Insert or replace, keeping the slot of a replaced id
    pub fn upsert(&mut self, point: Point) {
        match self.index.get(&point.id) {
            Some(&slot) => self.points[slot] = point,
            None => {
                self.index.insert(point.id.clone(), self.points.len());
                self.points.push(point);
            }
        }
    }

    /// Copy of `self` with every point of `other` merged in
    pub fn merged(&self, other: &PointSet) -> PointSet {
        let mut merged = self.clone();
        for point in other.iter() {
            merged.upsert(point.clone());
        }
        merged
    }

    pub fn get(&self, id: &str) -> Option<&Point> {
        self.index.get(id).map(|&slot| &self.points[slot])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check every angle and speed is finite
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.points.iter().try_for_each(Point::validate)
    }

    /// Same as `validate` but also rejects an empty set
    pub fn validate_non_empty(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPointSet);
        }
        self.validate()
    }
}

impl TryFrom<Vec<Point>> for PointSet {
    type Error = ValidationError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        let mut set = PointSet::new();
        for point in points {
            set.insert(point)?;
        }
        Ok(set)
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

// Wire shape: {"Sun": [angle, speed?], ...}, document order preserved
impl Serialize for PointSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.points.len()))?;
        for point in &self.points {
            match point.speed {
                Some(speed) => map.serialize_entry(&point.id, &[point.angle, speed][..])?,
                None => map.serialize_entry(&point.id, &[point.angle][..])?,
            }
        }
        map.end()
    }
}

struct PointSetVisitor;

impl<'de> Visitor<'de> for PointSetVisitor {
    type Value = PointSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of point id to [angle] or [angle, speed]")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PointSet, A::Error> {
        let mut set = PointSet::new();
        while let Some((id, values)) = access.next_entry::<String, Vec<f64>>()? {
            let point = match values.as_slice() {
                [angle] => Point::new(id, *angle),
                [angle, speed, ..] => Point::with_speed(id, *angle, *speed),
                [] => {
                    return Err(de::Error::custom(format!(
                        "point '{}' must have at least an angle",
                        id
                    )))
                }
            };
            set.insert(point).map_err(de::Error::custom)?;
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for PointSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PointSetVisitor)
    }
}
