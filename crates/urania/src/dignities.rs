//! Essential dignities: rulership, detriment, exaltation, fall and exact
//! exaltation of the classical and modern planets.

use crate::geometry::{angular_separation, normalize};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DignityType {
    Rulership,
    Detriment,
    Exaltation,
    Fall,
    ExactExaltation,
}

impl DignityType {
    /// Short mark printed next to a planet symbol
    pub fn code(self) -> &'static str {
        match self {
            DignityType::Rulership => "r",
            DignityType::Detriment => "d",
            DignityType::Exaltation => "e",
            DignityType::Fall => "f",
            DignityType::ExactExaltation => "E",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dignity {
    #[serde(rename = "type")]
    pub dignity_type: DignityType,
    /// Sign index (0 = Aries)
    pub sign: usize,
    /// Exact exaltation degree, for `ExactExaltation` only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<f64>,
}

/// Degree at which a planet is exactly exalted, within `orbit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactExaltation {
    pub planet_id: String,
    pub position: f64,
    pub orbit: f64,
}

impl ExactExaltation {
    pub fn new(planet_id: &str, position: f64, orbit: f64) -> Self {
        Self {
            planet_id: planet_id.to_string(),
            position,
            orbit,
        }
    }

    fn covers(&self, longitude: f64) -> bool {
        angular_separation(longitude, self.position) <= self.orbit
    }
}

/// Crowley's exact exaltation degrees, 2 degree orb
pub fn default_exact_exaltations() -> Vec<ExactExaltation> {
    vec![
        ExactExaltation::new("sun", 19.0, 2.0),
        ExactExaltation::new("moon", 33.0, 2.0),
        ExactExaltation::new("mercury", 165.0, 2.0),
        ExactExaltation::new("venus", 357.0, 2.0),
        ExactExaltation::new("mars", 298.0, 2.0),
        ExactExaltation::new("jupiter", 95.0, 2.0),
        ExactExaltation::new("saturn", 201.0, 2.0),
    ]
}

/// Sign indices per planet
struct Table {
    rulership: &'static [usize],
    detriment: &'static [usize],
    exaltation: Option<usize>,
    fall: Option<usize>,
}

fn table(planet: &str) -> Option<Table> {
    let table = match planet {
        "sun" => Table {
            rulership: &[4],
            detriment: &[10],
            exaltation: Some(0),
            fall: Some(5),
        },
        "moon" => Table {
            rulership: &[3],
            detriment: &[9],
            exaltation: Some(1),
            fall: Some(7),
        },
        "mercury" => Table {
            rulership: &[2, 5],
            detriment: &[8, 11],
            exaltation: Some(5),
            fall: Some(11),
        },
        "venus" => Table {
            rulership: &[1, 6],
            detriment: &[0, 7],
            exaltation: Some(11),
            fall: Some(5),
        },
        "mars" => Table {
            rulership: &[0, 7],
            detriment: &[1, 6],
            exaltation: Some(9),
            fall: Some(3),
        },
        "jupiter" => Table {
            rulership: &[8, 11],
            detriment: &[2, 5],
            exaltation: Some(3),
            fall: Some(9),
        },
        "saturn" => Table {
            rulership: &[9, 10],
            detriment: &[3, 4],
            exaltation: Some(6),
            fall: Some(0),
        },
        "uranus" => Table {
            rulership: &[10],
            detriment: &[4],
            exaltation: None,
            fall: None,
        },
        "neptune" => Table {
            rulership: &[11],
            detriment: &[5],
            exaltation: None,
            fall: None,
        },
        "pluto" => Table {
            rulership: &[7],
            detriment: &[1],
            exaltation: Some(0),
            fall: Some(6),
        },
        _ => return None,
    };
    Some(table)
}

/// Dignities of `planet_id` at `longitude`. Ids are matched case-insensitively;
/// unknown bodies have none.
pub fn dignities(planet_id: &str, longitude: f64, exact: &[ExactExaltation]) -> Vec<Dignity> {
    let planet = planet_id.to_lowercase();
    let longitude = normalize(longitude);
    let sign = ((longitude / 30.0).floor() as usize).min(11);
    let at = |dignity_type| Dignity {
        dignity_type,
        sign,
        degree: None,
    };

    let mut result = Vec::new();
    if let Some(table) = table(&planet) {
        if table.rulership.contains(&sign) {
            result.push(at(DignityType::Rulership));
        } else if table.detriment.contains(&sign) {
            result.push(at(DignityType::Detriment));
        }
        if table.exaltation == Some(sign) {
            result.push(at(DignityType::Exaltation));
        } else if table.fall == Some(sign) {
            result.push(at(DignityType::Fall));
        }
    }

    for entry in exact {
        if entry.planet_id.to_lowercase() == planet && entry.covers(longitude) {
            result.push(Dignity {
                dignity_type: DignityType::ExactExaltation,
                sign,
                degree: Some(entry.position),
            });
        }
    }
    result
}

/// Comma-joined dignity codes, empty when the planet has none
pub fn dignity_text(planet_id: &str, longitude: f64, exact: &[ExactExaltation]) -> String {
    dignities(planet_id, longitude, exact)
        .iter()
        .map(|d| d.dignity_type.code())
        .collect::<Vec<_>>()
        .join(",")
}
