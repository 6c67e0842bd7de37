use crate::error::ValidationError;
use crate::points::PointSet;
use serde::{Deserialize, Serialize};

/// Indices of the four angles within the cusp list
pub const AS: usize = 0;
pub const IC: usize = 3;
pub const DS: usize = 6;
pub const MC: usize = 9;

/// Input for one chart: planet positions, optional house cusps and optional
/// extra points used only as aspect targets.
///
/// ```json
/// {"planets": {"Sun": [30.5], "Moon": [120.0, -0.5]},
///  "cusps": [300, 340, 30, 60, 75, 90, 116, 172, 210, 236, 250, 274]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub planets: PointSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cusps: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_of_interest: Option<PointSet>,
}

impl ChartData {
    pub fn new(planets: PointSet) -> Self {
        Self {
            planets,
            cusps: None,
            points_of_interest: None,
        }
    }

    pub fn with_cusps(mut self, cusps: Vec<f64>) -> Self {
        self.cusps = Some(cusps);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.planets.validate()?;
        if let Some(points) = &self.points_of_interest {
            points.validate()?;
        }
        if let Some(cusps) = &self.cusps {
            if cusps.len() != 12 {
                return Err(ValidationError::InvalidCusps(format!(
                    "expected 12 cusps, got {}",
                    cusps.len()
                )));
            }
            if let Some(index) = cusps.iter().position(|c| !c.is_finite()) {
                return Err(ValidationError::InvalidCusps(format!(
                    "cusp {} is not a finite angle",
                    index + 1
                )));
            }
        }
        Ok(())
    }

    /// The four chart angles as a point set ("As", "Ic", "Ds", "Mc")
    pub fn angles(&self) -> Option<PointSet> {
        let cusps = self.cusps.as_ref()?;
        PointSet::from_angles([
            ("As", *cusps.get(AS)?),
            ("Ic", *cusps.get(IC)?),
            ("Ds", *cusps.get(DS)?),
            ("Mc", *cusps.get(MC)?),
        ])
        .ok()
    }
}
