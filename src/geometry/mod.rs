//! Pothole geometry calculation
//!
//! Converts the sensor viewing angle, the sensor mounting height and the
//! average road height into the hole depth, footprint, volume and the weight
//! of asphalt needed to fill it. Everything here is pure; recording results is
//! left to the caller.

mod units;

pub use units::{
    FormulaMode, UnitMode, ASPHALT_DENSITY_KG_M3, ASPHALT_DENSITY_LB_FT3,
    CUBIC_FEET_PER_CUBIC_METER, FEET_PER_METER, SQUARE_FEET_PER_SQUARE_METER,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input field a value was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SensorAngle,
    SensorHeight,
    RoadHeight,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::SensorAngle => write!(f, "sensor angle"),
            Field::SensorHeight => write!(f, "sensor height"),
            Field::RoadHeight => write!(f, "average road height"),
        }
    }
}

/// Errors reported by the calculator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Please enter a valid numeric value for the {0}")]
    InvalidInput(Field),
    #[error("Sensor height ({sensor_height}) should be greater than or equal to average road height ({road_height})")]
    GeometryConstraintViolation { sensor_height: f64, road_height: f64 },
    #[error("The estimate is too large to represent; check the input values")]
    ResultOutOfRange,
}

/// The three measurements an estimate is derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementInput {
    /// Half-angle of the sensing cone from vertical, in degrees
    pub angle_deg: f64,
    /// Sensor mounting height
    pub sensor_height: f64,
    /// Average height of the surrounding road surface
    pub road_height: f64,
}

impl MeasurementInput {
    pub fn new(angle_deg: f64, sensor_height: f64, road_height: f64) -> Self {
        Self {
            angle_deg,
            sensor_height,
            road_height,
        }
    }

    /// Parse the three free-text input fields
    pub fn parse(angle: &str, sensor_height: &str, road_height: &str) -> Result<Self, GeometryError> {
        Ok(Self {
            angle_deg: parse_field(angle, Field::SensorAngle)?,
            sensor_height: parse_field(sensor_height, Field::SensorHeight)?,
            road_height: parse_field(road_height, Field::RoadHeight)?,
        })
    }

    /// Vertical distance between the sensor and the road surface
    pub fn hole_depth(&self) -> f64 {
        self.sensor_height - self.road_height
    }

    /// Check both preconditions of [`compute`]
    pub fn validate(&self) -> Result<(), GeometryError> {
        let fields = [
            (self.angle_deg, Field::SensorAngle),
            (self.sensor_height, Field::SensorHeight),
            (self.road_height, Field::RoadHeight),
        ];
        if let Some((_, field)) = fields.iter().find(|(value, _)| !value.is_finite()) {
            return Err(GeometryError::InvalidInput(*field));
        }
        if self.sensor_height < self.road_height {
            return Err(GeometryError::GeometryConstraintViolation {
                sensor_height: self.sensor_height,
                road_height: self.road_height,
            });
        }
        Ok(())
    }
}

/// Parse a single field, rejecting empty, non-numeric and non-finite text
pub fn parse_field(text: &str, field: Field) -> Result<f64, GeometryError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(GeometryError::InvalidInput(field))
}

/// Derived quantities of one successful calculation
///
/// Serialized with the flat keys of the results export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Complementary angle in degrees
    #[serde(rename = "Gamma")]
    pub gamma: f64,
    #[serde(rename = "Hole Depth")]
    pub hole_depth: f64,
    /// Side length of the square footprint
    #[serde(rename = "Area Width")]
    pub area_edge: f64,
    #[serde(rename = "Area")]
    pub area: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    /// Asphalt needed to fill the volume
    #[serde(rename = "Asphalt Weight")]
    pub asphalt_weight: f64,
}

impl CalculationResult {
    /// Whether every quantity is a finite number; JSON cannot carry the rest
    pub fn is_finite(&self) -> bool {
        [
            self.gamma,
            self.hole_depth,
            self.area_edge,
            self.area,
            self.volume,
            self.asphalt_weight,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Compute an estimate using the field tool compatible formulas
pub fn compute(input: MeasurementInput, units: UnitMode) -> Result<CalculationResult, GeometryError> {
    compute_with(input, units, FormulaMode::Legacy)
}

/// Compute an estimate with an explicit imperial formula
pub fn compute_with(
    input: MeasurementInput,
    units: UnitMode,
    formula: FormulaMode,
) -> Result<CalculationResult, GeometryError> {
    input.validate()?;

    let result = match (units, formula) {
        (UnitMode::Metric, _) => metric_estimate(&input),
        (UnitMode::Imperial, FormulaMode::Legacy) => legacy_imperial_estimate(&input),
        (UnitMode::Imperial, FormulaMode::Corrected) => convert_to_imperial(&metric_estimate(&input)),
    };
    if !result.is_finite() {
        return Err(GeometryError::ResultOutOfRange);
    }
    Ok(result)
}

fn metric_estimate(input: &MeasurementInput) -> CalculationResult {
    let hole_depth = input.hole_depth();
    let area_edge = input.sensor_height * input.angle_deg.to_radians().tan();
    let area = area_edge * area_edge;
    let volume = area * hole_depth;

    CalculationResult {
        gamma: complementary_angle(input.angle_deg),
        hole_depth,
        area_edge,
        area,
        volume,
        asphalt_weight: volume * ASPHALT_DENSITY_KG_M3,
    }
}

// The feet factor scales the angle in radians, and the depth stays in input
// units. Estimates must keep matching the field tool, so this is kept as is.
fn legacy_imperial_estimate(input: &MeasurementInput) -> CalculationResult {
    let hole_depth = input.hole_depth();
    let area_edge = input.sensor_height * (input.angle_deg.to_radians() * FEET_PER_METER).tan();
    let area = area_edge * area_edge * SQUARE_FEET_PER_SQUARE_METER;
    let volume = area * hole_depth * CUBIC_FEET_PER_CUBIC_METER;

    CalculationResult {
        gamma: complementary_angle(input.angle_deg),
        hole_depth,
        area_edge,
        area,
        volume,
        asphalt_weight: volume * ASPHALT_DENSITY_LB_FT3,
    }
}

fn convert_to_imperial(metric: &CalculationResult) -> CalculationResult {
    let volume = metric.volume * CUBIC_FEET_PER_CUBIC_METER;
    CalculationResult {
        gamma: metric.gamma,
        hole_depth: metric.hole_depth * FEET_PER_METER,
        area_edge: metric.area_edge * FEET_PER_METER,
        area: metric.area * SQUARE_FEET_PER_SQUARE_METER,
        volume,
        asphalt_weight: volume * ASPHALT_DENSITY_LB_FT3,
    }
}

fn complementary_angle(angle_deg: f64) -> f64 {
    180.0 - (90.0 + angle_deg)
}
