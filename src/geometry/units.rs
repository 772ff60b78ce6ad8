//! Unit systems and fixed conversion constants
//!
//! The constants are the ones used by the field tool the estimates must stay
//! numerically compatible with.

use serde::{Deserialize, Serialize};

/// Asphalt density in kg/m³
pub const ASPHALT_DENSITY_KG_M3: f64 = 2400.0;

/// Asphalt density used for imperial estimates (lb/ft³)
pub const ASPHALT_DENSITY_LB_FT3: f64 = 94.6405;

/// Meters to feet
pub const FEET_PER_METER: f64 = 3.28084;

/// Square meters to square feet
pub const SQUARE_FEET_PER_SQUARE_METER: f64 = 10.7639;

/// Cubic meters to cubic feet
pub const CUBIC_FEET_PER_CUBIC_METER: f64 = 35.3147;

/// Unit system the results are reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitMode {
    /// Meters and kilograms
    #[default]
    Metric,
    /// Feet and pounds
    Imperial,
}

impl UnitMode {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitMode::Metric => "Metric (meters, kilograms)",
            UnitMode::Imperial => "Imperial (feet, pounds)",
        }
    }

    pub fn length_label(&self) -> &'static str {
        self.pick("meter", "foot")
    }

    pub fn area_label(&self) -> &'static str {
        self.pick("square meter", "square foot")
    }

    pub fn volume_label(&self) -> &'static str {
        self.pick("cubic meter", "cubic foot")
    }

    pub fn weight_label(&self) -> &'static str {
        self.pick("kilogram", "pound")
    }

    fn pick(&self, metric: &'static str, imperial: &'static str) -> &'static str {
        match self {
            UnitMode::Metric => metric,
            UnitMode::Imperial => imperial,
        }
    }
}

/// How imperial results are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormulaMode {
    /// Reproduce the field tool exactly, including the feet factor applied to
    /// the tangent argument and the unconverted hole depth
    #[default]
    Legacy,
    /// Compute in metric, then convert each output quantity
    Corrected,
}

impl FormulaMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaMode::Legacy => "Legacy (field tool compatible)",
            FormulaMode::Corrected => "Corrected (convert metric results)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_labels() {
        assert_eq!(UnitMode::Metric.length_label(), "meter");
        assert_eq!(UnitMode::Imperial.length_label(), "foot");
        assert_eq!(UnitMode::Metric.weight_label(), "kilogram");
        assert_eq!(UnitMode::Imperial.volume_label(), "cubic foot");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(UnitMode::default(), UnitMode::Metric);
        assert_eq!(FormulaMode::default(), FormulaMode::Legacy);
    }
}
