//! Calculation session
//!
//! Owns the text of the input fields and the append-only history of results
//! for the lifetime of the application.

use crate::geometry::{
    self, parse_field, CalculationResult, Field, FormulaMode, GeometryError, MeasurementInput,
    UnitMode,
};
use anyhow::Context;
use rand::Rng;
use std::path::Path;

/// Range random sensor angles are drawn from, in degrees
const RANDOM_ANGLE_RANGE: (f64, f64) = (0.1, 2.0);

/// Range random heights are drawn from
const RANDOM_HEIGHT_RANGE: (f64, f64) = (0.5, 2.0);

/// Calculation session state
#[derive(Debug, Default)]
pub struct Session {
    /// Sensor angle field text
    pub angle_text: String,
    /// Sensor height field text
    pub sensor_height_text: String,
    /// Average road height field text
    pub road_height_text: String,
    /// Unit system for new calculations
    pub units: UnitMode,
    /// Imperial formula for new calculations
    pub formula: FormulaMode,
    /// Successful results in call order
    history: Vec<CalculationResult>,
    /// Report shown in the result area
    report: Option<String>,
}

impl Session {
    pub fn new(units: UnitMode, formula: FormulaMode) -> Self {
        Self {
            units,
            formula,
            ..Default::default()
        }
    }

    /// Parse the three input fields
    pub fn input(&self) -> Result<MeasurementInput, GeometryError> {
        MeasurementInput::parse(
            &self.angle_text,
            &self.sensor_height_text,
            &self.road_height_text,
        )
    }

    /// Parse the fields and check the geometry constraint without computing
    pub fn validated_input(&self) -> Result<MeasurementInput, GeometryError> {
        let input = self.input()?;
        input.validate()?;
        Ok(input)
    }

    /// Sensor and road heights, the only fields the plots need
    pub fn heights(&self) -> Result<(f64, f64), GeometryError> {
        Ok((
            parse_field(&self.sensor_height_text, Field::SensorHeight)?,
            parse_field(&self.road_height_text, Field::RoadHeight)?,
        ))
    }

    /// Run a calculation and record it
    ///
    /// Failed calculations leave the history untouched.
    pub fn calculate(&mut self) -> Result<CalculationResult, GeometryError> {
        let input = self.input()?;
        let result = geometry::compute_with(input, self.units, self.formula)?;

        self.history.push(result);
        self.report = Some(format_report(&result, self.units));
        log::info!(
            "Calculated estimate #{}: area {} {}, volume {} {}",
            self.history.len(),
            result.area,
            self.units.area_label(),
            result.volume,
            self.units.volume_label()
        );
        Ok(result)
    }

    /// All recorded results, oldest first
    pub fn history(&self) -> &[CalculationResult] {
        &self.history
    }

    /// Report text of the latest calculation, if not cleared
    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Clear the displayed report; the history is kept
    pub fn clear_display(&mut self) {
        self.report = None;
    }

    /// Fill the input fields with plausible random measurements
    pub fn randomize_inputs<R: Rng>(&mut self, rng: &mut R) {
        let (angle_min, angle_max) = RANDOM_ANGLE_RANGE;
        let (height_min, height_max) = RANDOM_HEIGHT_RANGE;

        let angle = round2(rng.random_range(angle_min..=angle_max));
        let sensor_height = round2(rng.random_range(height_min..=height_max));
        let road_height = round2(rng.random_range(height_min..=sensor_height.min(height_max)));

        self.angle_text = angle.to_string();
        self.sensor_height_text = sensor_height.to_string();
        self.road_height_text = road_height.to_string();
    }

    /// Write the whole history as a JSON array
    pub fn export_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.history)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        log::info!("Saved {} results to {:?}", self.history.len(), path);
        Ok(())
    }
}

/// Read a results file written by [`Session::export_json`]
pub fn load_json(path: &Path) -> anyhow::Result<Vec<CalculationResult>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let history: Vec<CalculationResult> =
        serde_json::from_str(&json).with_context(|| format!("Invalid results file {:?}", path))?;
    log::info!("Loaded {} results from {:?}", history.len(), path);
    Ok(history)
}

/// Human readable report of one result
pub fn format_report(result: &CalculationResult, units: UnitMode) -> String {
    format!(
        "Gamma = {} degrees\n\
         The depth of the hole is {} {}\n\
         The width of the Area is {} {}\n\
         The Area is: {} {}\n\
         The volume is: {} {}\n\
         The asphalt weight needed is: {} {}",
        result.gamma,
        result.hole_depth,
        units.length_label(),
        result.area_edge,
        units.length_label(),
        result.area,
        units.area_label(),
        result.volume,
        units.volume_label(),
        result.asphalt_weight,
        units.weight_label(),
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
