//! Calculation tab
//!
//! Input fields, unit selection and the result report.

use crate::geometry::{FormulaMode, UnitMode};
use crate::session::Session;
use eframe::egui::{self, RichText};

/// Actions requested from the calculation tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationAction {
    Calculate,
    ClearResult,
    RandomInputs,
    UnitsChanged(UnitMode),
    FormulaChanged(FormulaMode),
}

/// Draw the calculation tab and collect the user's actions
pub fn show(ui: &mut egui::Ui, session: &mut Session) -> Vec<CalculationAction> {
    let mut actions = Vec::new();

    egui::Grid::new("measurement_inputs")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Sensor Angle (degree):");
            ui.text_edit_singleline(&mut session.angle_text);
            ui.end_row();

            ui.label(format!("Sensor Height ({}):", session.units.length_label()));
            ui.text_edit_singleline(&mut session.sensor_height_text);
            ui.end_row();

            ui.label(format!("Average Road Height ({}):", session.units.length_label()));
            ui.text_edit_singleline(&mut session.road_height_text);
            ui.end_row();
        });

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label("Units:");
        for mode in [UnitMode::Metric, UnitMode::Imperial] {
            if ui
                .radio_value(&mut session.units, mode, mode.display_name())
                .changed()
            {
                actions.push(CalculationAction::UnitsChanged(mode));
            }
        }
    });

    if session.units == UnitMode::Imperial {
        ui.horizontal(|ui| {
            ui.label("Imperial formula:");
            for mode in [FormulaMode::Legacy, FormulaMode::Corrected] {
                if ui
                    .radio_value(&mut session.formula, mode, mode.display_name())
                    .changed()
                {
                    actions.push(CalculationAction::FormulaChanged(mode));
                }
            }
        });
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        if ui.button("Calculate").clicked() {
            actions.push(CalculationAction::Calculate);
        }
        if ui.button("Clear Result").clicked() {
            actions.push(CalculationAction::ClearResult);
        }
        if ui.button("Generate Random Inputs").clicked() {
            actions.push(CalculationAction::RandomInputs);
        }
    });

    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| match session.report() {
        Some(report) => {
            ui.label(RichText::new(report).monospace());
        }
        None => {
            ui.weak("No result");
        }
    });

    let count = session.history().len();
    if count > 0 {
        ui.separator();
        ui.weak(format!("{} result(s) recorded this session", count));
    }

    actions
}
