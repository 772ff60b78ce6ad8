//! Main application state and UI
//!
//! Three tabs (Calculation, Visualization, Save/Export) over one [`Session`].
//! Plots and the video preview open in their own windows. Every failure and
//! every successful export is reported in a modal notification.

use crate::geometry::{FormulaMode, UnitMode};
use crate::plot::raster::{self, RasterOptions};
use crate::plot::PrismMesh;
use crate::session::Session;
use crate::settings::AppPreferences;
use crate::ui::calculation_panel::{self, CalculationAction};
use crate::ui::{DepthProfileView, Notification, PrismView, VideoPreviewWindow};
use crate::video;
use eframe::egui;
use std::path::{Path, PathBuf};

/// Top level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Calculation,
    Visualization,
    SaveExport,
}

/// Main application state
pub struct PotholeEstimatorApp {
    pub session: Session,
    /// Preferences in effect, including command-line overrides
    pub prefs: AppPreferences,
    /// Preferences as persisted; user changes are mirrored here and saved
    stored_prefs: AppPreferences,
    /// Where preferences are saved, `None` to keep them in memory
    prefs_path: Option<PathBuf>,
    pub tab: Tab,

    // Windows
    profile_view: Option<DepthProfileView>,
    prism_view: Option<PrismView>,
    video_window: VideoPreviewWindow,
    notification: Option<Notification>,

    /// PNG export settings
    pub export_options: RasterOptions,
}

impl PotholeEstimatorApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>, prefs: AppPreferences, stored: AppPreferences) -> Self {
        log::info!("Initializing Pothole Estimator...");
        let app = Self::with_preferences(prefs, stored, AppPreferences::prefs_path());
        log::info!(
            "Units: {:?}, formula: {:?}, video: {:?}",
            app.prefs.units,
            app.prefs.formula,
            app.prefs.video_path
        );
        app
    }

    pub fn with_preferences(prefs: AppPreferences, stored: AppPreferences, prefs_path: Option<PathBuf>) -> Self {
        Self {
            session: Session::new(prefs.units, prefs.formula),
            video_window: VideoPreviewWindow::new(prefs.frame_interval()),
            prefs,
            stored_prefs: stored,
            prefs_path,
            tab: Tab::default(),
            profile_view: None,
            prism_view: None,
            notification: None,
            export_options: RasterOptions::default(),
        }
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.notification = Some(Notification::error(message));
    }

    fn notify_success(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::success(message));
    }

    // ---- Calculation ----

    pub fn calculate(&mut self) {
        if let Err(e) = self.session.calculate() {
            self.notify_error(e.to_string());
        }
    }

    pub fn randomize_inputs(&mut self) {
        self.session.randomize_inputs(&mut rand::rng());
    }

    pub fn set_units(&mut self, units: UnitMode) {
        self.session.units = units;
        self.prefs.units = units;
        self.stored_prefs.units = units;
        self.persist_preferences();
    }

    pub fn set_formula(&mut self, formula: FormulaMode) {
        self.session.formula = formula;
        self.prefs.formula = formula;
        self.stored_prefs.formula = formula;
        self.persist_preferences();
    }

    pub fn set_video_path(&mut self, path: PathBuf) {
        log::info!("Video set to {:?}", path);
        self.prefs.video_path = Some(path.clone());
        self.stored_prefs.video_path = Some(path);
        self.persist_preferences();
    }

    fn persist_preferences(&self) {
        let Some(path) = &self.prefs_path else {
            return;
        };
        if let Err(e) = self.stored_prefs.save_to(path) {
            log::warn!("Failed to save preferences: {:#}", e);
        }
    }

    // ---- Visualization ----

    pub fn open_2d_plot(&mut self) {
        match self.session.heights() {
            Ok((sensor, road)) => {
                self.profile_view = Some(DepthProfileView::new(sensor, road, self.session.units));
            }
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    pub fn open_3d_plot(&mut self) {
        match self.session.heights() {
            Ok((sensor, road)) => {
                self.prism_view = Some(PrismView::new(sensor, road, self.session.units));
            }
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    pub fn is_2d_plot_open(&self) -> bool {
        self.profile_view.is_some()
    }

    pub fn is_3d_plot_open(&self) -> bool {
        self.prism_view.is_some()
    }

    /// Validate the inputs and start looping the configured video
    pub fn start_video(&mut self, ctx: &egui::Context) {
        let session = &self.session;
        if [&session.angle_text, &session.sensor_height_text, &session.road_height_text]
            .iter()
            .any(|text| text.trim().is_empty())
        {
            self.notify_error("Please enter all the required input values.");
            return;
        }
        if let Err(e) = self.session.validated_input() {
            self.notify_error(e.to_string());
            return;
        }
        let Some(path) = self.prefs.video_path.clone() else {
            self.notify_error("No video selected. Choose a video file first.");
            return;
        };

        self.video_window.set_interval(self.prefs.frame_interval());
        if let Err(e) = self.video_window.start(ctx, &path) {
            self.notify_error(e.to_string());
        }
    }

    pub fn is_video_playing(&self) -> bool {
        self.video_window.player().is_playing()
    }

    fn choose_video(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Choose Video")
            .add_filter("Video", video::supported_extensions().as_slice());
        if let Some(dir) = self.prefs.video_path.as_ref().and_then(|p| p.parent()) {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.set_video_path(path);
        }
    }

    fn choose_frame_folder(&mut self) {
        if let Some(path) = rfd::FileDialog::new().set_title("Choose Frame Folder").pick_folder() {
            self.set_video_path(path);
        }
    }

    // ---- Save / Export ----

    /// Write the history to `path` and report the outcome
    pub fn save_results_to(&mut self, path: &Path) {
        match self.session.export_json(path) {
            Ok(()) => {
                self.remember_export_dir(path);
                self.notify_success(format!("Results saved to {}", path.display()));
            }
            Err(e) => self.notify_error(format!("Failed to save results: {:#}", e)),
        }
    }

    /// Render the 3D scatter to `path` and report the outcome
    pub fn export_visualization_to(&mut self, path: &Path) {
        let (sensor, road) = match self.session.heights() {
            Ok(heights) => heights,
            Err(e) => {
                self.notify_error(e.to_string());
                return;
            }
        };
        let mesh = PrismMesh::new(sensor, road);
        match raster::export_png(&mesh, path, &self.export_options) {
            Ok(()) => {
                self.remember_export_dir(path);
                self.notify_success(format!("Visualization saved to {}", path.display()));
            }
            Err(e) => self.notify_error(format!("Failed to export visualization: {:#}", e)),
        }
    }

    fn remember_export_dir(&mut self, path: &Path) {
        if let Some(dir) = path.parent() {
            self.prefs.last_export_dir = Some(dir.to_path_buf());
            self.stored_prefs.last_export_dir = Some(dir.to_path_buf());
            self.persist_preferences();
        }
    }

    fn save_dialog(&self, name: &str, extension: &str, file_name: &str) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new()
            .add_filter(name, &[extension])
            .set_file_name(file_name);
        match &self.prefs.last_export_dir {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn save_results(&mut self) {
        if let Some(path) = self.save_dialog("JSON files", "json", "results.json").save_file() {
            self.save_results_to(&path);
        }
    }

    fn export_visualization(&mut self) {
        // Check the inputs before asking for a file name
        if let Err(e) = self.session.heights() {
            self.notify_error(e.to_string());
            return;
        }
        if let Some(path) = self.save_dialog("PNG files", "png", "visualization.png").save_file() {
            self.export_visualization_to(&path);
        }
    }

    // ---- Drawing ----

    fn show_calculation_tab(&mut self, ui: &mut egui::Ui) {
        for action in calculation_panel::show(ui, &mut self.session) {
            match action {
                CalculationAction::Calculate => self.calculate(),
                CalculationAction::ClearResult => self.session.clear_display(),
                CalculationAction::RandomInputs => self.randomize_inputs(),
                CalculationAction::UnitsChanged(units) => self.set_units(units),
                CalculationAction::FormulaChanged(formula) => self.set_formula(formula),
            }
        }
    }

    fn show_visualization_tab(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            if ui.button("Plot 2D Graph").clicked() {
                self.open_2d_plot();
            }
            ui.add_space(4.0);
            if ui.button("Display 3D Visualization").clicked() {
                self.open_3d_plot();
            }
            ui.add_space(4.0);
            let label = if self.is_video_playing() { "Restart Video" } else { "Display Video" };
            if ui.button(label).clicked() {
                self.start_video(ui.ctx());
            }
        });

        ui.add_space(12.0);
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Video:");
            match &self.prefs.video_path {
                Some(path) => ui.monospace(path.display().to_string()),
                None => ui.weak("none"),
            };
        });
        ui.horizontal(|ui| {
            if ui.button("Choose Video...").clicked() {
                self.choose_video();
            }
            if ui.button("Choose Frame Folder...").clicked() {
                self.choose_frame_folder();
            }
        });
        ui.weak(format!("Frame interval: {} ms", self.prefs.frame_interval().as_millis()));
    }

    fn show_export_tab(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            if ui.button("Save Results as JSON").clicked() {
                self.save_results();
            }
            ui.add_space(4.0);
            if ui.button("Export Visualization as Image").clicked() {
                self.export_visualization();
            }
        });

        ui.add_space(12.0);
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Image size:");
            ui.add(egui::DragValue::new(&mut self.export_options.width).clamp_range(64..=8192).suffix(" px"));
            ui.label("x");
            ui.add(egui::DragValue::new(&mut self.export_options.height).clamp_range(64..=8192).suffix(" px"));
        });
        ui.weak(format!("{} result(s) will be saved", self.session.history().len()));
    }

    fn show_plot_windows(&mut self, ctx: &egui::Context, enabled: bool) {
        if let Some(view) = &self.profile_view {
            let mut open = true;
            egui::Window::new("2D Graph")
                .open(&mut open)
                .enabled(enabled)
                .default_size([520.0, 360.0])
                .show(ctx, |ui| view.show(ui));
            if !open {
                self.profile_view = None;
            }
        }

        if let Some(view) = &mut self.prism_view {
            let mut open = true;
            egui::Window::new("Data Coordination")
                .open(&mut open)
                .enabled(enabled)
                .default_size([600.0, 460.0])
                .show(ctx, |ui| view.show(ui));
            if !open {
                self.prism_view = None;
            }
        }
    }
}

impl eframe::App for PotholeEstimatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let modal_open = self.notification.is_some();

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.tab, Tab::Calculation, "Calculation");
                    ui.selectable_value(&mut self.tab, Tab::Visualization, "Visualization");
                    ui.selectable_value(&mut self.tab, Tab::SaveExport, "Save/Export");
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| match self.tab {
                Tab::Calculation => self.show_calculation_tab(ui),
                Tab::Visualization => self.show_visualization_tab(ui),
                Tab::SaveExport => self.show_export_tab(ui),
            });
        });

        self.show_plot_windows(ctx, !modal_open);

        if let Some(e) = self.video_window.show(ctx, !modal_open) {
            self.notify_error(e.to_string());
        }

        if let Some(notification) = &self.notification {
            if notification.show_modal(ctx) {
                self.dismiss_notification();
            }
        }
    }

    fn on_exit(&mut self) {
        self.video_window.stop();
        log::info!("Recorded {} results this session", self.session.history().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::NotificationKind;

    fn app() -> PotholeEstimatorApp {
        PotholeEstimatorApp::with_preferences(AppPreferences::default(), AppPreferences::default(), None)
    }

    fn fill(app: &mut PotholeEstimatorApp, angle: &str, sensor: &str, road: &str) {
        app.session.angle_text = angle.to_string();
        app.session.sensor_height_text = sensor.to_string();
        app.session.road_height_text = road.to_string();
    }

    #[test]
    fn test_calculate_records_result() {
        let mut app = app();
        fill(&mut app, "1.0", "1.5", "1.0");

        app.calculate();
        assert_eq!(app.session.history().len(), 1);
        assert!(app.notification().is_none());
    }

    #[test]
    fn test_invalid_input_notifies() {
        let mut app = app();
        fill(&mut app, "abc", "1.5", "1.0");

        app.calculate();
        assert!(app.session.history().is_empty());
        let notification = app.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Please enter a valid numeric value for the sensor angle");
    }

    #[test]
    fn test_constraint_violation_notifies() {
        let mut app = app();
        fill(&mut app, "1.0", "1.0", "1.5");

        app.calculate();
        assert!(app.session.history().is_empty());
        assert_eq!(app.notification().unwrap().kind, NotificationKind::Error);
    }

    #[test]
    fn test_plots_skip_geometry_constraint() {
        let mut app = app();
        fill(&mut app, "", "1.0", "1.5");

        app.open_2d_plot();
        app.open_3d_plot();
        assert!(app.is_2d_plot_open());
        assert!(app.is_3d_plot_open());
        assert!(app.notification().is_none());
    }

    #[test]
    fn test_plot_with_bad_height_notifies() {
        let mut app = app();
        fill(&mut app, "1.0", "high", "1.0");

        app.open_3d_plot();
        assert!(!app.is_3d_plot_open());
        assert!(app.notification().is_some());
    }

    #[test]
    fn test_video_needs_all_inputs() {
        let ctx = egui::Context::default();
        let mut app = app();
        fill(&mut app, "1.0", "", "1.0");

        app.start_video(&ctx);
        assert!(!app.is_video_playing());
        assert_eq!(app.notification().unwrap().message, "Please enter all the required input values.");
    }

    #[test]
    fn test_video_needs_valid_geometry() {
        let ctx = egui::Context::default();
        let mut app = app();
        fill(&mut app, "1.0", "1.0", "2.0");
        app.prefs.video_path = Some(PathBuf::from("clip.gif"));

        app.start_video(&ctx);
        assert!(!app.is_video_playing());
        assert!(app.notification().unwrap().message.contains("greater than or equal"));
    }

    #[test]
    fn test_video_missing_file_notifies() {
        let ctx = egui::Context::default();
        let mut app = app();
        fill(&mut app, "1.0", "1.5", "1.0");
        app.prefs.video_path = Some(PathBuf::from("/definitely/not/here.gif"));

        app.start_video(&ctx);
        assert!(!app.is_video_playing());
        assert!(app.notification().unwrap().message.contains("Unable to open the video file"));
    }

    #[test]
    fn test_video_starts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.gif");
        crate::video::test_support::write_gif(&path, 2);

        let ctx = egui::Context::default();
        let mut app = app();
        fill(&mut app, "1.0", "1.5", "1.0");
        app.prefs.video_path = Some(path);

        app.start_video(&ctx);
        assert!(app.is_video_playing());
        assert!(app.notification().is_none());
    }

    #[test]
    fn test_save_results_notifies_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let mut app = app();
        fill(&mut app, "1.0", "1.5", "1.0");
        app.calculate();

        app.save_results_to(&path);
        let notification = app.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert!(notification.message.starts_with("Results saved to"));
        assert_eq!(crate::session::load_json(&path).unwrap().len(), 1);
        assert_eq!(app.prefs.last_export_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_export_visualization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visualization.png");
        let mut app = app();
        app.export_options = RasterOptions {
            width: 200,
            height: 150,
            point_radius: 3.0,
        };
        fill(&mut app, "", "1.5", "1.0");

        app.export_visualization_to(&path);
        assert_eq!(app.notification().unwrap().kind, NotificationKind::Success);
        assert!(path.exists());
    }

    #[test]
    fn test_user_changes_persist_without_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let prefs_path = dir.path().join("preferences.json");

        let stored = AppPreferences::default();
        let mut effective = stored.clone();
        effective.frame_interval_ms = 40;
        let mut app = PotholeEstimatorApp::with_preferences(effective, stored, Some(prefs_path.clone()));

        app.set_units(UnitMode::Imperial);
        assert_eq!(app.session.units, UnitMode::Imperial);

        let saved = AppPreferences::load_from(&prefs_path).unwrap();
        assert_eq!(saved.units, UnitMode::Imperial);
        assert_eq!(saved.frame_interval_ms, AppPreferences::default().frame_interval_ms);
    }
}
