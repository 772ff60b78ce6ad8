//! Pothole Estimator - area and volume calculator
//!
//! Main entry point for the application.

use pothole_estimator::{AppPreferences, CliOptions, PotholeEstimatorApp};

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting Pothole Estimator v{}", env!("CARGO_PKG_VERSION"));

    let options = CliOptions::parse(std::env::args().skip(1));
    let stored = AppPreferences::load();
    let mut prefs = stored.clone();
    options.apply_to(&mut prefs);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([520.0, 420.0])
            .with_title("Area and Volume Calculator"),
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        "Area and Volume Calculator",
        native_options,
        Box::new(|cc| Ok(Box::new(PotholeEstimatorApp::new(cc, prefs, stored)))),
    )
}
