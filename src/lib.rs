//! Pothole Estimator Library
//!
//! Estimates the area, volume and asphalt weight of a road pothole from a
//! sensor angle and two heights, with plots, a looping video preview and
//! JSON/PNG export.

pub mod app;
pub mod geometry;
pub mod plot;
pub mod session;
pub mod settings;
pub mod ui;
pub mod video;

// Re-export commonly used types
pub use app::PotholeEstimatorApp;
pub use geometry::{compute, compute_with, CalculationResult, FormulaMode, GeometryError, MeasurementInput, UnitMode};
pub use session::Session;
pub use settings::{AppPreferences, CliOptions};
pub use video::{FrameSource, LoopPlayer, VideoError};
