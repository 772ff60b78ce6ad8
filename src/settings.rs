//! Application preferences and command-line options
//!
//! Preferences persist between runs as JSON in the platform config directory.
//! Command-line options override them for one run only.

use crate::geometry::{FormulaMode, UnitMode};
use crate::video::DEFAULT_FRAME_INTERVAL;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppPreferences {
    /// Unit system selected at startup
    pub units: UnitMode,
    /// Imperial formula
    pub formula: FormulaMode,
    /// Video shown by the preview
    pub video_path: Option<PathBuf>,
    /// Delay between preview frames in milliseconds
    pub frame_interval_ms: u64,
    /// Directory of the last JSON or PNG export
    pub last_export_dir: Option<PathBuf>,
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            units: UnitMode::Metric,
            formula: FormulaMode::Legacy,
            video_path: None,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            last_export_dir: None,
        }
    }
}

impl AppPreferences {
    /// Get the preferences file path
    pub fn prefs_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("PotholeEstimator");
            p.push("preferences.json");
            p
        })
    }

    /// Load preferences from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::prefs_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("Ignoring preferences: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let prefs = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        log::debug!("Loaded preferences from {:?}", path);
        Ok(prefs)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        log::debug!("Saved preferences to {:?}", path);
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

/// Options given on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub video_path: Option<PathBuf>,
    pub imperial: bool,
    pub corrected_imperial: bool,
    pub frame_interval_ms: Option<u64>,
}

impl CliOptions {
    /// Parse arguments, excluding the program name
    ///
    /// Unknown or malformed arguments are logged and skipped.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--video" => match args.next() {
                    Some(path) => options.video_path = Some(PathBuf::from(path)),
                    None => log::warn!("--video needs a path"),
                },
                "--imperial" => options.imperial = true,
                "--corrected-imperial" => options.corrected_imperial = true,
                "--frame-interval-ms" => match args.next().map(|v| v.parse::<u64>()) {
                    Some(Ok(ms)) if ms > 0 => options.frame_interval_ms = Some(ms),
                    _ => log::warn!("--frame-interval-ms needs a positive number of milliseconds"),
                },
                other => log::warn!("Ignoring unknown argument: {}", other),
            }
        }
        options
    }

    /// Apply the options on top of loaded preferences
    pub fn apply_to(&self, prefs: &mut AppPreferences) {
        if let Some(path) = &self.video_path {
            prefs.video_path = Some(path.clone());
        }
        if self.imperial {
            prefs.units = UnitMode::Imperial;
        }
        if self.corrected_imperial {
            prefs.formula = FormulaMode::Corrected;
        }
        if let Some(ms) = self.frame_interval_ms {
            prefs.frame_interval_ms = ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_options() {
        let options = CliOptions::parse([
            "--video",
            "clips/fluid.gif",
            "--imperial",
            "--frame-interval-ms",
            "40",
            "--corrected-imperial",
        ]);
        assert_eq!(options.video_path, Some(PathBuf::from("clips/fluid.gif")));
        assert!(options.imperial);
        assert!(options.corrected_imperial);
        assert_eq!(options.frame_interval_ms, Some(40));
    }

    #[test]
    fn test_parse_skips_bad_arguments() {
        let options = CliOptions::parse(["--bogus", "--frame-interval-ms", "zero", "--video"]);
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn test_cli_overrides_preferences() {
        let mut prefs = AppPreferences::default();
        CliOptions::parse(["--imperial", "--video", "a.gif"]).apply_to(&mut prefs);

        assert_eq!(prefs.units, UnitMode::Imperial);
        assert_eq!(prefs.formula, FormulaMode::Legacy);
        assert_eq!(prefs.video_path, Some(PathBuf::from("a.gif")));
        assert_eq!(prefs.frame_interval(), DEFAULT_FRAME_INTERVAL);
    }

    #[test]
    fn test_preferences_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let prefs = AppPreferences {
            units: UnitMode::Imperial,
            formula: FormulaMode::Corrected,
            video_path: Some(PathBuf::from("/tmp/clip.gif")),
            frame_interval_ms: 33,
            last_export_dir: None,
        };
        prefs.save_to(&path).unwrap();

        assert_eq!(AppPreferences::load_from(&path).unwrap(), prefs);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{ "units": "Imperial" }"#).unwrap();

        let prefs = AppPreferences::load_from(&path).unwrap();
        assert_eq!(prefs.units, UnitMode::Imperial);
        assert_eq!(prefs.frame_interval_ms, 10);
        assert!(prefs.video_path.is_none());
    }

    #[test]
    fn test_corrupt_preferences_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(AppPreferences::load_from(&path).is_err());
    }
}
