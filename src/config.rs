//! Run configuration.
//!
//! Assembled once at startup from defaults, an optional JSON override
//! file, and CLI flags (flags win). Read-only afterward: the renderer
//! and runner borrow it, nothing mutates it mid-run.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReverieError;
use crate::theme::DEFAULT_THEME;

/// Lower clamp for the speed factor. Keeps `delay / speed` finite.
pub const MIN_SPEED: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Palette name; unknown names fall back to the default palette.
    pub theme: String,
    /// Delay divisor, always >= MIN_SPEED.
    pub speed: f64,
    /// Pause for a keypress between phases.
    pub interactive: bool,
    /// Enter the unbounded random-beat loop after the scripted phases.
    pub monitoring: bool,
    /// Plain-text mirror of every rendered line.
    pub log_file: Option<PathBuf>,
    /// Fixed seed for a reproducible narrative.
    pub seed: Option<u64>,
    /// Cap on the monitoring loop, in seconds. None means until Ctrl-C.
    pub duration: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            speed: 1.0,
            interactive: false,
            monitoring: false,
            log_file: None,
            seed: None,
            duration: None,
        }
    }
}

impl RunConfig {
    /// Sanitize a raw speed value: non-finite or non-positive input
    /// falls back to 1.0, small positives clamp to MIN_SPEED.
    pub fn clamp_speed(raw: f64) -> f64 {
        if !raw.is_finite() || raw <= 0.0 {
            1.0
        } else {
            raw.max(MIN_SPEED)
        }
    }

    /// Fold override-file values in. CLI flags are applied after this,
    /// so they take precedence.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(theme) = &overrides.theme {
            self.theme = theme.clone();
        }
        if let Some(speed) = overrides.speed {
            self.speed = Self::clamp_speed(speed);
        }
        if let Some(interactive) = overrides.interactive {
            self.interactive = interactive;
        }
        if let Some(monitoring) = overrides.monitoring {
            self.monitoring = monitoring;
        }
        if let Some(log_file) = &overrides.log_file {
            self.log_file = Some(log_file.clone());
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(duration) = overrides.duration {
            self.duration = Some(duration);
        }
    }
}

/// Shape of the optional `--config` JSON file. Every field optional;
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Overrides {
    pub theme: Option<String>,
    pub speed: Option<f64>,
    pub interactive: Option<bool>,
    pub monitoring: Option<bool>,
    pub log_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub duration: Option<u64>,
}

impl Overrides {
    /// Load from a JSON file. Callers treat failure as "no overrides"
    /// and log it; a bad config file must not stop the show.
    pub fn load(path: &Path) -> Result<Self, ReverieError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn speed_clamping() {
        assert_eq!(RunConfig::clamp_speed(2.0), 2.0);
        assert_eq!(RunConfig::clamp_speed(0.0), 1.0);
        assert_eq!(RunConfig::clamp_speed(-3.0), 1.0);
        assert_eq!(RunConfig::clamp_speed(f64::NAN), 1.0);
        assert_eq!(RunConfig::clamp_speed(f64::INFINITY), 1.0);
        assert_eq!(RunConfig::clamp_speed(0.0001), MIN_SPEED);
    }

    #[test]
    fn defaults_are_sane() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.theme, "default");
        assert_eq!(cfg.speed, 1.0);
        assert!(!cfg.interactive);
        assert!(!cfg.monitoring);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn overrides_apply_and_clamp() {
        let mut cfg = RunConfig::default();
        let overrides = Overrides {
            theme: Some("matrix".into()),
            speed: Some(-1.0),
            monitoring: Some(true),
            seed: Some(99),
            ..Default::default()
        };
        cfg.apply_overrides(&overrides);
        assert_eq!(cfg.theme, "matrix");
        assert_eq!(cfg.speed, 1.0); // invalid speed fell back
        assert!(cfg.monitoring);
        assert_eq!(cfg.seed, Some(99));
    }

    #[test]
    fn override_file_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"theme": "retro", "speed": 4.0, "log-file": "/tmp/out.txt"}}"#
        )
        .unwrap();

        let overrides = Overrides::load(file.path()).unwrap();
        assert_eq!(overrides.theme.as_deref(), Some("retro"));
        assert_eq!(overrides.speed, Some(4.0));
        assert_eq!(
            overrides.log_file.as_deref(),
            Some(Path::new("/tmp/out.txt"))
        );
    }

    #[test]
    fn override_file_missing_is_error_not_panic() {
        assert!(Overrides::load(Path::new("/nonexistent/config.json")).is_err());
    }

    #[test]
    fn override_file_invalid_json_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        assert!(Overrides::load(file.path()).is_err());
    }
}
