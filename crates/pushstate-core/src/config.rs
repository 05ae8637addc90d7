use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GeometryError};
use crate::time::Period;
use crate::types::{Shape, StepCount};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

fn default_out_dir() -> PathBuf {
    PathBuf::from("processed_dataset")
}
fn default_base_filename() -> String {
    "MIT_Push_state_tuple_part".into()
}
const fn default_true() -> bool {
    true
}
const fn default_resample_period_ms() -> u64 {
    10
}
const fn default_threshold() -> f64 {
    0.05
}

// ---------------------------------------------------------------------------
// ProcessConfig
// ---------------------------------------------------------------------------

/// Configuration of one trajectory-to-example run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Directory holding the raw recordings. Its final component names the
    /// shape unless [`shape`](Self::shape) is set.
    pub source_dir: PathBuf,

    /// Where output files are created (default: `processed_dataset`).
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Base name of every output file.
    #[serde(default = "default_base_filename")]
    pub base_filename: String,

    /// Consecutive states per example (2, 3 or 4).
    #[serde(default)]
    pub number_of_steps: StepCount,

    /// Put trajectories of every velocity into the same output files.
    #[serde(default = "default_true")]
    pub mixed_vel: bool,

    /// Put trajectories of every acceleration into the same output files.
    #[serde(default = "default_true")]
    pub mixed_acc: bool,

    /// Resampling grid in milliseconds (default: 10).
    #[serde(default = "default_resample_period_ms")]
    pub resample_period_ms: u64,

    /// Shape override. Defaults to the source directory's final component.
    #[serde(default)]
    pub shape: Option<Shape>,

    /// Split aligned frames at missing timesteps and window each piece
    /// separately.
    #[serde(default)]
    pub split_on_gaps: bool,

    /// Also write tagged state rows for contact flagging.
    #[serde(default)]
    pub write_states: bool,
}

impl ProcessConfig {
    /// Defaults for everything except the source directory.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            out_dir: default_out_dir(),
            base_filename: default_base_filename(),
            number_of_steps: StepCount::default(),
            mixed_vel: true,
            mixed_acc: true,
            resample_period_ms: default_resample_period_ms(),
            shape: None,
            split_on_gaps: false,
            write_states: false,
        }
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Period::from_millis(self.resample_period_ms)?;
        if self.base_filename.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "base_filename".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Resampling period.
    pub fn period(&self) -> Result<Period, ConfigError> {
        Period::from_millis(self.resample_period_ms)
    }

    /// Shape of the processed objects: the override, or the source
    /// directory's final component.
    pub fn resolve_shape(&self) -> Result<Shape, GeometryError> {
        if let Some(shape) = self.shape {
            return Ok(shape);
        }
        let name = self
            .source_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.parse()
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// ContactConfig
// ---------------------------------------------------------------------------

/// Configuration of one contact-flagging run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Directory holding state files.
    pub source_dir: PathBuf,

    /// Where flagged files are written (default: `processed_dataset`).
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Tip-to-edge distance (m) at or below which the tip is in contact.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl ContactConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            out_dir: default_out_dir(),
            threshold: default_threshold(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Directory checks
// ---------------------------------------------------------------------------

/// Fail fast when the source directory is missing, then create the output
/// directory if needed.
pub fn prepare_directories(source_dir: &Path, out_dir: &Path) -> Result<(), ConfigError> {
    if !source_dir.is_dir() {
        return Err(ConfigError::MissingSourceDirectory(source_dir.to_path_buf()));
    }
    std::fs::create_dir_all(out_dir)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_defaults() {
        let config = ProcessConfig::new("data/rect1");
        assert_eq!(config.out_dir, PathBuf::from("processed_dataset"));
        assert_eq!(config.base_filename, "MIT_Push_state_tuple_part");
        assert_eq!(config.number_of_steps.get(), 2);
        assert!(config.mixed_vel);
        assert!(config.mixed_acc);
        assert_eq!(config.period().unwrap(), Period::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn process_from_minimal_toml() {
        let config: ProcessConfig = toml::from_str(r#"source_dir = "data/rect2""#).unwrap();
        assert_eq!(config, ProcessConfig::new("data/rect2"));
    }

    #[test]
    fn process_toml_overrides() {
        let config: ProcessConfig = toml::from_str(
            r#"
            source_dir = "data/rect1"
            number_of_steps = 3
            mixed_vel = false
            shape = "rect3"
            "#,
        )
        .unwrap();
        assert_eq!(config.number_of_steps.get(), 3);
        assert!(!config.mixed_vel);
        assert!(config.mixed_acc);
        assert_eq!(config.resolve_shape().unwrap(), Shape::Rect3);
    }

    #[test]
    fn process_toml_rejects_bad_step_count() {
        let result: Result<ProcessConfig, _> = toml::from_str(
            r#"
            source_dir = "data/rect1"
            number_of_steps = 5
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_period_fails_validation() {
        let mut config = ProcessConfig::new("data/rect1");
        config.resample_period_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPeriod(0))
        ));
    }

    #[test]
    fn shape_from_directory_name() {
        let config = ProcessConfig::new("/datasets/push/rect2");
        assert_eq!(config.resolve_shape().unwrap(), Shape::Rect2);

        let unknown = ProcessConfig::new("/datasets/push/ellip2");
        assert_eq!(
            unknown.resolve_shape(),
            Err(GeometryError::UnknownShape("ellip2".into()))
        );
    }

    #[test]
    fn contact_threshold_validation() {
        let mut config = ContactConfig::new("states");
        assert!((config.threshold - 0.05).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());

        config.threshold = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
        config.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_source_dir_is_fatal() {
        let err = prepare_directories(
            Path::new("/definitely/not/here"),
            Path::new("/tmp/unused"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSourceDirectory(_)));
    }
}
