use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the dataset pipelines.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Configuration errors. All of these abort a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Source directory does not exist: {}", .0.display())]
    MissingSourceDirectory(PathBuf),

    #[error("number_of_steps has to be 2, 3 or 4, got {0}")]
    InvalidStepCount(usize),

    #[error("Invalid contact threshold: {0} (must be finite and >= 0)")]
    InvalidThreshold(f64),

    #[error("Invalid resample period: {0} ms (must be > 0)")]
    InvalidPeriod(u64),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Geometric errors raised by the corner and distance computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Unknown shape '{0}', supported shapes are rect1, rect2, rect3")]
    UnknownShape(String),

    #[error("Expected an (N, 2) point set, got {len} coordinates")]
    InvalidPointSet { len: usize },

    #[error("Degenerate edge: selected corners coincide at ({x}, {y})")]
    DegenerateEdge { x: f64, y: f64 },
}

/// Errors raised while reading, parsing or writing dataset files.
///
/// These are file-level: the pipelines log them and move on to the next file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file extension: {} (expected one of {expected})", .path.display())]
    UnsupportedFileExtension { path: PathBuf, expected: &'static str },

    #[error("No {format} reader is available for {}", .path.display())]
    ReaderUnavailable { path: PathBuf, format: &'static str },

    #[error("Malformed row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Malformed file name '{name}': cannot read field '{field}'")]
    MalformedFileName { name: String, field: &'static str },

    #[error("Unusable timestamps: {reason}")]
    InvalidTimestamps { reason: String },

    #[error("No output partition for velocity {velocity} / acceleration {acceleration}")]
    UnknownPartition { velocity: f64, acceleration: f64 },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_from_config_error() {
        let err = ConfigError::InvalidStepCount(5);
        let pipeline_err: PipelineError = err.into();
        assert!(matches!(pipeline_err, PipelineError::Config(_)));
        assert!(pipeline_err.to_string().contains('5'));
    }

    #[test]
    fn pipeline_error_from_geometry_error() {
        let err = GeometryError::UnknownShape("ellip1".into());
        let pipeline_err: PipelineError = err.into();
        assert!(matches!(pipeline_err, PipelineError::Geometry(_)));
        assert!(pipeline_err.to_string().contains("ellip1"));
    }

    #[test]
    fn data_error_wraps_geometry_error() {
        let err: DataError = GeometryError::DegenerateEdge { x: 1.0, y: 2.0 }.into();
        assert!(matches!(err, DataError::Geometry(_)));
        assert!(err.to_string().contains("coincide"));
    }

    #[test]
    fn missing_source_directory_names_path() {
        let err = ConfigError::MissingSourceDirectory(PathBuf::from("/nowhere/rect1"));
        assert!(err.to_string().contains("/nowhere/rect1"));
    }

    #[test]
    fn malformed_file_name_display() {
        let err = DataError::MalformedFileName {
            name: "foo.json".into(),
            field: "_v=",
        };
        let msg = err.to_string();
        assert!(msg.contains("foo.json"));
        assert!(msg.contains("_v="));
    }
}
