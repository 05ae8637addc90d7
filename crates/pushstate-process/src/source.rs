//! Raw recording readers.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use pushstate_core::error::DataError;
use pushstate_core::types::{SensorStream, StreamKind};
use serde::{Deserialize, Serialize};

/// The three raw streams of one recording, as `[time_s, a, b, c]` rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub object_pose: Vec<[f64; 4]>,
    pub tip_pose: Vec<[f64; 4]>,
    pub ft_wrench: Vec<[f64; 4]>,
}

impl RawRecord {
    /// Object pose, tip pose and force-torque streams.
    pub fn streams(&self) -> (SensorStream, SensorStream, SensorStream) {
        (
            SensorStream::from_rows(StreamKind::ObjectPose, &self.object_pose),
            SensorStream::from_rows(StreamKind::TipPose, &self.tip_pose),
            SensorStream::from_rows(StreamKind::FtWrench, &self.ft_wrench),
        )
    }
}

/// Recording formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Hdf5,
}

impl SourceFormat {
    pub const EXPECTED: &'static str = ".h5 or .json";

    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("h5") => Ok(Self::Hdf5),
            _ => Err(DataError::UnsupportedFileExtension {
                path: path.to_path_buf(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Read a recording.
///
/// HDF5 recordings are recognised but no reader is linked into this build;
/// they fail with [`DataError::ReaderUnavailable`].
pub fn read_record(path: &Path) -> Result<RawRecord, DataError> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Json => {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_json::from_reader(reader)?)
        }
        SourceFormat::Hdf5 => Err(DataError::ReaderUnavailable {
            path: path.to_path_buf(),
            format: "HDF5",
        }),
    }
}
