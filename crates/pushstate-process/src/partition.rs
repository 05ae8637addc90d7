//! Output file fan-out by step offset, velocity and acceleration.
//!
//! When trajectories are not mixed by velocity (or acceleration), every value
//! of the recording catalogue gets its own set of part files. The
//! [`MixingMode`] table decides which axes split the output; the
//! [`OutputPartitioner`] turns that into file names and creates every file
//! with its header before any data is written.

use std::path::{Path, PathBuf};

use pushstate_core::error::DataError;
use pushstate_core::format::{format_float, format_param};
use pushstate_core::schema;
use pushstate_core::types::{Shape, StateVector, StepCount, TrajectoryMeta};

use crate::io::{append_records, create_with_header};
use crate::window::{ExampleRow, ExampleSink};

/// End-effector velocities present in the recordings.
pub const POSSIBLE_VELS: [f64; 10] = [
    10.0, 20.0, 50.0, 75.0, 100.0, 150.0, 200.0, 300.0, 400.0, 500.0,
];

/// End-effector accelerations present in the recordings.
pub const POSSIBLE_ACCS: [f64; 9] = [0.0, 0.1, 0.2, 0.5, 0.75, 1.0, 1.5, 2.0, 2.5];

const CATALOGUE_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// MixingMode
// ---------------------------------------------------------------------------

/// Which parameters split the output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixingMode {
    /// One file per part.
    Mixed,
    /// One file per part and velocity.
    ByVelocity,
    /// One file per part and acceleration.
    ByAcceleration,
    /// One file per part, acceleration and velocity.
    ByBoth,
}

impl MixingMode {
    pub const fn from_flags(mixed_vel: bool, mixed_acc: bool) -> Self {
        match (mixed_vel, mixed_acc) {
            (true, true) => Self::Mixed,
            (false, true) => Self::ByVelocity,
            (true, false) => Self::ByAcceleration,
            (false, false) => Self::ByBoth,
        }
    }

    pub const fn splits_velocity(self) -> bool {
        matches!(self, Self::ByVelocity | Self::ByBoth)
    }

    pub const fn splits_acceleration(self) -> bool {
        matches!(self, Self::ByAcceleration | Self::ByBoth)
    }

    fn velocity_values(self) -> Vec<Option<f64>> {
        if self.splits_velocity() {
            POSSIBLE_VELS.iter().copied().map(Some).collect()
        } else {
            vec![None]
        }
    }

    fn acceleration_values(self) -> Vec<Option<f64>> {
        if self.splits_acceleration() {
            POSSIBLE_ACCS.iter().copied().map(Some).collect()
        } else {
            vec![None]
        }
    }
}

// ---------------------------------------------------------------------------
// PartitionKey
// ---------------------------------------------------------------------------

/// Identifies one output file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionKey {
    /// 1-based step offset within an example.
    pub part: usize,
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
}

/// `<base>_<shape>_<part>_of_<n>[_vel=<v>][_acc=<a>].csv`
pub fn file_name(base: &str, shape: Shape, steps: StepCount, key: &PartitionKey) -> String {
    let mut name = format!("{base}_{shape}_{}_of_{steps}", key.part);
    if let Some(v) = key.velocity {
        name.push_str(&format!("_vel={}", format_param(v)));
    }
    if let Some(a) = key.acceleration {
        name.push_str(&format!("_acc={}", format_param(a)));
    }
    name.push_str(".csv");
    name
}

fn catalogue_value(catalogue: &[f64], v: f64) -> Option<f64> {
    catalogue
        .iter()
        .copied()
        .find(|c| (c - v).abs() < CATALOGUE_TOLERANCE)
}

// ---------------------------------------------------------------------------
// OutputPartitioner
// ---------------------------------------------------------------------------

/// Names and initialises the example files of one run.
#[derive(Debug, Clone)]
pub struct OutputPartitioner {
    out_dir: PathBuf,
    base_filename: String,
    shape: Shape,
    steps: StepCount,
    mode: MixingMode,
}

impl OutputPartitioner {
    pub fn new(
        out_dir: impl Into<PathBuf>,
        base_filename: impl Into<String>,
        shape: Shape,
        steps: StepCount,
        mode: MixingMode,
    ) -> Self {
        Self {
            out_dir: out_dir.into(),
            base_filename: base_filename.into(),
            shape,
            steps,
            mode,
        }
    }

    pub const fn mode(&self) -> MixingMode {
        self.mode
    }

    pub const fn steps(&self) -> StepCount {
        self.steps
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Every key a run may write to: parts outermost, then accelerations,
    /// then velocities.
    pub fn keys(&self) -> Vec<PartitionKey> {
        let vels = self.mode.velocity_values();
        let accs = self.mode.acceleration_values();
        let mut keys = Vec::with_capacity(self.steps.get() * vels.len() * accs.len());
        for part in 1..=self.steps.get() {
            for &acceleration in &accs {
                for &velocity in &vels {
                    keys.push(PartitionKey {
                        part,
                        velocity,
                        acceleration,
                    });
                }
            }
        }
        keys
    }

    pub fn path_for(&self, key: &PartitionKey) -> PathBuf {
        self.out_dir
            .join(file_name(&self.base_filename, self.shape, self.steps, key))
    }

    /// Create every output file with its header row and no data.
    pub fn setup(&self) -> Result<Vec<PathBuf>, DataError> {
        let header = schema::example_header();
        self.keys()
            .iter()
            .map(|key| {
                let path = self.path_for(key);
                create_with_header(&path, &header)?;
                Ok(path)
            })
            .collect()
    }

    /// Key of `part` for a trajectory. Fails when a split axis has no
    /// catalogue entry for the trajectory's value.
    pub fn key_for(&self, part: usize, meta: &TrajectoryMeta) -> Result<PartitionKey, DataError> {
        let unknown = || DataError::UnknownPartition {
            velocity: meta.velocity,
            acceleration: meta.acceleration,
        };
        let velocity = if self.mode.splits_velocity() {
            Some(catalogue_value(&POSSIBLE_VELS, meta.velocity).ok_or_else(unknown)?)
        } else {
            None
        };
        let acceleration = if self.mode.splits_acceleration() {
            Some(catalogue_value(&POSSIBLE_ACCS, meta.acceleration).ok_or_else(unknown)?)
        } else {
            None
        };
        Ok(PartitionKey {
            part,
            velocity,
            acceleration,
        })
    }

    /// Sink appending the examples of one trajectory to its files.
    pub fn sink<'a>(&'a self, meta: &'a TrajectoryMeta) -> CsvPartitionSink<'a> {
        CsvPartitionSink {
            partitioner: self,
            meta,
        }
    }
}

// ---------------------------------------------------------------------------
// CsvPartitionSink
// ---------------------------------------------------------------------------

/// [`ExampleSink`] writing to the partitioned CSV files.
pub struct CsvPartitionSink<'a> {
    partitioner: &'a OutputPartitioner,
    meta: &'a TrajectoryMeta,
}

impl ExampleSink for CsvPartitionSink<'_> {
    fn append_stream(&mut self, part: usize, rows: &[ExampleRow<'_>]) -> Result<(), DataError> {
        let key = self.partitioner.key_for(part, self.meta)?;
        let path = self.partitioner.path_for(&key);
        append_records(&path, rows.iter().map(|r| example_record(r.id, r.state)))?;
        Ok(())
    }
}

fn example_record(id: u64, state: &StateVector) -> Vec<String> {
    let mut record = Vec::with_capacity(state.len() + 1);
    record.push(id.to_string());
    record.extend(state.as_slice().iter().map(|&v| format_float(v)));
    record
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
