// pushstate-core: Types, geometry, config, time, errors for push-trajectory datasets.

pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod schema;
pub mod time;
pub mod types;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        config::{ContactConfig, ProcessConfig},
        error::{ConfigError, DataError, GeometryError, PipelineError},
        geometry::{CornerSet, corners, order_by_angle, rotate},
        time::{Period, Timestamp},
        types::{
            Pose2, Sample, SensorStream, Shape, StateVector, StepCount, StreamKind,
            TrajectoryMeta, Wrench,
        },
    };
}
