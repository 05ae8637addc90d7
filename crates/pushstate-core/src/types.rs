use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GeometryError};
use crate::time::Timestamp;

// ---------------------------------------------------------------------------
// Pose2 / Wrench
// ---------------------------------------------------------------------------

/// Planar pose: position in metres, orientation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose2 {
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.theta]
    }

    pub const fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Planar force/torque reading (N, N, Nm).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wrench {
    pub fx: f64,
    pub fy: f64,
    pub torque: f64,
}

impl Wrench {
    pub const fn new(fx: f64, fy: f64, torque: f64) -> Self {
        Self { fx, fy, torque }
    }

    pub const fn to_array(self) -> [f64; 3] {
        [self.fx, self.fy, self.torque]
    }

    pub const fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

// ---------------------------------------------------------------------------
// SensorStream
// ---------------------------------------------------------------------------

/// Which of the three recorded streams a [`SensorStream`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    ObjectPose,
    TipPose,
    FtWrench,
}

impl StreamKind {
    /// Key of this stream inside a raw record.
    pub const fn key(self) -> &'static str {
        match self {
            Self::ObjectPose => "object_pose",
            Self::TipPose => "tip_pose",
            Self::FtWrench => "ft_wrench",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One timestamped three-component reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: Timestamp,
    pub values: [f64; 3],
}

impl Sample {
    pub const fn new(time: Timestamp, values: [f64; 3]) -> Self {
        Self { time, values }
    }
}

/// Ordered samples of one sensor, as recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorStream {
    pub kind: StreamKind,
    pub samples: Vec<Sample>,
}

impl SensorStream {
    pub const fn new(kind: StreamKind, samples: Vec<Sample>) -> Self {
        Self { kind, samples }
    }

    /// Build a stream from raw `[time_s, a, b, c]` rows.
    pub fn from_rows(kind: StreamKind, rows: &[[f64; 4]]) -> Self {
        let samples = rows
            .iter()
            .map(|r| Sample::new(Timestamp::from_secs(r[0]), [r[1], r[2], r[3]]))
            .collect();
        Self { kind, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether timestamps strictly increase.
    pub fn is_strictly_increasing(&self) -> bool {
        self.samples.windows(2).all(|w| w[0].time < w[1].time)
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// The fixed catalogue of rectangular objects pushed in the recordings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rect1,
    Rect2,
    Rect3,
}

impl Shape {
    pub const ALL: [Self; 3] = [Self::Rect1, Self::Rect2, Self::Rect3];

    /// Half-width `a` and half-height `b` in metres.
    pub const fn half_extents(self) -> (f64, f64) {
        match self {
            Self::Rect1 => (0.045, 0.045),
            Self::Rect2 => (0.045, 0.0563),
            Self::Rect3 => (0.0675, 0.045),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Rect1 => "rect1",
            Self::Rect2 => "rect2",
            Self::Rect3 => "rect3",
        }
    }
}

impl FromStr for Shape {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| GeometryError::UnknownShape(s.to_string()))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// StepCount
// ---------------------------------------------------------------------------

/// Number of consecutive states per example. Always 2, 3 or 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct StepCount(usize);

impl StepCount {
    pub const MIN: usize = 2;
    pub const MAX: usize = 4;

    pub fn new(n: usize) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(ConfigError::InvalidStepCount(n))
        }
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for StepCount {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<usize> for StepCount {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<StepCount> for usize {
    fn from(n: StepCount) -> Self {
        n.0
    }
}

impl fmt::Display for StepCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TrajectoryMeta
// ---------------------------------------------------------------------------

/// Per-trajectory parameters attached to every state of that trajectory.
///
/// Velocity and acceleration come from the recording's file name; the index
/// is assigned by the processor in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryMeta {
    /// Trajectory index within one output dataset (0-based).
    pub index: usize,
    /// End-effector velocity (mm/s).
    pub velocity: f64,
    /// End-effector acceleration.
    pub acceleration: f64,
    /// Push angle in degrees.
    pub push_angle_deg: f64,
    /// Side of the object that was pushed.
    pub push_side: i64,
    /// Relative contact point along the pushed side.
    pub push_point: f64,
}

impl TrajectoryMeta {
    #[must_use]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Scalar tags appended to tagged state rows: velocity, acceleration, index.
    #[allow(clippy::cast_precision_loss)]
    pub const fn tags(&self) -> [f64; 3] {
        [self.velocity, self.acceleration, self.index as f64]
    }
}

// ---------------------------------------------------------------------------
// StateVector
// ---------------------------------------------------------------------------

/// One timestep's feature row. Width depends on the layout that built it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateVector(pub Vec<f64>);

impl StateVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for StateVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
