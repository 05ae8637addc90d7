//! Per-timestep state vectors.

use pushstate_core::geometry::corners_for_pose;
use pushstate_core::types::{Pose2, Shape, StateVector, TrajectoryMeta, Wrench};

use crate::align::AlignedFrame;

// ---------------------------------------------------------------------------
// StateLayout
// ---------------------------------------------------------------------------

/// Column layout of the assembled state vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateLayout {
    /// Six planar nodes: four corners, object centre, tip position (12 floats).
    Nodes,
    /// Corners and centre, object pose, tip pose, force-torque, then the
    /// trajectory's velocity, acceleration and index (22 floats).
    Tagged,
}

impl StateLayout {
    pub const fn width(self) -> usize {
        match self {
            Self::Nodes => 12,
            Self::Tagged => 22,
        }
    }
}

/// Corner and centre coordinates: `t_r, t_l, b_r, b_l, centre`.
pub fn object_nodes(shape: Shape, object: Pose2) -> [f64; 10] {
    let mut out = [0.0; 10];
    out[..8].copy_from_slice(&corners_for_pose(shape, object).flatten());
    out[8] = object.x;
    out[9] = object.y;
    out
}

// ---------------------------------------------------------------------------
// StateAssembler
// ---------------------------------------------------------------------------

/// Builds state vectors for one object shape in a fixed layout.
#[derive(Debug, Clone, Copy)]
pub struct StateAssembler {
    shape: Shape,
    layout: StateLayout,
}

impl StateAssembler {
    pub const fn new(shape: Shape, layout: StateLayout) -> Self {
        Self { shape, layout }
    }

    pub const fn layout(&self) -> StateLayout {
        self.layout
    }

    /// State vector of one timestep.
    pub fn state(
        &self,
        object: Pose2,
        tip: Pose2,
        wrench: Wrench,
        meta: &TrajectoryMeta,
    ) -> StateVector {
        let mut row = Vec::with_capacity(self.layout.width());
        row.extend(object_nodes(self.shape, object));
        match self.layout {
            StateLayout::Nodes => {
                row.extend([tip.x, tip.y]);
            }
            StateLayout::Tagged => {
                row.extend(object.to_array());
                row.extend(tip.to_array());
                row.extend(wrench.to_array());
                row.extend(meta.tags());
            }
        }
        StateVector(row)
    }

    /// States of every timestep of one aligned trajectory.
    pub fn assemble(&self, frame: &AlignedFrame, meta: &TrajectoryMeta) -> Vec<StateVector> {
        frame
            .object
            .iter()
            .zip(&frame.tip)
            .zip(&frame.wrench)
            .map(|((&o, &t), &w)| self.state(o, t, w, meta))
            .collect()
    }

    /// States of several trajectory segments sharing one meta record.
    pub fn assemble_batch(
        &self,
        frames: &[AlignedFrame],
        meta: &TrajectoryMeta,
    ) -> Vec<Vec<StateVector>> {
        frames.iter().map(|f| self.assemble(f, meta)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
