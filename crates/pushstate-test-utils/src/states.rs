//! Synthetic state-file rows for contact-flagging tests.

use std::path::{Path, PathBuf};

use pushstate_core::format::format_float;
use pushstate_core::geometry::corners_for_pose;
use pushstate_core::schema;
use pushstate_core::types::{Pose2, Shape};

/// Builds one unflagged state row (`schema::STATE_WIDTH` fields).
#[derive(Debug, Clone)]
pub struct StateRowBuilder {
    id: u64,
    shape: Shape,
    object: Pose2,
    tip: Pose2,
    trajectory: usize,
}

impl StateRowBuilder {
    pub fn new(id: u64, trajectory: usize) -> Self {
        Self {
            id,
            shape: Shape::Rect1,
            object: Pose2::default(),
            tip: Pose2::default(),
            trajectory,
        }
    }

    #[must_use]
    pub fn object(mut self, x: f64, y: f64, theta: f64) -> Self {
        self.object = Pose2::new(x, y, theta);
        self
    }

    #[must_use]
    pub fn tip(mut self, x: f64, y: f64) -> Self {
        self.tip = Pose2::new(x, y, 0.0);
        self
    }

    #[must_use]
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Row as CSV fields.
    #[allow(clippy::cast_precision_loss)]
    pub fn fields(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(schema::STATE_WIDTH);
        values.push(self.id as f64);
        values.extend(corners_for_pose(self.shape, self.object).flatten());
        values.extend([self.object.x, self.object.y]);
        values.extend(self.object.to_array());
        values.extend(self.tip.to_array());
        values.extend([0.1, -0.2, 0.0]);
        values.extend([20.0, 0.5]);
        values.push(self.trajectory as f64);
        let mut fields: Vec<String> = values.into_iter().map(format_float).collect();
        fields[0] = self.id.to_string();
        fields
    }
}

/// Write a state CSV with a header and the given rows.
pub fn write_state_csv(dir: &Path, name: &str, rows: &[StateRowBuilder]) -> PathBuf {
    let path = dir.join(name);
    let mut text = schema::state_header().join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.fields().join(","));
        text.push('\n');
    }
    std::fs::write(&path, text).expect("write state csv");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_has_state_width() {
        let fields = StateRowBuilder::new(3, 1).tip(0.1, 0.0).fields();
        assert_eq!(fields.len(), schema::STATE_WIDTH);
        assert_eq!(fields[0], "3");
        assert_eq!(fields[schema::STATE_WIDTH - 1], "1.0");
        assert_eq!(fields[schema::TIP_POSE], "0.1");
    }
}
