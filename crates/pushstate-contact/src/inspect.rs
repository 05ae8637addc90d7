//! Loading one trajectory of a flagged state file for inspection.

use std::path::Path;

use csv::StringRecord;
use nalgebra::Point2;
use pushstate_core::error::{DataError, GeometryError};
use pushstate_core::format::{parse_flag, parse_index};
use pushstate_core::geometry::order_flat_by_angle;
use pushstate_core::schema;
use pushstate_core::types::{Pose2, Wrench};

/// Column of the contact flag in a flagged row.
const IN_CONTACT: usize = schema::FLAGGED_WIDTH - 2;

/// Per-step data of one flagged trajectory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlaggedTrajectory {
    pub ids: Vec<i64>,
    /// Corner and centre coordinates of each step.
    pub nodes: Vec<[f64; 10]>,
    pub object: Vec<Pose2>,
    pub tip: Vec<Pose2>,
    pub wrench: Vec<Wrench>,
    pub contact: Vec<bool>,
}

impl FlaggedTrajectory {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Steps flagged as in contact.
    pub fn contact_count(&self) -> usize {
        self.contact.iter().filter(|&&c| c).count()
    }

    /// Object corners of `step`, ordered around their centroid.
    pub fn corner_polygon(&self, step: usize) -> Result<Vec<Point2<f64>>, GeometryError> {
        let nodes = self
            .nodes
            .get(step)
            .ok_or(GeometryError::InvalidPointSet { len: 0 })?;
        order_flat_by_angle(&nodes[..8])
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_row(&mut self, line: usize, record: &StringRecord) -> Result<(), DataError> {
        if record.len() != schema::FLAGGED_WIDTH {
            return Err(DataError::MalformedRow {
                line,
                reason: format!(
                    "expected {} fields, got {}",
                    schema::FLAGGED_WIDTH,
                    record.len()
                ),
            });
        }
        let mut values = [0.0_f64; schema::FLAGGED_WIDTH];
        for (i, field) in record.iter().enumerate() {
            if i == IN_CONTACT {
                continue;
            }
            values[i] = field.trim().parse().map_err(|_| DataError::MalformedRow {
                line,
                reason: format!("column {i} is not a number: '{field}'"),
            })?;
        }
        let contact = parse_flag(&record[IN_CONTACT]).ok_or_else(|| DataError::MalformedRow {
            line,
            reason: format!("unreadable contact flag '{}'", &record[IN_CONTACT]),
        })?;

        let triple = |at: usize| [values[at], values[at + 1], values[at + 2]];
        let mut nodes = [0.0; 10];
        nodes.copy_from_slice(&values[schema::NODES..schema::NODES + 10]);

        self.ids.push(values[schema::ID].trunc() as i64);
        self.nodes.push(nodes);
        self.object.push(Pose2::from_array(triple(schema::OBJECT_POSE)));
        self.tip.push(Pose2::from_array(triple(schema::TIP_POSE)));
        self.wrench.push(Wrench::from_array(triple(schema::FORCE_TORQUE)));
        self.contact.push(contact);
        Ok(())
    }
}

/// Read trajectory `index` of a flagged state file.
///
/// Rows are read until the trajectory's block ends. A missing trajectory
/// yields an empty result.
pub fn load_flagged_trajectory(path: &Path, index: i64) -> Result<FlaggedTrajectory, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut trajectory = FlaggedTrajectory::default();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let Some(row_index) = record.iter().last().and_then(parse_index) else {
            continue;
        };
        if row_index == index {
            trajectory.push_row(i + 1, &record)?;
        } else if !trajectory.is_empty() {
            break;
        }
    }
    Ok(trajectory)
}
