//! Tagged state files consumed by contact flagging.

use std::path::{Path, PathBuf};

use pushstate_core::error::DataError;
use pushstate_core::format::format_float;
use pushstate_core::schema;
use pushstate_core::types::StateVector;

use crate::io::{append_records, create_with_header};

/// Appends tagged state rows to one CSV, numbering them with a running id.
#[derive(Debug)]
pub struct StateFileWriter {
    path: PathBuf,
    next_id: u64,
}

impl StateFileWriter {
    /// Create (or truncate) the file and write its header.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        create_with_header(&path, &schema::state_header())?;
        Ok(Self { path, next_id: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Append `states`, returning how many rows were written.
    pub fn append(&mut self, states: &[StateVector]) -> Result<usize, DataError> {
        let first = self.next_id;
        let written = append_records(
            &self.path,
            states.iter().zip(first..).map(|(state, id)| {
                std::iter::once(id.to_string())
                    .chain(state.as_slice().iter().map(|&v| format_float(v)))
                    .collect::<Vec<_>>()
            }),
        )?;
        self.next_id += written as u64;
        Ok(written)
    }
}
