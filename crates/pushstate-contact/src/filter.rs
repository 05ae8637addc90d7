//! Contact flagging of state files.
//!
//! Each state file is processed trajectory by trajectory: every row gets a
//! contact flag from its tip-to-edge distance, then the file is rewritten to
//! the output directory with `in_contact` inserted before `trajectory`.
//! Rows that already carry a flag have it recomputed in place.

use std::path::{Path, PathBuf};

use nalgebra::Point2;
use pushstate_core::config::{ContactConfig, prepare_directories};
use pushstate_core::error::{ConfigError, DataError, GeometryError, PipelineError};
use pushstate_core::format::{format_flag, parse_index};
use pushstate_core::schema;
use tracing::{debug, error, info, warn};

use crate::distance::{row_tip, tip_edge_distance};
use crate::rows::{RowClass, StateRow, StateTable, classify_row};

// ---------------------------------------------------------------------------
// FileReport
// ---------------------------------------------------------------------------

/// Outcome of flagging one state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Data rows written to the output (header excluded).
    pub rows_written: usize,
    pub contact_rows: usize,
    /// Rows whose nearest corners coincided.
    pub degenerate_rows: usize,
    /// Id of the row at which the rewrite stopped, if it stopped early.
    pub truncated_at: Option<i64>,
}

/// Flag computed for one state row.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RowFlag {
    id: i64,
    distance: f64,
    in_contact: bool,
    degenerate: bool,
}

// ---------------------------------------------------------------------------
// ContactFilter
// ---------------------------------------------------------------------------

/// Flags every state file of a source directory.
#[derive(Debug, Clone)]
pub struct ContactFilter {
    config: ContactConfig,
}

impl ContactFilter {
    /// Validate the configuration and prepare directories.
    ///
    /// The output directory must differ from the source directory so that
    /// no state file is overwritten by its flagged copy.
    pub fn new(config: ContactConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        prepare_directories(&config.source_dir, &config.out_dir)?;
        let source = std::fs::canonicalize(&config.source_dir).map_err(ConfigError::from)?;
        let out = std::fs::canonicalize(&config.out_dir).map_err(ConfigError::from)?;
        if source == out {
            return Err(ConfigError::InvalidValue {
                field: "out_dir".into(),
                message: format!(
                    "{} is the source directory, flagged files would replace their sources",
                    config.out_dir.display()
                ),
            }
            .into());
        }
        Ok(Self { config })
    }

    pub const fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Path the flagged copy of `source` is written to.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        let name = source.file_name().unwrap_or(source.as_os_str());
        self.config.out_dir.join(name)
    }

    /// Flag every file of the source directory, in name order.
    ///
    /// Files that are not CSV or fail to parse are logged and skipped.
    pub fn run(&self) -> Result<Vec<FileReport>, PipelineError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.config.source_dir).map_err(DataError::from)? {
            let path = entry.map_err(DataError::from)?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut reports = Vec::with_capacity(files.len());
        for path in files {
            match self.flag_file(&path) {
                Ok(report) => {
                    info!(
                        file = %path.display(),
                        rows = report.rows_written,
                        contact = report.contact_rows,
                        "flagged state file"
                    );
                    reports.push(report);
                }
                Err(e) => error!(file = %path.display(), "skipping state file: {e}"),
            }
        }
        Ok(reports)
    }

    /// Flag one state file and write its flagged copy.
    pub fn flag_file(&self, path: &Path) -> Result<FileReport, DataError> {
        let is_csv = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(DataError::UnsupportedFileExtension {
                path: path.to_path_buf(),
                expected: ".csv",
            });
        }

        let table = StateTable::read(path)?;
        let max_index = table.max_traj_index();
        if max_index < 0 {
            warn!(file = %path.display(), "no trajectory index on the last row");
        }
        if !table.malformed.is_empty() {
            warn!(
                file = %path.display(),
                rows = table.malformed.len(),
                "ignoring malformed rows"
            );
        }
        for &line in &table.malformed {
            debug!(file = %path.display(), line = line + 1, "ignoring malformed row");
        }

        let mut flags = Vec::with_capacity(table.rows.len());
        for index in 0..=max_index {
            for row in table.trajectory(index) {
                flags.push(self.flag_row(row)?);
            }
        }

        let mut report = FileReport {
            source: path.to_path_buf(),
            output: self.output_path(path),
            rows_written: 0,
            contact_rows: 0,
            degenerate_rows: 0,
            truncated_at: None,
        };
        Self::rewrite(&table, &flags, &mut report)?;
        Ok(report)
    }

    /// Distance and flag of one row. Coincident nearest corners fall back to
    /// the distance between the tip and that corner.
    fn flag_row(&self, row: &StateRow) -> Result<RowFlag, DataError> {
        let malformed = |e: GeometryError| DataError::MalformedRow {
            line: row.record + 1,
            reason: e.to_string(),
        };
        let (distance, degenerate) = match tip_edge_distance(&row.values) {
            Ok(d) => (d, false),
            Err(GeometryError::DegenerateEdge { x, y }) => {
                let tip = row_tip(&row.values).map_err(malformed)?;
                warn!(id = row.id(), x, y, "degenerate edge, using corner distance");
                ((Point2::new(x, y) - tip).norm(), true)
            }
            Err(e) => return Err(malformed(e)),
        };
        Ok(RowFlag {
            id: row.id(),
            distance,
            in_contact: distance <= self.config.threshold,
            degenerate,
        })
    }

    /// Write the flagged copy. Source rows are matched to flags by id in
    /// sequence; the first row without a matching flag ends the file. A row
    /// of flagged width has its existing flag replaced.
    fn rewrite(
        table: &StateTable,
        flags: &[RowFlag],
        report: &mut FileReport,
    ) -> Result<(), DataError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&report.output)?;
        writer.write_record(schema::flagged_header())?;

        let mut pending = flags.iter();
        for record in &table.records {
            if !matches!(classify_row(record), RowClass::Data(_)) {
                continue;
            }
            let Some(id) = record.get(schema::ID).and_then(parse_index) else {
                continue;
            };
            let Some(flag) = pending.next().filter(|f| f.id == id) else {
                warn!(
                    file = %report.source.display(),
                    id,
                    "no flag for row in sequence, truncating output"
                );
                report.truncated_at = Some(id);
                break;
            };

            let last = record.len() - 1;
            let kept = if record.len() == schema::FLAGGED_WIDTH {
                last - 1
            } else {
                last
            };
            let fields = record
                .iter()
                .take(kept)
                .chain(std::iter::once(format_flag(flag.in_contact)))
                .chain(record.iter().skip(last));
            writer.write_record(fields)?;

            report.rows_written += 1;
            report.contact_rows += usize::from(flag.in_contact);
            report.degenerate_rows += usize::from(flag.degenerate);
            debug!(id, distance = flag.distance, "flagged row");
        }
        writer.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
