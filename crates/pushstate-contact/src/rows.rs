//! Reading state files: row classification and trajectory extraction.
//!
//! A state file is a header followed by data rows whose trailing field is
//! the trajectory index. Trajectories are contiguous blocks in ascending
//! index order, so the file's largest index sits on its last row. Files that
//! were already flagged carry an `in_contact` column before the index.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use pushstate_core::error::DataError;
use pushstate_core::format::{parse_flag, parse_index};

// ---------------------------------------------------------------------------
// Row classification
// ---------------------------------------------------------------------------

/// What a CSV record holds.
#[derive(Debug, Clone, PartialEq)]
pub enum RowClass {
    /// No field is numeric.
    Header,
    /// Every field is numeric. Contact flags read as `1.0` / `0.0`.
    Data(Vec<f64>),
    /// A mix of numeric and non-numeric fields, or an empty record.
    Malformed,
}

/// Classify a record as header, data or malformed.
pub fn classify_row(record: &StringRecord) -> RowClass {
    if record.is_empty() {
        return RowClass::Malformed;
    }
    let parsed: Vec<Option<f64>> = record
        .iter()
        .map(|f| {
            f.trim()
                .parse()
                .ok()
                .or_else(|| parse_flag(f).map(f64::from))
        })
        .collect();
    if parsed.iter().all(Option::is_some) {
        RowClass::Data(parsed.into_iter().flatten().collect())
    } else if parsed.iter().all(Option::is_none) {
        RowClass::Header
    } else {
        RowClass::Malformed
    }
}

/// Trajectory index held in a record's trailing field.
pub fn trailing_index(record: &StringRecord) -> Option<i64> {
    record.iter().last().and_then(parse_index)
}

// ---------------------------------------------------------------------------
// StateTable
// ---------------------------------------------------------------------------

/// One numeric row of a state file.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRow {
    /// Position of the row among all records of the file (0-based).
    pub record: usize,
    pub values: Vec<f64>,
    pub trajectory: i64,
}

impl StateRow {
    /// Row id from the leading column.
    #[allow(clippy::cast_possible_truncation)]
    pub fn id(&self) -> i64 {
        self.values.first().map_or(-1, |v| v.trunc() as i64)
    }
}

/// Every record of a state file plus its parsed data rows.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    pub records: Vec<StringRecord>,
    pub rows: Vec<StateRow>,
    /// Records classified as malformed, by position.
    pub malformed: Vec<usize>,
}

impl StateTable {
    pub fn read(path: &Path) -> Result<Self, DataError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut table = Self::default();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            match classify_row(&record) {
                RowClass::Data(values) => {
                    if let Some(trajectory) = trailing_index(&record) {
                        table.rows.push(StateRow {
                            record: i,
                            values,
                            trajectory,
                        });
                    } else {
                        table.malformed.push(i);
                    }
                }
                RowClass::Header => {}
                RowClass::Malformed => table.malformed.push(i),
            }
            table.records.push(record);
        }
        Ok(table)
    }

    /// Largest trajectory index, read from the last record's trailing field.
    /// `-1` when that field is not a number (or the file is empty).
    pub fn max_traj_index(&self) -> i64 {
        self.records.last().and_then(trailing_index).unwrap_or(-1)
    }

    /// Rows of trajectory `index` in file order.
    pub fn trajectory(&self, index: i64) -> impl Iterator<Item = &StateRow> + '_ {
        self.rows.iter().filter(move |r| r.trajectory == index)
    }
}

/// Largest trajectory index of a state file; `-1` when the last row's
/// trailing field does not parse.
pub fn extract_max_traj_index(path: &Path) -> Result<i64, DataError> {
    Ok(StateTable::read(path)?.max_traj_index())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn classify_header_data_malformed() {
        assert_eq!(classify_row(&record(&["id", "x", "trajectory"])), RowClass::Header);
        assert_eq!(
            classify_row(&record(&["0", "1.5", "2.0"])),
            RowClass::Data(vec![0.0, 1.5, 2.0])
        );
        assert_eq!(classify_row(&record(&["0", "abc", "2.0"])), RowClass::Malformed);
        assert_eq!(classify_row(&StringRecord::new()), RowClass::Malformed);
    }

    #[test]
    fn contact_flags_count_as_numeric() {
        assert_eq!(
            classify_row(&record(&["4", "0.5", "True", "1.0"])),
            RowClass::Data(vec![4.0, 0.5, 1.0, 1.0])
        );
        assert_eq!(
            classify_row(&record(&["4", "0.5", "False", "1.0"])),
            RowClass::Data(vec![4.0, 0.5, 0.0, 1.0])
        );
        assert_eq!(
            classify_row(&record(&["id", "x", "in_contact", "trajectory"])),
            RowClass::Header
        );
    }

    #[test]
    fn max_index_from_last_row() {
        let text = "id,x,trajectory\n0,1.0,0.0\n1,1.0,1.0\n2,1.0,3.0\n";
        let table = StateTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(table.max_traj_index(), 3);
    }

    #[test]
    fn max_index_unparsable_is_minus_one() {
        let text = "id,x,trajectory\n0,1.0,0.0\n1,1.0,oops\n";
        let table = StateTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(table.max_traj_index(), -1);
        assert_eq!(table.malformed, vec![2]);

        let header_only = StateTable::from_reader("id,x,trajectory\n".as_bytes()).unwrap();
        assert_eq!(header_only.max_traj_index(), -1);
        let empty = StateTable::from_reader("".as_bytes()).unwrap();
        assert_eq!(empty.max_traj_index(), -1);
    }

    #[test]
    fn trajectory_preserves_file_order() {
        let text = "id,x,trajectory\n0,1.0,0.0\n1,2.0,0.0\n2,3.0,1.0\n3,4.0,1.0\n4,5.0,1.0\n";
        let table = StateTable::from_reader(text.as_bytes()).unwrap();
        let ids: Vec<i64> = table.trajectory(1).map(StateRow::id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(table.trajectory(5).count(), 0);
        assert_eq!(table.records.len(), 6);
    }

    #[test]
    fn extract_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.csv");
        std::fs::write(&path, "id,trajectory\n0,0.0\n1,3.0\n").unwrap();
        assert_eq!(extract_max_traj_index(&path).unwrap(), 3);
    }
}
