//! CSV file helpers. Every append opens, writes and closes the file.

use std::fs::OpenOptions;
use std::path::Path;

use pushstate_core::error::DataError;

/// Create (or truncate) `path` and write only the header row.
pub fn create_with_header(path: &Path, header: &[&str]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header)?;
    writer.flush()?;
    Ok(())
}

/// Append records to `path`, creating it if needed.
pub fn append_records<I, R, T>(path: &Path, records: I) -> Result<usize, DataError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    let mut written = 0;
    for record in records {
        writer.write_record(record)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
