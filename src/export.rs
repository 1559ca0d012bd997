//! CSV serialization of a [`Dataset`]: header row, no index column, missing
//! values written as empty fields.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::table::Dataset;
use crate::{CollectorError, Result};

/// Write the dataset as CSV to any writer
pub fn write_csv<W: io::Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        csv_writer.write_record(row.iter().map(ToString::to_string))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render the dataset as a CSV string
pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(dataset, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| CollectorError::general(format!("CSV output is not valid UTF-8: {e}")))
}

/// Save the dataset to `path`, creating parent directories as needed
pub fn save_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_csv(dataset, io::BufWriter::new(file))?;
    info!(rows = dataset.len(), path = %path.display(), "Saved dataset");
    Ok(())
}
