use crate::dataset::SalesDataset;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File names for the six flat exports, in dependency order.
pub const EXPORT_FILES: [&str; 6] = [
    "territories.csv",
    "sales_reps.csv",
    "products.csv",
    "accounts.csv",
    "opportunities.csv",
    "activities.csv",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {file}: {source}")]
    Write { file: String, source: csv::Error },
}

/// Serialize one table to CSV. The header row comes from the entity's
/// field names and the column order follows the struct definition.
pub fn write_csv<W: Write, S: Serialize>(writer: W, rows: &[S]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write all six tables under `dir` (created if missing). Returns the
/// paths written, in the same order as [`EXPORT_FILES`].
pub fn export_dataset(dataset: &SalesDataset, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(EXPORT_FILES.len());
    write_table(dir, EXPORT_FILES[0], &dataset.territories, &mut written)?;
    write_table(dir, EXPORT_FILES[1], &dataset.sales_reps, &mut written)?;
    write_table(dir, EXPORT_FILES[2], &dataset.products, &mut written)?;
    write_table(dir, EXPORT_FILES[3], &dataset.accounts, &mut written)?;
    write_table(dir, EXPORT_FILES[4], &dataset.opportunities, &mut written)?;
    write_table(dir, EXPORT_FILES[5], &dataset.activities, &mut written)?;
    Ok(written)
}

fn write_table<S: Serialize>(
    dir: &Path,
    file: &str,
    rows: &[S],
    written: &mut Vec<PathBuf>,
) -> Result<(), ExportError> {
    let path = dir.join(file);
    let mut csv_writer = csv::Writer::from_path(&path).map_err(|source| ExportError::Write {
        file: file.to_string(),
        source,
    })?;
    for row in rows {
        csv_writer.serialize(row).map_err(|source| ExportError::Write {
            file: file.to_string(),
            source,
        })?;
    }
    csv_writer
        .flush()
        .map_err(|source| ExportError::Write {
            file: file.to_string(),
            source: csv::Error::from(source),
        })?;
    written.push(path);
    Ok(())
}
