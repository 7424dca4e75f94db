//! Whole-file TSV tables with schema checks and atomic writes.
//!
//! Every stage of the pipeline reads a tab-separated table fully into memory
//! (the files are small), validates the header, transforms rows and writes a
//! new table. Fields are carried verbatim: no quoting is applied on either
//! side, so retained rows are byte-identical to the input.
//!
//! Output goes to a `<path>.tmp` sibling first and is renamed into place on
//! success, so a failed run never leaves a truncated output file behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// Fatal header problems, raised before any row processing.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{path}: missing required column(s): {missing:?}; found: {found:?}")]
    MissingColumns {
        path: String,
        missing: Vec<String>,
        found: Vec<String>,
    },
    #[error("{path}: empty file (no header row)")]
    EmptyFile { path: String },
}

/// An in-memory tab-separated table: one header row plus data rows.
#[derive(Debug, Clone)]
pub struct TsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TsvTable {
    /// Read a whole TSV file. Rows with a field count differing from the
    /// header are still returned; callers decide whether that is a row-level
    /// failure. A file without a header row is a [`SchemaError::EmptyFile`].
    pub fn read(path: &Path) -> Result<TsvTable> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;

        let mut header: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec.with_context(|| format!("reading {}", path.display()))?;
            let fields: Vec<String> = rec.iter().map(|f| f.to_string()).collect();
            if header.is_none() {
                header = Some(fields);
            } else {
                rows.push(fields);
            }
        }

        let header = header.ok_or_else(|| SchemaError::EmptyFile {
            path: path.display().to_string(),
        })?;
        Ok(TsvTable { header, rows })
    }

    /// Number of header fields; data rows are expected to match.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Position of a named column, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Verify that every column in `required` is present, reporting all
    /// missing names at once.
    pub fn require_columns(&self, path: &Path, required: &[&str]) -> Result<(), SchemaError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|c| self.index_of(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns {
                path: path.display().to_string(),
                missing,
                found: self.header.clone(),
            })
        }
    }

    /// Write the table to `path` via a temporary sibling file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let tmp = tmp_path(path);
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_path(&tmp)
            .with_context(|| format!("creating {}", tmp.display()))?;
        wtr.write_record(&self.header)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        drop(wtr);
        std::fs::rename(&tmp, path)
            .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".tmp");
    path.with_file_name(name)
}
