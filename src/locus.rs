//! Typed access to SSRMMD `.compare` rows.
//!
//! A [`LocusRecord`] is one locus as reported by the comparison of two
//! genomes: an integer key, the motif each genome reported, the repeat count
//! in each genome and the polymorphism marker. Parsing is strict where it
//! matters (integers must be integers) and lenient where the filter decides
//! (an empty or mismatched motif is a predicate failure, not a parse error).

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use thiserror::Error;

use crate::schema;
use crate::table::{SchemaError, TsvTable};

/// Row-level parse failures. These never abort a run; callers count them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("row has {got} fields, header has {want}")]
    FieldCount { want: usize, got: usize },
    #[error("non-integer locus number: {0:?}")]
    BadLocusNumber(String),
    #[error("non-integer repeat count: {0:?}")]
    BadRepeatCount(String),
}

/// Resolved column positions for the compare fields the pipeline reads.
#[derive(Debug, Clone, Copy)]
pub struct CompareColumns {
    pub number: usize,
    pub motif_a: usize,
    pub motif_b: usize,
    pub repeats_a: usize,
    pub repeats_b: usize,
    pub polymorphism: usize,
}

impl CompareColumns {
    pub fn resolve(table: &TsvTable, path: &Path) -> Result<CompareColumns, SchemaError> {
        table.require_columns(
            path,
            &[
                schema::compare::NUMBER,
                schema::compare::FASTA1_MOTIF,
                schema::compare::FASTA2_MOTIF,
                schema::compare::FASTA1_REPEAT_NUMBER,
                schema::compare::FASTA2_REPEAT_NUMBER,
                schema::compare::POLYMORPHISM,
            ],
        )?;
        let idx = |name| table.index_of(name).expect("validated header");
        Ok(CompareColumns {
            number: idx(schema::compare::NUMBER),
            motif_a: idx(schema::compare::FASTA1_MOTIF),
            motif_b: idx(schema::compare::FASTA2_MOTIF),
            repeats_a: idx(schema::compare::FASTA1_REPEAT_NUMBER),
            repeats_b: idx(schema::compare::FASTA2_REPEAT_NUMBER),
            polymorphism: idx(schema::compare::POLYMORPHISM),
        })
    }
}

/// One compare-table row in typed form. The raw row is kept by the caller for
/// verbatim passthrough; this struct only carries the fields predicates and
/// naming read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusRecord {
    pub number: u64,
    /// Motif from the first genome, trimmed and uppercased. May be empty.
    pub motif_a: String,
    /// Motif from the second genome, trimmed and uppercased. May be empty.
    pub motif_b: String,
    /// Repeat counts (first genome, second genome).
    pub repeats: (u64, u64),
    pub polymorphic: bool,
}

impl LocusRecord {
    /// Canonical motif for naming: the first genome's, falling back to the
    /// second when empty.
    pub fn motif(&self) -> &str {
        if self.motif_a.is_empty() {
            &self.motif_b
        } else {
            &self.motif_a
        }
    }
}

/// Parse one data row against resolved columns. `width` is the header width.
pub fn parse_locus(row: &[String], cols: &CompareColumns, width: usize) -> Result<LocusRecord, RowError> {
    if row.len() != width {
        return Err(RowError::FieldCount {
            want: width,
            got: row.len(),
        });
    }
    let number = parse_u64(&row[cols.number]).map_err(RowError::BadLocusNumber)?;
    let repeats_a = parse_u64(&row[cols.repeats_a]).map_err(RowError::BadRepeatCount)?;
    let repeats_b = parse_u64(&row[cols.repeats_b]).map_err(RowError::BadRepeatCount)?;
    Ok(LocusRecord {
        number,
        motif_a: row[cols.motif_a].trim().to_ascii_uppercase(),
        motif_b: row[cols.motif_b].trim().to_ascii_uppercase(),
        repeats: (repeats_a, repeats_b),
        polymorphic: row[cols.polymorphism].trim().eq_ignore_ascii_case("yes"),
    })
}

fn parse_u64(field: &str) -> Result<u64, String> {
    field.trim().parse::<u64>().map_err(|_| field.to_string())
}

/// Per-locus metadata the Name Assigner joins against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusInfo {
    pub motif: String,
    pub repeats: (u64, u64),
}

/// Load a compare table into a locus number -> [`LocusInfo`] map.
///
/// Rows that fail to parse are skipped; the skip count is returned alongside
/// the map. A compare file yielding no usable rows at all is a fatal error.
pub fn load_compare_map(path: &Path) -> Result<(HashMap<u64, LocusInfo>, usize)> {
    let table = TsvTable::read(path)?;
    let cols = CompareColumns::resolve(&table, path)?;
    let width = table.width();

    let mut map = HashMap::new();
    let mut skipped = 0usize;
    for row in &table.rows {
        match parse_locus(row, &cols, width) {
            Ok(rec) => {
                map.insert(
                    rec.number,
                    LocusInfo {
                        motif: rec.motif().to_string(),
                        repeats: rec.repeats,
                    },
                );
            }
            Err(_) => skipped += 1,
        }
    }
    if map.is_empty() {
        anyhow::bail!("no usable rows in compare table {}", path.display());
    }
    Ok((map, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> CompareColumns {
        CompareColumns {
            number: 0,
            motif_a: 1,
            motif_b: 2,
            repeats_a: 3,
            repeats_b: 4,
            polymorphism: 5,
        }
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn parses_a_well_formed_row() {
        let r = parse_locus(&row(&["66", "tc", "TC", "10", "11", "Yes"]), &cols(), 6).unwrap();
        assert_eq!(r.number, 66);
        assert_eq!(r.motif_a, "TC");
        assert_eq!(r.motif(), "TC");
        assert_eq!(r.repeats, (10, 11));
        assert!(r.polymorphic);
    }

    #[test]
    fn motif_falls_back_to_second_genome() {
        let r = parse_locus(&row(&["1", "", "ag", "5", "5", "no"]), &cols(), 6).unwrap();
        assert_eq!(r.motif(), "AG");
        assert!(!r.polymorphic);
    }

    #[test]
    fn wrong_field_count_is_a_row_error() {
        let err = parse_locus(&row(&["66", "TC", "TC", "10", "11"]), &cols(), 6).unwrap_err();
        assert_eq!(err, RowError::FieldCount { want: 6, got: 5 });
    }

    #[test]
    fn non_numeric_fields_are_specific_errors() {
        let err = parse_locus(&row(&["x", "TC", "TC", "10", "11", "yes"]), &cols(), 6).unwrap_err();
        assert_eq!(err, RowError::BadLocusNumber("x".into()));
        let err = parse_locus(&row(&["66", "TC", "TC", "ten", "11", "yes"]), &cols(), 6).unwrap_err();
        assert_eq!(err, RowError::BadRepeatCount("ten".into()));
    }
}
