//! Name Assigner: append a standardized microsatellite name to every primer
//! row.
//!
//! The name is `<MOTIF>(<MIN>-<MAX>).<VARIANT>`, e.g. `TC(10-11).1`. Motif
//! and repeat range come from the compare table and are computed once per
//! locus; the variant suffix comes from the row's own primer id, so rows
//! `66.1` and `66.2` share the `TC(10-11)` prefix and keep their own suffix.
//! Rows whose locus is missing from the compare table, or whose id does not
//! parse, are emitted with an empty name and counted.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use thiserror::Error;

use crate::locus::{load_compare_map, LocusInfo};
use crate::schema;
use crate::table::TsvTable;

/// Why a primer id failed to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("primer id {0:?} has no '.' separator")]
    MissingSeparator(String),
    #[error("primer id {0:?}: locus segment is not an integer")]
    BadLocus(String),
    #[error("primer id {0:?}: variant segment is not an integer")]
    BadVariant(String),
}

/// A primer identifier `<locus>.<variant>`, both segments integers.
///
/// The encoding is the wire contract with connectorToPrimer3.pl; anything
/// else (`66`, `66.1.2`, `66.x`) is rejected so malformed upstream output
/// surfaces early instead of being silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimerId {
    pub locus: u64,
    pub variant: u64,
}

impl FromStr for PrimerId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (locus, variant) = s
            .split_once('.')
            .ok_or_else(|| IdError::MissingSeparator(s.to_string()))?;
        let locus = locus
            .parse::<u64>()
            .map_err(|_| IdError::BadLocus(s.to_string()))?;
        let variant = variant
            .parse::<u64>()
            .map_err(|_| IdError::BadVariant(s.to_string()))?;
        Ok(PrimerId { locus, variant })
    }
}

impl fmt::Display for PrimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.locus, self.variant)
    }
}

/// Format the shared per-locus prefix, `MOTIF(MIN-MAX)`.
pub fn base_name(info: &LocusInfo) -> String {
    let (a, b) = info.repeats;
    format!("{}({}-{})", info.motif, a.min(b), a.max(b))
}

/// Explicit per-run cache of locus number -> base name.
///
/// `None` marks a locus already looked up and found absent from the compare
/// table, so the miss is not re-resolved for every row of that locus. Because
/// the base is computed at most once, all rows of a locus get a byte-identical
/// motif-and-range prefix regardless of row interleaving.
#[derive(Debug, Default)]
pub struct NameCache {
    base: HashMap<u64, Option<String>>,
}

impl NameCache {
    pub fn new() -> Self {
        NameCache::default()
    }

    /// Base name for `locus`, or `None` if the compare table has no such
    /// locus.
    pub fn base_for(&mut self, locus: u64, compare: &HashMap<u64, LocusInfo>) -> Option<&str> {
        self.base
            .entry(locus)
            .or_insert_with(|| compare.get(&locus).map(base_name))
            .as_deref()
    }

    /// Loci that were requested but absent from the compare table.
    pub fn missing_loci(&self) -> usize {
        self.base.values().filter(|v| v.is_none()).count()
    }
}

/// Per-run naming tally, reported on stderr by the CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameSummary {
    /// Data rows read (and emitted; naming never drops a row).
    pub rows: usize,
    /// Rows that received a name.
    pub named: usize,
    /// Rows whose locus was absent from the compare table.
    pub missing: usize,
    /// Rows whose primer id did not parse as `<int>.<int>`.
    pub bad_ids: usize,
    /// Distinct loci absent from the compare table.
    pub missing_loci: usize,
    /// Compare rows skipped while building the locus map.
    pub compare_skipped: usize,
}

/// Run the naming stage: join `primers` against `compare` and write the
/// primer table with one appended `microsatellite_name` column.
pub fn run_name(primers: &Path, compare: &Path, output: &Path) -> Result<NameSummary> {
    let (map, compare_skipped) = load_compare_map(compare)?;

    let table = TsvTable::read(primers)?;
    table.require_columns(primers, &[schema::primer::ID])?;
    let id_idx = table.index_of(schema::primer::ID).expect("validated header");
    let width = table.width();

    let mut summary = NameSummary {
        compare_skipped,
        ..NameSummary::default()
    };
    let mut cache = NameCache::new();

    let mut header = table.header.clone();
    header.push(schema::primer::MICROSATELLITE_NAME.to_string());

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        summary.rows += 1;
        let mut out = row.clone();
        // Short rows are padded so the appended column lands in a consistent
        // position; extra fields pass through untouched.
        while out.len() < width {
            out.push(String::new());
        }

        let name = match out.get(id_idx).map(|s| s.as_str()).unwrap_or("").parse::<PrimerId>() {
            Ok(id) => match cache.base_for(id.locus, &map) {
                Some(base) => {
                    summary.named += 1;
                    format!("{}.{}", base, id.variant)
                }
                None => {
                    summary.missing += 1;
                    String::new()
                }
            },
            Err(_) => {
                summary.bad_ids += 1;
                String::new()
            }
        };
        out.push(name);
        rows.push(out);
    }
    summary.missing_loci = cache.missing_loci();

    let out = TsvTable { header, rows };
    out.write(output)?;
    Ok(summary)
}
