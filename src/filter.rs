//! Locus Filter: reduce an SSRMMD `.compare` table to polymorphic,
//! primer-friendly loci.
//!
//! The output carries the exact input header and the retained rows verbatim,
//! in their original order, so it stays valid input for
//! connectorToPrimer3.pl. Predicates are AND-combined; a row is dropped by
//! the first one it fails. Malformed rows (ragged, non-numeric counts) are
//! dropped and counted, never fatal.

use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::locus::{parse_locus, CompareColumns, LocusRecord};
use crate::schema;
use crate::table::TsvTable;

/// Filter configuration, one instance per run.
#[derive(Debug, Clone)]
pub struct FilterOpts {
    /// Allowed motif lengths. Default keeps di-/tri-/tetranucleotides.
    pub motif_lengths: Vec<usize>,
    /// Minimum repeat count required in BOTH genomes.
    pub min_repeats: u64,
    /// Keep motifs composed solely of A/T instead of dropping them.
    pub keep_at_only: bool,
}

impl Default for FilterOpts {
    fn default() -> Self {
        FilterOpts {
            motif_lengths: vec![2, 3, 4],
            min_repeats: 5,
            keep_at_only: false,
        }
    }
}

/// Parse a comma-separated motif-length list such as `"2,3,4"`.
pub fn parse_motif_lengths(list: &str) -> Result<Vec<usize>> {
    let mut out = Vec::new();
    for tok in list.split(',') {
        let tok = tok.trim();
        if tok.is_empty() {
            continue;
        }
        let n: usize = tok
            .parse()
            .map_err(|_| anyhow::anyhow!("non-integer motif length: {:?}", tok))?;
        out.push(n);
    }
    if out.is_empty() {
        anyhow::bail!("motif-length list is empty: {:?}", list);
    }
    Ok(out)
}

/// Why a row was dropped. The first failing predicate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Ragged row or non-numeric number/repeat field.
    Malformed,
    NotPolymorphic,
    /// Motif empty in either genome, or differing between genomes.
    MotifMismatch,
    /// Motif contains characters outside unambiguous A/C/G/T.
    InvalidMotif,
    MotifLength,
    /// Repeat count below threshold in at least one genome.
    LowRepeat,
    AtOnly,
}

/// True if the motif is composed solely of A and T (any case).
pub fn is_at_only(motif: &str) -> bool {
    !motif.is_empty() && motif.bytes().all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'T'))
}

/// True if the motif contains only unambiguous A/C/G/T.
pub fn is_valid_dna(motif: &str) -> bool {
    !motif.is_empty()
        && motif
            .bytes()
            .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T'))
}

/// Evaluate all predicates against a parsed record. `None` means keep.
pub fn drop_reason(rec: &LocusRecord, opts: &FilterOpts) -> Option<DropReason> {
    if !rec.polymorphic {
        return Some(DropReason::NotPolymorphic);
    }
    if rec.motif_a.is_empty() || rec.motif_b.is_empty() || rec.motif_a != rec.motif_b {
        return Some(DropReason::MotifMismatch);
    }
    if !is_valid_dna(&rec.motif_a) {
        return Some(DropReason::InvalidMotif);
    }
    if !opts.motif_lengths.contains(&rec.motif_a.len()) {
        return Some(DropReason::MotifLength);
    }
    let (ra, rb) = rec.repeats;
    if ra < opts.min_repeats || rb < opts.min_repeats {
        return Some(DropReason::LowRepeat);
    }
    if !opts.keep_at_only && is_at_only(&rec.motif_a) {
        return Some(DropReason::AtOnly);
    }
    None
}

/// Per-run filter tally, reported on stderr by the CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterSummary {
    pub total: usize,
    pub kept: usize,
    pub malformed: usize,
    pub not_polymorphic: usize,
    pub motif_mismatch: usize,
    pub invalid_motif: usize,
    pub motif_length: usize,
    pub low_repeat: usize,
    pub at_only: usize,
}

impl FilterSummary {
    pub fn dropped(&self) -> usize {
        self.total - self.kept
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::Malformed => self.malformed += 1,
            DropReason::NotPolymorphic => self.not_polymorphic += 1,
            DropReason::MotifMismatch => self.motif_mismatch += 1,
            DropReason::InvalidMotif => self.invalid_motif += 1,
            DropReason::MotifLength => self.motif_length += 1,
            DropReason::LowRepeat => self.low_repeat += 1,
            DropReason::AtOnly => self.at_only += 1,
        }
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kept={}/{} | malformed={} | not-polymorphic={} | motif-mismatch={} | invalid-motif={} | motif-length={} | low-repeat={} | at-only={}",
            self.kept,
            self.total,
            self.malformed,
            self.not_polymorphic,
            self.motif_mismatch,
            self.invalid_motif,
            self.motif_length,
            self.low_repeat,
            self.at_only,
        )
    }
}

/// Run the filter stage: read `input`, keep rows passing every predicate,
/// write `output` with the identical header.
pub fn run_filter(input: &Path, output: &Path, opts: &FilterOpts) -> Result<FilterSummary> {
    let table = TsvTable::read(input)?;
    table.require_columns(input, &schema::compare::REQUIRED)?;
    let cols = CompareColumns::resolve(&table, input)?;
    let width = table.width();

    let mut summary = FilterSummary::default();
    let mut kept_rows = Vec::new();
    for row in &table.rows {
        summary.total += 1;
        let reason = match parse_locus(row, &cols, width) {
            Ok(rec) => drop_reason(&rec, opts),
            Err(_) => Some(DropReason::Malformed),
        };
        match reason {
            Some(r) => summary.record(r),
            None => {
                kept_rows.push(row.clone());
                summary.kept += 1;
            }
        }
    }

    let out = TsvTable {
        header: table.header.clone(),
        rows: kept_rows,
    };
    out.write(output)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const HEADER: &str = "number\tfasta1_id\tfasta1_motif\tfasta1_repeat_number\tfasta1_start\tfasta1_end\tfasta2_id\tfasta2_motif\tfasta2_repeat_number\tfasta2_start\tfasta2_end\tfasta1_left_fs\tfasta1_left_fs_length\tfasta2_left_distance(LD)\tfasta2_left_identity(NW)\tfasta1_right_fs\tfasta1_right_fs_length\tfasta2_right_distance(LD)\tfasta2_right_identity(NW)\tpolymorphism";

    fn compare_row(number: &str, motif: &str, r1: &str, r2: &str, poly: &str) -> String {
        [
            number, "chr1", motif, r1, "100", "120", "chr1", motif, r2, "100", "122", "ACGTACGT",
            "8", "0", "1.0", "TTGGCCAA", "8", "0", "1.0", poly,
        ]
        .join("\t")
    }

    fn write_compare(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
        let p = dir.join(name);
        let mut lines = vec![HEADER.to_string()];
        lines.extend_from_slice(rows);
        fs::write(&p, lines.join("\n")).unwrap();
        p
    }

    fn rec(motif: &str, r1: u64, r2: u64, poly: bool) -> LocusRecord {
        LocusRecord {
            number: 1,
            motif_a: motif.to_string(),
            motif_b: motif.to_string(),
            repeats: (r1, r2),
            polymorphic: poly,
        }
    }

    #[test]
    fn at_only_detection() {
        assert!(is_at_only("AT"));
        assert!(is_at_only("tta"));
        assert!(!is_at_only("TC"));
        assert!(!is_at_only(""));
    }

    #[test]
    fn dna_validation() {
        assert!(is_valid_dna("ACGT"));
        assert!(is_valid_dna("tc"));
        assert!(!is_valid_dna("ACGN"));
        assert!(!is_valid_dna(""));
    }

    #[test]
    fn each_predicate_excludes_in_isolation() {
        let opts = FilterOpts::default();
        // Baseline passes everything.
        assert_eq!(drop_reason(&rec("TC", 10, 11, true), &opts), None);
        assert_eq!(
            drop_reason(&rec("TC", 10, 11, false), &opts),
            Some(DropReason::NotPolymorphic)
        );
        let mut mismatch = rec("TC", 10, 11, true);
        mismatch.motif_b = "AG".to_string();
        assert_eq!(drop_reason(&mismatch, &opts), Some(DropReason::MotifMismatch));
        assert_eq!(
            drop_reason(&rec("TN", 10, 11, true), &opts),
            Some(DropReason::InvalidMotif)
        );
        assert_eq!(
            drop_reason(&rec("ACGTC", 10, 11, true), &opts),
            Some(DropReason::MotifLength)
        );
        assert_eq!(
            drop_reason(&rec("TC", 4, 9, true), &opts),
            Some(DropReason::LowRepeat)
        );
        assert_eq!(
            drop_reason(&rec("AT", 10, 11, true), &opts),
            Some(DropReason::AtOnly)
        );
    }

    #[test]
    fn at_only_override_retains_the_row() {
        let opts = FilterOpts {
            keep_at_only: true,
            ..FilterOpts::default()
        };
        assert_eq!(drop_reason(&rec("AT", 10, 11, true), &opts), None);
    }

    #[test]
    fn pentanucleotide_allowed_when_configured() {
        let opts = FilterOpts {
            motif_lengths: vec![2, 3, 4, 5],
            ..FilterOpts::default()
        };
        assert_eq!(drop_reason(&rec("ACGTC", 10, 11, true), &opts), None);
    }

    #[test]
    fn run_keeps_schema_and_passing_rows_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_compare(
            dir.path(),
            "in.compare",
            &[
                compare_row("66", "TC", "10", "11", "yes"),
                compare_row("67", "TC", "10", "11", "no"),
                compare_row("68", "AT", "10", "11", "yes"),
                compare_row("69", "TC", "4", "9", "yes"),
            ],
        );
        let output = dir.path().join("out.compare");
        let summary = run_filter(&input, &output, &FilterOpts::default()).unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.kept, 1);
        assert_eq!(summary.not_polymorphic, 1);
        assert_eq!(summary.at_only, 1);
        assert_eq!(summary.low_repeat, 1);
        assert_eq!(summary.dropped(), 3);

        let text = fs::read_to_string(&output).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), HEADER);
        assert_eq!(lines.next().unwrap(), compare_row("66", "TC", "10", "11", "yes"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn malformed_rows_are_dropped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_compare(
            dir.path(),
            "in.compare",
            &[
                "66\tshort".to_string(),
                compare_row("67", "TC", "ten", "11", "yes"),
                compare_row("68", "AG", "10", "11", "yes"),
            ],
        );
        let output = dir.path().join("out.compare");
        let summary = run_filter(&input, &output, &FilterOpts::default()).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.malformed, 2);
        assert_eq!(summary.kept, 1);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bad.compare");
        fs::write(&p, "number\tfasta1_motif\n1\tTC\n").unwrap();
        let output = dir.path().join("out.compare");
        let err = run_filter(&p, &output, &FilterOpts::default()).unwrap_err();
        assert!(err.to_string().contains("missing required column"));
        assert!(!output.exists());
    }

    #[test]
    fn filtering_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_compare(
            dir.path(),
            "in.compare",
            &[
                compare_row("66", "TC", "10", "11", "yes"),
                compare_row("67", "AAG", "6", "7", "yes"),
                compare_row("68", "AT", "10", "11", "yes"),
            ],
        );
        let once = dir.path().join("once.compare");
        let twice = dir.path().join("twice.compare");
        let opts = FilterOpts::default();
        run_filter(&input, &once, &opts).unwrap();
        let second = run_filter(&once, &twice, &opts).unwrap();
        assert_eq!(second.kept, second.total);
        assert_eq!(
            fs::read_to_string(&once).unwrap(),
            fs::read_to_string(&twice).unwrap()
        );
    }

    #[test]
    fn motif_length_list_parsing() {
        assert_eq!(parse_motif_lengths("2,3,4").unwrap(), vec![2, 3, 4]);
        assert_eq!(parse_motif_lengths(" 2, 3 ,").unwrap(), vec![2, 3]);
        assert!(parse_motif_lengths("2,x").is_err());
        assert!(parse_motif_lengths(",").is_err());
    }
}
