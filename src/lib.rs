#![forbid(unsafe_code)]
//! # ssrpipe
//!
//! Command-line filters for the SSRMMD → Primer3 microsatellite workflow:
//! small, composable transformations over the tab-separated report files the
//! external tools exchange. Nothing here mines repeats or designs primers;
//! ssrpipe only reads, filters, joins and annotates the tables at their
//! boundary.
//!
//! ## Stages
//! - [`filter`] — keep only polymorphic, primer-friendly loci in a
//!   `.compare` table, preserving its schema exactly.
//! - [`name`] — append a standardized microsatellite name
//!   (`TC(10-11).1`) to every row of a primer table, joined against the
//!   compare table by locus number.
//! - [`tsv`] — copy or rename a file so it carries a `.tsv` suffix.
//!
//! Each stage reads its input fully, transforms in memory and writes its
//! output atomically (temp file + rename); row-level problems are counted
//! and summarized, never fatal.
//!
//! ## Examples
//! ```rust
//! // The primer-id wire contract: `<locus>.<variant>`, both integers.
//! let id: ssrpipe::name::PrimerId = "66.1".parse().unwrap();
//! assert_eq!((id.locus, id.variant), (66, 1));
//!
//! // Per-locus base names order the repeat range.
//! let info = ssrpipe::locus::LocusInfo { motif: "TC".into(), repeats: (11, 10) };
//! assert_eq!(ssrpipe::name::base_name(&info), "TC(10-11)");
//! ```

pub mod filter;
pub mod locus;
pub mod name;
pub mod schema;
pub mod table;
pub mod tsv;

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
