//! Column-name constants for the tables ssrpipe reads and writes.
//!
//! The compare table is produced by SSRMMD's two-genome comparison step; the
//! primer table by connectorToPrimer3.pl. Column *presence* is validated
//! against these names before any row processing; column *order* is whatever
//! the input carries and is preserved on output.

/// Columns of an SSRMMD `.compare` table.
pub mod compare {
    /// Locus number, the unique integer key joining compare and primer rows.
    pub const NUMBER: &str = "number";
    /// Motif reported for the first genome.
    pub const FASTA1_MOTIF: &str = "fasta1_motif";
    /// Motif reported for the second genome.
    pub const FASTA2_MOTIF: &str = "fasta2_motif";
    /// Repeat count observed in the first genome.
    pub const FASTA1_REPEAT_NUMBER: &str = "fasta1_repeat_number";
    /// Repeat count observed in the second genome.
    pub const FASTA2_REPEAT_NUMBER: &str = "fasta2_repeat_number";
    /// "yes"/"no" marker for loci whose repeat counts differ between genomes.
    pub const POLYMORPHISM: &str = "polymorphism";

    /// Full column set a well-formed `.compare` file must carry. A header
    /// missing any of these is a fatal configuration error for the filter.
    pub const REQUIRED: [&str; 20] = [
        NUMBER,
        "fasta1_id",
        FASTA1_MOTIF,
        FASTA1_REPEAT_NUMBER,
        "fasta1_start",
        "fasta1_end",
        "fasta2_id",
        FASTA2_MOTIF,
        FASTA2_REPEAT_NUMBER,
        "fasta2_start",
        "fasta2_end",
        "fasta1_left_fs",
        "fasta1_left_fs_length",
        "fasta2_left_distance(LD)",
        "fasta2_left_identity(NW)",
        "fasta1_right_fs",
        "fasta1_right_fs_length",
        "fasta2_right_distance(LD)",
        "fasta2_right_identity(NW)",
        POLYMORPHISM,
    ];
}

/// Columns of a connectorToPrimer3.pl primer table.
pub mod primer {
    /// Primer identifier, encoded `<locus>.<variant>` (e.g. `66.1`).
    pub const ID: &str = "id";
    /// Name column the Name Assigner appends to its output.
    pub const MICROSATELLITE_NAME: &str = "microsatellite_name";
}
