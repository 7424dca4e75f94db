use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ssrpipe::filter::{parse_motif_lengths, run_filter, FilterOpts};
use ssrpipe::name::run_name;
use ssrpipe::tsv::{run_force_tsv, Overwrite};

/// ssrpipe CLI
#[derive(Parser)]
#[command(name = "ssrpipe")]
#[command(version)]
#[command(about = "SSRMMD compare-table filtering and primer naming", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a .compare table down to polymorphic, primer-friendly loci
    Filter {
        /// Input SSRMMD .compare table (TSV)
        #[arg(short = 'i', long)]
        input: PathBuf,
        /// Output .compare table, same schema as the input
        #[arg(short = 'o', long)]
        output: PathBuf,
        /// Comma-separated allowed motif lengths (e.g. "2,3,4" or "2,3,4,5,6")
        #[arg(long, default_value = "2,3,4")]
        motif_lengths: String,
        /// Minimum motif repeat count required in BOTH genomes
        #[arg(long, default_value_t = 5)]
        min_repeats: u64,
        /// Keep AT-only motifs instead of dropping them
        #[arg(long)]
        keep_at_only: bool,
    },

    /// Append standardized microsatellite names to a primer table
    Name {
        /// Primer table TSV from connectorToPrimer3.pl
        #[arg(short = 'p', long)]
        primers: PathBuf,
        /// SSRMMD .compare table (filtered or unfiltered)
        #[arg(short = 'c', long)]
        compare: PathBuf,
        /// Output TSV: primer table plus a microsatellite_name column
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Copy or rename a file so it carries a .tsv extension
    Tsv {
        /// Source file
        #[arg(short = 'i', long)]
        input: PathBuf,
        /// Destination path (.tsv appended when missing)
        #[arg(short = 'o', long)]
        output: PathBuf,
        /// Rename (move) instead of copy
        #[arg(long)]
        rename: bool,
        /// Overwrite an existing destination
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Filter { input, output, motif_lengths, min_repeats, keep_at_only } => {
            let opts = FilterOpts {
                motif_lengths: parse_motif_lengths(&motif_lengths)?,
                min_repeats,
                keep_at_only,
            };
            let summary = run_filter(&input, &output, &opts)?;
            eprintln!(
                "filter: input={} | output={} | {}",
                input.display(),
                output.display(),
                summary
            );
        }

        Commands::Name { primers, compare, output } => {
            let summary = run_name(&primers, &compare, &output)?;
            eprintln!(
                "name: primers={} | compare={} | output={} | named={}/{}",
                primers.display(),
                compare.display(),
                output.display(),
                summary.named,
                summary.rows
            );
            if summary.missing > 0 {
                eprintln!(
                    "name: WARNING: {} row(s) ({} distinct loci) had no match in the compare table; name left empty",
                    summary.missing, summary.missing_loci
                );
            }
            if summary.bad_ids > 0 {
                eprintln!(
                    "name: WARNING: {} row(s) had an id not matching <locus>.<variant>; name left empty",
                    summary.bad_ids
                );
            }
            if summary.compare_skipped > 0 {
                eprintln!(
                    "name: WARNING: {} unparsable compare row(s) skipped",
                    summary.compare_skipped
                );
            }
        }

        Commands::Tsv { input, output, rename, force } => {
            let policy = if force { Overwrite::Force } else { Overwrite::Refuse };
            let dst = run_force_tsv(&input, &output, rename, policy)?;
            eprintln!(
                "tsv: {} {} -> {}",
                if rename { "renamed" } else { "copied" },
                input.display(),
                dst.display()
            );
        }
    }

    Ok(())
}
