//! alnkit - FASTA alignment toolkit
//!
//! Reads a FASTA file, optionally normalizes case, checks that all
//! sequences share a length or translates codon records, and writes FASTA.
//!
//! ## Usage
//!
//! ```bash
//! alnkit <sequence_file>                      # echo as FASTA on stdout
//! alnkit --codon --translate in.fa -o out.fa  # write protein translation
//! alnkit --check --case upper in.fa           # fail if lengths differ
//! ```

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use alnkit::fasta::{parse_fasta, parse_fasta_file, write_fasta, write_fasta_file};
use alnkit::model::{Alignment, Record, RecordKind};

/// Case conversion applied before writing
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CaseArg {
    /// Convert sequences to uppercase
    Upper,
    /// Convert sequences to lowercase
    Lower,
}

/// alnkit - read, check and rewrite FASTA alignments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// FASTA file to read. Use "-" for stdin.
    file: PathBuf,

    /// Output file. Use "-" for stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,

    /// Read sequences as codons (lengths must be multiples of 3)
    #[arg(short = 'c', long = "codon")]
    codon: bool,

    /// Convert sequence case before writing
    #[arg(long = "case", value_enum)]
    case: Option<CaseArg>,

    /// Write the protein translation instead of nucleotides (requires --codon)
    #[arg(short = 't', long = "translate", requires = "codon")]
    translate: bool,

    /// Fail if sequences do not all have the same length
    #[arg(long = "check")]
    check: bool,

    /// Gap token used when counting ungapped residues
    #[arg(short = 'g', long = "gap", default_value = "-")]
    gap: String,
}

fn read_alignment(file: &Path, kind: RecordKind) -> Result<Alignment> {
    let alignment = if file.as_os_str() == "-" {
        parse_fasta(io::stdin().lock(), kind)?
    } else {
        parse_fasta_file(file, kind)?
    };
    Ok(alignment)
}

/// Replaces each codon record by its protein translation.
fn translate(alignment: Alignment) -> Alignment {
    alignment
        .into_iter()
        .map(|record| match record {
            Record::Codon(codon) => Record::Char(codon.to_protein_record()),
            other => other,
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .init();

    let args = Args::parse();
    let kind = if args.codon {
        RecordKind::Codon
    } else {
        RecordKind::Char
    };

    let mut alignment = read_alignment(&args.file, kind)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;
    info!(
        "Read {} {} records from {}",
        alignment.sequence_count(),
        kind,
        args.file.display()
    );

    if args.check && !alignment.is_length_consistent() {
        anyhow::bail!(
            "Sequences have different lengths (longest: {}). Not a valid alignment.",
            alignment.alignment_length()
        );
    }

    // A codon gap token must be whole codons
    let gap = if args.codon && args.gap == "-" {
        "---".to_string()
    } else {
        args.gap.clone()
    };
    let (_, cols) = alignment.ungapped_coords(&gap)?;
    info!("{} ungapped units (gap token {:?})", cols.len(), gap);

    match args.case {
        Some(CaseArg::Upper) => alignment.to_upper(),
        Some(CaseArg::Lower) => alignment.to_lower(),
        None => {}
    }

    let output_alignment = if args.translate {
        translate(alignment)
    } else {
        alignment
    };

    if args.output == "-" {
        write_fasta(&output_alignment, io::stdout().lock())?;
    } else {
        write_fasta_file(&output_alignment, &args.output)
            .with_context(|| format!("Cannot write {}", args.output))?;
        info!(
            "Wrote {} sequences to {}",
            output_alignment.sequence_count(),
            args.output
        );
    }

    Ok(())
}
