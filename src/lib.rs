//! # alnkit - Sequence records and FASTA alignments
//!
//! Loads, inspects and re-serializes aligned or unaligned sequence sets.
//!
//! ## Architecture
//!
//! - `model`: Record capabilities, character records and the alignment container
//! - `codon`: Codon records keeping sequence, codons and protein consistent
//! - `genetic_code`: The standard codon translation table
//! - `fasta`: Streaming FASTA reader and writer
//!
//! ## Example
//!
//! ```
//! use alnkit::{parse_fasta_str, RecordKind, SequenceRecord};
//!
//! let alignment = parse_fasta_str(">a\nATG---\n>b\nATGTGG\n", RecordKind::Codon).unwrap();
//! assert!(alignment.is_length_consistent());
//! assert_eq!(alignment.get(0).unwrap().ungapped_coords("---").unwrap(), vec![0]);
//! ```

pub mod codon;
pub mod fasta;
pub mod genetic_code;
pub mod model;

pub use codon::CodonRecord;
pub use fasta::{parse_fasta, parse_fasta_file, parse_fasta_str, write_fasta, FastaError};
pub use genetic_code::GeneticCode;
pub use model::{Alignment, CharRecord, Record, RecordKind, SequenceError, SequenceRecord};
