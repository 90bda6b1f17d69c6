//! FASTA reader and writer.
//!
//! The reader is a single pass over lines and handles both single-line and
//! multi-line sequences. Blank lines and lines starting with `#` or `;` are
//! skipped wherever they appear, including inside a sequence body.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::model::{Alignment, Record, RecordKind, SequenceError};

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(#[from] io::Error),

    #[error("Empty sequence identifier at line {line}")]
    EmptyIdentifier { line: usize },

    #[error("Invalid sequence '{id}': {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: SequenceError,
    },
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// A record whose header has been read and whose body is still growing.
struct PendingRecord {
    id: String,
    description: String,
    body: String,
    line: usize,
}

impl PendingRecord {
    /// Parses a header (without the leading `>`): the id runs up to the
    /// first space, the rest is the description.
    fn from_header(header: &str, line: usize) -> FastaResult<Self> {
        let (id, description) = header.split_once(' ').unwrap_or((header, ""));
        if id.is_empty() {
            return Err(FastaError::EmptyIdentifier { line });
        }
        Ok(Self {
            id: id.to_string(),
            description: description.to_string(),
            body: String::new(),
            line,
        })
    }

    /// Builds the record, or returns `None` if no sequence was read.
    fn finish(self, kind: RecordKind) -> FastaResult<Option<Record>> {
        if self.body.is_empty() {
            warn!(
                "Discarding '{}' (line {}): header has no sequence",
                self.id, self.line
            );
            return Ok(None);
        }
        debug!(
            "Read {} record '{}' ({} bytes)",
            kind,
            self.id,
            self.body.len()
        );
        Record::build(kind, self.id.as_str(), self.description, self.body)
            .map(Some)
            .map_err(|source| FastaError::InvalidRecord {
                id: self.id,
                source,
            })
    }
}

/// Parses FASTA content from a reader.
///
/// Every record is built as `kind`. Sequence lines are appended verbatim
/// (only the line terminator is removed); lines before the first header
/// are ignored.
///
/// # Examples
///
/// ```
/// use alnkit::fasta::parse_fasta;
/// use alnkit::model::{RecordKind, SequenceRecord};
///
/// let content = ">seq1 first\nATG\nGCG\n>seq2\nTGG\n";
/// let alignment = parse_fasta(content.as_bytes(), RecordKind::Codon).unwrap();
/// assert_eq!(alignment.sequence_count(), 2);
/// assert_eq!(alignment.get(0).unwrap().sequence(), "ATGGCG");
/// ```
pub fn parse_fasta<R: BufRead>(reader: R, kind: RecordKind) -> FastaResult<Alignment> {
    let mut alignment = Alignment::default();
    let mut current: Option<PendingRecord> = None;

    for (index, line_result) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line_result?;

        if let Some(header) = line.strip_prefix('>') {
            // Save previous record if exists
            if let Some(pending) = current.take() {
                if let Some(record) = pending.finish(kind)? {
                    alignment.push(record);
                }
            }
            current = Some(PendingRecord::from_header(header, line_number)?);
        } else if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        } else if let Some(pending) = current.as_mut() {
            pending.body.push_str(&line);
        } else {
            warn!("Ignoring line {} before the first header", line_number);
        }
    }

    // Don't forget the last record
    if let Some(pending) = current {
        if let Some(record) = pending.finish(kind)? {
            alignment.push(record);
        }
    }

    Ok(alignment)
}

/// Parses FASTA content from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_fasta_str(content: &str, kind: RecordKind) -> FastaResult<Alignment> {
    parse_fasta(content.as_bytes(), kind)
}

/// Parses a FASTA file and returns an Alignment.
///
/// # Examples
///
/// ```no_run
/// use alnkit::fasta::parse_fasta_file;
/// use alnkit::model::RecordKind;
///
/// let alignment = parse_fasta_file("sequences.fasta", RecordKind::Char).unwrap();
/// println!("Loaded {} sequences", alignment.sequence_count());
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P, kind: RecordKind) -> FastaResult<Alignment> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FastaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fasta(BufReader::new(file), kind)
}

/// Writes an alignment as FASTA, one sequence line per record.
pub fn write_fasta<W: Write>(alignment: &Alignment, mut writer: W) -> io::Result<()> {
    write!(writer, "{alignment}")?;
    writer.flush()
}

/// Writes an alignment to a FASTA file, replacing any existing file.
pub fn write_fasta_file<P: AsRef<Path>>(alignment: &Alignment, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    write_fasta(alignment, BufWriter::new(file))
}
