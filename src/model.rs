//! Data model for sequence records and alignments.
//!
//! This module contains:
//! - [`SequenceRecord`]: the capability set every record kind provides
//! - [`CharRecord`]: one character per unit (nucleotides, amino acids, ...)
//! - [`Record`]: the closed set of record kinds an alignment can hold
//! - [`Alignment`]: an ordered collection of records
//!
//! Codon records live in [`crate::codon`].
//!
//! Sequences are stored as text and indexed by Unicode code point, never by
//! byte, so multi-byte alphabets behave like ASCII ones.

use thiserror::Error;

use crate::codon::CodonRecord;

/// Sentinel written by `ungapped_position_slice` at gap positions.
pub const GAP_POSITION: isize = -1;

/// Errors raised by record construction, mutation and queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sequence length {length} is not divisible by 3")]
    InvalidSequenceLength { length: usize },

    #[error("Gap token {token:?} has length {length}, expected a multiple of 3")]
    InvalidGapTokenLength { token: String, length: usize },

    #[error("Gap token is empty")]
    EmptyGapToken,

    #[error("Index {index} out of range for length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("Codon {index} ({codon:?}) is not 3 characters long")]
    InvalidCodon { index: usize, codon: String },
}

/// Result type for record operations.
pub type SequenceResult<T> = Result<T, SequenceError>;

/// Capabilities shared by every record kind.
///
/// A "unit" is one character for [`CharRecord`] and one codon for
/// [`CodonRecord`]; the gap-aware queries count units, while `len` and
/// `unit_at` always address characters of the underlying sequence.
pub trait SequenceRecord {
    /// The identifier (header text up to the first space).
    fn id(&self) -> &str;

    /// The free-text description, possibly empty.
    fn description(&self) -> &str;

    /// The sequence as text.
    fn sequence(&self) -> &str;

    /// Number of characters in the sequence.
    fn len(&self) -> usize {
        self.sequence().chars().count()
    }

    fn is_empty(&self) -> bool {
        self.sequence().is_empty()
    }

    /// Number of units in the sequence.
    fn unit_count(&self) -> usize;

    /// Returns the character at a 0-based code-point index.
    fn unit_at(&self, index: usize) -> SequenceResult<char> {
        self.sequence()
            .chars()
            .nth(index)
            .ok_or_else(|| SequenceError::IndexOutOfRange {
                index,
                length: self.len(),
            })
    }

    /// Ascending indices of units that differ from the gap token.
    fn ungapped_coords(&self, gap: &str) -> SequenceResult<Vec<usize>>;

    /// One entry per unit: the rank of the unit among non-gap units, or
    /// [`GAP_POSITION`] if the unit is a gap.
    fn ungapped_position_slice(&self, gap: &str) -> SequenceResult<Vec<isize>>;

    fn set_id(&mut self, id: String);

    fn set_description(&mut self, description: String);

    /// Replaces the sequence, re-deriving any dependent state.
    fn set_sequence(&mut self, sequence: String) -> SequenceResult<()>;

    /// Converts the sequence to uppercase in place.
    fn to_upper(&mut self);

    /// Converts the sequence to lowercase in place.
    fn to_lower(&mut self);
}

/// Walks units, returning the indices of those not equal to the gap.
pub(crate) fn ungapped_indices<I, T>(units: I, is_gap: impl Fn(&T) -> bool) -> Vec<usize>
where
    I: IntoIterator<Item = T>,
{
    units
        .into_iter()
        .enumerate()
        .filter(|(_, unit)| !is_gap(unit))
        .map(|(i, _)| i)
        .collect()
}

/// Walks units, numbering non-gap units and marking gaps with [`GAP_POSITION`].
pub(crate) fn ungapped_positions<I, T>(units: I, is_gap: impl Fn(&T) -> bool) -> Vec<isize>
where
    I: IntoIterator<Item = T>,
{
    let mut count: isize = 0;
    units
        .into_iter()
        .map(|unit| {
            if is_gap(&unit) {
                GAP_POSITION
            } else {
                count += 1;
                count - 1
            }
        })
        .collect()
}

/// Maps one character to one character, keeping it unchanged when its case
/// mapping expands (`ß` uppercases to `SS`).
fn map_char<I: Iterator<Item = char>>(c: char, mapped: impl FnOnce(char) -> I) -> char {
    let mut mapped = mapped(c);
    match (mapped.next(), mapped.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// Uppercases character by character; the result has as many characters
/// as the input.
pub(crate) fn upper_chars(s: &str) -> String {
    s.chars().map(|c| map_char(c, char::to_uppercase)).collect()
}

/// Lowercases character by character; the result has as many characters
/// as the input.
pub(crate) fn lower_chars(s: &str) -> String {
    s.chars().map(|c| map_char(c, char::to_lowercase)).collect()
}

/// A named sequence whose units are single characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharRecord {
    id: String,
    description: String,
    sequence: String,
}

impl CharRecord {
    /// Creates a new record.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        sequence: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            sequence: sequence.into(),
        }
    }

    /// The gap token's first character; a char record compares one
    /// character at a time.
    fn gap_char(gap: &str) -> SequenceResult<char> {
        gap.chars().next().ok_or(SequenceError::EmptyGapToken)
    }
}

impl SequenceRecord for CharRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn sequence(&self) -> &str {
        &self.sequence
    }

    fn unit_count(&self) -> usize {
        self.len()
    }

    fn ungapped_coords(&self, gap: &str) -> SequenceResult<Vec<usize>> {
        let gap = Self::gap_char(gap)?;
        Ok(ungapped_indices(self.sequence.chars(), |&c| c == gap))
    }

    fn ungapped_position_slice(&self, gap: &str) -> SequenceResult<Vec<isize>> {
        let gap = Self::gap_char(gap)?;
        Ok(ungapped_positions(self.sequence.chars(), |&c| c == gap))
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_description(&mut self, description: String) {
        self.description = description;
    }

    fn set_sequence(&mut self, sequence: String) -> SequenceResult<()> {
        self.sequence = sequence;
        Ok(())
    }

    fn to_upper(&mut self) {
        self.sequence = upper_chars(&self.sequence);
    }

    fn to_lower(&mut self) {
        self.sequence = lower_chars(&self.sequence);
    }
}

/// Which record kind a reader builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordKind {
    /// One character per unit.
    #[default]
    Char,
    /// One codon per unit, with a derived protein translation.
    Codon,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Char => write!(f, "char"),
            RecordKind::Codon => write!(f, "codon"),
        }
    }
}

/// Any record an alignment can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Char(CharRecord),
    Codon(CodonRecord),
}

impl Record {
    /// Builds a record of the requested kind.
    pub fn build(
        kind: RecordKind,
        id: impl Into<String>,
        description: impl Into<String>,
        sequence: impl Into<String>,
    ) -> SequenceResult<Self> {
        Ok(match kind {
            RecordKind::Char => Record::Char(CharRecord::new(id, description, sequence)),
            RecordKind::Codon => Record::Codon(CodonRecord::new(id, description, sequence)?),
        })
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Char(_) => RecordKind::Char,
            Record::Codon(_) => RecordKind::Codon,
        }
    }

    pub fn as_char(&self) -> Option<&CharRecord> {
        match self {
            Record::Char(record) => Some(record),
            Record::Codon(_) => None,
        }
    }

    pub fn as_codon(&self) -> Option<&CodonRecord> {
        match self {
            Record::Codon(record) => Some(record),
            Record::Char(_) => None,
        }
    }
}

impl From<CharRecord> for Record {
    fn from(record: CharRecord) -> Self {
        Record::Char(record)
    }
}

impl From<CodonRecord> for Record {
    fn from(record: CodonRecord) -> Self {
        Record::Codon(record)
    }
}

impl SequenceRecord for Record {
    fn id(&self) -> &str {
        match self {
            Record::Char(record) => record.id(),
            Record::Codon(record) => record.id(),
        }
    }

    fn description(&self) -> &str {
        match self {
            Record::Char(record) => record.description(),
            Record::Codon(record) => record.description(),
        }
    }

    fn sequence(&self) -> &str {
        match self {
            Record::Char(record) => record.sequence(),
            Record::Codon(record) => record.sequence(),
        }
    }

    fn unit_count(&self) -> usize {
        match self {
            Record::Char(record) => record.unit_count(),
            Record::Codon(record) => record.unit_count(),
        }
    }

    fn ungapped_coords(&self, gap: &str) -> SequenceResult<Vec<usize>> {
        match self {
            Record::Char(record) => record.ungapped_coords(gap),
            Record::Codon(record) => record.ungapped_coords(gap),
        }
    }

    fn ungapped_position_slice(&self, gap: &str) -> SequenceResult<Vec<isize>> {
        match self {
            Record::Char(record) => record.ungapped_position_slice(gap),
            Record::Codon(record) => record.ungapped_position_slice(gap),
        }
    }

    fn set_id(&mut self, id: String) {
        match self {
            Record::Char(record) => record.set_id(id),
            Record::Codon(record) => record.set_id(id),
        }
    }

    fn set_description(&mut self, description: String) {
        match self {
            Record::Char(record) => record.set_description(description),
            Record::Codon(record) => record.set_description(description),
        }
    }

    fn set_sequence(&mut self, sequence: String) -> SequenceResult<()> {
        match self {
            Record::Char(record) => record.set_sequence(sequence),
            Record::Codon(record) => record.set_sequence(sequence),
        }
    }

    fn to_upper(&mut self) {
        match self {
            Record::Char(record) => record.to_upper(),
            Record::Codon(record) => record.to_upper(),
        }
    }

    fn to_lower(&mut self) {
        match self {
            Record::Char(record) => record.to_lower(),
            Record::Codon(record) => record.to_lower(),
        }
    }
}

/// Represents an ordered collection of records.
///
/// Records need not share a length; [`Alignment::is_length_consistent`]
/// checks it on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    records: Vec<Record>,
}

impl Alignment {
    /// Creates a new alignment from a vector of records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Appends a record at the end.
    pub fn push(&mut self, record: impl Into<Record>) {
        self.records.push(record.into());
    }

    /// Returns the number of records.
    pub fn sequence_count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the alignment holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the length of the longest record, 0 when empty.
    pub fn alignment_length(&self) -> usize {
        self.records.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Gets a record by index.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Record> {
        self.records.iter_mut()
    }

    /// Row and column coordinates of every non-gap unit, record by record.
    ///
    /// The two vectors are parallel: `rows[i]` is the record index and
    /// `cols[i]` the unit index within that record.
    pub fn ungapped_coords(&self, gap: &str) -> SequenceResult<(Vec<usize>, Vec<usize>)> {
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        for (row, record) in self.records.iter().enumerate() {
            let coords = record.ungapped_coords(gap)?;
            rows.extend(std::iter::repeat(row).take(coords.len()));
            cols.extend(coords);
        }
        Ok((rows, cols))
    }

    /// One position slice per record, in order. Rows are ragged when
    /// records differ in length.
    pub fn ungapped_position_matrix(&self, gap: &str) -> SequenceResult<Vec<Vec<isize>>> {
        self.records
            .iter()
            .map(|record| record.ungapped_position_slice(gap))
            .collect()
    }

    /// True if the alignment is empty or every record has the first
    /// record's length.
    pub fn is_length_consistent(&self) -> bool {
        match self.records.first() {
            None => true,
            Some(first) => {
                let length = first.len();
                self.records.iter().all(|r| r.len() == length)
            }
        }
    }

    /// Converts every record to uppercase.
    pub fn to_upper(&mut self) {
        self.records.iter_mut().for_each(SequenceRecord::to_upper);
    }

    /// Converts every record to lowercase.
    pub fn to_lower(&mut self) {
        self.records.iter_mut().for_each(SequenceRecord::to_lower);
    }

    /// Renders the alignment as FASTA text, one sequence line per record.
    pub fn to_fasta(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for record in &self.records {
            if record.description().is_empty() {
                writeln!(f, ">{}", record.id())?;
            } else {
                writeln!(f, ">{} {}", record.id(), record.description())?;
            }
            writeln!(f, "{}", record.sequence())?;
        }
        Ok(())
    }
}

impl FromIterator<Record> for Alignment {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Alignment {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Alignment {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
