//! Codon-unit sequence records.
//!
//! A [`CodonRecord`] keeps three views of the same data in lockstep:
//! the nucleotide sequence, its codon triplets and the translated protein.
//! The sequence and codons can be replaced; the protein is always derived.

use crate::genetic_code::GeneticCode;
use crate::model::{
    lower_chars, ungapped_indices, ungapped_positions, upper_chars, CharRecord, SequenceError,
    SequenceRecord, SequenceResult,
};

/// Number of nucleotides in a codon.
pub const CODON_LENGTH: usize = 3;

/// A named nucleotide sequence read codon by codon.
///
/// Invariants:
/// - `sequence.len() % 3 == 0` (in characters)
/// - `codons.concat() == sequence`
/// - `protein[i]` is the translation of `codons[i]`, except after a case
///   conversion, which transforms all three views directly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonRecord {
    nucleotides: CharRecord,
    codons: Vec<String>,
    protein: String,
}

/// Splits a sequence into codons, checking its length first.
fn split_codons(sequence: &str) -> SequenceResult<Vec<String>> {
    let chars: Vec<char> = sequence.chars().collect();
    if chars.len() % CODON_LENGTH != 0 {
        return Err(SequenceError::InvalidSequenceLength {
            length: chars.len(),
        });
    }
    Ok(chars
        .chunks(CODON_LENGTH)
        .map(|codon| codon.iter().collect())
        .collect())
}

impl CodonRecord {
    /// Creates a record from a nucleotide sequence, deriving codons and
    /// protein.
    ///
    /// Fails with [`SequenceError::InvalidSequenceLength`] if the sequence
    /// length is not a multiple of 3.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        sequence: impl Into<String>,
    ) -> SequenceResult<Self> {
        let sequence = sequence.into();
        let codons = split_codons(&sequence)?;
        let protein = GeneticCode::standard().translate_codons(&codons);
        Ok(Self {
            nucleotides: CharRecord::new(id, description, sequence),
            codons,
            protein,
        })
    }

    /// The codon triplets, in order.
    pub fn codons(&self) -> &[String] {
        &self.codons
    }

    /// The translated protein, one character per codon.
    pub fn protein(&self) -> &str {
        &self.protein
    }

    /// Returns the codon at a 0-based codon index.
    pub fn codon_at(&self, index: usize) -> SequenceResult<&str> {
        self.codons
            .get(index)
            .map(String::as_str)
            .ok_or(SequenceError::IndexOutOfRange {
                index,
                length: self.codons.len(),
            })
    }

    /// Returns the amino acid at a 0-based codon index.
    pub fn protein_char_at(&self, index: usize) -> SequenceResult<char> {
        self.protein
            .chars()
            .nth(index)
            .ok_or(SequenceError::IndexOutOfRange {
                index,
                length: self.codons.len(),
            })
    }

    /// Replaces the codons, rebuilding the sequence by concatenation and
    /// re-translating the protein.
    ///
    /// Every codon must be exactly 3 characters; nothing is changed if one
    /// is not.
    pub fn set_codons(&mut self, codons: Vec<String>) -> SequenceResult<()> {
        if let Some((index, codon)) = codons
            .iter()
            .enumerate()
            .find(|(_, codon)| codon.chars().count() != CODON_LENGTH)
        {
            return Err(SequenceError::InvalidCodon {
                index,
                codon: codon.clone(),
            });
        }

        let sequence = codons.concat();
        // Cannot fail: every codon has been checked above
        self.nucleotides.set_sequence(sequence)?;
        self.protein = GeneticCode::standard().translate_codons(&codons);
        self.codons = codons;
        Ok(())
    }

    /// Returns a character record holding the protein under the same id
    /// and description.
    pub fn to_protein_record(&self) -> CharRecord {
        CharRecord::new(self.id(), self.description(), self.protein.clone())
    }

    fn check_gap(gap: &str) -> SequenceResult<()> {
        let length = gap.chars().count();
        if length % CODON_LENGTH != 0 {
            return Err(SequenceError::InvalidGapTokenLength {
                token: gap.to_string(),
                length,
            });
        }
        Ok(())
    }
}

impl SequenceRecord for CodonRecord {
    fn id(&self) -> &str {
        self.nucleotides.id()
    }

    fn description(&self) -> &str {
        self.nucleotides.description()
    }

    fn sequence(&self) -> &str {
        self.nucleotides.sequence()
    }

    fn unit_count(&self) -> usize {
        self.codons.len()
    }

    // A gap token spanning several codons is compared against a single
    // codon, so it never matches.
    fn ungapped_coords(&self, gap: &str) -> SequenceResult<Vec<usize>> {
        Self::check_gap(gap)?;
        Ok(ungapped_indices(&self.codons, |codon| codon.as_str() == gap))
    }

    fn ungapped_position_slice(&self, gap: &str) -> SequenceResult<Vec<isize>> {
        Self::check_gap(gap)?;
        Ok(ungapped_positions(&self.codons, |codon| codon.as_str() == gap))
    }

    fn set_id(&mut self, id: String) {
        self.nucleotides.set_id(id);
    }

    fn set_description(&mut self, description: String) {
        self.nucleotides.set_description(description);
    }

    fn set_sequence(&mut self, sequence: String) -> SequenceResult<()> {
        let codons = split_codons(&sequence)?;
        self.protein = GeneticCode::standard().translate_codons(&codons);
        self.codons = codons;
        self.nucleotides.set_sequence(sequence)
    }

    fn to_upper(&mut self) {
        self.nucleotides.to_upper();
        self.codons.iter_mut().for_each(|c| *c = upper_chars(c));
        self.protein = upper_chars(&self.protein);
    }

    fn to_lower(&mut self) {
        self.nucleotides.to_lower();
        self.codons.iter_mut().for_each(|c| *c = lower_chars(c));
        self.protein = lower_chars(&self.protein);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GAP_POSITION;

    const EXHAUSTIVE: &str = "TTTTTCTTATTGTCTTCCTCATCGTATTACTAATAGTGTTGCTGATGGCTTCTCCTACTGCCTCCCCCACCGCATCACCAACAGCGTCGCCGACGGATTATCATAATGACTACCACAACGAATAACAAAAAGAGTAGCAGAAGGGTTGTCGTAGTGGCTGCCGCAGCGGATGACGAAGAGGGTGGCGGAGGG---NNN";
    const EXHAUSTIVE_PROTEIN: &str =
        "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG-X";

    fn exhaustive_codons() -> Vec<String> {
        let mut codons = GeneticCode::standard().codons().to_vec();
        codons.push("---".to_string());
        codons.push("NNN".to_string());
        codons
    }

    #[test]
    fn test_new_rejects_partial_codon() {
        let result = CodonRecord::new("a", "test", "ATGGCGTG");
        assert_eq!(
            result,
            Err(SequenceError::InvalidSequenceLength { length: 8 })
        );
    }

    #[test]
    fn test_properties() {
        let record = CodonRecord::new("a", "test", "ATGGCGTGG").unwrap();
        assert_eq!(record.id(), "a");
        assert_eq!(record.description(), "test");
        assert_eq!(record.sequence(), "ATGGCGTGG");
        assert_eq!(record.codons(), ["ATG", "GCG", "TGG"]);
        assert_eq!(record.protein(), "MAW");
        assert_eq!(record.len(), 9);
        assert_eq!(record.unit_count(), 3);
    }

    #[test]
    fn test_indexed_access() {
        let record = CodonRecord::new("a", "test", "ATGGCGTGG").unwrap();
        assert_eq!(record.unit_at(5), Ok('G'));
        assert_eq!(record.codon_at(2), Ok("TGG"));
        assert_eq!(record.protein_char_at(1), Ok('A'));

        assert_eq!(
            record.unit_at(9),
            Err(SequenceError::IndexOutOfRange { index: 9, length: 9 })
        );
        assert_eq!(
            record.codon_at(3),
            Err(SequenceError::IndexOutOfRange { index: 3, length: 3 })
        );
        assert!(record.protein_char_at(3).is_err());
    }

    #[test]
    fn test_set_sequence_derives_views() {
        let mut record = CodonRecord::new("test", "", "").unwrap();
        record.set_sequence(EXHAUSTIVE.to_string()).unwrap();

        assert_eq!(record.sequence(), EXHAUSTIVE);
        assert_eq!(record.codons(), exhaustive_codons().as_slice());
        assert_eq!(record.protein(), EXHAUSTIVE_PROTEIN);
        assert_eq!(record.codons().concat(), record.sequence());
    }

    #[test]
    fn test_set_sequence_rejects_partial_codon() {
        let mut record = CodonRecord::new("test", "", "ATG").unwrap();
        let result = record.set_sequence("TTT---TTCTTATTGA".to_string());
        assert_eq!(
            result,
            Err(SequenceError::InvalidSequenceLength { length: 16 })
        );
        // Unchanged
        assert_eq!(record.sequence(), "ATG");
        assert_eq!(record.codons(), ["ATG"]);
        assert_eq!(record.protein(), "M");
    }

    #[test]
    fn test_set_codons_derives_views() {
        let mut record = CodonRecord::new("test", "", "").unwrap();
        record.set_codons(exhaustive_codons()).unwrap();

        assert_eq!(record.sequence(), EXHAUSTIVE);
        assert_eq!(record.codons(), exhaustive_codons().as_slice());
        assert_eq!(record.protein(), EXHAUSTIVE_PROTEIN);
    }

    #[test]
    fn test_set_codons_rejects_bad_codon() {
        let mut record = CodonRecord::new("test", "", "ATG").unwrap();
        let result = record.set_codons(vec!["TTT".to_string(), "TT".to_string()]);
        assert_eq!(
            result,
            Err(SequenceError::InvalidCodon {
                index: 1,
                codon: "TT".to_string()
            })
        );
        assert_eq!(record.sequence(), "ATG");
    }

    #[test]
    fn test_ungapped_coords() {
        let record = CodonRecord::new("test", "", "TTT---TTCTTATTG").unwrap();
        assert_eq!(record.ungapped_coords("---").unwrap(), vec![0, 2, 3, 4]);
        assert_eq!(
            record.ungapped_coords("--"),
            Err(SequenceError::InvalidGapTokenLength {
                token: "--".to_string(),
                length: 2
            })
        );
    }

    #[test]
    fn test_ungapped_position_slice() {
        let record = CodonRecord::new("test", "", "TTT---TTCTTATTG").unwrap();
        let slice = record.ungapped_position_slice("---").unwrap();
        assert_eq!(slice, vec![0, -1, 1, 2, 3]);
        assert_eq!(slice.len(), record.unit_count());
        assert_eq!(
            slice.iter().filter(|&&p| p != GAP_POSITION).count(),
            record.ungapped_coords("---").unwrap().len()
        );
        assert!(record.ungapped_position_slice("--").is_err());
    }

    #[test]
    fn test_multi_codon_gap_never_matches() {
        let record = CodonRecord::new("test", "", "TTT------TTG").unwrap();
        assert_eq!(record.ungapped_coords("------").unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_case_transforms_all_views() {
        let mut record = CodonRecord::new("a", "test", "ATGGCGTGG").unwrap();
        record.to_lower();
        assert_eq!(record.sequence(), "atggcgtgg");
        assert_eq!(record.codons(), ["atg", "gcg", "tgg"]);
        assert_eq!(record.protein(), "maw");

        record.to_upper();
        assert_eq!(record.sequence(), "ATGGCGTGG");
        assert_eq!(record.codons(), ["ATG", "GCG", "TGG"]);
        assert_eq!(record.protein(), "MAW");
    }

    #[test]
    fn test_case_keeps_codon_shape() {
        let mut record = CodonRecord::new("a", "", "ßAA---").unwrap();
        record.to_upper();
        assert_eq!(record.sequence(), "ßAA---");
        assert_eq!(record.len() % CODON_LENGTH, 0);
        assert_eq!(record.codons(), ["ßAA", "---"]);
        assert_eq!(record.codons().concat(), record.sequence());
        assert_eq!(record.ungapped_coords("---").unwrap(), vec![0]);

        record.to_lower();
        assert_eq!(record.sequence(), "ßaa---");
        assert_eq!(record.codons(), ["ßaa", "---"]);
        assert_eq!(record.protein(), "x-");
    }

    #[test]
    fn test_lowercase_input_translates_to_unknown() {
        let record = CodonRecord::new("a", "", "atg").unwrap();
        assert_eq!(record.protein(), "X");
    }

    #[test]
    fn test_multibyte_sequence() {
        let record = CodonRecord::new("a", "", "αβγATG").unwrap();
        assert_eq!(record.codons(), ["αβγ", "ATG"]);
        assert_eq!(record.protein(), "XM");
    }

    #[test]
    fn test_to_protein_record() {
        let record = CodonRecord::new("a", "desc", "ATG---TAA").unwrap();
        let protein = record.to_protein_record();
        assert_eq!(protein, CharRecord::new("a", "desc", "M-*"));
    }
}
