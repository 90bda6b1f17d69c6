//! Genetic code table and codon translation.
//!
//! This module provides:
//! - The standard NCBI genetic code (table 1) keyed by DNA triplet
//! - A gap codon entry (`---` → `-`)
//! - A fallback symbol (`X`) for any codon that is not a table key
//!
//! The table is built once and shared process-wide through
//! [`GeneticCode::standard`].

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Codon that stands for an alignment gap.
pub const GAP_CODON: &str = "---";
/// Translation of [`GAP_CODON`].
pub const GAP_SYMBOL: char = '-';
/// Translation of any codon that is not a table key.
pub const UNKNOWN_SYMBOL: char = 'X';
/// Translation of stop codons.
pub const STOP_SYMBOL: char = '*';

/// Bases in NCBI codon order.
const BASES: [char; 4] = ['T', 'C', 'A', 'G'];

/// NCBI table 1 amino acids, one per codon in TTT, TTC, TTA, ... GGG order.
const STANDARD_NCBIEAA: &str = "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

lazy_static! {
    static ref STANDARD: GeneticCode = GeneticCode::new(1, "Standard", STANDARD_NCBIEAA);
}

/// A genetic code table for translating codons to amino acids.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    /// NCBI genetic code ID
    pub id: u8,
    /// Name of the genetic code
    pub name: String,
    /// The 64 nucleotide codons, in NCBI order
    codons: Vec<String>,
    /// Codon to amino acid mapping (64 codons plus the gap codon)
    codon_table: HashMap<String, char>,
}

impl GeneticCode {
    /// Creates a new genetic code from an NCBI amino-acid string.
    ///
    /// # Arguments
    /// * `id` - NCBI genetic code ID
    /// * `name` - Name of the genetic code
    /// * `ncbieaa` - 64-character string of amino acids (NCBI format)
    fn new(id: u8, name: &str, ncbieaa: &str) -> Self {
        let mut codons = Vec::with_capacity(64);
        let mut codon_table = HashMap::with_capacity(65);

        // NCBI order: TTT, TTC, TTA, TTG, TCT, TCC, ... (Base1, Base2, Base3)
        let mut amino_acids = ncbieaa.chars();
        for &b1 in &BASES {
            for &b2 in &BASES {
                for &b3 in &BASES {
                    let codon: String = [b1, b2, b3].iter().collect();
                    let aa = amino_acids.next().unwrap_or(UNKNOWN_SYMBOL);
                    codon_table.insert(codon.clone(), aa);
                    codons.push(codon);
                }
            }
        }
        codon_table.insert(GAP_CODON.to_string(), GAP_SYMBOL);

        Self {
            id,
            name: name.to_string(),
            codons,
            codon_table,
        }
    }

    /// Returns the shared standard genetic code.
    pub fn standard() -> &'static GeneticCode {
        &STANDARD
    }

    /// Looks up a codon without applying the fallback symbol.
    pub fn get(&self, codon: &str) -> Option<char> {
        self.codon_table.get(codon).copied()
    }

    /// Translates a single codon to an amino acid.
    ///
    /// Lookup is exact: lowercase codons, RNA codons and codons containing
    /// ambiguity codes are not table keys and translate to `X`.
    pub fn translate_codon(&self, codon: &str) -> char {
        self.get(codon).unwrap_or(UNKNOWN_SYMBOL)
    }

    /// Translates consecutive codons into a protein string.
    pub fn translate_codons<I, S>(&self, codons: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        codons
            .into_iter()
            .map(|codon| self.translate_codon(codon.as_ref()))
            .collect()
    }

    /// Returns the 64 nucleotide codons in table order.
    pub fn codons(&self) -> &[String] {
        &self.codons
    }

    /// Number of keys in the table, gap codon included.
    pub fn len(&self) -> usize {
        self.codon_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codon_table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_code_translation() {
        let standard = GeneticCode::standard();

        assert_eq!(standard.translate_codon("ATG"), 'M'); // Start codon
        assert_eq!(standard.translate_codon("TAA"), STOP_SYMBOL);
        assert_eq!(standard.translate_codon("TAG"), '*');
        assert_eq!(standard.translate_codon("TGA"), '*');
        assert_eq!(standard.translate_codon("TTT"), 'F');
        assert_eq!(standard.translate_codon("GGG"), 'G');
    }

    #[test]
    fn test_table_shape() {
        let standard = GeneticCode::standard();
        assert_eq!(standard.id, 1);
        assert_eq!(standard.name, "Standard");
        assert_eq!(standard.codons().len(), 64);
        assert_eq!(standard.len(), 65);
        assert_eq!(standard.codons()[0], "TTT");
        assert_eq!(standard.codons()[63], "GGG");
    }

    #[test]
    fn test_gap_handling() {
        let standard = GeneticCode::standard();
        assert_eq!(standard.translate_codon(GAP_CODON), GAP_SYMBOL);
        // Partial gaps are not keys
        assert_eq!(standard.translate_codon("A--"), UNKNOWN_SYMBOL);
    }

    #[test]
    fn test_unknown_codons() {
        let standard = GeneticCode::standard();
        assert_eq!(standard.translate_codon("NNN"), 'X');
        assert_eq!(standard.translate_codon("ATN"), 'X');
        assert_eq!(standard.translate_codon("atg"), 'X');
        assert_eq!(standard.translate_codon("AUG"), 'X');
        assert_eq!(standard.get("NNN"), None);
    }

    #[test]
    fn test_exhaustive_translation() {
        let standard = GeneticCode::standard();
        let mut codons: Vec<&str> = standard.codons().iter().map(String::as_str).collect();
        codons.push("---");
        codons.push("NNN");

        assert_eq!(
            standard.translate_codons(codons),
            "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG-X"
        );
    }
}
