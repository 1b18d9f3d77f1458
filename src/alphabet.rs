// alphabet.rs - nucleotide complement and reverse complement

/// Complement of a single nucleotide symbol.
///
/// Only `ACGTN` and `acgtn` are substituted (A ↔ T, C ↔ G, N ↔ N) and case
/// is preserved. Every other symbol, including IUPAC ambiguity codes and gap
/// characters, is returned unchanged.
pub fn complement_base(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'G' => 'C',
        'C' => 'G',
        'N' => 'N',
        'a' => 't',
        't' => 'a',
        'g' => 'c',
        'c' => 'g',
        'n' => 'n',
        _ => base,
    }
}

/// Reverse complement of a sequence: read backwards, each symbol complemented.
pub fn reverse_complement(sequence: &str) -> String {
    sequence.chars().rev().map(complement_base).collect()
}
