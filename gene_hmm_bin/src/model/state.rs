use crate::model::{Error, Result};

pub const HMM_STATES: usize = 68;
pub const ALPHABET_SIZE: usize = 4;

const BASES: [char; 4] = ['A', 'C', 'G', 'T'];


#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CoarseLabel
{
    NonCoding,
    Coding,
    ReverseCoding,
}

impl CoarseLabel
{
    pub fn as_char(self) -> char
    {
        match self
        {
            CoarseLabel::NonCoding => 'N',
            CoarseLabel::Coding => 'C',
            CoarseLabel::ReverseCoding => 'R',
        }
    }

    pub fn from_char(symbol: char) -> Result<CoarseLabel>
    {
        match symbol
        {
            'N' | 'n' => Ok(CoarseLabel::NonCoding),
            'C' | 'c' => Ok(CoarseLabel::Coding),
            'R' | 'r' => Ok(CoarseLabel::ReverseCoding),
            other => Err(Error::InvalidAnnotation(other)),
        }
    }
}


#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CodonRole
{
    CodingStart,
    CodingStop,
    ReverseStart,
    ReverseStop,
    CodingInterior,
    ReverseInterior,
}

impl CodonRole
{
    pub fn as_str(self) -> &'static str
    {
        match self
        {
            CodonRole::CodingStart => "coding-start",
            CodonRole::CodingStop => "coding-stop",
            CodonRole::ReverseStart => "reverse-start",
            CodonRole::ReverseStop => "reverse-stop",
            CodonRole::CodingInterior => "coding",
            CodonRole::ReverseInterior => "reverse",
        }
    }
}


// Fixed codon tables, each codon owning a block of three consecutive states.
// Reverse-strand codons are as they appear on the forward strand.

const CODING_START_TABLE: [([u8; 3], usize); 7] = [
    ([0, 3, 2], 1),  // ATG
    ([0, 3, 1], 4),  // ATC
    ([0, 3, 0], 7),  // ATA
    ([0, 3, 3], 10), // ATT
    ([2, 3, 2], 13), // GTG
    ([2, 3, 3], 16), // GTT
    ([3, 3, 2], 19), // TTG
];

const CODING_STOP_TABLE: [([u8; 3], usize); 3] = [
    ([3, 0, 2], 22), // TAG
    ([3, 0, 0], 25), // TAA
    ([3, 2, 0], 28), // TGA
];

const REVERSE_START_TABLE: [([u8; 3], usize); 7] = [
    ([1, 0, 3], 31), // CAT
    ([0, 0, 3], 34), // AAT
    ([1, 0, 1], 37), // CAC
    ([1, 0, 0], 40), // CAA
    ([3, 0, 3], 43), // TAT
    ([1, 0, 2], 46), // CAG
    ([2, 0, 3], 49), // GAT
];

const REVERSE_STOP_TABLE: [([u8; 3], usize); 3] = [
    ([1, 3, 0], 52), // CTA
    ([3, 3, 0], 55), // TTA
    ([3, 1, 0], 58), // TCA
];


pub fn sequence_to_indices(sequence: &str) -> Result<Vec<u8>>
{
    let mut indices = Vec::with_capacity(sequence.len());

    for symbol in sequence.chars()
    {
        let index = match symbol
        {
            'A' | 'a' => 0,
            'C' | 'c' => 1,
            'G' | 'g' => 2,
            'T' | 't' => 3,
            other => return Err(Error::InvalidNucleotide(other)),
        };
        indices.push(index);
    }

    Ok(indices)
}

pub fn indices_to_sequence(indices: &[u8]) -> String
{
    indices.iter().map(|&idx| BASES[idx as usize]).collect()
}

pub fn annotation_to_labels(annotation: &str) -> Result<Vec<CoarseLabel>>
{
    annotation.chars().map(CoarseLabel::from_char).collect()
}

pub fn labels_to_annotation(labels: &[CoarseLabel]) -> String
{
    labels.iter().map(|label| label.as_char()).collect()
}


pub fn codon_to_states(codon: [u8; 3], role: CodonRole) -> Result<[usize; 3]>
{
    let table: &[([u8; 3], usize)] = match role
        {
        CodonRole::CodingInterior => return Ok([61, 62, 63]),
        CodonRole::ReverseInterior => return Ok([64, 65, 67]), // state 66 is never assigned
        CodonRole::CodingStart => &CODING_START_TABLE,
        CodonRole::CodingStop => &CODING_STOP_TABLE,
        CodonRole::ReverseStart => &REVERSE_START_TABLE,
        CodonRole::ReverseStop => &REVERSE_STOP_TABLE,
        };

    for (entry, first) in table
        {
        if *entry == codon
            { return Ok([*first, first + 1, first + 2]); }
        }

    Err(Error::UnknownCodon(indices_to_sequence(&codon), role.as_str()))
}

pub fn state_to_label(state: usize) -> CoarseLabel
{
    if state == 0
        { CoarseLabel::NonCoding }
    else if (1..=30).contains(&state) || (61..=63).contains(&state)
        { CoarseLabel::Coding }
    else
        { CoarseLabel::ReverseCoding }
}

pub fn collapse_states_to_annotation(states: &[usize]) -> String
{
    states.iter().map(|&state| state_to_label(state).as_char()).collect()
}


// Expands a coarse annotation into exact hidden states in one greedy pass.
// A codon-aligned run bordered by N resolves its boundary codon by peeking at
// the annotation three positions ahead; genes abutting without an intervening
// N are mislabelled by this heuristic.
pub fn expand_annotation_to_states(indices: &[u8], labels: &[CoarseLabel]) -> Result<Vec<usize>>
{
    if indices.len() != labels.len()
        { return Err(Error::LengthMismatch(labels.len(), indices.len())); }

    let n = indices.len();
    let mut states = vec![0usize; n];
    let mut i = 0;

    while i < n
    {
        match labels[i]
        {
            CoarseLabel::NonCoding =>
                {
                states[i] = 0;

                if i + 3 < n && labels[i + 1..i + 4].iter().all(|&l| l == CoarseLabel::Coding)
                    {
                    let codon = [indices[i + 1], indices[i + 2], indices[i + 3]];
                    let block = codon_to_states(codon, CodonRole::CodingStart)?;
                    states[i + 1..i + 4].copy_from_slice(&block);
                    i += 4;
                    }
                else if i + 3 < n && labels[i + 1..i + 4].iter().all(|&l| l == CoarseLabel::ReverseCoding)
                    {
                    // reverse genes run right to left, so the codon after N is their stop
                    let codon = [indices[i + 1], indices[i + 2], indices[i + 3]];
                    let block = codon_to_states(codon, CodonRole::ReverseStop)?;
                    states[i + 1..i + 4].copy_from_slice(&block);
                    i += 4;
                    }
                else
                    { i += 1; }
                },

            CoarseLabel::Coding =>
                {
                if i + 3 > n
                    { return Err(Error::TruncatedCodon(i)); }

                let role = if i + 3 < n && labels[i + 3] == CoarseLabel::NonCoding
                    { CodonRole::CodingStop }
                else
                    { CodonRole::CodingInterior };

                let codon = [indices[i], indices[i + 1], indices[i + 2]];
                let block = codon_to_states(codon, role)?;
                states[i..i + 3].copy_from_slice(&block);
                i += 3;
                },

            CoarseLabel::ReverseCoding =>
                {
                if i + 3 > n
                    { return Err(Error::TruncatedCodon(i)); }

                let role = if i + 3 < n && labels[i + 3] == CoarseLabel::NonCoding
                    { CodonRole::ReverseStart }
                else
                    { CodonRole::ReverseInterior };

                let codon = [indices[i], indices[i + 1], indices[i + 2]];
                let block = codon_to_states(codon, role)?;
                states[i..i + 3].copy_from_slice(&block);
                i += 3;
                },
        }
    }

    Ok(states)
}




#[cfg(test)]
mod tests {
    use super::*;

    fn expand(sequence: &str, annotation: &str) -> Result<Vec<usize>>
    {
        let indices = sequence_to_indices(sequence)?;
        let labels = annotation_to_labels(annotation)?;
        expand_annotation_to_states(&indices, &labels)
    }

    #[test]
    fn test_sequence_translation_roundtrip()
    {
        let indices = sequence_to_indices("acgtACGT").unwrap();
        assert_eq!(indices, vec![0, 1, 2, 3, 0, 1, 2, 3]);
        assert_eq!(indices_to_sequence(&indices), "ACGTACGT");
    }

    #[test]
    fn test_sequence_translation_rejects_unknown_symbol()
    {
        assert!(matches!(sequence_to_indices("ACGU"), Err(Error::InvalidNucleotide('U'))));
        assert!(matches!(annotation_to_labels("NCX"), Err(Error::InvalidAnnotation('X'))));
    }

    #[test]
    fn test_codon_tables()
    {
        let atg = sequence_to_indices("ATG").unwrap();
        let states = codon_to_states([atg[0], atg[1], atg[2]], CodonRole::CodingStart).unwrap();
        assert_eq!(states, [1, 2, 3]);

        let tga = sequence_to_indices("TGA").unwrap();
        let states = codon_to_states([tga[0], tga[1], tga[2]], CodonRole::CodingStop).unwrap();
        assert_eq!(states, [28, 29, 30]);

        let gat = sequence_to_indices("GAT").unwrap();
        let states = codon_to_states([gat[0], gat[1], gat[2]], CodonRole::ReverseStart).unwrap();
        assert_eq!(states, [49, 50, 51]);

        let tca = sequence_to_indices("TCA").unwrap();
        let states = codon_to_states([tca[0], tca[1], tca[2]], CodonRole::ReverseStop).unwrap();
        assert_eq!(states, [58, 59, 60]);
    }

    #[test]
    fn test_interior_blocks_ignore_codon_identity()
    {
        assert_eq!(codon_to_states([0, 0, 0], CodonRole::CodingInterior).unwrap(), [61, 62, 63]);
        assert_eq!(codon_to_states([3, 2, 1], CodonRole::ReverseInterior).unwrap(), [64, 65, 67]);
    }

    #[test]
    fn test_unknown_codon_for_fixed_role()
    {
        // TGC is not a start codon
        let result = codon_to_states([3, 2, 1], CodonRole::CodingStart);
        assert!(matches!(result, Err(Error::UnknownCodon(_, "coding-start"))));
    }

    #[test]
    fn test_state_to_label_mapping()
    {
        assert_eq!(state_to_label(0), CoarseLabel::NonCoding);

        for state in (1..=30).chain(61..=63)
            { assert_eq!(state_to_label(state), CoarseLabel::Coding); }

        for state in (31..=60).chain(64..=67)
            { assert_eq!(state_to_label(state), CoarseLabel::ReverseCoding); }

        // the unused state still collapses, as does anything past the table
        assert_eq!(state_to_label(66), CoarseLabel::ReverseCoding);
        assert_eq!(state_to_label(99), CoarseLabel::ReverseCoding);
    }

    #[test]
    fn test_expand_forward_gene()
    {
        // start codon resolved by the N lookahead, stop codon by the run tail
        let states = expand("AATGTAAA", "NCCCCCCN").unwrap();
        assert_eq!(states, vec![0, 1, 2, 3, 25, 26, 27, 0]);
    }

    #[test]
    fn test_expand_reverse_gene()
    {
        // the codon right after N on the reverse strand is the stop
        let states = expand("ATCACATA", "NRRRRRRN").unwrap();
        assert_eq!(states, vec![0, 58, 59, 60, 31, 32, 33, 0]);
    }

    #[test]
    fn test_expand_mixed_genome()
    {
        let states = expand("AAAATGCGTAAACTATAGAAA", "NNNCCCNNNNNNRRRNNNNNN").unwrap();
        assert_eq!(
            states,
            vec![0, 0, 0, 1, 2, 3, 0, 0, 0, 0, 0, 0, 52, 53, 54, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_expand_interior_codons()
    {
        // six coding codons: start, four interior, stop
        let states = expand("AATGAAACCCGGGTTTTAAA", "NCCCCCCCCCCCCCCCCCCN").unwrap();
        assert_eq!(states[1..4], [1, 2, 3]);
        assert_eq!(states[4..7], [61, 62, 63]);
        assert_eq!(states[13..16], [61, 62, 63]);
        assert_eq!(states[16..19], [25, 26, 27]);
    }

    #[test]
    fn test_expand_rejects_structural_mismatch()
    {
        // AAA after N is marked as a start codon but is not in the start table
        assert!(matches!(expand("AAAAA", "NCCCN"), Err(Error::UnknownCodon(_, "coding-start"))));
    }

    #[test]
    fn test_expand_rejects_truncated_run()
    {
        assert!(matches!(expand("AA", "CC"), Err(Error::TruncatedCodon(0))));
    }

    #[test]
    fn test_expand_rejects_length_mismatch()
    {
        assert!(matches!(expand("AAAA", "NNN"), Err(Error::LengthMismatch(3, 4))));
    }

    #[test]
    fn test_collapse_roundtrip()
    {
        for (sequence, annotation) in [
            ("AATGTAAA", "NCCCCCCN"),
            ("ATCACATA", "NRRRRRRN"),
            ("AAAATGCGTAAACTATAGAAA", "NNNCCCNNNNNNRRRNNNNNN"),
        ]
        .iter()
        {
            let states = expand(sequence, annotation).unwrap();
            assert_eq!(&collapse_states_to_annotation(&states), annotation);
        }
    }
}
