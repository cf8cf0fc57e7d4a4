use std::convert::TryFrom;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::error::ParseError;
use crate::Nucleotide;

/// An immutable DNA sequence over the alphabet {A, C, G, T}
///
/// Lower case input is accepted and normalized. Every other symbol (including `N`) is rejected
/// with a `ParseError` pointing at the offending index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    bases: Vec<Nucleotide>,
}

impl Sequence {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut bases = Vec::with_capacity(text.len());
        for (i, c) in text.chars().enumerate() {
            match Nucleotide::try_from(c) {
                Ok(base) => bases.push(base),
                Err(_) => {
                    return Err(ParseError::item(
                        "sequence",
                        i,
                        "one of A, C, G or T",
                        c.to_string(),
                    ))
                }
            }
        }
        Ok(Self { bases })
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<Nucleotide> {
        self.bases.get(position).copied()
    }

    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.bases
    }

    pub fn iter(&self) -> impl Iterator<Item = Nucleotide> + '_ {
        self.bases.iter().copied()
    }

    /// A copy of this sequence with one base replaced
    ///
    /// Returns `None` if `position` lies outside the sequence.
    pub fn with_substitution(&self, position: usize, base: Nucleotide) -> Option<Sequence> {
        if position >= self.bases.len() {
            return None;
        }
        let mut bases = self.bases.clone();
        bases[position] = base;
        Some(Sequence { bases })
    }
}

impl From<Vec<Nucleotide>> for Sequence {
    fn from(bases: Vec<Nucleotide>) -> Self {
        Self { bases }
    }
}

impl FromStr for Sequence {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sequence::parse(s)
    }
}

impl Index<usize> for Sequence {
    type Output = Nucleotide;
    fn index(&self, position: usize) -> &Self::Output {
        &self.bases[position]
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in &self.bases {
            write!(f, "{}", base.name())?;
        }
        Ok(())
    }
}
