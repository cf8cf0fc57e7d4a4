use serde::Serialize;

use crate::sequence::Sequence;
use crate::{Nucleotide, SubstitutionClass};

/// A proposed single-base substitution
///
/// The scores are opaque numbers in [0, 100] from an external model; they are carried through
/// for display and never influence the diff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EditSuggestion {
    pub target_position: usize,
    pub original_base: Nucleotide,
    pub target_base: Nucleotide,
    pub efficiency_score: f64,
    pub confidence: f64,
}

impl EditSuggestion {
    pub fn new(
        target_position: usize,
        original_base: Nucleotide,
        target_base: Nucleotide,
        efficiency_score: f64,
        confidence: f64,
    ) -> Self {
        Self {
            target_position,
            original_base,
            target_base,
            efficiency_score,
            confidence,
        }
    }

    /// An edit applies if its position is inside the sequence and the sequence actually carries
    /// `original_base` there.
    pub fn is_applicable_to(&self, sequence: &Sequence) -> bool {
        sequence.get(self.target_position) == Some(self.original_base)
    }

    pub fn substitution_class(&self) -> SubstitutionClass {
        SubstitutionClass::classify(self.original_base, self.target_base)
    }
}
