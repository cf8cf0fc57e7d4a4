use log::warn;

use crate::edit::EditSuggestion;
use crate::sequence::Sequence;
use crate::{Nucleotide, SubstitutionClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionChange {
    pub position: usize,
    pub original: Nucleotide,
    pub modified: Nucleotide,
}

impl PositionChange {
    pub fn substitution_class(&self) -> SubstitutionClass {
        SubstitutionClass::classify(self.original, self.modified)
    }
}

/// The original sequence next to one edited variant
///
/// Built once per suggestion when analysis data is loaded and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub suggestion_index: usize,
    pub original: Sequence,
    pub modified: Sequence,
    /// Sorted by position
    pub changes: Vec<PositionChange>,
    /// `false` if the suggestion could not be applied and `modified` is just a copy of `original`
    pub applied: bool,
}

impl Comparison {
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    pub fn is_changed(&self, position: usize) -> bool {
        self.changes
            .binary_search_by_key(&position, |c| c.position)
            .is_ok()
    }
}

/// Apply `edit` to `original` and record where the two sequences differ
///
/// An edit outside the sequence, or one whose reference base does not match the sequence, is a
/// data condition and produces a no-op comparison (`applied == false`, no changes).
pub fn diff(original: &Sequence, edit: &EditSuggestion, suggestion_index: usize) -> Comparison {
    let modified = if edit.is_applicable_to(original) {
        original.with_substitution(edit.target_position, edit.target_base)
    } else {
        None
    };

    match modified {
        Some(modified) => Comparison {
            suggestion_index,
            changes: changes_between(original, &modified),
            original: original.clone(),
            modified,
            applied: true,
        },
        None => {
            warn!(
                "Skipping edit suggestion {}: {}>{} at position {} does not apply to a sequence of length {}",
                suggestion_index,
                edit.original_base,
                edit.target_base,
                edit.target_position,
                original.len()
            );
            Comparison {
                suggestion_index,
                original: original.clone(),
                modified: original.clone(),
                changes: Vec::new(),
                applied: false,
            }
        }
    }
}

/// Every index at which `a` and `b` carry different bases
///
/// Only the common prefix is compared if the lengths differ.
pub fn changes_between(a: &Sequence, b: &Sequence) -> Vec<PositionChange> {
    a.iter()
        .zip(b.iter())
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(position, (original, modified))| PositionChange {
            position,
            original,
            modified,
        })
        .collect()
}
