pub mod analysis;
mod animation;
mod color;
pub mod config;
mod density;
mod diff;
mod edit;
pub mod error;
mod helix;
pub mod interval;
mod orchestrator;
mod sequence;
mod viewport;

use std::convert::TryFrom;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

pub use crate::animation::{
    AnimationController, AnimationState, FrameHandle, FrameScheduler, ManualScheduler,
    PlaybackState, SubscriptionId, TimerScheduler,
};
pub use crate::color::{ColorMap, Rgb};
pub use crate::config::EngineConfig;
pub use crate::density::{bin, bin_chromosome, DensityBin, DensityHistogram, VariantRecord};
pub use crate::diff::{changes_between, diff, Comparison, PositionChange};
pub use crate::edit::EditSuggestion;
use crate::error::ParseError;
pub use crate::helix::{
    perturbation_offset, ActiveEdit, HelixGeometry, HelixGeometryGenerator, HelixParams, Point3,
};
pub use crate::interval::{Interval, Locus};
pub use crate::orchestrator::{ComparisonOrchestrator, Tab, TabSummary, ViewModel};
pub use crate::sequence::Sequence;
pub use crate::viewport::{Viewport, ViewportSlider};

/// Diff every suggestion against the same original sequence
///
/// The result has one comparison per suggestion, in input order. Inapplicable suggestions yield
/// a comparison with `applied == false` rather than being dropped, so indices stay aligned.
pub fn compare_all(original: &Sequence, suggestions: &[EditSuggestion]) -> Vec<Comparison> {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, suggestion)| diff(original, suggestion, i))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub fn name(&self) -> char {
        match self {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::T => 'T',
        }
    }

    /// Watson-Crick partner (A<->T, G<->C)
    pub fn complement(&self) -> Nucleotide {
        match self {
            Nucleotide::A => Nucleotide::T,
            Nucleotide::C => Nucleotide::G,
            Nucleotide::G => Nucleotide::C,
            Nucleotide::T => Nucleotide::A,
        }
    }

    pub fn is_purine(&self) -> bool {
        matches!(self, Nucleotide::A | Nucleotide::G)
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<char> for Nucleotide {
    type Error = ParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'A' | 'a' => Ok(Self::A),
            'C' | 'c' => Ok(Self::C),
            'G' | 'g' => Ok(Self::G),
            'T' | 't' => Ok(Self::T),
            _ => Err(ParseError::somewhere("nucleotide", c.to_string())),
        }
    }
}

impl TryFrom<&str> for Nucleotide {
    type Error = ParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Nucleotide::try_from(c),
            _ => Err(ParseError::somewhere("single nucleotide", s.to_string())),
        }
    }
}

/// Kind of a point substitution
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum SubstitutionClass {
    /// Same base before and after. Only occurs for no-op edits.
    Identity = 0,
    /// purine<->purine or pyrimidine<->pyrimidine
    Transition = 1,
    /// purine<->pyrimidine
    Transversion = 2,
}

impl SubstitutionClass {
    pub fn classify(from: Nucleotide, to: Nucleotide) -> Self {
        if from == to {
            Self::Identity
        } else if from.is_purine() == to.is_purine() {
            Self::Transition
        } else {
            Self::Transversion
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Transition => "transition",
            Self::Transversion => "transversion",
        }
    }
}

impl fmt::Display for SubstitutionClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<u8> for SubstitutionClass {
    type Error = ParseError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::Identity),
            1 => Ok(Self::Transition),
            2 => Ok(Self::Transversion),
            _ => Err(ParseError::somewhere(
                "substitution class 0, 1 or 2",
                n.to_string(),
            )),
        }
    }
}
