//! Request and response shapes of the external gene-analysis service
//!
//! Only the fields the engine consumes are modelled; unknown fields in a response are ignored.

use std::convert::TryFrom;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::animation::FrameScheduler;
use crate::config::EngineConfig;
use crate::density::VariantRecord;
use crate::edit::EditSuggestion;
use crate::error::{EditvizError, ParseError};
use crate::interval::Locus;
use crate::orchestrator::ComparisonOrchestrator;
use crate::sequence::Sequence;
use crate::Nucleotide;

pub const MIN_SEQUENCE_LENGTH: usize = 20;
pub const MAX_SEQUENCE_LENGTH: usize = 10_000;
pub const MAX_REQUESTED_SUGGESTIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitType {
    PlantHeight,
    LeafColor,
    FloweringTime,
    Yield,
    DiseaseResistance,
    DroughtTolerance,
    Custom,
}

/// A validated analysis request, ready to be serialized and sent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub dna_sequence: String,
    pub target_trait: TraitType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_region: Option<String>,
    pub max_suggestions: usize,
    pub min_efficiency: f64,
}

impl AnalysisRequest {
    pub fn new(
        dna_sequence: &str,
        target_trait: TraitType,
        target_region: Option<&str>,
        max_suggestions: usize,
        min_efficiency: f64,
    ) -> Result<Self, ParseError> {
        let sequence = Sequence::parse(dna_sequence.trim())?;
        if sequence.len() < MIN_SEQUENCE_LENGTH || sequence.len() > MAX_SEQUENCE_LENGTH {
            return Err(ParseError::somewhere(
                "sequence of 20 to 10000 nucleotides",
                format!("{} nucleotides", sequence.len()),
            ));
        }
        if max_suggestions < 1 || max_suggestions > MAX_REQUESTED_SUGGESTIONS {
            return Err(ParseError::somewhere(
                "1 to 20 suggestions",
                max_suggestions.to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&min_efficiency) {
            return Err(ParseError::somewhere(
                "efficiency between 0 and 100",
                min_efficiency.to_string(),
            ));
        }
        let target_region = match target_region {
            Some(region) => Some(Locus::parse(region)?.to_string()),
            None => None,
        };
        Ok(Self {
            dna_sequence: sequence.to_string(),
            target_trait,
            target_region,
            max_suggestions,
            min_efficiency,
        })
    }

    pub fn to_json(&self) -> Result<String, EditvizError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestionRecord {
    #[serde(default)]
    pub guide_rna: String,
    pub target_position: i64,
    #[serde(default)]
    pub edit_type: String,
    pub efficiency_score: f64,
    pub confidence: f64,
    pub original_base: Option<String>,
    pub target_base: Option<String>,
}

fn base_field(value: &Option<String>, expected: &'static str) -> Result<Nucleotide, ParseError> {
    match value {
        Some(text) => Nucleotide::try_from(text.as_str()),
        None => Err(ParseError::somewhere(expected, "nothing".to_string())),
    }
}

fn score_field(value: f64, expected: &'static str) -> Result<f64, ParseError> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ParseError::somewhere(expected, value.to_string()))
    }
}

impl TryFrom<&SuggestionRecord> for EditSuggestion {
    type Error = ParseError;
    fn try_from(record: &SuggestionRecord) -> Result<Self, Self::Error> {
        if record.target_position < 0 {
            return Err(ParseError::somewhere(
                "non-negative target position",
                record.target_position.to_string(),
            ));
        }
        Ok(EditSuggestion::new(
            record.target_position as usize,
            base_field(&record.original_base, "original base")?,
            base_field(&record.target_base, "target base")?,
            score_field(record.efficiency_score, "efficiency score in [0, 100]")?,
            score_field(record.confidence, "confidence in [0, 100]")?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SnpChange {
    pub snp_id: String,
    pub chromosome: String,
    pub position: i64,
    pub original_allele: String,
    pub new_allele: String,
    #[serde(default)]
    pub effect_size: f64,
    #[serde(default)]
    pub is_causal_candidate: bool,
    #[serde(default)]
    pub nearby_genes: Vec<String>,
    pub dnabert_score: Option<f64>,
}

impl From<&SnpChange> for VariantRecord {
    fn from(snp: &SnpChange) -> Self {
        VariantRecord {
            position: snp.position,
            chromosome: snp.chromosome.clone(),
            is_causal_candidate: snp.is_causal_candidate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditSummary {
    pub total_snps_affected: usize,
    pub high_impact_snps: usize,
    pub trait_prediction_change: f64,
    pub risk_assessment: String,
    pub overall_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisResponse {
    pub analysis_id: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub edit_suggestions: Vec<SuggestionRecord>,
    #[serde(default)]
    pub snp_changes: Vec<SnpChange>,
    pub summary: Option<EditSummary>,
}

impl AnalysisResponse {
    pub fn from_json(text: &str) -> Result<Self, EditvizError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Suggestions usable by the engine, in service order. Malformed records are skipped.
    pub fn suggestions(&self) -> Vec<EditSuggestion> {
        self.edit_suggestions
            .iter()
            .enumerate()
            .filter_map(|(i, record)| match EditSuggestion::try_from(record) {
                Ok(suggestion) => Some(suggestion),
                Err(e) => {
                    warn!(
                        "Skipping suggestion {} of analysis {}: {}",
                        i, self.analysis_id, e
                    );
                    None
                }
            })
            .collect()
    }

    pub fn variants(&self) -> Vec<VariantRecord> {
        self.snp_changes.iter().map(VariantRecord::from).collect()
    }
}

impl<S: FrameScheduler> ComparisonOrchestrator<S> {
    /// Build the comparison view for `sequence` from a service response
    pub fn from_analysis(
        sequence: Sequence,
        response: &AnalysisResponse,
        config: &EngineConfig,
        scheduler: S,
    ) -> Result<Self, EditvizError> {
        ComparisonOrchestrator::new(sequence, response.suggestions(), config, scheduler)
    }
}
