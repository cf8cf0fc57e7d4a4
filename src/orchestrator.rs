use std::convert::TryFrom;

use log::{debug, info};
use serde::Serialize;

use crate::animation::{AnimationController, AnimationState, FrameScheduler};
use crate::config::EngineConfig;
use crate::density::{bin_chromosome, DensityHistogram, VariantRecord};
use crate::diff::Comparison;
use crate::edit::EditSuggestion;
use crate::error::EditvizError;
use crate::helix::{ActiveEdit, HelixGeometry, HelixGeometryGenerator};
use crate::interval::{Interval, Locus};
use crate::sequence::Sequence;
use crate::viewport::Viewport;
use crate::{compare_all, Nucleotide, SubstitutionClass};

/// Tab 0 is the overview without an edit; tab `i + 1` shows suggestion `i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tab {
    Overview,
    Suggestion(usize),
}

impl Tab {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Tab::Overview,
            i => Tab::Suggestion(i - 1),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Suggestion(i) => i + 1,
        }
    }
}

/// Everything the rendering layer needs for one frame
///
/// Always built fresh from the orchestrator's source state, never cached.
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    pub tab: Tab,
    pub active_comparison: Option<&'a Comparison>,
    pub viewport: Interval,
    pub visible_original: &'a [Nucleotide],
    pub visible_modified: &'a [Nucleotide],
    pub animation: AnimationState,
    pub geometry: HelixGeometry,
}

/// One line in the tab strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSummary {
    pub tab: Tab,
    pub target_position: usize,
    pub original_base: Nucleotide,
    pub target_base: Nucleotide,
    pub efficiency_score: f64,
    pub confidence: f64,
    pub change_count: usize,
    pub substitution_class: SubstitutionClass,
    pub applied: bool,
}

pub struct ComparisonOrchestrator<S: FrameScheduler> {
    sequence: Sequence,
    suggestions: Vec<EditSuggestion>,
    comparisons: Vec<Comparison>,
    active_tab: Tab,
    viewport: Viewport,
    animation: AnimationController<S>,
    helix: HelixGeometryGenerator,
    density_bins: usize,
    density_window: u64,
}

impl<S: FrameScheduler> ComparisonOrchestrator<S> {
    pub fn new(
        sequence: Sequence,
        mut suggestions: Vec<EditSuggestion>,
        config: &EngineConfig,
        scheduler: S,
    ) -> Result<Self, EditvizError> {
        config.validate()?;
        if suggestions.len() > config.max_suggestions {
            info!(
                "Showing {} of {} edit suggestions",
                config.max_suggestions,
                suggestions.len()
            );
            suggestions.truncate(config.max_suggestions);
        }
        let comparisons = compare_all(&sequence, &suggestions);
        info!(
            "Loaded sequence of length {} with {} edit suggestions",
            sequence.len(),
            comparisons.len()
        );
        Ok(Self {
            sequence,
            suggestions,
            comparisons,
            active_tab: Tab::Overview,
            viewport: Viewport::new(config.viewport_size),
            animation: AnimationController::new(scheduler, config.animation_increment),
            helix: HelixGeometryGenerator::new(config.helix.clone(), config.colors.clone()),
            density_bins: config.density_bins,
            density_window: config.density_window,
        })
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn tab_count(&self) -> usize {
        self.comparisons.len() + 1
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn active_comparison(&self) -> Option<&Comparison> {
        match self.active_tab {
            Tab::Overview => None,
            Tab::Suggestion(i) => self.comparisons.get(i),
        }
    }

    /// Switch tabs, rewinding the viewport and the animation
    ///
    /// Selecting the tab that is already active changes nothing.
    pub fn select_tab(&mut self, index: usize) -> Result<(), EditvizError> {
        if index >= self.tab_count() {
            return Err(EditvizError::InvalidTab {
                requested: index,
                available: self.tab_count(),
            });
        }
        let tab = Tab::from_index(index);
        if tab == self.active_tab {
            return Ok(());
        }
        debug!("Switching from tab {:?} to {:?}", self.active_tab, tab);
        self.animation.reset();
        self.viewport.reset();
        self.active_tab = tab;
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn next_page(&mut self) {
        self.viewport.next(self.sequence.len());
    }

    pub fn previous_page(&mut self) {
        self.viewport.previous();
    }

    pub fn animation(&self) -> &AnimationController<S> {
        &self.animation
    }

    /// Mutable access for subscribing views and delivering frames
    pub fn animation_mut(&mut self) -> &mut AnimationController<S> {
        &mut self.animation
    }

    pub fn play(&mut self) {
        self.animation.start();
    }

    pub fn pause(&mut self) {
        self.animation.stop();
    }

    fn active_edit(&self) -> Option<ActiveEdit> {
        let comparison = self.active_comparison().filter(|c| c.applied)?;
        let suggestion = &self.suggestions[comparison.suggestion_index];
        Some(ActiveEdit {
            position: suggestion.target_position,
            target_base: suggestion.target_base,
        })
    }

    pub fn view(&self) -> ViewModel<'_> {
        let active_comparison = self.active_comparison();
        let modified = active_comparison
            .map(|c| &c.modified)
            .unwrap_or(&self.sequence);
        let animation = self.animation.state();
        ViewModel {
            tab: self.active_tab,
            active_comparison,
            viewport: self.viewport.window(self.sequence.len()),
            visible_original: self.viewport.visible(&self.sequence),
            visible_modified: self.viewport.visible(modified),
            animation,
            geometry: self
                .helix
                .generate(&self.sequence, self.active_edit(), animation.progress),
        }
    }

    /// Variant density of the locus browser, centered on `locus`
    pub fn density(&self, variants: &[VariantRecord], locus: &Locus) -> DensityHistogram {
        let center = i64::try_from(locus.center()).unwrap_or(i64::MAX);
        bin_chromosome(
            variants,
            &locus.chromosome,
            center,
            self.density_window,
            self.density_bins,
        )
    }

    pub fn summaries(&self) -> Vec<TabSummary> {
        self.comparisons
            .iter()
            .zip(&self.suggestions)
            .map(|(comparison, suggestion)| TabSummary {
                tab: Tab::Suggestion(comparison.suggestion_index),
                target_position: suggestion.target_position,
                original_base: suggestion.original_base,
                target_base: suggestion.target_base,
                efficiency_score: suggestion.efficiency_score,
                confidence: suggestion.confidence,
                change_count: comparison.change_count(),
                substitution_class: suggestion.substitution_class(),
                applied: comparison.applied,
            })
            .collect()
    }
}
