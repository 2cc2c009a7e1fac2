//! Healthier-variant suggestions for a scored drink

use crate::catalog::Catalog;
use crate::error::Result;
use crate::features::ScoreAdapter;
use crate::types::*;
use tracing::debug;

/// Suggests same-beverage variants that improve the score by the smallest margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlternativeSuggester {
    pub gate: f64,    // only drinks scoring at or below this get suggestions
    pub limit: usize,
}

impl Default for AlternativeSuggester {
    fn default() -> Self {
        Self {
            gate: 60.0,
            limit: 3,
        }
    }
}

impl AlternativeSuggester {
    pub fn new(gate: f64, limit: usize) -> Self {
        Self { gate, limit }
    }

    /// Ranked alternatives for `beverage` given the queried drink's predicted score.
    ///
    /// Drinks above the gate get nothing and no candidate is scored. Otherwise
    /// every catalog row of the beverage is scored, rows that do not improve
    /// on `original_score` are dropped, and the rest are ordered by ascending
    /// improvement. An empty result means there is no healthier variant.
    pub fn suggest(
        &self,
        catalog: &Catalog,
        scorer: &ScoreAdapter,
        beverage: &str,
        original_score: f64,
    ) -> Result<Vec<SuggestionResult>> {
        if original_score > self.gate {
            debug!(
                "Score {:.2} above gate {:.0}, skipping suggestions for '{}'",
                original_score, self.gate, beverage
            );
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();
        for variant in catalog.variants_of(beverage) {
            let score = scorer.score(variant)?;
            let score_delta = score - original_score;
            if score_delta > 0.0 {
                candidates.push(SuggestionResult {
                    beverage: variant.beverage.clone(),
                    size: variant.size,
                    milk: variant.milk.clone(),
                    whipped_cream: variant.whipped_cream,
                    score,
                    score_delta,
                });
            }
        }

        candidates.sort_by(|a, b| a.score_delta.total_cmp(&b.score_delta));
        candidates.truncate(self.limit);

        debug!(
            "{} healthier variants of '{}' (limit {})",
            candidates.len(),
            beverage,
            self.limit
        );
        Ok(candidates)
    }
}
