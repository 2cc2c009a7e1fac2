//! Recommendation engine: the transport-agnostic query surface

use crate::catalog::{Catalog, SharedCatalog};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::features::ScoreAdapter;
use crate::predictors::{ScorePredictor, TagClassifier};
use crate::scoring::{round_score, verdict};
use crate::suggestion::AlternativeSuggester;
use crate::text_match::TextTagMatcher;
use crate::types::*;
use std::sync::Arc;
use tracing::{info, warn};

/// Scores drinks, suggests alternatives and matches free text.
///
/// Holds an immutable catalog snapshot and the loaded predictors; every
/// query is computed from them without writing anything back.
pub struct RecommendationEngine {
    catalog: SharedCatalog,
    scorer: ScoreAdapter,
    classifier: Arc<dyn TagClassifier>,
    suggester: AlternativeSuggester,
    matcher: TextTagMatcher,
}

pub type SharedEngine = Arc<RecommendationEngine>;

impl RecommendationEngine {
    /// Wire the engine. Fails if the predictor's declared features cannot be
    /// built from a drink variant.
    pub fn new(
        catalog: SharedCatalog,
        score_predictor: Arc<dyn ScorePredictor>,
        classifier: Arc<dyn TagClassifier>,
        config: &EngineConfig,
    ) -> Result<SharedEngine> {
        let scorer = ScoreAdapter::new(score_predictor)?;

        if !catalog.is_tagged() {
            warn!("Catalog carries no tag column; text matching will fail");
        }
        info!(
            "Engine ready: {} variants, {} features ({}), classifier {} with {} classes",
            catalog.len(),
            scorer.schema().len(),
            scorer.predictor_name(),
            classifier.name(),
            classifier.classes().len()
        );

        Ok(Arc::new(Self {
            catalog,
            scorer,
            classifier,
            suggester: AlternativeSuggester::new(config.suggestion_gate, config.max_suggestions),
            matcher: TextTagMatcher::new(config.tag_threshold, config.max_matches),
        }))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Predict the score of a catalog drink and, when it is low, suggest
    /// healthier variants of the same beverage.
    pub fn score_and_suggest(&self, query: &DrinkQuery) -> Result<ScoreResponse> {
        let variant = self
            .catalog
            .find(query)
            .ok_or_else(|| EngineError::NotFound(query.to_string()))?;

        let score = self.scorer.score(variant)?;
        let suggestions =
            self.suggester
                .suggest(&self.catalog, &self.scorer, &query.beverage, score)?;

        info!(
            "Scored '{}' at {:.2} with {} suggestions",
            query,
            score,
            suggestions.len()
        );

        Ok(ScoreResponse {
            score: round_score(score),
            message: verdict(score).to_string(),
            beverage: query.beverage.clone(),
            size: query.size,
            milk: query.milk.clone(),
            whipped_cream: query.whipped_cream,
            suggestions,
        })
    }

    /// Predict tags for free text and return the best matching drinks
    pub fn match_by_text(&self, text: &str) -> Result<MatchResponse> {
        let predicted_tags = self.matcher.predict_tags(self.classifier.as_ref(), text)?;
        let (tier, matches) = self
            .matcher
            .match_tags(&self.catalog, &self.scorer, &predicted_tags)?;

        info!(
            "Text query matched {} drinks ({:?} tier) for tags {:?}",
            matches.len(),
            tier,
            predicted_tags
        );

        Ok(MatchResponse {
            predicted_tags,
            tier,
            message: tier.message().to_string(),
            matches,
        })
    }
}
