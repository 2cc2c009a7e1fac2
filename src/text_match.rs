//! Free-text tag prediction and tag-overlap matching against the catalog

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::features::ScoreAdapter;
use crate::predictors::TagClassifier;
use crate::types::*;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Literal substitutions, applied in this order
pub const SYNONYMS: [(&str, &str); 3] = [
    ("calories", "calorie"),
    ("low calorie", "low_calorie"),
    ("low-calorie", "low_calorie"),
];

/// Lowercase and apply the synonym substitutions in order
pub fn normalize_text(text: &str) -> String {
    let mut text = text.to_lowercase();
    for (from, to) in SYNONYMS {
        text = text.replace(from, to);
    }
    text
}

/// Matches free text to catalog rows through predicted tags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextTagMatcher {
    pub threshold: f64, // minimum class probability to keep a tag
    pub limit: usize,
}

impl Default for TextTagMatcher {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            limit: 5,
        }
    }
}

impl TextTagMatcher {
    pub fn new(threshold: f64, limit: usize) -> Self {
        Self { threshold, limit }
    }

    /// Tags whose probability reaches the threshold, or `{none}` if there are none.
    /// A probability outside [0, 1] (NaN included) is a prediction error.
    pub fn predict_tags(&self, classifier: &dyn TagClassifier, text: &str) -> Result<TagSet> {
        let normalized = normalize_text(text);
        let probabilities = classifier.predict_proba(&normalized)?;

        let mut tags = TagSet::new();
        for (label, probability) in probabilities {
            if !(0.0..=1.0).contains(&probability) {
                return Err(EngineError::Prediction(format!(
                    "{} returned probability {} for '{}'",
                    classifier.name(),
                    probability,
                    label
                )));
            }
            if probability < self.threshold {
                continue;
            }
            match Tag::from_label(&label) {
                Some(tag) => {
                    tags.insert(tag);
                }
                None => warn!("{} predicted unknown tag '{}'", classifier.name(), label),
            }
        }

        if tags.is_empty() {
            tags.insert(Tag::Untagged);
        }
        debug!("Predicted tags for '{}': {:?}", normalized, tags);
        Ok(tags)
    }

    /// Rows matching the predicted tags.
    ///
    /// Superset matches win; intersection matches are used only when there
    /// are none. Results are deduplicated by beverage (highest score kept),
    /// sorted by score descending and truncated. Rows without a stored score
    /// are scored on demand; nothing is written back to the catalog.
    pub fn match_tags(
        &self,
        catalog: &Catalog,
        scorer: &ScoreAdapter,
        predicted: &TagSet,
    ) -> Result<(MatchTier, Vec<MatchedDrink>)> {
        if !catalog.is_tagged() {
            return Err(EngineError::Configuration(
                "catalog has no tag column; derive tags before matching".to_string(),
            ));
        }

        let strict: Vec<(&DrinkVariant, &TagSet)> = tagged_rows(catalog)
            .filter(|(_, tags)| tags.is_superset(predicted))
            .collect();
        if !strict.is_empty() {
            return Ok((MatchTier::Strict, self.rank(scorer, strict)?));
        }

        let fallback: Vec<(&DrinkVariant, &TagSet)> = tagged_rows(catalog)
            .filter(|(_, tags)| !tags.is_disjoint(predicted))
            .collect();
        if !fallback.is_empty() {
            info!(
                "No row carries all of {:?}; using {} partial matches",
                predicted,
                fallback.len()
            );
            return Ok((MatchTier::Fallback, self.rank(scorer, fallback)?));
        }

        info!("No catalog row shares any of {:?}", predicted);
        Ok((MatchTier::Empty, Vec::new()))
    }

    fn rank(
        &self,
        scorer: &ScoreAdapter,
        rows: Vec<(&DrinkVariant, &TagSet)>,
    ) -> Result<Vec<MatchedDrink>> {
        let mut best: Vec<MatchedDrink> = Vec::new();
        let mut by_beverage: HashMap<&str, usize> = HashMap::new();

        for (variant, tags) in rows {
            let score = match variant.score {
                Some(score) => score,
                None => scorer.score(variant)?,
            };

            let existing = by_beverage.get(variant.beverage.as_str()).copied();
            match existing {
                Some(index) if best[index].score >= score => {}
                Some(index) => best[index] = matched(variant, tags, score),
                None => {
                    by_beverage.insert(variant.beverage.as_str(), best.len());
                    best.push(matched(variant, tags, score));
                }
            }
        }

        best.sort_by(|a, b| b.score.total_cmp(&a.score));
        best.truncate(self.limit);
        Ok(best)
    }
}

fn tagged_rows(catalog: &Catalog) -> impl Iterator<Item = (&DrinkVariant, &TagSet)> {
    catalog
        .variants()
        .iter()
        .filter_map(|v| v.tags.as_ref().map(|tags| (v, tags)))
}

fn matched(variant: &DrinkVariant, tags: &TagSet, score: f64) -> MatchedDrink {
    MatchedDrink {
        beverage: variant.beverage.clone(),
        beverage_prep: variant.beverage_prep.clone(),
        category: variant.category.clone(),
        size: variant.size,
        milk: variant.milk.clone(),
        whipped_cream: variant.whipped_cream,
        tags: tags.clone(),
        score,
    }
}
