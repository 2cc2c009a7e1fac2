//! Capability interfaces for the trained collaborators, plus deterministic stand-ins

use crate::error::{EngineError, Result};
use crate::features::{FeatureVector, MILK_PREFIX, SIZE_PREFIX, WHIPPED_PREFIX};
use crate::scoring::health_score;
use crate::types::*;
use std::collections::BTreeMap;

/// Fitted regression model: aligned feature vector in, health score out
pub trait ScorePredictor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ordered column names the model was fitted on
    fn feature_names(&self) -> &[String];

    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64>;
}

/// Fitted multi-label text classifier over the tag vocabulary
pub trait TagClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn classes(&self) -> &[String];

    /// Per-class probability for already-normalized text
    fn predict_proba(&self, normalized_text: &str) -> Result<BTreeMap<String, f64>>;
}

pub(crate) fn check_width(model: &str, expected: usize, features: &FeatureVector<'_>) -> Result<()> {
    if features.len() != expected {
        return Err(EngineError::Prediction(format!(
            "{} expects {} features, got {}",
            model,
            expected,
            features.len()
        )));
    }
    Ok(())
}

/// Applies the labeling rules to whatever the vector carries.
///
/// Categorical values are recovered from the one-hot columns, so a size or
/// milk the schema does not declare is seen as absent.
pub struct RuleScorePredictor {
    feature_names: Vec<String>,
}

impl RuleScorePredictor {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self { feature_names }
    }
}

impl ScorePredictor for RuleScorePredictor {
    fn name(&self) -> &'static str {
        "rule_stub"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64> {
        check_width(self.name(), self.feature_names.len(), features)?;

        let mut variant = DrinkVariant {
            beverage: String::new(),
            beverage_prep: String::new(),
            category: None,
            size: None,
            milk: String::new(),
            whipped_cream: false,
            nutrition: Nutrition::default(),
            tags: None,
            score: None,
        };

        for (name, value) in features.iter() {
            match name {
                "Calories" => variant.nutrition.calories = value,
                "Sugars (g)" => variant.nutrition.sugar_g = value,
                "Protein (g)" => variant.nutrition.protein_g = value,
                "Total Fat (g)" => variant.nutrition.fat_g = value,
                "Caffeine (mg)" => variant.nutrition.caffeine_mg = value,
                "Calcium (% DV)" => variant.nutrition.calcium_dv = value,
                _ if value < 0.5 => {}
                _ => {
                    if let Some(size) = name.strip_prefix(SIZE_PREFIX) {
                        variant.size = Size::from_name(size);
                    } else if let Some(milk) = name.strip_prefix(MILK_PREFIX) {
                        variant.milk = milk.to_string();
                    } else if name.strip_prefix(WHIPPED_PREFIX) == Some("True") {
                        variant.whipped_cream = true;
                    }
                }
            }
        }

        Ok(health_score(&variant))
    }
}

type ScoreFn = dyn Fn(&FeatureVector<'_>) -> f64 + Send + Sync;

/// Closure-backed predictor for testing
pub struct MockScorePredictor {
    feature_names: Vec<String>,
    score_fn: Box<ScoreFn>,
}

impl MockScorePredictor {
    pub fn new<F>(feature_names: Vec<String>, score_fn: F) -> Self
    where
        F: Fn(&FeatureVector<'_>) -> f64 + Send + Sync + 'static,
    {
        Self {
            feature_names,
            score_fn: Box::new(score_fn),
        }
    }
}

impl ScorePredictor for MockScorePredictor {
    fn name(&self) -> &'static str {
        "mock_score"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64> {
        check_width(self.name(), self.feature_names.len(), features)?;
        Ok((self.score_fn)(features))
    }
}

/// Returns the same probabilities for every input
pub struct MockTagClassifier {
    classes: Vec<String>,
    probabilities: BTreeMap<String, f64>,
}

impl MockTagClassifier {
    pub fn new(probabilities: BTreeMap<String, f64>) -> Self {
        Self {
            classes: probabilities.keys().cloned().collect(),
            probabilities,
        }
    }
}

impl TagClassifier for MockTagClassifier {
    fn name(&self) -> &'static str {
        "mock_tags"
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, _normalized_text: &str) -> Result<BTreeMap<String, f64>> {
        Ok(self.probabilities.clone())
    }
}

/// Keyword cues per tag for the demo classifier
const KEYWORD_CUES: &[(Tag, &[&str])] = &[
    (Tag::Sweet, &["sweet", "sugar", "sugary", "dessert"]),
    (Tag::LowCalorie, &["low_calorie", "light", "diet"]),
    (Tag::HighProtein, &["protein", "workout"]),
    (Tag::CaffeineBoost, &["caffeine", "caffeinated", "coffee", "energizing", "boost"]),
];

/// Keyword classifier used when no trained text model is loaded.
///
/// A class scores 1.0 when any of its cue words appears in the text.
pub struct KeywordTagClassifier {
    classes: Vec<String>,
}

impl KeywordTagClassifier {
    pub fn new() -> Self {
        Self {
            classes: KEYWORD_CUES
                .iter()
                .map(|(tag, _)| tag.as_str().to_string())
                .collect(),
        }
    }
}

impl Default for KeywordTagClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TagClassifier for KeywordTagClassifier {
    fn name(&self) -> &'static str {
        "keyword_stub"
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, normalized_text: &str) -> Result<BTreeMap<String, f64>> {
        Ok(KEYWORD_CUES
            .iter()
            .map(|(tag, cues)| {
                let hit = cues.iter().any(|cue| normalized_text.contains(cue));
                (tag.as_str().to_string(), if hit { 1.0 } else { 0.0 })
            })
            .collect())
    }
}
