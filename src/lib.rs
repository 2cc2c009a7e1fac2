//! drinkscore - beverage scoring and recommendation
//!
//! Balances taste and nutrition over a catalog of drink variants:
//! - Field normalization of raw menu rows (size, milk, whipped cream, nutrition)
//! - Nutrition-derived descriptor tags
//! - Rule-based health score labels and trained-model score prediction
//! - Healthier-variant suggestions ("smallest nudge" first)
//! - Free-text tag prediction and tag-overlap matching

pub mod types;
pub mod error;
pub mod normalizer;
pub mod tags;
pub mod scoring;
pub mod features;
pub mod predictors;
pub mod models;
pub mod catalog;
pub mod suggestion;
pub mod text_match;
pub mod engine;
pub mod config;
pub mod artifacts;
pub mod server;

pub use types::*;
pub use error::EngineError;
pub use catalog::{Catalog, SharedCatalog};
pub use config::{EngineConfig, ServiceConfig};
pub use engine::{RecommendationEngine, SharedEngine};
pub use features::{FeatureSchema, FeatureVector, ScoreAdapter};
pub use predictors::{
    KeywordTagClassifier, MockScorePredictor, MockTagClassifier, RuleScorePredictor,
    ScorePredictor, TagClassifier,
};
pub use models::{ForestScoreModel, LogisticTagModel};
pub use artifacts::{ArtifactStore, FileArtifactStore, HttpArtifactStore};
