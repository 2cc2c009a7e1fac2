//! Engine tuning and environment-driven service configuration

use std::path::PathBuf;
use tracing::warn;

/// Policy constants for the query surface
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub suggestion_gate: f64,  // suggestions only for scores at or below this
    pub max_suggestions: usize,
    pub tag_threshold: f64,
    pub max_matches: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suggestion_gate: 60.0,
            max_suggestions: 3,
            tag_threshold: 0.3,
            max_matches: 5,
        }
    }
}

/// Process configuration read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub port: u16,
    pub artifacts_dir: PathBuf,
    pub artifacts_url: Option<String>, // fetch artifacts over HTTP instead of disk
    pub catalog_artifact: String,
    pub score_model_artifact: String,
    pub text_model_artifact: String,
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            artifacts_dir: PathBuf::from("./artifacts"),
            artifacts_url: None,
            catalog_artifact: "labeled_catalog.json".to_string(),
            score_model_artifact: "score_model.json".to_string(),
            text_model_artifact: "text_model.json".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut engine = defaults.engine.clone();
        let threshold = parsed(&lookup, "DRINKSCORE_TAG_THRESHOLD", engine.tag_threshold);
        if (0.0..=1.0).contains(&threshold) {
            engine.tag_threshold = threshold;
        } else {
            warn!(
                "Ignoring DRINKSCORE_TAG_THRESHOLD={} outside [0, 1]",
                threshold
            );
        }

        Self {
            port: parsed(&lookup, "DRINKSCORE_PORT", defaults.port),
            artifacts_dir: lookup("DRINKSCORE_ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifacts_dir),
            artifacts_url: lookup("DRINKSCORE_ARTIFACTS_URL").filter(|url| !url.is_empty()),
            catalog_artifact: lookup("DRINKSCORE_CATALOG").unwrap_or(defaults.catalog_artifact),
            score_model_artifact: lookup("DRINKSCORE_SCORE_MODEL")
                .unwrap_or(defaults.score_model_artifact),
            text_model_artifact: lookup("DRINKSCORE_TEXT_MODEL")
                .unwrap_or(defaults.text_model_artifact),
            engine,
        }
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}='{}'", key, raw);
            default
        }),
        None => default,
    }
}
