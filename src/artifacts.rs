//! Startup loading of the catalog and trained-model artifacts

use crate::catalog::Catalog;
use crate::config::ServiceConfig;
use crate::models::{ForestScoreModel, LogisticTagModel};
use crate::predictors::TagClassifier;
use crate::types::CatalogRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Source of named artifact blobs
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, artifact: &str) -> Result<Vec<u8>>;
}

/// Artifacts stored as files under a root directory
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch(&self, artifact: &str) -> Result<Vec<u8>> {
        let path = self.root.join(artifact);
        debug!("Reading artifact {}", path.display());

        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read artifact {}", path.display()))
    }
}

/// Artifacts served by an HTTP host at `{base_url}/artifacts/{name}`
#[derive(Debug, Clone)]
pub struct HttpArtifactStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpArtifactStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn artifact_url(&self, artifact: &str) -> String {
        format!(
            "{}/artifacts/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(artifact)
        )
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, artifact: &str) -> Result<Vec<u8>> {
        let url = self.artifact_url(artifact);
        debug!("Fetching artifact from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach artifact host at {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Artifact host error {} for '{}': {}", status, artifact, body);
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Store selected by the service configuration
pub fn store_for(config: &ServiceConfig) -> Box<dyn ArtifactStore> {
    match &config.artifacts_url {
        Some(url) => Box::new(HttpArtifactStore::new(url.clone())),
        None => Box::new(FileArtifactStore::new(config.artifacts_dir.clone())),
    }
}

/// Names of the three startup artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactNames {
    pub catalog: String,
    pub score_model: String,
    pub text_model: String,
}

impl From<&ServiceConfig> for ArtifactNames {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            catalog: config.catalog_artifact.clone(),
            score_model: config.score_model_artifact.clone(),
            text_model: config.text_model_artifact.clone(),
        }
    }
}

/// Everything the engine needs, parsed and validated
#[derive(Debug)]
pub struct LoadedArtifacts {
    pub catalog: Catalog,
    pub score_model: ForestScoreModel,
    pub text_model: LogisticTagModel,
}

/// Fetch all artifacts concurrently, then parse them
pub async fn load_artifacts(
    store: &dyn ArtifactStore,
    names: &ArtifactNames,
) -> Result<LoadedArtifacts> {
    info!("Loading artifacts from {} store", store.name());

    let (catalog_bytes, score_bytes, text_bytes) = futures::future::try_join3(
        store.fetch(&names.catalog),
        store.fetch(&names.score_model),
        store.fetch(&names.text_model),
    )
    .await?;

    let records: Vec<CatalogRecord> = serde_json::from_slice(&catalog_bytes)
        .with_context(|| format!("Invalid catalog artifact '{}'", names.catalog))?;
    let catalog = Catalog::from_records(records);

    let score_model = ForestScoreModel::from_json(&score_bytes)
        .with_context(|| format!("Invalid score model artifact '{}'", names.score_model))?;
    let text_model = LogisticTagModel::from_json(&text_bytes)
        .with_context(|| format!("Invalid text model artifact '{}'", names.text_model))?;

    info!(
        "Loaded {} catalog rows, {} trees, {} text classes over {} terms",
        catalog.len(),
        score_model.trees().len(),
        text_model.classes().len(),
        text_model.vocabulary_len()
    );

    Ok(LoadedArtifacts {
        catalog,
        score_model,
        text_model,
    })
}
