//! HTTP server for drink scoring and recommendation

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{DrinkQuery, EngineError, MatchResponse, ScoreResponse, SharedEngine, Size};

/// Score request as sent over HTTP
#[derive(Debug, Deserialize)]
pub struct PredictRequestHttp {
    pub beverage: String,
    pub size: Option<String>,
    #[serde(default)]
    pub milk: String,
    #[serde(default)]
    pub whipped_cream: bool,
}

/// Free-text recommendation request
#[derive(Debug, Deserialize)]
pub struct RecommendRequestHttp {
    pub text: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub catalog_size: usize,
}

#[derive(Debug, Serialize)]
pub struct BeveragesResponse {
    pub beverages: Vec<String>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: &str, details: String) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            details: Some(details),
        }),
    )
}

fn engine_error(e: EngineError) -> HandlerError {
    let (status, error) = match &e {
        EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "Cannot find the drink"),
        EngineError::Configuration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Service misconfigured"),
        EngineError::Prediction(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed"),
    };
    // Internal details stay in the log
    let details = if status.is_server_error() {
        error!("Request failed: {}", e);
        None
    } else {
        Some(e.to_string())
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
}

impl PredictRequestHttp {
    fn into_query(self) -> Result<DrinkQuery, HandlerError> {
        let size = match self.size.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(
                Size::from_name(name)
                    .ok_or_else(|| bad_request("Unknown size", format!("'{}'", name)))?,
            ),
        };

        Ok(DrinkQuery {
            beverage: self.beverage,
            size,
            milk: self.milk,
            whipped_cream: self.whipped_cream,
        })
    }
}

/// Score a drink and suggest healthier variants
pub async fn predict_handler(
    State(engine): State<SharedEngine>,
    Json(req): Json<PredictRequestHttp>,
) -> Result<Json<ScoreResponse>, HandlerError> {
    info!(
        "Received predict request: beverage='{}', size={:?}, milk='{}', whipped_cream={}",
        req.beverage, req.size, req.milk, req.whipped_cream
    );

    let query = req.into_query()?;
    engine.score_and_suggest(&query).map(Json).map_err(engine_error)
}

/// Recommend drinks for a free-text request
pub async fn recommend_handler(
    State(engine): State<SharedEngine>,
    Json(req): Json<RecommendRequestHttp>,
) -> Result<Json<MatchResponse>, HandlerError> {
    info!("Received recommend request: text='{}'", req.text);

    engine.match_by_text(&req.text).map(Json).map_err(engine_error)
}

/// Distinct beverage names in the catalog
pub async fn beverages_handler(State(engine): State<SharedEngine>) -> Json<BeveragesResponse> {
    Json(BeveragesResponse {
        beverages: engine
            .catalog()
            .beverages()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// Health check handler
pub async fn health_handler(State(engine): State<SharedEngine>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "drinkscore".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size: engine.catalog().len(),
    })
}

/// Create and configure the HTTP router
pub fn create_router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/beverages", get(beverages_handler))
        .route("/predict", post(predict_handler))
        .route("/recommend", post(recommend_handler))
        .with_state(engine)
}

/// Run the HTTP server
pub async fn run_server(engine: SharedEngine, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting drinkscore server on {}", addr);

    let app = create_router(engine);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
