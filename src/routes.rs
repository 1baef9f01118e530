use axum::{Json, Router, extract::{rejection::JsonRejection, State}, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{CorsLayer, Any};
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::{error::{ErrorKind, GenerationError}, generator::AdCopyGenerator, models::{AdRequest, GeneratedAd}};

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<AdCopyGenerator>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-dental-ad", post(generate_dental_ad))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "dental-ad-generator" }))
}

/// The wizard shows one generic message; the precise kind and detail travel alongside for diagnostics.
pub struct ApiError(GenerationError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::RequestValidation => StatusCode::BAD_REQUEST,
            ErrorKind::Service => StatusCode::BAD_GATEWAY,
            ErrorKind::Parse | ErrorKind::StructuralValidation => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({
            "error": "Failed to generate ad",
            "details": self.0.to_string(),
            "kind": kind,
        });
        (status, Json(body)).into_response()
    }
}

#[axum::debug_handler]
pub async fn generate_dental_ad(
    State(state): State<AppState>,
    payload: Result<Json<AdRequest>, JsonRejection>,
) -> Result<Json<GeneratedAd>, ApiError> {
    let span = tracing::info_span!("generate_dental_ad", request_id = %Uuid::new_v4());
    async move {
        let body = match payload {
            Ok(Json(body)) => body,
            Err(rejection) => {
                let e = GenerationError::RequestValidation(rejection.body_text());
                error!(kind = ?e.kind(), "❌ Rejected request body: {}", e);
                return Err(ApiError(e));
            }
        };
        info!("🚀 Ad requested for practice: {}", body.practice_name);
        match state.generator.generate(&body).await {
            Ok(ad) => Ok(Json(ad)),
            Err(e) => {
                error!(kind = ?e.kind(), "❌ Ad generation failed: {}", e);
                Err(ApiError(e))
            }
        }
    }
    .instrument(span)
    .await
}
