use std::sync::Arc;

use alexandria_parsing::ParserKind;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::models::{BatchRequest, BatchResponse, ParseRequest};
use crate::state::AppState;

/// `POST /api/parse`: classify, then parse.
pub async fn parse_auto(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> impl IntoResponse {
    let citation = req.citation.unwrap_or_default();
    Json(state.parser.parse(&citation))
}

/// `POST /api/parse/{parser_type}`: parse with the named extractor.
pub async fn parse_typed(
    State(state): State<Arc<AppState>>,
    Path(parser_type): Path<String>,
    Json(req): Json<ParseRequest>,
) -> impl IntoResponse {
    let kind: ParserKind = match parser_type.parse() {
        Ok(kind) => kind,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let citation = req.citation.unwrap_or_default();
    Json(state.parser.parse_with(&citation, kind)).into_response()
}

/// `POST /api/parse/batch`: parse every citation, results in input order.
pub async fn parse_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> impl IntoResponse {
    let count = req.citations.len();
    let result = tokio::task::spawn_blocking(move || {
        let items: Vec<String> = req
            .citations
            .into_iter()
            .map(|c| {
                let c = c.unwrap_or_default();
                if req.clean { state.parser.clean(&c) } else { c }
            })
            .collect();
        state.parser.parse_batch(&items)
    })
    .await;

    match result {
        Ok(results) => Json(BatchResponse { results }).into_response(),
        Err(e) => {
            tracing::error!(count, error = %e, "batch parse task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Batch parsing failed" })),
            )
                .into_response()
        }
    }
}
