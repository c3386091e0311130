use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::llm_client::LlmError;
use crate::vector_store::VectorStoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::Embedding(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EMBEDDING_ERROR",
                "The embedding service failed",
            ),
            AppError::VectorStore(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "VECTOR_STORE_ERROR",
                "The CV index search failed",
            ),
            AppError::Llm(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "LLM_ERROR",
                "An AI processing error occurred",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Embedding(e) => tracing::error!("Embedding error: {e}"),
            AppError::VectorStore(e) => tracing::error!("Vector store error: {e}"),
            AppError::Llm(e) => tracing::error!("LLM error: {e}"),
        }

        let (status, code, message) = self.parts();
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
