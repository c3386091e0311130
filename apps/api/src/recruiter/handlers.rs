//! Axum route handlers for the matching API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

fn default_n_results() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub job_description: String,
    /// Number of CV chunks to retrieve. `0` is accepted and yields an empty
    /// context; the model is still asked and its answer returned.
    #[serde(default = "default_n_results")]
    pub n_results: usize,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub answer: String,
}

/// POST /match
///
/// Takes a job description and returns ranked CVs with a recruiter-style evaluation.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<JobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let answer = state
        .recruiter
        .generate_recruiter_response(&request.job_description, request.n_results)
        .await?;

    Ok(Json(JobResponse { answer }))
}
