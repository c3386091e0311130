//! Recruiter service — retrieval plus synthesis over the startup-built index.
//!
//! Flow: embed query → nearest chunks → labeled context → prompt → LLM → raw text.
//! Stateless per request; the index is shared read-only.

use std::sync::Arc;

use tracing::info;

use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::llm_client::ChatModel;
use crate::recruiter::prompts::render_recruiter_prompt;
use crate::recruiter::retrieval::get_relevant_chunks_with_scores;
use crate::vector_store::VectorIndex;

#[derive(Clone)]
pub struct Recruiter {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn ChatModel>,
}

impl Recruiter {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn Embedder>, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            index,
            embedder,
            llm,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Builds the recruiter prompt for `job_description`.
    /// Context blocks are joined with blank lines, nearest chunk first.
    pub async fn build_prompt(
        &self,
        job_description: &str,
        n_results: usize,
    ) -> Result<String, AppError> {
        let blocks = get_relevant_chunks_with_scores(
            job_description,
            &self.index,
            self.embedder.as_ref(),
            n_results,
        )
        .await?;
        info!(
            "Matched {} CV chunks for a {}-character job description",
            blocks.len(),
            job_description.chars().count()
        );
        Ok(render_recruiter_prompt(job_description, &blocks.join("\n\n")))
    }

    /// Returns the model's recruiter-style evaluation verbatim.
    /// Upstream failures propagate; there is no fallback answer.
    pub async fn generate_recruiter_response(
        &self,
        job_description: &str,
        n_results: usize,
    ) -> Result<String, AppError> {
        let prompt = self.build_prompt(job_description, n_results).await?;
        Ok(self.llm.complete(&prompt).await?)
    }
}
