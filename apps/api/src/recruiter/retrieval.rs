//! Retrieval — nearest CV chunks for a job description, formatted for the prompt.

use crate::corpus::Chunk;
use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::vector_store::{ScoredChunk, VectorIndex};

pub const BLOCK_PREFIX: &str = "From CV: ";

/// Stable sort, nearest first. NaN distances sort last.
pub fn sort_by_distance(mut results: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    results
}

pub fn format_chunk(chunk: &Chunk) -> String {
    format!("{BLOCK_PREFIX}{}\n\n{}", chunk.metadata.cv_name, chunk.text)
}

/// Embeds `query`, fetches up to `k` chunks and returns them as labeled blocks,
/// nearest first. Skips the embedding call when nothing could match.
pub async fn get_relevant_chunks_with_scores(
    query: &str,
    index: &VectorIndex,
    embedder: &dyn Embedder,
    k: usize,
) -> Result<Vec<String>, AppError> {
    if k == 0 || index.is_empty() {
        return Ok(Vec::new());
    }

    let query_embedding = embedder.embed_query(query).await?;
    let results = index
        .similarity_search_with_score(&query_embedding, k)
        .await?;

    tracing::debug!(
        "Retrieved {} chunks (requested {k}), distances: {:?}",
        results.len(),
        results.iter().map(|r| r.distance).collect::<Vec<_>>()
    );

    Ok(sort_by_distance(results)
        .iter()
        .map(|r| format_chunk(&r.chunk))
        .collect())
}
