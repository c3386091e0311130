// Embedding providers. The index and the retrieval path only see `Embedder`,
// so tests can swap in a deterministic fake.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Provider returned {got} embeddings for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },

    #[error("Failed after {retries} retries")]
    RetriesExhausted { retries: u32 },
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds corpus text. Output order matches `texts`.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embeds a search query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
