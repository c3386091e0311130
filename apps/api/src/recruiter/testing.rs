//! Deterministic stand-ins for the hosted embedding and chat models.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::corpus::{derive_cv_name, Chunk, ChunkMetadata};
use crate::embeddings::{Embedder, EmbeddingError};
use crate::llm_client::{ChatModel, LlmError};
use crate::vector_store::VectorIndex;

const VOCABULARY: [&str; 4] = ["rust", "python", "kubernetes", "sql"];

/// Embeds text as keyword counts over a tiny vocabulary.
#[derive(Default)]
pub struct KeywordEmbedder {
    document_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    VOCABULARY
        .iter()
        .map(|term| words.iter().filter(|w| *w == term).count() as f32)
        .collect()
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| keyword_vector(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(keyword_vector(text))
    }
}

/// Records every prompt and answers with a canned reply.
pub struct RecordingModel {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for RecordingModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Always fails like an upstream outage.
pub struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

pub fn sample_chunks() -> Vec<Chunk> {
    [
        (
            Some("CVs/alice.pdf"),
            "Rust engineer building Rust services on Kubernetes",
        ),
        (Some("CVs/bob.pdf"), "Python developer, some Rust"),
        (Some("CVs/carol.pdf"), "SQL analyst"),
        (None, "Kubernetes operator"),
    ]
    .into_iter()
    .map(|(source, text)| {
        Chunk::new(
            text,
            ChunkMetadata {
                source: source.map(str::to_string),
                page: Some(0),
                cv_name: derive_cv_name(source),
            },
        )
    })
    .collect()
}

pub async fn sample_index(embedder: &KeywordEmbedder) -> VectorIndex {
    VectorIndex::from_chunks("rag_collection", sample_chunks(), embedder)
        .await
        .unwrap()
}
