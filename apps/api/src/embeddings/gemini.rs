//! Google Generative Language embeddings (`text-embedding-004`).
//!
//! Documents go through `batchEmbedContents` tagged `RETRIEVAL_DOCUMENT`;
//! queries through `embedContent` tagged `RETRIEVAL_QUERY`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::embeddings::{Embedder, EmbeddingError};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const MODEL: &str = "models/text-embedding-004";
/// Upper bound the API accepts per `batchEmbedContents` call.
const MAX_BATCH: usize = 100;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: TaskType,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
}

impl GeminiEmbedder {
    pub fn new(api_key: String) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(60)).build()?,
            api_key,
        })
    }

    fn request<'a>(text: &'a str, task_type: TaskType) -> EmbedContentRequest<'a> {
        EmbedContentRequest {
            model: MODEL,
            content: Content {
                parts: [Part { text }],
            },
            task_type,
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|t| Self::request(t, TaskType::RetrievalDocument))
                .collect(),
        };
        let url = format!("{GEMINI_API_URL}/{MODEL}:batchEmbedContents");
        let response: BatchEmbedResponse = self.post(&url, &body).await?;

        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                got: response.embeddings.len(),
            });
        }
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    /// POSTs `body` and decodes the JSON reply.
    /// Retries on 429, 5xx and transport errors with exponential backoff.
    async fn post<B, T>(&self, url: &str, body: &B) -> Result<T, EmbeddingError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Embedding call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(url)
                .header("x-goog-api-key", &self.api_key)
                .json(body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: error_message(body),
                });
            }

            return Ok(response.json::<T>().await?);
        }

        Err(last_error.unwrap_or(EmbeddingError::RetriesExhausted {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for (batch_index, batch) in texts.chunks(MAX_BATCH).enumerate() {
            debug!(
                "Embedding batch {} ({} texts)",
                batch_index + 1,
                batch.len()
            );
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = Self::request(text, TaskType::RetrievalQuery);
        let url = format!("{GEMINI_API_URL}/{MODEL}:embedContent");
        let response: EmbedContentResponse = self.post(&url, &body).await?;
        Ok(response.embedding.values)
    }
}

/// Pulls `error.message` out of a Google error payload, or returns the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<GoogleError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_shape() {
        let body = GeminiEmbedder::request("rust engineer", TaskType::RetrievalQuery);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "models/text-embedding-004");
        assert_eq!(json["taskType"], "RETRIEVAL_QUERY");
        assert_eq!(json["content"]["parts"][0]["text"], "rust engineer");
    }

    #[test]
    fn test_document_task_type_serializes() {
        let json = serde_json::to_value(TaskType::RetrievalDocument).unwrap();
        assert_eq!(json, "RETRIEVAL_DOCUMENT");
    }

    #[test]
    fn test_batch_response_deserializes() {
        let json = r#"{"embeddings": [{"values": [0.1, 0.2]}, {"values": [0.3, 0.4]}]}"#;
        let parsed: BatchEmbedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.embeddings.len(), 2);
        assert_eq!(parsed.embeddings[1].values, vec![0.3, 0.4]);
    }

    #[test]
    fn test_single_response_deserializes() {
        let json = r#"{"embedding": {"values": [1.0, -1.0, 0.5]}}"#;
        let parsed: EmbedContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.embedding.values.len(), 3);
    }

    #[test]
    fn test_error_message_extracts_google_error() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body.to_string()), "API key not valid");
        assert_eq!(error_message("plain failure".to_string()), "plain failure");
    }
}
