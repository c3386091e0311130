//! Vector collection backed by an embedded LanceDB table.
//!
//! The table lives in a private temporary directory that is removed when the
//! index is dropped. Rows are written once at startup; requests only search.

use std::sync::Arc;

use arrow_array::types::Float32Type;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
    UInt64Array,
};
use arrow_schema::{ArrowError, DataType, Field, Schema, SchemaRef};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, DistanceType, Table};
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::corpus::{Chunk, ChunkMetadata};
use crate::embeddings::{Embedder, EmbeddingError};

const VECTOR_COLUMN: &str = "vector";
const DISTANCE_COLUMN: &str = "_distance";
const INSERT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Got {got} embeddings for {expected} chunks")]
    CountMismatch { expected: usize, got: usize },

    #[error("Vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("LanceDB error: {0}")]
    Lance(#[from] lancedb::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Failed to create index directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Search result is missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("Stored chunk id is not a UUID: {0}")]
    InvalidId(#[from] uuid::Error),
}

/// A chunk paired with its squared L2 distance to the query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub distance: f32,
}

/// Named, read-only nearest-neighbour collection.
/// Cloning the underlying `Table` handle is cheap, so the index is shared
/// across handlers behind a plain `Arc`.
pub struct VectorIndex {
    name: String,
    table: Option<Table>,
    len: usize,
    dimension: Option<usize>,
    built_at: DateTime<Utc>,
    _dir: TempDir,
}

impl VectorIndex {
    /// Embeds every chunk and builds the collection.
    /// An empty chunk list produces an empty index without calling the embedder.
    pub async fn from_chunks(
        name: impl Into<String>,
        chunks: Vec<Chunk>,
        embedder: &dyn Embedder,
    ) -> Result<Self, VectorStoreError> {
        let embeddings = if chunks.is_empty() {
            Vec::new()
        } else {
            let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
            embedder.embed_documents(&texts).await?
        };

        let index = Self::from_embeddings(name, chunks, embeddings).await?;
        info!(
            "Built vector collection '{}' with {} chunks (dimension {:?})",
            index.name, index.len, index.dimension
        );
        Ok(index)
    }

    /// Writes precomputed embeddings into a fresh table.
    pub async fn from_embeddings(
        name: impl Into<String>,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, VectorStoreError> {
        let name = name.into();
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::CountMismatch {
                expected: chunks.len(),
                got: embeddings.len(),
            });
        }

        let dimension = embeddings.first().map(Vec::len);
        if let Some(expected) = dimension {
            if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    got: bad.len(),
                });
            }
        }

        let dir = tempfile::Builder::new().prefix("cv-matcher-").tempdir()?;
        let len = chunks.len();

        let table = match dimension {
            Some(dim) => {
                let db = connect(dir.path().to_string_lossy().as_ref()).execute().await?;
                let schema = build_schema(dim);
                let mut batches = Vec::new();
                for (chunk_rows, vector_rows) in chunks
                    .chunks(INSERT_BATCH_SIZE)
                    .zip(embeddings.chunks(INSERT_BATCH_SIZE))
                {
                    batches.push(to_record_batch(&schema, dim, chunk_rows, vector_rows)?);
                }
                let reader = Box::new(RecordBatchIterator::new(
                    batches.into_iter().map(Ok),
                    schema,
                ));
                debug!("Creating LanceDB table '{}' in {}", name, dir.path().display());
                Some(db.create_table(&name, reader).execute().await?)
            }
            None => None,
        };

        Ok(Self {
            name,
            table,
            len,
            dimension,
            built_at: Utc::now(),
            _dir: dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Returns the `k` nearest chunks by squared L2 distance (or all of them
    /// if fewer exist), nearest first.
    pub async fn similarity_search_with_score(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, VectorStoreError> {
        let (Some(table), Some(expected)) = (&self.table, self.dimension) else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != expected {
            return Err(VectorStoreError::DimensionMismatch {
                expected,
                got: query.len(),
            });
        }

        let mut stream = table
            .vector_search(query.to_vec())?
            .column(VECTOR_COLUMN)
            .distance_type(DistanceType::L2)
            .limit(k)
            .execute()
            .await?;

        let mut results = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            results.extend(read_scored_chunks(&batch)?);
        }
        Ok(results)
    }
}

fn build_schema(dimension: usize) -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, true),
        Field::new("page", DataType::UInt64, true),
        Field::new("cv_name", DataType::Utf8, false),
        Field::new(
            VECTOR_COLUMN,
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dimension as i32),
            true,
        ),
    ]))
}

fn to_record_batch(
    schema: &SchemaRef,
    dimension: usize,
    chunks: &[Chunk],
    embeddings: &[Vec<f32>],
) -> Result<RecordBatch, VectorStoreError> {
    let ids: Vec<String> = chunks.iter().map(|c| c.id.to_string()).collect();
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    let sources: Vec<Option<&str>> = chunks.iter().map(|c| c.metadata.source.as_deref()).collect();
    let pages: Vec<Option<u64>> = chunks
        .iter()
        .map(|c| c.metadata.page.map(|p| p as u64))
        .collect();
    let cv_names: Vec<&str> = chunks.iter().map(|c| c.metadata.cv_name.as_str()).collect();
    let vectors = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        embeddings
            .iter()
            .map(|v| Some(v.iter().copied().map(Some).collect::<Vec<_>>())),
        dimension as i32,
    );

    Ok(RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(texts)),
            Arc::new(StringArray::from(sources)),
            Arc::new(UInt64Array::from(pages)),
            Arc::new(StringArray::from(cv_names)),
            Arc::new(vectors),
        ],
    )?)
}

fn column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &'static str,
) -> Result<&'a T, VectorStoreError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or(VectorStoreError::MissingColumn(name))
}

fn read_scored_chunks(batch: &RecordBatch) -> Result<Vec<ScoredChunk>, VectorStoreError> {
    let ids = column::<StringArray>(batch, "id")?;
    let texts = column::<StringArray>(batch, "text")?;
    let sources = column::<StringArray>(batch, "source")?;
    let pages = column::<UInt64Array>(batch, "page")?;
    let cv_names = column::<StringArray>(batch, "cv_name")?;
    let distances = column::<Float32Array>(batch, DISTANCE_COLUMN)?;

    (0..batch.num_rows())
        .map(|i| -> Result<ScoredChunk, VectorStoreError> {
            Ok(ScoredChunk {
                chunk: Chunk {
                    id: Uuid::parse_str(ids.value(i))?,
                    text: texts.value(i).to_string(),
                    metadata: ChunkMetadata {
                        source: (!sources.is_null(i)).then(|| sources.value(i).to_string()),
                        page: (!pages.is_null(i)).then(|| pages.value(i) as usize),
                        cv_name: cv_names.value(i).to_string(),
                    },
                },
                distance: distances.value(i),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::derive_cv_name;

    fn chunk(text: &str, source: &str) -> Chunk {
        Chunk::new(
            text,
            ChunkMetadata {
                source: Some(source.to_string()),
                page: Some(0),
                cv_name: derive_cv_name(Some(source)),
            },
        )
    }

    async fn sample_index() -> VectorIndex {
        VectorIndex::from_embeddings(
            "rag_collection",
            vec![
                chunk("far", "CVs/far.pdf"),
                chunk("near", "CVs/near.pdf"),
                chunk("middle", "CVs/middle.pdf"),
            ],
            vec![vec![10.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]],
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_nearest_first_with_squared_distance() {
        let index = sample_index().await;
        let results = index
            .similarity_search_with_score(&[0.0, 0.0], 2)
            .await
            .unwrap();
        let texts: Vec<_> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["near", "middle"]);
        assert!((results[0].distance - 1.0).abs() < 1e-4);
        assert!((results[1].distance - 9.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_search_round_trips_chunk_metadata() {
        let stored = Chunk::new(
            "Kubernetes operator",
            ChunkMetadata {
                source: None,
                page: None,
                cv_name: derive_cv_name(None),
            },
        );
        let paged = chunk("Rust engineer", "CVs/engineering/alice.pdf");
        let index = VectorIndex::from_embeddings(
            "rag_collection",
            vec![stored.clone(), paged.clone()],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        )
        .await
        .unwrap();

        let results = index
            .similarity_search_with_score(&[0.0, 1.0], 2)
            .await
            .unwrap();

        assert_eq!(results[0].chunk.id, stored.id);
        assert_eq!(results[0].chunk.metadata, stored.metadata);
        assert_eq!(results[1].chunk.id, paged.id);
        assert_eq!(results[1].chunk.metadata, paged.metadata);
        assert_eq!(results[1].chunk.text, "Rust engineer");
    }

    #[tokio::test]
    async fn test_k_larger_than_index_returns_everything() {
        let index = sample_index().await;
        let results = index
            .similarity_search_with_score(&[0.0, 0.0], 50)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_k_returns_nothing() {
        let index = sample_index().await;
        assert!(index
            .similarity_search_with_score(&[0.0, 0.0], 0)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing() {
        let index = VectorIndex::from_embeddings("rag_collection", vec![], vec![])
            .await
            .unwrap();
        assert!(index.is_empty());
        assert!(index
            .similarity_search_with_score(&[1.0, 2.0, 3.0], 5)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let index = sample_index().await;
        assert!(matches!(
            index.similarity_search_with_score(&[0.0, 0.0, 0.0], 1).await,
            Err(VectorStoreError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_inconsistent_embedding_dimensions_rejected() {
        let result = VectorIndex::from_embeddings(
            "rag_collection",
            vec![chunk("a", "a.pdf"), chunk("b", "b.pdf")],
            vec![vec![1.0, 2.0], vec![1.0]],
        )
        .await;
        assert!(matches!(
            result,
            Err(VectorStoreError::DimensionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_embedding_count_mismatch_rejected() {
        let result =
            VectorIndex::from_embeddings("rag_collection", vec![chunk("a", "a.pdf")], vec![])
                .await;
        assert!(matches!(
            result,
            Err(VectorStoreError::CountMismatch {
                expected: 1,
                got: 0
            })
        ));
    }
}
