// CV corpus: PDF loading, chunking, and the metadata carried by every chunk.
// Runs once at startup; nothing here is touched by request handlers.

pub mod loader;
pub mod splitter;

use uuid::Uuid;

use crate::corpus::splitter::RecursiveCharacterSplitter;

/// Display name used when a chunk has no usable source path.
pub const UNKNOWN_CV: &str = "Unknown CV";

/// Text of one PDF page plus where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub source: Option<String>,
    /// 0-based page index within the source PDF.
    pub page: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMetadata {
    pub source: Option<String>,
    pub page: Option<usize>,
    /// Always non-empty. See `derive_cv_name`.
    pub cv_name: String,
}

/// Unit of embedding and retrieval.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Row key in the vector table.
    pub id: Uuid,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            metadata,
        }
    }
}

/// The final path segment of `source`, split on either separator style.
/// Falls back to `UNKNOWN_CV` when the source is absent or ends in a separator.
pub fn derive_cv_name(source: Option<&str>) -> String {
    source
        .and_then(|s| s.rsplit(|c: char| c == '/' || c == '\\').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_CV)
        .to_string()
}

/// Splits every document and tags each resulting chunk with its CV name.
pub fn split_documents(documents: &[Document], splitter: &RecursiveCharacterSplitter) -> Vec<Chunk> {
    documents
        .iter()
        .flat_map(|doc| {
            let metadata = ChunkMetadata {
                source: doc.source.clone(),
                page: doc.page,
                cv_name: derive_cv_name(doc.source.as_deref()),
            };
            splitter
                .split_text(&doc.text)
                .into_iter()
                .map(move |text| Chunk::new(text, metadata.clone()))
        })
        .collect()
}
