mod config;
mod corpus;
mod embeddings;
mod errors;
mod llm_client;
mod recruiter;
mod routes;
mod state;
mod vector_store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::corpus::loader::load_pdf_directory;
use crate::corpus::splitter::RecursiveCharacterSplitter;
use crate::corpus::split_documents;
use crate::embeddings::GeminiEmbedder;
use crate::llm_client::LlmClient;
use crate::recruiter::Recruiter;
use crate::routes::build_router;
use crate::state::AppState;
use crate::vector_store::VectorIndex;

const COLLECTION_NAME: &str = "rag_collection";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV matcher v{}", env!("CARGO_PKG_VERSION"));

    let splitter = RecursiveCharacterSplitter::new(config.chunk_size, config.chunk_overlap)?;

    // Ingest the corpus (blocking PDF extraction off the async workers)
    let cv_dir = config.cv_dir.clone();
    let documents = tokio::task::spawn_blocking(move || load_pdf_directory(&cv_dir))
        .await
        .context("PDF loader task panicked")??;
    let chunks = split_documents(&documents, &splitter);
    info!(
        "Split {} pages into {} chunks (size {}, overlap {})",
        documents.len(),
        chunks.len(),
        splitter.chunk_size(),
        splitter.chunk_overlap()
    );
    drop(documents);

    // Initialize model clients
    let embedder = Arc::new(GeminiEmbedder::new(config.google_api_key.clone())?);
    info!("Embedding client initialized (model: {})", embeddings::gemini::MODEL);
    let llm = Arc::new(LlmClient::new(config.cohere_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Embed and index every chunk once, before serving
    let index = VectorIndex::from_chunks(COLLECTION_NAME, chunks, embedder.as_ref()).await?;

    let state = AppState {
        recruiter: Recruiter::new(Arc::new(index), embedder, llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
