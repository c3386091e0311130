//! PDF directory loader — one `Document` per page.
//!
//! Blocking and CPU-bound. Call from `tokio::task::spawn_blocking`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::corpus::Document;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CV directory '{0}' does not exist or is not a directory")]
    MissingDirectory(PathBuf),

    #[error("Failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from '{path}': {message}")]
    Pdf { path: PathBuf, message: String },
}

/// Loads every PDF under `dir` (recursively), one document per page.
/// Any unreadable file aborts the whole load.
pub fn load_pdf_directory(dir: &Path) -> Result<Vec<Document>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDirectory(dir.to_path_buf()));
    }

    let files = list_pdf_files(dir)?;
    if files.is_empty() {
        info!("No PDF files found under {}", dir.display());
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    for (file_index, path) in files.iter().enumerate() {
        debug!(
            "Extracting PDF {}/{}: {}",
            file_index + 1,
            files.len(),
            path.display()
        );
        let pages = extract_pages(path)?;
        let source = path.to_string_lossy().to_string();
        documents.extend(pages.into_iter().enumerate().map(|(page, text)| Document {
            text,
            source: Some(source.clone()),
            page: Some(page),
        }));
    }

    info!(
        "Loaded {} pages from {} PDF files under {}",
        documents.len(),
        files.len(),
        dir.display()
    );
    Ok(documents)
}

fn extract_pages(path: &Path) -> Result<Vec<String>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| LoadError::Pdf {
        path: path.to_path_buf(),
        message: format!("{e:?}"),
    })
}

/// Sorted list of `.pdf` files below `root`.
/// Hidden files and everything under hidden directories are skipped.
fn list_pdf_files(root: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_pdf(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
