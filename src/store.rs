//! Filesystem-backed document store.
//!
//! Documents live flat inside a single docs directory. The store never mutates
//! stored files; reads are the only operation. PDF page text comes from
//! `pdf-extract`, with form-feed characters treated as page separators.

use crate::segmenter::SegmentError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Metadata describing one stored document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    /// File name within the docs directory.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, RFC 3339.
    pub upload_time: String,
}

/// Read-only view over the configured docs directory.
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Open a store rooted at `root`, creating the directory when missing.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if let Err(error) = fs::create_dir_all(&root) {
            tracing::warn!(root = %root.display(), error = %error, "Failed to create docs directory");
        }
        Self { root }
    }

    /// Whether the named document exists as a regular file.
    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Read a plain-text document, replacing invalid UTF-8 instead of failing.
    pub fn read_text(&self, name: &str) -> Result<String, SegmentError> {
        let path = self.resolve_existing(name)?;
        let bytes = fs::read(&path)
            .map_err(|error| SegmentError::Extraction(format!("failed to read file: {error}")))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Extract per-page text from a PDF document.
    ///
    /// Pages are split on form feeds; empty pages are preserved so page
    /// numbering stays stable. A document with no page breaks is a single
    /// page. Parse failures surface as [`SegmentError::Extraction`], never a
    /// panic.
    pub fn page_texts(&self, name: &str) -> Result<Vec<String>, SegmentError> {
        let path = self.resolve_existing(name)?;
        let bytes = fs::read(&path)
            .map_err(|error| SegmentError::Extraction(format!("failed to read file: {error}")))?;
        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|error| SegmentError::Extraction(format!("PDF parse failed: {error}")))?;
        Ok(split_pages(&text))
    }

    /// Enumerate stored documents, newest first.
    pub fn list(&self) -> Vec<DocumentInfo> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!(root = %self.root.display(), error = %error, "Failed to list docs directory");
                return Vec::new();
            }
        };

        let mut documents: Vec<(std::time::SystemTime, DocumentInfo)> = entries
            .flatten()
            .filter_map(|entry| {
                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }
                let modified = metadata.modified().ok()?;
                let upload_time = OffsetDateTime::from(modified)
                    .format(&Rfc3339)
                    .unwrap_or_default();
                Some((
                    modified,
                    DocumentInfo {
                        filename: entry.file_name().to_string_lossy().into_owned(),
                        size: metadata.len(),
                        upload_time,
                    },
                ))
            })
            .collect();

        documents.sort_by(|a, b| b.0.cmp(&a.0));
        documents.into_iter().map(|(_, info)| info).collect()
    }

    fn resolve_existing(&self, name: &str) -> Result<PathBuf, SegmentError> {
        self.resolve(name)
            .filter(|path| path.is_file())
            .ok_or_else(|| SegmentError::NotFound(name.to_string()))
    }

    /// Resolve a document name inside the root, rejecting anything that could
    /// escape the docs directory.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name == "." || name == ".." {
            return None;
        }
        if name.contains('/') || name.contains('\\') {
            return None;
        }
        Some(self.root.join(name))
    }

    /// Root directory backing this store.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn split_pages(text: &str) -> Vec<String> {
    text.split('\x0C').map(str::to_string).collect()
}
