//! Fetch-and-concatenate loading of biographical documents.
//!
//! Two policies coexist on purpose:
//! - [`CorpusLoader::load_dir`] never fails. An unreadable directory or an
//!   empty one yields a sentinel context.
//! - [`CorpusLoader::load_urls`] and [`CorpusLoader::load`] are atomic. Any
//!   single failure fails the whole batch.

use std::path::{Path, PathBuf};

use biograph_core::{CorpusContext, Document};
use futures::future::try_join_all;

use crate::error::LoadError;

/// Sentinel used when the corpus directory cannot be read.
pub const LOAD_ERROR_SENTINEL: &str = "Error loading documents";

/// One corpus locator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorpusSource {
    Url(String),
    Path(PathBuf),
}

impl CorpusSource {
    /// Classify a locator string: `http://` and `https://` are URLs, anything
    /// else is a local path.
    pub fn parse(locator: &str) -> Self {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            CorpusSource::Url(locator.to_string())
        } else {
            CorpusSource::Path(PathBuf::from(locator))
        }
    }
}

/// Loads and concatenates corpus documents.
#[derive(Clone)]
pub struct CorpusLoader {
    client: reqwest::Client,
    extensions: Vec<String>,
}

impl CorpusLoader {
    /// Create a loader accepting files with the given extensions (no dot).
    pub fn new(extensions: Vec<String>) -> Self {
        Self::with_client(reqwest::Client::new(), extensions)
    }

    pub fn with_client(client: reqwest::Client, extensions: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self { client, extensions }
    }

    /// Load every matching file in `dir`, ordered by file name.
    pub async fn load_dir(&self, dir: &Path) -> CorpusContext {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(dir = %dir.display(), error = %e, "Corpus directory unreadable");
                return CorpusContext::sentinel(LOAD_ERROR_SENTINEL);
            }
        };

        let mut paths = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if self.accepts(&path) && is_regular_file(&entry).await {
                        paths.push(path);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(dir = %dir.display(), error = %e, "Corpus directory listing failed");
                    return CorpusContext::sentinel(LOAD_ERROR_SENTINEL);
                }
            }
        }

        if paths.is_empty() {
            tracing::warn!(dir = %dir.display(), "No corpus documents found");
            return CorpusContext::sentinel(self.empty_sentinel(dir));
        }

        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in &paths {
            match tokio::fs::read_to_string(path).await {
                Ok(content) => documents.push(Document::new(file_name(path), content)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable corpus document");
                }
            }
        }

        if documents.is_empty() {
            return CorpusContext::sentinel(LOAD_ERROR_SENTINEL);
        }

        tracing::info!(
            dir = %dir.display(),
            documents = documents.len(),
            "Corpus loaded from directory"
        );
        CorpusContext::from_documents(&documents)
    }

    /// Fetch all URLs concurrently; the first failure fails the batch.
    pub async fn load_urls(&self, urls: &[String]) -> Result<CorpusContext, LoadError> {
        if urls.is_empty() {
            return Err(LoadError::Empty);
        }
        let documents = try_join_all(urls.iter().map(|url| self.fetch(url))).await?;
        tracing::info!(documents = documents.len(), "Corpus loaded from URLs");
        Ok(CorpusContext::from_documents(&documents))
    }

    /// Load mixed locators in order. Any failure is fatal.
    pub async fn load(&self, sources: &[CorpusSource]) -> Result<CorpusContext, LoadError> {
        if sources.is_empty() {
            return Err(LoadError::Empty);
        }
        let documents = try_join_all(sources.iter().map(|source| async move {
            match source {
                CorpusSource::Url(url) => self.fetch(url).await,
                CorpusSource::Path(path) => read_file(path).await,
            }
        }))
        .await?;
        Ok(CorpusContext::from_documents(&documents))
    }

    async fn fetch(&self, url: &str) -> Result<Document, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await.map_err(|e| LoadError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(url = %url, bytes = content.len(), "Fetched corpus document");
        Ok(Document::new(url_name(url), content))
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    fn empty_sentinel(&self, dir: &Path) -> String {
        let kinds = self
            .extensions
            .iter()
            .map(|e| format!(".{}", e))
            .collect::<Vec<_>>()
            .join(" or ");
        format!(
            "No documents found. Please add {} files to {}",
            kinds,
            dir.display()
        )
    }
}

async fn read_file(path: &Path) -> Result<Document, LoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Document::new(file_name(path), content))
}

/// Regular file, following symlinks.
async fn is_regular_file(entry: &tokio::fs::DirEntry) -> bool {
    match entry.file_type().await {
        Ok(kind) if kind.is_symlink() => tokio::fs::metadata(entry.path())
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false),
        Ok(kind) => kind.is_file(),
        Err(_) => false,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Last non-empty path segment of a URL, or the URL itself.
fn url_name(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string)
        })
        .unwrap_or_else(|| url.to_string())
}
