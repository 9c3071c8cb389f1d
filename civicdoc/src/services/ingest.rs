use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, IngestConfig};
use crate::error::{CivicdocError, Result};
use crate::models::{DocumentFormat, ParsedDocument};
use crate::processing::DocumentNormalizer;

/// A file that could not be normalized during a batch run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of ingesting a directory. All lists are sorted by path.
#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub documents: Vec<ParsedDocument>,
    pub failures: Vec<IngestFailure>,
    pub skipped: Vec<PathBuf>,
}

/// Runs the blocking normalizer off the async runtime under a deadline.
pub async fn parse_document_file_with_timeout(
    normalizer: Arc<DocumentNormalizer>,
    path: PathBuf,
    timeout: Duration,
) -> Result<ParsedDocument> {
    let task_path = path.clone();
    let handle = tokio::task::spawn_blocking(move || normalizer.parse(&task_path));

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(parsed)) => Ok(parsed?),
        Ok(Err(join_err)) => Err(CivicdocError::Worker(join_err.to_string())),
        Err(_) => Err(CivicdocError::Timeout {
            path,
            secs: timeout.as_secs(),
        }),
    }
}

/// Lists regular files under `dir`, split into supported documents and
/// everything else. Both lists are sorted.
///
/// Symlinks to files are listed like the files themselves. Symlinked
/// directories are never descended into, so link cycles cannot recurse.
pub fn discover_documents(dir: &Path, recursive: bool) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    if !dir.is_dir() {
        return Err(CivicdocError::Config(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut documents = Vec::new();
    let mut skipped = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if file_type.is_symlink() && path.is_dir() {
                debug!(path = %path.display(), "Not following directory symlink");
            } else if path.is_file() {
                if DocumentFormat::from_path(&path).is_some() {
                    documents.push(path);
                } else {
                    skipped.push(path);
                }
            }
        }
    }

    documents.sort();
    skipped.sort();
    Ok((documents, skipped))
}

/// Normalizes every supported file in a directory with bounded parallelism.
#[derive(Clone)]
pub struct IngestService {
    normalizer: Arc<DocumentNormalizer>,
    config: IngestConfig,
}

impl IngestService {
    pub fn new(config: &Config) -> Self {
        Self {
            normalizer: Arc::new(DocumentNormalizer::new(config.normalizer.clone())),
            config: config.ingest.clone(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency.max(1);
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.config.recursive = recursive;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub async fn parse_file(&self, path: PathBuf) -> Result<ParsedDocument> {
        parse_document_file_with_timeout(
            Arc::clone(&self.normalizer),
            path,
            Duration::from_secs(self.config.parse_timeout_secs),
        )
        .await
    }

    /// Parses every supported file under `dir`.
    ///
    /// Individual failures are collected in the report; only problems
    /// listing the directory itself fail the whole run.
    pub async fn ingest_directory(&self, dir: &Path) -> Result<IngestReport> {
        info!("Starting ingestion of {}", dir.display());

        let root = dir.to_path_buf();
        let recursive = self.config.recursive;
        let (paths, skipped) =
            tokio::task::spawn_blocking(move || discover_documents(&root, recursive))
                .await
                .map_err(|e| CivicdocError::Worker(e.to_string()))??;

        for path in &skipped {
            debug!("Skipping unsupported file: {}", path.display());
        }

        let total = paths.len();
        let results: Vec<(PathBuf, Result<ParsedDocument>)> = stream::iter(paths)
            .map(|path| async move {
                let result = self.parse_file(path.clone()).await;
                (path, result)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut report = IngestReport {
            skipped,
            ..IngestReport::default()
        };

        for (path, result) in results {
            match result {
                Ok(doc) => report.documents.push(doc),
                Err(e) => {
                    warn!("Failed to ingest {}: {}", path.display(), e);
                    report.failures.push(IngestFailure {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        report.documents.sort_by(|a, b| a.source.cmp(&b.source));
        report.failures.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            "Ingestion complete: {} parsed, {} failed, {} skipped out of {} candidates",
            report.documents.len(),
            report.failures.len(),
            report.skipped.len(),
            total
        );

        Ok(report)
    }
}
