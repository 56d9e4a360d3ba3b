use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::analysis::query::{self, AnalysisResult, AnalyzeRequest, ComparisonResult};
use crate::analysis::roles::{Role, RoleMap, resolve_roles};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Process-wide dataset
// ---------------------------------------------------------------------------

/// Holds the current dataset snapshot.
///
/// Replacement swaps in a new `Arc`; requests that already took a snapshot
/// keep reading the old one until they finish.
pub struct DatasetStore {
    /// File the active dataset is persisted to.
    data_path: PathBuf,
    current: RwLock<Option<Arc<Dataset>>>,
}

/// Column diagnostics for the active dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub rows: usize,
    pub columns: Vec<String>,
    pub roles: RoleMap,
    pub unresolved: Vec<Role>,
}

impl DatasetStore {
    /// An empty store backed by `data_path`. Nothing is read until
    /// [`load`](Self::load).
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            current: RwLock::new(None),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Read the dataset at the data path.
    ///
    /// A missing file leaves the store empty and is not an error. A file
    /// that fails to parse also leaves the store empty, and the failure is
    /// returned.
    pub fn load(&self) -> Result<Option<usize>> {
        if !self.data_path.exists() {
            log::info!("no dataset at {}", self.data_path.display());
            self.set(None);
            return Ok(None);
        }
        match load_file(&self.data_path) {
            Ok(dataset) => {
                let rows = dataset.len();
                self.set(Some(Arc::new(dataset)));
                Ok(Some(rows))
            }
            Err(err) => {
                log::warn!("failed to load {}: {err:#}", self.data_path.display());
                self.set(None);
                Err(AnalysisError::Load {
                    path: self.data_path.clone(),
                    reason: format!("{err:#}"),
                })
            }
        }
    }

    /// Validate `candidate`, persist it over the data path and make it the
    /// active dataset. On any failure the current snapshot stays active.
    pub fn replace_from_file(&self, candidate: &Path) -> Result<usize> {
        let ext = |p: &Path| p.extension().map(|e| e.to_ascii_lowercase());
        if ext(candidate) != ext(&self.data_path) {
            return Err(AnalysisError::Load {
                path: candidate.to_path_buf(),
                reason: format!(
                    "expected a file with the same extension as {}",
                    self.data_path.display()
                ),
            });
        }
        let dataset = load_file(candidate).map_err(|err| AnalysisError::Load {
            path: candidate.to_path_buf(),
            reason: format!("{err:#}"),
        })?;

        let same_file = candidate
            .canonicalize()
            .ok()
            .zip(self.data_path.canonicalize().ok())
            .is_some_and(|(a, b)| a == b);
        if !same_file {
            let persist_err = |err: std::io::Error| AnalysisError::Persist {
                path: self.data_path.clone(),
                reason: err.to_string(),
            };
            if let Some(parent) = self.data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(persist_err)?;
            }
            std::fs::copy(candidate, &self.data_path).map_err(persist_err)?;
        }

        let rows = dataset.len();
        self.set(Some(Arc::new(dataset)));
        log::info!("dataset replaced from {} ({rows} rows)", candidate.display());
        Ok(rows)
    }

    /// Copy the persisted dataset file to `dest`, returning the bytes
    /// written. The file is copied as stored, without parsing it.
    pub fn download_to(&self, dest: &Path) -> Result<u64> {
        if !self.data_path.is_file() {
            return Err(AnalysisError::NoPreloadFile);
        }
        let bytes = std::fs::copy(&self.data_path, dest).map_err(|err| AnalysisError::Persist {
            path: dest.to_path_buf(),
            reason: err.to_string(),
        })?;
        log::info!("copied {} to {} ({bytes} bytes)", self.data_path.display(), dest.display());
        Ok(bytes)
    }

    /// The dataset a request should use from start to finish.
    pub fn snapshot(&self) -> Result<Arc<Dataset>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AnalysisError::NoDataset)
    }

    fn set(&self, dataset: Option<Arc<Dataset>>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = dataset;
    }

    // -- Query entry points --

    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        if request.query.trim().is_empty() {
            return Err(AnalysisError::BlankQuery);
        }
        let dataset = self.snapshot()?;
        query::analyze(&dataset, request)
    }

    pub fn compare<S: AsRef<str>>(&self, labels: &[S], limit: usize) -> Result<ComparisonResult> {
        query::normalize_labels(labels)?;
        let dataset = self.snapshot()?;
        query::compare(&dataset, labels, limit)
    }

    pub fn columns(&self) -> Result<ColumnReport> {
        let dataset = self.snapshot()?;
        let roles = resolve_roles(&dataset.column_names);
        Ok(ColumnReport {
            rows: dataset.len(),
            columns: dataset.column_names.clone(),
            unresolved: roles.unresolved(),
            roles,
        })
    }
}
