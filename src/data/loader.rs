//! Dataset loading
//!
//! A load is one fetch, one parse and one validation pass. There are no
//! retries: the first failure is the result.

use crate::data::csv_parser::parse_csv_bytes;
use crate::data::error::{LoadError, LoadResult};
use crate::data::validator::{ColumnMap, validate_record};
use crate::settings::ColumnNames;
use crate::types::FilteredDataset;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Status and body of a completed fetch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of resource bodies
pub trait ResourceFetcher {
    fn fetch(&self, path: &str) -> LoadResult<FetchResponse>;
}

impl<F: ResourceFetcher + ?Sized> ResourceFetcher for &F {
    fn fetch(&self, path: &str) -> LoadResult<FetchResponse> {
        (**self).fetch(path)
    }
}

impl<F: ResourceFetcher + ?Sized> ResourceFetcher for Box<F> {
    fn fetch(&self, path: &str) -> LoadResult<FetchResponse> {
        (**self).fetch(path)
    }
}

/// Serves resources from a root directory with static-server status codes
///
/// - missing file: 404
/// - permission denied, or a path escaping the root: 403
/// - any other read failure: 500
#[derive(Clone, Debug)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request path under the root, `None` if it escapes.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

impl ResourceFetcher for FileFetcher {
    fn fetch(&self, path: &str) -> LoadResult<FetchResponse> {
        let Some(resolved) = self.resolve(path) else {
            return Ok(FetchResponse::status(403));
        };
        if resolved.is_dir() {
            return Ok(FetchResponse::status(404));
        }

        match std::fs::read(&resolved) {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(e) => {
                let status = match e.kind() {
                    ErrorKind::NotFound => 404,
                    ErrorKind::PermissionDenied => 403,
                    _ => 500,
                };
                debug!(path = %resolved.display(), error = %e, status, "Resource read failed");
                Ok(FetchResponse::status(status))
            }
        }
    }
}

/// Outcome of a successful load
#[derive(Clone, Debug, PartialEq)]
pub struct LoadReport {
    pub dataset: FilteredDataset,
    /// Records parsed from the body
    pub parsed: usize,
    /// Records dropped by the row validator
    pub rejected: usize,
}

/// Fetches, parses and validates the dataset resource.
pub struct DataLoader<F> {
    fetcher: F,
    columns: ColumnNames,
}

impl<F: ResourceFetcher> DataLoader<F> {
    pub fn new(fetcher: F, columns: ColumnNames) -> Self {
        Self { fetcher, columns }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load `path` into a [`FilteredDataset`].
    ///
    /// Invalid rows are dropped without individual reporting; only the count
    /// reaches the [`LoadReport`].
    pub fn load(&self, path: &str) -> LoadResult<LoadReport> {
        let response = self.fetcher.fetch(path)?;
        if !response.is_success() {
            return Err(LoadError::network(response.status));
        }

        let table = parse_csv_bytes(&response.body)?;
        let columns = ColumnMap::resolve(&table, &self.columns);
        let missing = columns.missing(&self.columns);
        if !missing.is_empty() {
            warn!(path, ?missing, "Resource header lacks expected columns");
        }

        let parsed = table.row_count();
        let rows: Vec<_> = table
            .records
            .iter()
            .filter_map(|record| validate_record(record, &columns).ok())
            .collect();
        let rejected = parsed - rows.len();

        debug!(path, parsed, rejected, "Validated resource rows");
        info!(path, rows = rows.len(), "Loaded dataset");

        Ok(LoadReport {
            dataset: FilteredDataset::new(rows),
            parsed,
            rejected,
        })
    }
}
