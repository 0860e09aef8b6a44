//! Snapshot reader for the schedstat pseudo-file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use super::parser::{ParseError, parse_schedstat};
use crate::collector::traits::FileSystem;
use crate::model::Snapshot;

/// Where the kernel exposes scheduler statistics.
pub const DEFAULT_SCHEDSTAT_PATH: &str = "/proc/schedstat";

/// Error type for snapshot collection failures.
#[derive(Debug)]
pub enum CollectError {
    /// The source could not be read at all.
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The content did not match any known layout.
    Parse(ParseError),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::SourceUnavailable { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            CollectError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::SourceUnavailable { source, .. } => Some(source),
            CollectError::Parse(e) => Some(e),
        }
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e)
    }
}

/// Takes complete snapshots of a schedstat source.
///
/// Every call to [`read`](Self::read) reads the whole file once and decodes
/// it from scratch; nothing is carried over between reads.
pub struct SnapshotReader<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> SnapshotReader<F> {
    /// Creates a new reader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `path` - Path to the schedstat file (usually `/proc/schedstat`)
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the source exists. Kernels built without `CONFIG_SCHEDSTATS`
    /// do not expose the file.
    pub fn is_available(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Reads and decodes one snapshot.
    pub fn read(&self) -> Result<Snapshot, CollectError> {
        let start = Instant::now();

        let content =
            self.fs
                .read_to_string(&self.path)
                .map_err(|source| CollectError::SourceUnavailable {
                    path: self.path.clone(),
                    source,
                })?;
        let snapshot = parse_schedstat(&content)?;

        debug!(
            "Read {}: version={}, domains={}, cpus={}, took {:?}",
            self.path.display(),
            snapshot.version(),
            snapshot.domains().len(),
            snapshot.cpus().len(),
            start.elapsed()
        );

        Ok(snapshot)
    }
}
