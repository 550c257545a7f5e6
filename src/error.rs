use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced to the caller. Per-page detail failures are absorbed
/// at the fetch layer and never reach this taxonomy.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The list page could not be fetched. Recoverable by snapshot
    /// substitution, unlike [`CrawlError::EmptyResult`].
    #[error("could not reach the movie source: {0:#}")]
    Network(anyhow::Error),

    /// The list page was fetched but no row survived extraction, which
    /// signals a markup break rather than a connectivity problem.
    #[error("the movie list page yielded no parsable rows")]
    EmptyResult,

    /// Search filters eliminated every record.
    #[error("no movie matched the given filters")]
    NoMatch,

    /// Exact-title lookup had no match in the list.
    #[error("no movie titled {0:?}")]
    NotFound(String),

    /// Snapshot read/write failed where a snapshot was required.
    #[error("snapshot store failure: {0}")]
    Persistence(#[from] SnapshotError),
}

/// Failures of the snapshot persistence boundary.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no snapshot at {}", .0.display())]
    NotFound(PathBuf),

    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding: {0}")]
    Csv(#[from] csv::Error),

    #[error("cast list encoding: {0}")]
    CastList(#[from] serde_json::Error),

    #[error("snapshot row {row}: invalid {field}: {value:?}")]
    BadField {
        row: usize,
        field: &'static str,
        value: String,
    },
}
