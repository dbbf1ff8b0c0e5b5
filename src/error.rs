use thiserror::Error;

/// Errors surfaced by the data pipeline. All operations are pure,
/// deterministic, in-memory transforms, so nothing here is retried.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The source dataset could not be read or parsed.
    #[error("failed to load dataset: {0}")]
    DataLoad(String),

    /// A derived or requested column is absent from the loaded table.
    /// Indicates a registry/loader schema mismatch, not user error.
    #[error("column not found in dataset: {0}")]
    ColumnNotFound(String),

    /// A category label outside the fixed registry reached a lookup.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
