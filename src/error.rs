use thiserror::Error;

/// Shape and configuration failures raised at the ingestion boundary.
///
/// Transport and file errors travel as `anyhow::Error` with context; these
/// are the cases callers may want to match on.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source returned no rows; expected a header row")]
    MissingHeader,

    #[error("source returned {rows} row(s); expected a header and at least one data row")]
    TooFewRows { rows: usize },

    #[error("missing configuration: environment variable {var} is not set")]
    MissingConfig { var: &'static str },
}
