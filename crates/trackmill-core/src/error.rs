//! Error types for the aggregation engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("tracker request failed: {0}")]
    Repository(String),

    #[error("issue {id}: {source}")]
    Issue {
        id: String,
        #[source]
        source: Box<Error>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach the id of the issue that was being processed when the
    /// underlying failure occurred.
    pub fn for_issue(id: impl Into<String>, source: Error) -> Self {
        Error::Issue {
            id: id.into(),
            source: Box::new(source),
        }
    }
}
