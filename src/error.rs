//! Errors raised while loading or querying a survey dataset.

use std::io;
use std::path::PathBuf;

/// Everything that can go wrong between opening the export and answering a query.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("cannot read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("unknown category key: {0:?}")]
    KeyNotFound(String),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl SurveyError {
    pub(crate) fn parse(line: u64, message: impl Into<String>) -> Self {
        SurveyError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
