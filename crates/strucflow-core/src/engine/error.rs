use thiserror::Error;

use super::config::ConfigError;
use crate::core::align::{AlignmentError, SimilarityError};
use crate::core::contacts::ContactError;
use crate::core::decode::DecodeError;
use crate::core::sequence::InvalidSequenceError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to decode record: {source}")]
    Decode {
        #[from]
        source: DecodeError,
    },

    #[error("Invalid sequence: {source}")]
    InvalidSequence {
        #[from]
        source: InvalidSequenceError,
    },

    #[error("Sequence alignment failed: {source}")]
    Alignment {
        #[from]
        source: AlignmentError,
    },

    #[error("Contact search failed: {source}")]
    Contact {
        #[from]
        source: ContactError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Stage '{stage}' failed: {reason}")]
    Stage { stage: &'static str, reason: String },

    #[error("Record '{id}': {source}")]
    Record {
        id: String,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Tags this error with the id of the record that produced it.
    pub fn for_record(self, id: impl Into<String>) -> Self {
        match self {
            already @ EngineError::Record { .. } => already,
            other => EngineError::Record {
                id: id.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, without record tagging.
    pub fn root(&self) -> &EngineError {
        match self {
            EngineError::Record { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<SimilarityError> for EngineError {
    fn from(err: SimilarityError) -> Self {
        match err {
            SimilarityError::InvalidSequence(source) => EngineError::InvalidSequence { source },
            SimilarityError::Alignment(source) => EngineError::Alignment { source },
        }
    }
}
