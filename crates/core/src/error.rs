//! Generation errors.

use std::io;

use restygen_common::ModelError;
use thiserror::Error;

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Fatal error aborting a generation round.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// An annotated entity lacks an enclosing interface, or a name is empty
    /// or unparseable.
    #[error("malformed declaration: {0}")]
    MalformedDeclaration(String),

    /// The output sink could not be created or written.
    #[error("failed to write artifact `{artifact}`: {source}")]
    ArtifactWriteFailure {
        /// Fully-qualified name of the artifact.
        artifact: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A member's concrete signature could not be resolved.
    #[error("type resolution failed: {0}")]
    TypeResolutionFailure(String),
}

impl GenerateError {
    pub(crate) fn write_failure(artifact: &str, source: io::Error) -> Self {
        GenerateError::ArtifactWriteFailure {
            artifact: artifact.to_string(),
            source,
        }
    }
}

impl From<ModelError> for GenerateError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Malformed(message) => GenerateError::MalformedDeclaration(message),
            other => GenerateError::TypeResolutionFailure(other.to_string()),
        }
    }
}
