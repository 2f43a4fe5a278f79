//! Error types for workflow document handling.

use thiserror::Error;

/// Result type for workflow operations.
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors that can occur when loading or validating workflow documents.
///
/// The generator and executor themselves are infallible by contract: the
/// generator answers under-specified input with a clarification question and
/// the executor records per-step failures in the execution log. These errors
/// cover the caller-side surface — documents arriving from outside the
/// generator (stdin, files) that may be malformed.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Document is not valid JSON or does not match the workflow schema.
    #[error("Invalid workflow document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// A step references a dependency id that is not in the workflow.
    #[error("Step '{step}' depends on unknown step '{dependency}'")]
    UnknownDependency { step: String, dependency: String },

    /// Two steps share the same id.
    #[error("Duplicate step id '{0}'")]
    DuplicateStepId(String),

    /// A step is missing its reasoning text.
    #[error("Step '{0}' has an empty reasoning field")]
    MissingReasoning(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
