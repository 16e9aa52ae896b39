//! Error types for the stage pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Stage → Detail

use thiserror::Error;

use crate::timeline::BuildError;
use crate::validation::OverlapError;

/// Top-level error with run context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The base timeline could not be built.
    #[error("Run '{run_name}' could not build a timeline: {source}")]
    BuildFailed {
        run_name: String,
        #[source]
        source: BuildError,
    },

    /// A stage failed.
    #[error("Run '{run_name}' failed at stage '{stage_name}': {source}")]
    StageFailed {
        run_name: String,
        stage_name: String,
        #[source]
        source: StageError,
    },

    /// The request itself is unusable.
    #[error("Run '{run_name}' has an invalid request: {message}")]
    InvalidRequest { run_name: String, message: String },
}

impl PipelineError {
    pub fn build_failed(run_name: impl Into<String>, source: BuildError) -> Self {
        Self::BuildFailed {
            run_name: run_name.into(),
            source,
        }
    }

    pub fn stage_failed(
        run_name: impl Into<String>,
        stage_name: impl Into<String>,
        source: StageError,
    ) -> Self {
        Self::StageFailed {
            run_name: run_name.into(),
            stage_name: stage_name.into(),
            source,
        }
    }

    pub fn invalid_request(run_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            run_name: run_name.into(),
            message: message.into(),
        }
    }
}

/// Error from a single stage.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// Exclusive tracks still overlap after validation.
    #[error(transparent)]
    Overlap(#[from] OverlapError),
}

impl StageError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }
}

pub type StageResult<T> = Result<T, StageError>;

pub type PipelineResult<T> = Result<T, PipelineError>;
