//! Error taxonomy for orchestration operations.
//!
//! "No operating point" is not an error: it is reported as `None`.

use super::state::StageKind;
use crate::services::ServiceError;
use crate::types::CurveValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A curve was malformed; retrying with the same data will fail again.
    #[error("invalid curve: {0}")]
    Validation(#[from] CurveValidationError),

    /// A remote calculation failed; the stage is marked failed and prior
    /// results are kept.
    #[error("{stage} calculation failed: {source}")]
    Upstream {
        stage: StageKind,
        #[source]
        source: ServiceError,
    },

    /// The operation ran before a stage it depends on. No remote call was made.
    #[error("precondition not met: {0}")]
    Precondition(String),
}

impl AnalysisError {
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Upstream { source, .. } => source.is_retryable(),
            AnalysisError::Validation(_) | AnalysisError::Precondition(_) => false,
        }
    }

    pub fn stage(&self) -> Option<StageKind> {
        match self {
            AnalysisError::Upstream { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
