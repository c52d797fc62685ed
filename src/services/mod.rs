//! Remote calculation services
//!
//! The analysis core consumes three request/response services. Each is a
//! trait so the orchestrator can run against the HTTP client in production
//! and against in-process fakes in tests.
//!
//! | Service            | Calls                                   |
//! |--------------------|-----------------------------------------|
//! | Fluid properties   | `compute_properties`, `compute_curve`   |
//! | Inflow performance | `compute_inflow`                        |
//! | Lift performance   | `compute_lift_performance`, `recommend` |
//!
//! Retries are the transport's business; `ServiceError::is_retryable` only
//! classifies a failure.

mod http;

pub use http::HttpCalculationClient;

use crate::types::{
    FluidCurveResponse, FluidInputs, FluidPropertiesResponse, InflowInputs, InflowResponse,
    LiftRequest, LiftResponse, RecommendationInputs, RecommendationResponse,
};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// Error Type
// ============================================================================

/// Structured failure from a calculation service: HTTP-like status (absent
/// for transport failures) plus the service's message list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct ServiceError {
    pub status: Option<u16>,
    pub messages: Vec<String>,
}

impl ServiceError {
    pub fn http(status: u16, messages: Vec<String>) -> Self {
        Self {
            status: Some(status),
            messages,
        }
    }

    /// Connection, timeout or other failure before a status was received.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            messages: vec![message.into()],
        }
    }

    /// A response arrived but its body could not be decoded.
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            status: None,
            messages: vec![format!("invalid response body: {}", message.into())],
        }
    }

    /// 4xx responses other than request-timeout (408) and rate-limit (429)
    /// will fail again unchanged; everything else may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self.status {
            Some(408 | 429) => true,
            Some(s) if (400..500).contains(&s) => false,
            _ => true,
        }
    }

    fn describe(&self) -> String {
        let body = if self.messages.is_empty() {
            "no details".to_string()
        } else {
            self.messages.join("; ")
        };
        match self.status {
            Some(s) => format!("service returned status {s}: {body}"),
            None => format!("service unavailable: {body}"),
        }
    }
}

// ============================================================================
// Service Traits
// ============================================================================

/// PVT service.
#[async_trait]
pub trait FluidPropertyService: Send + Sync {
    /// Point values at the given conditions.
    async fn compute_properties(
        &self,
        inputs: &FluidInputs,
    ) -> Result<FluidPropertiesResponse, ServiceError>;

    /// Property-vs-pressure curve; consumed for per-method bubble points.
    async fn compute_curve(&self, inputs: &FluidInputs) -> Result<FluidCurveResponse, ServiceError>;
}

/// IPR service.
#[async_trait]
pub trait InflowService: Send + Sync {
    async fn compute_inflow(&self, inputs: &InflowInputs) -> Result<InflowResponse, ServiceError>;
}

/// VLP service.
#[async_trait]
pub trait LiftPerformanceService: Send + Sync {
    async fn compute_lift_performance(
        &self,
        request: &LiftRequest,
    ) -> Result<LiftResponse, ServiceError>;

    async fn recommend(
        &self,
        inputs: &RecommendationInputs,
    ) -> Result<RecommendationResponse, ServiceError>;
}
