//! HTTP/JSON client for the calculation services.

use super::{FluidPropertyService, InflowService, LiftPerformanceService, ServiceError};
use crate::config::ServiceConfig;
use crate::types::{
    FluidCurveResponse, FluidInputs, FluidPropertiesResponse, InflowInputs, InflowResponse,
    LiftRequest, LiftResponse, RecommendationInputs, RecommendationResponse,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const PVT_CALCULATE: &str = "/pvt/calculate";
const PVT_CURVE: &str = "/pvt/curve";
const IPR_CALCULATE: &str = "/ipr/calculate";
const VLP_CALCULATE: &str = "/vlp/calculate";
const VLP_RECOMMEND: &str = "/vlp/recommend";

/// One client serving all three service traits against a common base URL.
#[derive(Clone)]
pub struct HttpCalculationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCalculationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "calculation service request");

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ServiceError::http(status.as_u16(), error_messages(&bytes)));
        }
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::decode(e.to_string()))
    }
}

/// Pull a message list out of an error body.
///
/// Accepts `{"messages": [..]}`, `{"detail": "..." | [..]}` and
/// `{"error": "..."}`; anything else is returned as raw text.
fn error_messages(body: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(body).trim().to_string();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
        return if text.is_empty() { Vec::new() } else { vec![text] };
    };

    let as_list = |v: &serde_json::Value| -> Vec<String> {
        match v {
            serde_json::Value::String(s) => vec![s.clone()],
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Object(o) => o
                        .get("msg")
                        .and_then(|m| m.as_str())
                        .map_or_else(|| item.to_string(), str::to_string),
                    other => other.to_string(),
                })
                .collect(),
            other => vec![other.to_string()],
        }
    };

    ["messages", "detail", "error"]
        .iter()
        .find_map(|key| value.get(key).map(as_list))
        .unwrap_or_else(|| vec![text])
}

#[async_trait]
impl FluidPropertyService for HttpCalculationClient {
    async fn compute_properties(
        &self,
        inputs: &FluidInputs,
    ) -> Result<FluidPropertiesResponse, ServiceError> {
        self.post_json(PVT_CALCULATE, inputs).await
    }

    async fn compute_curve(
        &self,
        inputs: &FluidInputs,
    ) -> Result<FluidCurveResponse, ServiceError> {
        self.post_json(PVT_CURVE, inputs).await
    }
}

#[async_trait]
impl InflowService for HttpCalculationClient {
    async fn compute_inflow(&self, inputs: &InflowInputs) -> Result<InflowResponse, ServiceError> {
        self.post_json(IPR_CALCULATE, inputs).await
    }
}

#[async_trait]
impl LiftPerformanceService for HttpCalculationClient {
    async fn compute_lift_performance(
        &self,
        request: &LiftRequest,
    ) -> Result<LiftResponse, ServiceError> {
        self.post_json(VLP_CALCULATE, request).await
    }

    async fn recommend(
        &self,
        inputs: &RecommendationInputs,
    ) -> Result<RecommendationResponse, ServiceError> {
        self.post_json(VLP_RECOMMEND, inputs).await
    }
}
