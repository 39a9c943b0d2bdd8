//! API DTOs (Data Transfer Objects)

use platform::rate_limit::RateLimitPolicy;
use serde::Serialize;

use crate::domain::entities::Decision;
use crate::domain::value_objects::BackendKind;

pub const RATE_LIMIT_EXCEEDED: &str = "Rate limit exceeded";

/// Policy echoed back to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsDto {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl From<&RateLimitPolicy> for LimitsDto {
    fn from(policy: &RateLimitPolicy) -> Self {
        Self {
            max_requests: policy.max_requests,
            window_seconds: policy.window_secs(),
        }
    }
}

/// 429 body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitExceededResponse {
    pub error: &'static str,
    pub message: String,
    pub rate_limit_type: BackendKind,
    pub reset_time: String,
    pub limits: LimitsDto,
}

impl From<&Decision> for RateLimitExceededResponse {
    fn from(decision: &Decision) -> Self {
        Self {
            error: RATE_LIMIT_EXCEEDED,
            message: format!(
                "Too many requests. Maximum {} requests per {} seconds allowed.",
                decision.limit, decision.window_secs
            ),
            rate_limit_type: decision.backend,
            reset_time: decision.reset_iso(),
            limits: LimitsDto {
                max_requests: decision.limit,
                window_seconds: decision.window_secs,
            },
        }
    }
}

/// Response for GET /api/{backend}-protected
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedResponse {
    pub message: String,
    pub rate_limit_type: BackendKind,
    #[serde(rename = "clientIP")]
    pub client_ip: String,
    pub timestamp: String,
    pub limits: LimitsDto,
}

/// Response for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backends: Vec<BackendHealth>,
    pub limits: LimitsDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendHealth {
    #[serde(rename = "type")]
    pub backend: BackendKind,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BackendHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
