//! HTTP API request / response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::{ReportStatus, RiskLevel};

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub timestamp: String,
}

/// Room with its live membership count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub member_count: usize,
}

/// `GET /api/resources/crisis`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisResourcesDto {
    pub risk_level: RiskLevel,
    pub message: String,
}

/// `POST /api/moderation/reports` body. Fields are checked by the use case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub message_id: Option<String>,
    pub reason: Option<String>,
}

/// Excerpt of the reported message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedMessageDto {
    pub content: String,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterDto {
    pub nickname: String,
}

/// Stored report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDto {
    pub id: String,
    pub message_id: String,
    pub reported_by: String,
    pub reason: String,
    pub status: ReportStatus,
    /// RFC 3339 (UTC)
    pub created_at: String,
    pub message: Option<ReportedMessageDto>,
    pub reporter: Option<ReporterDto>,
}

/// Error body for non-2xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
