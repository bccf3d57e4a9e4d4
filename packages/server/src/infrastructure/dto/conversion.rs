//! Conversion logic between DTOs and domain entities.

use yorisoi_shared::time::timestamp_to_rfc3339;

use crate::domain::{AuthorProfile, Report, ReportedMessage, RoomSummary, StoredMessage};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<AuthorProfile> for dto::ProfileDto {
    fn from(model: AuthorProfile) -> Self {
        Self {
            nickname: model.nickname,
            avatar: model.avatar,
        }
    }
}

impl From<StoredMessage> for dto::StoredMessageDto {
    fn from(model: StoredMessage) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id.into_string(),
            user_id: model.user_id.into_string(),
            content: model.content.into_string(),
            risk_level: model.risk_level,
            created_at: timestamp_to_rfc3339(model.created_at.value()),
            profile: model.profile.map(Into::into),
        }
    }
}

impl From<StoredMessage> for dto::ChatMessage {
    fn from(model: StoredMessage) -> Self {
        Self {
            r#type: dto::MessageType::Chat,
            message: model.into(),
        }
    }
}

impl From<RoomSummary> for http::RoomSummaryDto {
    fn from(model: RoomSummary) -> Self {
        Self {
            id: model.room_id.into_string(),
            member_count: model.member_count,
        }
    }
}

impl From<ReportedMessage> for http::ReportedMessageDto {
    fn from(model: ReportedMessage) -> Self {
        Self {
            content: model.content.into_string(),
            risk_level: model.risk_level,
        }
    }
}

impl From<Report> for http::ReportDto {
    fn from(model: Report) -> Self {
        Self {
            id: model.id,
            message_id: model.message_id,
            reported_by: model.reported_by.into_string(),
            reason: model.reason,
            status: model.status,
            created_at: timestamp_to_rfc3339(model.created_at.value()),
            message: model.message.map(Into::into),
            reporter: model.reporter.map(|profile| http::ReporterDto {
                nickname: profile.nickname,
            }),
        }
    }
}
