//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use serde::Deserialize;

use crate::{
    domain::{AuthError, Identity, RiskLevel, RoomId, resources_for},
    infrastructure::dto::{
        http::{
            CreateReportRequest, CrisisResourcesDto, ErrorBody, HealthDto, ReportDto,
            RoomSummaryDto,
        },
        websocket::StoredMessageDto,
    },
    ui::state::AppState,
    usecase::ReportError,
};

type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// `limit` is kept raw so that a missing, zero or non-numeric value falls back
/// to the default page size instead of rejecting the request
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CrisisResourcesQuery {
    pub risk_level: Option<String>,
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody::new(message)))
}

fn auth_error(e: AuthError) -> ApiError {
    tracing::debug!("Rejected API request: {}", e);
    let status = match e {
        AuthError::NotModerator => StatusCode::FORBIDDEN,
        AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
    };
    api_error(status, e.to_string())
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    state
        .authenticate_usecase
        .execute(authorization(headers))
        .await
        .map_err(auth_error)
}

async fn authenticate_moderator(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Identity, ApiError> {
    state
        .authenticate_usecase
        .execute_moderator(authorization(headers))
        .await
        .map_err(auth_error)
}

/// Positive integer `limit`, otherwise `default`
fn resolve_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(default)
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        timestamp: state.clock.now_rfc3339(),
    })
}

/// Rooms with live membership counts
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<RoomSummaryDto>> {
    authenticate(&state, &headers).await?;

    let rooms = state.get_rooms_usecase.execute().await;
    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

/// Stored messages of a room, oldest first
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> ApiResult<Vec<StoredMessageDto>> {
    authenticate(&state, &headers).await?;

    let room_id = RoomId::new(room_id)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let limit = resolve_limit(query.limit.as_deref(), state.history_limit);

    let messages = state
        .get_room_history_usecase
        .execute(&room_id, limit)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch messages for room '{}': {}", room_id, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch messages")
        })?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// High and critical messages for moderators, newest first
pub async fn get_flagged_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<StoredMessageDto>> {
    let identity = authenticate_moderator(&state, &headers).await?;
    tracing::info!("Flagged messages requested by '{}'", identity.user_id);

    let messages = state
        .get_flagged_messages_usecase
        .execute()
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch flagged messages: {}", e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch flagged messages",
            )
        })?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Report a stored message. Any authenticated user may report.
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportDto>), ApiError> {
    let identity = authenticate(&state, &headers).await?;

    let report = state
        .create_report_usecase
        .execute(
            identity.user_id,
            body.message_id.as_deref().unwrap_or_default(),
            body.reason.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(|e| match e {
            ReportError::MissingFields => api_error(StatusCode::BAD_REQUEST, e.to_string()),
            ReportError::MessageNotFound(_) => {
                api_error(StatusCode::NOT_FOUND, "Message not found")
            }
            ReportError::StoreUnavailable(_) => {
                tracing::error!("Failed to create report: {}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create report")
            }
        })?;

    Ok((StatusCode::CREATED, Json(report.into())))
}

/// Every report for moderators, newest first
pub async fn get_reports(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<ReportDto>> {
    let identity = authenticate_moderator(&state, &headers).await?;
    tracing::info!("Reports requested by '{}'", identity.user_id);

    let reports = state.get_reports_usecase.execute().await.map_err(|e| {
        tracing::error!("Failed to fetch reports: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch reports")
    })?;

    Ok(Json(reports.into_iter().map(Into::into).collect()))
}

/// Crisis resource text for a risk level. Unknown or absent levels get the
/// supportive variant.
pub async fn get_crisis_resources(
    Query(query): Query<CrisisResourcesQuery>,
) -> Json<CrisisResourcesDto> {
    let risk_level = query
        .risk_level
        .as_deref()
        .and_then(RiskLevel::parse)
        .filter(|level| *level != RiskLevel::None)
        .unwrap_or(RiskLevel::Low);

    Json(CrisisResourcesDto {
        risk_level,
        message: resources_for(risk_level),
    })
}
