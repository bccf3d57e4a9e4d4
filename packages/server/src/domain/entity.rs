//! Entity 定義

use serde::{Deserialize, Serialize};

use super::{MessageContent, RiskLevel, RoomId, Timestamp, UserId};

/// 投稿者の表示情報（メッセージストアが付与する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub nickname: String,
    pub avatar: Option<String>,
}

/// 永続化前のチャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub content: MessageContent,
    pub risk_level: RiskLevel,
}

/// メッセージストアに保存されたチャットメッセージ
///
/// id と created_at はストア側で採番され、保存後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: String,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub content: MessageContent,
    pub risk_level: RiskLevel,
    pub created_at: Timestamp,
    pub profile: Option<AuthorProfile>,
}

/// 利用者の権限
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Member,
    /// 通報一覧・要注意メッセージを閲覧できるボランティア
    Moderator,
}

/// トークン検証で得られる利用者情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

/// 通報の対応状況（新規の通報は常に pending）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
}

/// 保存前の通報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub message_id: String,
    pub reported_by: UserId,
    pub reason: String,
}

/// 通報対象メッセージの抜粋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedMessage {
    pub content: MessageContent,
    pub risk_level: RiskLevel,
}

/// メッセージストアに保存された通報
///
/// `message` と `reporter` は取得時にストアが付与する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: String,
    pub message_id: String,
    pub reported_by: UserId,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: Timestamp,
    pub message: Option<ReportedMessage>,
    pub reporter: Option<AuthorProfile>,
}
