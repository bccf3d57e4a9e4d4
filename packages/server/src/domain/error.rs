//! Domain error types.

use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// 必須フィールドが空
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// メッセージストアのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// ストアに到達できない、または書き込みに失敗した
    #[error("message store unavailable: {0}")]
    Unavailable(String),

    /// 参照先のメッセージが存在しない
    #[error("message '{0}' not found")]
    MessageNotFound(String),
}

/// 感情推定エンドポイントのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    Transport(String),

    #[error("inference endpoint returned status {0}")]
    Status(u16),

    #[error("failed to decode inference response: {0}")]
    Decode(String),

    #[error("inference endpoint returned no scores")]
    Empty,
}

/// トークン検証のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing or invalid authorization header")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Moderator access required")]
    NotModerator,
}

/// セッションへの送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のセッションが既に閉じている
    #[error("session '{0}' is closed")]
    SessionClosed(String),
}
