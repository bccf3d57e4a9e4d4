//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::RepositoryError;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// メッセージストアへの保存に失敗（ブロードキャストは行われない）
    #[error("failed to persist message: {0}")]
    PersistFailed(#[source] RepositoryError),
}

/// 保存済みメッセージ取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("failed to read messages: {0}")]
    StoreUnavailable(#[source] RepositoryError),
}

/// 通報の作成・取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// messageId または reason が空
    #[error("Message ID and reason are required")]
    MissingFields,

    /// 通報対象のメッセージが存在しない
    #[error("message '{0}' not found")]
    MessageNotFound(String),

    #[error("failed to access reports: {0}")]
    StoreUnavailable(#[source] RepositoryError),
}
