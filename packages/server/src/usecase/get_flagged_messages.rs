//! UseCase: モデレーション向けの要注意メッセージ取得
//!
//! リスクレベル high 以上の保存済みメッセージを新しい順で返します。

use std::sync::Arc;

use crate::domain::{MessageStore, RiskLevel, StoredMessage};

use super::error::HistoryError;

/// 要注意メッセージ取得のユースケース
pub struct GetFlaggedMessagesUseCase {
    store: Arc<dyn MessageStore>,
    limit: usize,
}

impl GetFlaggedMessagesUseCase {
    /// 新しい GetFlaggedMessagesUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    pub async fn execute(&self) -> Result<Vec<StoredMessage>, HistoryError> {
        self.store
            .fetch_flagged(RiskLevel::High, self.limit)
            .await
            .map_err(HistoryError::StoreUnavailable)
    }
}
