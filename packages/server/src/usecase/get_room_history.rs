//! UseCase: ルームの保存済みメッセージ取得
//!
//! ストアは新しい順で返すため、ここで古い順に並べ替えてから返します。

use std::sync::Arc;

use crate::domain::{MessageStore, RoomId, StoredMessage};

use super::error::HistoryError;

/// 保存済みメッセージ取得のユースケース
pub struct GetRoomHistoryUseCase {
    store: Arc<dyn MessageStore>,
}

impl GetRoomHistoryUseCase {
    /// 新しい GetRoomHistoryUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// 最新 `limit` 件を古い順で返す
    pub async fn execute(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, HistoryError> {
        let mut messages = self
            .store
            .fetch_recent(room_id, limit)
            .await
            .map_err(HistoryError::StoreUnavailable)?;
        messages.reverse();
        Ok(messages)
    }
}
