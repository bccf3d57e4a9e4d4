//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - メンバー登録と表示情報の登録、履歴取得、参加通知のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 履歴の取得に失敗しても参加そのものは成立することを保証
//! - 参加通知が参加者本人を含むルーム全員に届くことを確認
//! - 参加時のニックネームが保存済みメッセージの表示情報になることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加、既存メンバーのいるルームへの参加
//! - 異常系：履歴取得の失敗、表示情報の登録失敗

use std::sync::Arc;

use crate::domain::{
    AuthorProfile, Member, MessageStore, RoomContext, RoomId, RoomRegistry, SessionHandle,
    StoredMessage,
};

use super::GetRoomHistoryUseCase;

/// 参加の結果
#[derive(Debug)]
pub struct JoinedRoom {
    /// 古い順の履歴。取得に失敗した場合は `None`
    pub history: Option<Vec<StoredMessage>>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    /// MessageStore（投稿者の表示情報の登録先）
    store: Arc<dyn MessageStore>,
    history: Arc<GetRoomHistoryUseCase>,
    history_limit: usize,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        store: Arc<dyn MessageStore>,
        history: Arc<GetRoomHistoryUseCase>,
        history_limit: usize,
    ) -> Self {
        Self {
            registry,
            store,
            history,
            history_limit,
        }
    }

    /// メンバー登録と表示情報の登録を行い、直近の履歴を取得する
    ///
    /// # Arguments
    ///
    /// * `context` - 参加するルームと利用者（Domain Model）
    /// * `session` - 参加するセッションの共有ハンドル
    pub async fn execute(&self, context: &RoomContext, session: Arc<SessionHandle>) -> JoinedRoom {
        self.registry
            .join(
                &context.room_id,
                Member {
                    session,
                    user_id: context.user_id.clone(),
                    nickname: context.nickname.clone(),
                },
            )
            .await;

        // 参加時のニックネームを投稿者の表示情報として記録する
        let profile = AuthorProfile {
            nickname: context.nickname.as_str().to_string(),
            avatar: None,
        };
        if let Err(e) = self.store.upsert_profile(&context.user_id, profile).await {
            tracing::warn!(
                "Failed to record profile of '{}': {}",
                context.user_id,
                e
            );
        }

        let history = match self
            .history
            .execute(&context.room_id, self.history_limit)
            .await
        {
            Ok(messages) => Some(messages),
            Err(e) => {
                tracing::warn!(
                    "Failed to load history for room '{}': {}",
                    context.room_id,
                    e
                );
                None
            }
        };

        JoinedRoom { history }
    }

    /// 参加通知をルーム全員（本人を含む）にブロードキャスト
    pub async fn broadcast_joined(&self, room_id: &RoomId, json_message: &str) -> usize {
        self.registry.broadcast(room_id, json_message).await
    }
}
