//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - リスク判定 → 保存 → ブロードキャストの流れ
//!
//! ### なぜこのテストが必要か
//! - 保存されたメッセージに判定結果のリスクレベルが付くことを確認
//! - 保存に失敗した場合はブロードキャストされないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常メッセージ、危機的なメッセージ
//! - 異常系：メッセージストアへの保存失敗
//! - エッジケース：ストアに投稿者の表示情報がない場合

use std::sync::Arc;

use crate::domain::{
    AuthorProfile, CrisisVerdict, MessageContent, MessageStore, NewMessage, RoomContext, RoomId,
    RoomRegistry, StoredMessage,
};

use super::{ClassifyMessageUseCase, error::SendMessageError};

/// 送信結果
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub stored: StoredMessage,
    pub verdict: CrisisVerdict,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    classifier: Arc<ClassifyMessageUseCase>,
    /// MessageStore（永続化の抽象化）
    store: Arc<dyn MessageStore>,
    /// RoomRegistry（ルーム単位の配信）
    registry: Arc<dyn RoomRegistry>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        classifier: Arc<ClassifyMessageUseCase>,
        store: Arc<dyn MessageStore>,
        registry: Arc<dyn RoomRegistry>,
    ) -> Self {
        Self {
            classifier,
            store,
            registry,
        }
    }

    /// メッセージを判定して保存する
    ///
    /// # Arguments
    ///
    /// * `context` - 送信者が参加中のルーム（Domain Model）
    /// * `content` - メッセージ内容（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(SentMessage)` - 保存済みメッセージと判定結果
    /// * `Err(SendMessageError)` - 保存失敗
    pub async fn execute(
        &self,
        context: &RoomContext,
        content: MessageContent,
    ) -> Result<SentMessage, SendMessageError> {
        // 1. リスク判定（失敗しない）
        let verdict = self.classifier.execute(content.as_str()).await;

        // 2. 判定結果のリスクレベル付きで保存
        let mut stored = self
            .store
            .append(NewMessage {
                room_id: context.room_id.clone(),
                user_id: context.user_id.clone(),
                content,
                risk_level: verdict.risk_level,
            })
            .await
            .map_err(SendMessageError::PersistFailed)?;

        // 3. ストアに表示情報がなければセッションのニックネームで補う
        if stored.profile.is_none() {
            stored.profile = Some(AuthorProfile {
                nickname: context.nickname.as_str().to_string(),
                avatar: None,
            });
        }

        Ok(SentMessage { stored, verdict })
    }

    /// 保存済みメッセージをルーム全員（送信者を含む）にブロードキャスト
    pub async fn broadcast(&self, room_id: &RoomId, json_message: &str) -> usize {
        self.registry.broadcast(room_id, json_message).await
    }
}
