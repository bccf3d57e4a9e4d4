//! UseCase: ルーム退出処理
//!
//! 明示的な leave フレームと、参加中の切断（暗黙の退出）の両方で使われます。

use std::sync::Arc;

use crate::domain::{RoomId, RoomRegistry, SessionId};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// セッションのエントリをルームから取り除き、削除件数を返す
    pub async fn execute(&self, room_id: &RoomId, session_id: SessionId) -> usize {
        self.registry.leave(room_id, session_id).await
    }

    /// 退出通知を残りのメンバーにブロードキャスト
    pub async fn broadcast_left(&self, room_id: &RoomId, json_message: &str) -> usize {
        self.registry.broadcast(room_id, json_message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Member, Nickname, Outbound, SessionHandle, UserId},
        infrastructure::repository::InMemoryRoomRegistry,
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_leave_then_notify_remaining_members() {
        // テスト項目: 退出したセッションには通知が届かず、残りのメンバーに届く
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let usecase = LeaveRoomUseCase::new(registry.clone());
        let lobby = RoomId::new("lobby".to_string()).unwrap();

        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();
        let alice = SessionHandle::new(alice_tx);
        for (handle, user) in [(alice.clone(), "alice"), (SessionHandle::new(bob_tx), "bob")] {
            registry
                .join(
                    &lobby,
                    Member {
                        session: handle,
                        user_id: UserId::new(user.to_string()).unwrap(),
                        nickname: Nickname::new(user.to_string()).unwrap(),
                    },
                )
                .await;
        }

        // when (操作):
        let removed = usecase.execute(&lobby, alice.id()).await;
        let delivered = usecase.broadcast_left(&lobby, "left").await;

        // then (期待する結果):
        assert_eq!(removed, 1);
        assert_eq!(delivered, 1);
        assert_eq!(bob_rx.recv().await, Some(Outbound::Text("left".into())));
        assert!(alice_rx.try_recv().is_err());
    }
}
