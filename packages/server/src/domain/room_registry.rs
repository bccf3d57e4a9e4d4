//! Room Registry trait 定義
//!
//! ルーム ID → 参加中セッションの集合を管理します。同じルームへの操作は
//! 互いに排他で、異なるルームへの操作は競合しません。

use async_trait::async_trait;

use super::{Member, RoomId, SessionId};

/// Live membership counts for one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub member_count: usize,
}

#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// ルームにメンバーを追加（ルームがなければ作成）。
    /// 同じセッションのエントリが既にあれば置き換える。
    async fn join(&self, room_id: &RoomId, member: Member);

    /// ルームからセッションのエントリをすべて削除し、削除件数を返す
    async fn leave(&self, room_id: &RoomId, session_id: SessionId) -> usize;

    /// ルーム内の open なセッションへ 1 回ずつ配信し、配信件数を返す
    async fn broadcast(&self, room_id: &RoomId, payload: &str) -> usize;

    /// ルームの現在のメンバー
    async fn members(&self, room_id: &RoomId) -> Vec<Member>;

    /// 既知のルームとメンバー数（ルーム ID 順）
    async fn summaries(&self) -> Vec<RoomSummary>;
}
