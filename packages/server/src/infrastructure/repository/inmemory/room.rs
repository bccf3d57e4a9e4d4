//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//!
//! ## ロック設計
//!
//! - 外側の `RwLock` はルーム ID → メンバー集合の対応表だけを守り、参照取得の間だけ保持する
//! - メンバー集合はルームごとの `Mutex` で守る（同一ルームの join / leave / broadcast は排他、
//!   別ルーム同士は競合しない）
//!
//! 空になったルームの集合は削除しない。削除すると、削除直前に集合の参照を取得した
//! join が孤立した集合に追加されてしまうため。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{Member, RoomId, RoomRegistry, RoomSummary, SessionId};

type MemberSet = Arc<Mutex<Vec<Member>>>;

/// インメモリ Room Registry 実装
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    rooms: RwLock<HashMap<RoomId, MemberSet>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    async fn room(&self, room_id: &RoomId) -> Option<MemberSet> {
        self.rooms.read().await.get(room_id).cloned()
    }

    async fn room_or_create(&self, room_id: &RoomId) -> MemberSet {
        if let Some(room) = self.room(room_id).await {
            return room;
        }
        let mut rooms = self.rooms.write().await;
        rooms.entry(room_id.clone()).or_default().clone()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room_id: &RoomId, member: Member) {
        let room = self.room_or_create(room_id).await;
        let mut members = room.lock().await;

        let session_id = member.session.id();
        members.retain(|m| m.session.id() != session_id);
        members.push(member);

        tracing::debug!(
            "Session '{}' joined room '{}' ({} members)",
            session_id,
            room_id,
            members.len()
        );
    }

    async fn leave(&self, room_id: &RoomId, session_id: SessionId) -> usize {
        let Some(room) = self.room(room_id).await else {
            return 0;
        };
        let mut members = room.lock().await;

        let before = members.len();
        members.retain(|m| m.session.id() != session_id);
        let removed = before - members.len();

        tracing::debug!(
            "Session '{}' left room '{}' ({} entries removed)",
            session_id,
            room_id,
            removed
        );
        removed
    }

    async fn broadcast(&self, room_id: &RoomId, payload: &str) -> usize {
        let Some(room) = self.room(room_id).await else {
            return 0;
        };
        let members = room.lock().await;

        let mut delivered = 0;
        for member in members.iter() {
            if !member.session.is_open() {
                continue;
            }
            // ブロードキャストでは一部の送信失敗を許容
            match member.session.push(payload.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::debug!("Skipping member during broadcast: {}", e),
            }
        }
        delivered
    }

    async fn members(&self, room_id: &RoomId) -> Vec<Member> {
        match self.room(room_id).await {
            Some(room) => room.lock().await.clone(),
            None => Vec::new(),
        }
    }

    async fn summaries(&self) -> Vec<RoomSummary> {
        let rooms: Vec<(RoomId, MemberSet)> = {
            let rooms = self.rooms.read().await;
            rooms
                .iter()
                .map(|(id, set)| (id.clone(), set.clone()))
                .collect()
        };

        let mut summaries = Vec::with_capacity(rooms.len());
        for (room_id, set) in rooms {
            let member_count = set.lock().await.len();
            summaries.push(RoomSummary {
                room_id,
                member_count,
            });
        }
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }
}
