//! WebSocket セッション一覧の実装
//!
//! ## 責務
//!
//! - 接続中の `SessionHandle` を保持する
//! - Liveness Monitor にスナップショットを提供する
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! ここではハンドルへの参照だけを保持し、送信そのものはハンドル経由で行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{SessionDirectory, SessionHandle, SessionId};

/// WebSocket セッション一覧
#[derive(Default)]
pub struct WebSocketSessionDirectory {
    /// Key: SessionId / Value: 共有ハンドル
    sessions: Mutex<HashMap<SessionId, Arc<SessionHandle>>>,
}

impl WebSocketSessionDirectory {
    /// 新しい WebSocketSessionDirectory を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionDirectory for WebSocketSessionDirectory {
    async fn register(&self, session: Arc<SessionHandle>) {
        let session_id = session.id();
        self.sessions.lock().await.insert(session_id, session);
        tracing::debug!("Session '{}' registered", session_id);
    }

    async fn unregister(&self, session_id: SessionId) {
        self.sessions.lock().await.remove(&session_id);
        tracing::debug!("Session '{}' unregistered", session_id);
    }

    async fn snapshot(&self) -> Vec<Arc<SessionHandle>> {
        self.sessions.lock().await.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
