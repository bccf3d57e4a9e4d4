//! セッション（1 接続）のモデル
//!
//! ## 構成
//!
//! - `SessionHandle`: 送信チャンネルと生存フラグを持つ共有ハンドル。
//!   Room Registry とセッション一覧はこのハンドルへの参照だけを持つ。
//! - `Session`: 接続ごとのタスクが所有する状態機械（Connected → InRoom → Closed）。

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc};

use super::{MessagePushError, Nickname, RoomId, SessionId, UserId};

/// Frames queued for the connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Serialized JSON frame
    Text(String),
    /// Liveness ping
    Ping,
}

/// Channel feeding the writer task of one connection
pub type PusherChannel = mpsc::UnboundedSender<Outbound>;

/// Shared handle to one live connection
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    sender: PusherChannel,
    alive: AtomicBool,
    terminated: AtomicBool,
    terminate_notify: Notify,
}

impl SessionHandle {
    pub fn new(sender: PusherChannel) -> Arc<Self> {
        Arc::new(Self {
            id: SessionId::generate(),
            sender,
            alive: AtomicBool::new(true),
            terminated: AtomicBool::new(false),
            terminate_notify: Notify::new(),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Open while neither terminated nor abandoned by its writer task
    pub fn is_open(&self) -> bool {
        !self.terminated.load(Ordering::Acquire) && !self.sender.is_closed()
    }

    /// Queue a text frame for this connection only
    pub fn push(&self, frame: String) -> Result<(), MessagePushError> {
        if !self.is_open() {
            return Err(MessagePushError::SessionClosed(self.id.to_string()));
        }
        self.sender
            .send(Outbound::Text(frame))
            .map_err(|_| MessagePushError::SessionClosed(self.id.to_string()))
    }

    /// Queue a liveness ping
    pub fn ping(&self) -> Result<(), MessagePushError> {
        self.sender
            .send(Outbound::Ping)
            .map_err(|_| MessagePushError::SessionClosed(self.id.to_string()))
    }

    /// Record a pong or any inbound activity
    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::Release);
    }

    /// Clear the liveness flag, returning whether it was set
    pub fn take_alive(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }

    /// Force the connection closed. The reader loop observes this through
    /// [`SessionHandle::terminated`].
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::Release);
        self.terminate_notify.notify_one();
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    /// Resolves once [`SessionHandle::terminate`] has been called
    pub async fn terminated(&self) {
        if self.is_terminated() {
            return;
        }
        self.terminate_notify.notified().await;
    }
}

/// Room Registry のメンバーエントリ（ハンドルへの参照 + 表示情報）
#[derive(Debug, Clone)]
pub struct Member {
    pub session: Arc<SessionHandle>,
    pub user_id: UserId,
    pub nickname: Nickname,
}

/// 参加中ルームのコンテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomContext {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub nickname: Nickname,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// ハンドシェイク完了、ルーム未参加
    Connected,
    /// ちょうど 1 つのルームに参加中
    InRoom(RoomContext),
    /// 終端
    Closed,
}

/// 接続ごとのタスクが所有するセッション
#[derive(Debug)]
pub struct Session {
    handle: Arc<SessionHandle>,
    state: SessionState,
}

impl Session {
    pub fn new(handle: Arc<SessionHandle>) -> Self {
        Self {
            handle,
            state: SessionState::Connected,
        }
    }

    pub fn handle(&self) -> &Arc<SessionHandle> {
        &self.handle
    }

    pub fn id(&self) -> SessionId {
        self.handle.id()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn room(&self) -> Option<&RoomContext> {
        match &self.state {
            SessionState::InRoom(context) => Some(context),
            _ => None,
        }
    }

    pub fn enter_room(&mut self, context: RoomContext) {
        self.state = SessionState::InRoom(context);
    }

    /// Back to `Connected`, returning the room that was left
    pub fn exit_room(&mut self) -> Option<RoomContext> {
        match std::mem::replace(&mut self.state, SessionState::Connected) {
            SessionState::InRoom(context) => Some(context),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Move to `Closed`, returning the room that was active
    pub fn close(&mut self) -> Option<RoomContext> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::InRoom(context) => Some(context),
            _ => None,
        }
    }
}

/// 接続中セッションの一覧（Liveness Monitor の走査対象）
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    async fn register(&self, session: Arc<SessionHandle>);

    async fn unregister(&self, session_id: SessionId);

    /// 登録中のハンドルのスナップショット
    async fn snapshot(&self) -> Vec<Arc<SessionHandle>>;

    async fn count(&self) -> usize;
}
