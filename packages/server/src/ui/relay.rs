//! Chat Relay: per-session frame dispatch.
//!
//! 1 接続につき 1 つの [`Session`] を所有し、受信フレームを受け取った順に処理します。
//! 状態遷移は `Connected` → `InRoom` → `Closed` で、各フレームへの応答
//! （private フレームとルームへのブロードキャスト）はここで組み立てます。
//!
//! ## 設計ノート
//!
//! - 参加中に別ルームへの join を受けた場合は、先に元のルームから暗黙に退出する
//! - 参加中のルームへ同じ userId / nickname で再度 join した場合は history だけを送り直す
//! - 参加中の切断は leave と同じ扱い（退出通知をブロードキャスト）
//! - 保存とブロードキャストは 1 つのトランザクションではない。保存後に配信できなかった
//!   メッセージは履歴からのみ参照できる

use std::sync::Arc;

use yorisoi_shared::time::Clock;

use crate::{
    domain::{
        MessageContent, Nickname, PusherChannel, RoomContext, RoomId, Session, SessionDirectory,
        SessionHandle, SessionState, UserId, resources_for,
    },
    infrastructure::dto::websocket::{
        ChatMessage, CrisisAlertMessage, ErrorMessage, HistoryMessage, InboundFrame, MessageType,
        PresenceMessage, encode,
    },
    usecase::{JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase},
};

pub const INVALID_FORMAT: &str = "Invalid message format";
pub const MISSING_FIELDS: &str = "Missing required fields";
pub const UNKNOWN_TYPE: &str = "Unknown message type";
pub const SAVE_FAILED: &str = "Failed to save message";

/// Per-instance relay state shared by every connection handler
pub struct ChatRelay {
    join_room: Arc<JoinRoomUseCase>,
    leave_room: Arc<LeaveRoomUseCase>,
    send_message: Arc<SendMessageUseCase>,
    directory: Arc<dyn SessionDirectory>,
    clock: Arc<dyn Clock>,
}

impl ChatRelay {
    pub fn new(
        join_room: Arc<JoinRoomUseCase>,
        leave_room: Arc<LeaveRoomUseCase>,
        send_message: Arc<SendMessageUseCase>,
        directory: Arc<dyn SessionDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            join_room,
            leave_room,
            send_message,
            directory,
            clock,
        }
    }

    /// Register a fresh connection. The returned session starts `Connected`.
    pub async fn connect(&self, sender: PusherChannel) -> Session {
        let handle = SessionHandle::new(sender);
        self.directory.register(handle.clone()).await;
        tracing::info!("Session '{}' connected", handle.id());
        Session::new(handle)
    }

    /// Handle one inbound text frame
    pub async fn handle_text(&self, session: &mut Session, text: &str) {
        if matches!(session.state(), SessionState::Closed) {
            return;
        }

        let frame = match serde_json::from_str::<InboundFrame>(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("Session '{}' sent malformed JSON: {}", session.id(), e);
                self.send_error(session, INVALID_FORMAT);
                return;
            }
        };

        match frame.r#type.as_deref() {
            Some("join") => self.handle_join(session, frame).await,
            Some("leave") => self.handle_leave(session).await,
            Some("chat") => self.handle_chat(session, frame).await,
            other => {
                tracing::debug!(
                    "Session '{}' sent unknown message type {:?}",
                    session.id(),
                    other
                );
                self.send_error(session, UNKNOWN_TYPE);
            }
        }
    }

    /// Close the session, leaving its room if it is in one
    pub async fn disconnect(&self, session: &mut Session) {
        if let Some(context) = session.close() {
            self.leave_and_notify(session.handle(), &context).await;
        }
        session.handle().terminate();
        self.directory.unregister(session.id()).await;
        tracing::info!("Session '{}' disconnected", session.id());
    }

    async fn handle_join(&self, session: &mut Session, frame: InboundFrame) {
        let Some(context) = join_context(frame) else {
            self.send_error(session, MISSING_FIELDS);
            return;
        };

        // 同じルーム・同じ名前での再 join は在室通知を出さない（履歴だけ送り直す）
        let rejoin = session.room() == Some(&context);
        if !rejoin && let Some(previous) = session.exit_room() {
            tracing::debug!(
                "Session '{}' switching from room '{}' to '{}'",
                session.id(),
                previous.room_id,
                context.room_id
            );
            self.leave_and_notify(session.handle(), &previous).await;
        }

        let joined = self
            .join_room
            .execute(&context, session.handle().clone())
            .await;
        session.enter_room(context.clone());
        tracing::info!(
            "User '{}' ({}) joined room '{}'",
            context.user_id,
            context.nickname,
            context.room_id
        );

        if let Some(history) = joined.history {
            let frame = HistoryMessage {
                r#type: MessageType::History,
                messages: history.into_iter().map(Into::into).collect(),
            };
            self.send_private(session, &frame);
        }

        if rejoin {
            return;
        }
        if let Some(json) = encode(&self.presence(MessageType::Join, &context)) {
            self.join_room
                .broadcast_joined(&context.room_id, &json)
                .await;
        }
    }

    async fn handle_leave(&self, session: &mut Session) {
        let Some(context) = session.exit_room() else {
            return;
        };
        self.leave_and_notify(session.handle(), &context).await;
        tracing::info!(
            "User '{}' left room '{}'",
            context.user_id,
            context.room_id
        );
    }

    async fn handle_chat(&self, session: &mut Session, frame: InboundFrame) {
        let content = frame.content.and_then(|c| MessageContent::new(c).ok());
        let (Some(context), Some(content)) = (session.room().cloned(), content) else {
            self.send_error(session, MISSING_FIELDS);
            return;
        };

        let sent = match self.send_message.execute(&context, content).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::warn!(
                    "Failed to persist message from '{}' in room '{}': {}",
                    context.user_id,
                    context.room_id,
                    e
                );
                self.send_error(session, SAVE_FAILED);
                return;
            }
        };

        let verdict = sent.verdict;
        let chat: ChatMessage = sent.stored.into();
        if let Some(json) = encode(&chat) {
            let delivered = self.send_message.broadcast(&context.room_id, &json).await;
            tracing::debug!(
                "Broadcast message '{}' to {} sessions in room '{}'",
                chat.message.id,
                delivered,
                context.room_id
            );
        }

        if verdict.is_crisis() {
            let alert = CrisisAlertMessage {
                r#type: MessageType::CrisisAlert,
                risk_level: verdict.risk_level,
                message: resources_for(verdict.risk_level),
                timestamp: self.clock.now_rfc3339(),
            };
            self.send_private(session, &alert);
        }
    }

    async fn leave_and_notify(&self, handle: &Arc<SessionHandle>, context: &RoomContext) {
        self.leave_room.execute(&context.room_id, handle.id()).await;
        if let Some(json) = encode(&self.presence(MessageType::Leave, context)) {
            self.leave_room
                .broadcast_left(&context.room_id, &json)
                .await;
        }
    }

    fn presence(&self, r#type: MessageType, context: &RoomContext) -> PresenceMessage {
        PresenceMessage {
            r#type,
            user_id: context.user_id.as_str().to_string(),
            nickname: context.nickname.as_str().to_string(),
            timestamp: self.clock.now_rfc3339(),
        }
    }

    fn send_error(&self, session: &Session, message: &str) {
        self.send_private(session, &ErrorMessage::new(message));
    }

    fn send_private<T: serde::Serialize>(&self, session: &Session, frame: &T) {
        let Some(json) = encode(frame) else {
            return;
        };
        if let Err(e) = session.handle().push(json) {
            tracing::warn!("Failed to push private frame: {}", e);
        }
    }
}

/// All three fields are required and must be non-empty
fn join_context(frame: InboundFrame) -> Option<RoomContext> {
    Some(RoomContext {
        room_id: RoomId::new(frame.room_id?).ok()?,
        user_id: UserId::new(frame.user_id?).ok()?,
        nickname: Nickname::new(frame.nickname?).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MessageStore, MockMessageStore, Outbound, RepositoryError, RiskLevel, RoomRegistry,
        },
        infrastructure::{
            dto::websocket::StoredMessageDto,
            repository::{InMemoryMessageStore, InMemoryRoomRegistry},
            session::WebSocketSessionDirectory,
        },
        usecase::{ClassifyMessageUseCase, GetRoomHistoryUseCase},
    };
    use serde_json::{Value, json};
    use tokio::sync::mpsc;
    use yorisoi_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - join / leave / chat の各フレームの処理と状態遷移
    // - 不正なフレームへの error フレーム
    // - crisis_alert が送信者にだけ届くこと
    // - 保存失敗時にブロードキャストされないこと
    // - 切断時の暗黙の退出
    // - 履歴の表示情報がライブ配信時と一致すること
    // ========================================

    struct Harness {
        relay: ChatRelay,
        registry: Arc<InMemoryRoomRegistry>,
        directory: Arc<WebSocketSessionDirectory>,
    }

    fn create_harness(store: Arc<dyn MessageStore>) -> Harness {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let directory = Arc::new(WebSocketSessionDirectory::new());
        let history = Arc::new(GetRoomHistoryUseCase::new(store.clone()));
        let relay = ChatRelay::new(
            Arc::new(JoinRoomUseCase::new(
                registry.clone(),
                store.clone(),
                history,
                50,
            )),
            Arc::new(LeaveRoomUseCase::new(registry.clone())),
            Arc::new(SendMessageUseCase::new(
                Arc::new(ClassifyMessageUseCase::keyword_only()),
                store,
                registry.clone(),
            )),
            directory.clone(),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        );
        Harness {
            relay,
            registry,
            directory,
        }
    }

    async fn connect(harness: &Harness) -> (Session, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (harness.relay.connect(tx).await, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(outbound) = rx.try_recv() {
            if let Outbound::Text(text) = outbound {
                frames.push(serde_json::from_str(&text).unwrap());
            }
        }
        frames
    }

    fn join_frame(room: &str, user: &str, nickname: &str) -> String {
        json!({"type": "join", "roomId": room, "userId": user, "nickname": nickname}).to_string()
    }

    fn chat_frame(content: &str) -> String {
        json!({"type": "chat", "content": content}).to_string()
    }

    fn lobby() -> RoomId {
        RoomId::new("lobby".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_sends_history_then_presence() {
        // テスト項目: join で history（private）と join（ルーム全員）が届く
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Sam"))
            .await;

        // then (期待する結果):
        let frames = drain(&mut alice_rx);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["type"], "history");
        assert_eq!(frames[0]["messages"], json!([]));
        assert_eq!(frames[1]["type"], "join");
        assert_eq!(frames[1]["userId"], "u1");
        assert_eq!(frames[1]["nickname"], "Sam");
        assert!(matches!(alice.state(), SessionState::InRoom(_)));
    }

    #[tokio::test]
    async fn test_join_missing_nickname_is_rejected() {
        // テスト項目: nickname のない join は error になり、メンバー登録もブロードキャストもされない
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut bob_rx);
        let (mut alice, mut alice_rx) = connect(&harness).await;

        // when (操作):
        harness
            .relay
            .handle_text(
                &mut alice,
                &json!({"type": "join", "roomId": "lobby", "userId": "u1"}).to_string(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut alice_rx),
            vec![json!({"type": "error", "message": "Missing required fields"})]
        );
        assert!(drain(&mut bob_rx).is_empty());
        assert_eq!(alice.state(), &SessionState::Connected);
        assert_eq!(harness.registry.members(&lobby()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_join_with_empty_room_id_is_rejected() {
        // テスト項目: 空文字列のフィールドも欠落と同じ扱い
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &join_frame("", "u1", "Sam"))
            .await;

        // then (期待する結果):
        assert_eq!(drain(&mut alice_rx)[0]["message"], "Missing required fields");
        assert_eq!(alice.state(), &SessionState::Connected);
    }

    #[tokio::test]
    async fn test_malformed_and_unknown_frames() {
        // テスト項目: 不正な JSON と未知の type はそれぞれ error になり、状態は変わらない
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;

        // when (操作):
        harness.relay.handle_text(&mut alice, "not json").await;
        harness
            .relay
            .handle_text(&mut alice, r#"{"type":"dance"}"#)
            .await;
        harness
            .relay
            .handle_text(&mut alice, r#"{"content":"no type"}"#)
            .await;

        // then (期待する結果):
        let messages: Vec<Value> = drain(&mut alice_rx)
            .into_iter()
            .map(|frame| frame["message"].clone())
            .collect();
        assert_eq!(
            messages,
            vec![
                json!("Invalid message format"),
                json!("Unknown message type"),
                json!("Unknown message type"),
            ]
        );
        assert_eq!(alice.state(), &SessionState::Connected);
    }

    #[tokio::test]
    async fn test_chat_before_join_is_rejected() {
        // テスト項目: ルーム未参加の chat は error になり、保存されない
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::default());
        let harness = create_harness(store.clone());
        let (mut alice, mut alice_rx) = connect(&harness).await;

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &chat_frame("hello"))
            .await;

        // then (期待する結果):
        assert_eq!(drain(&mut alice_rx)[0]["message"], "Missing required fields");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_chat_broadcasts_stored_message() {
        // テスト項目: chat は保存済みメッセージとしてルーム全員に届く
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &chat_frame("good morning"))
            .await;

        // then (期待する結果):
        let alice_frames = drain(&mut alice_rx);
        let bob_frames = drain(&mut bob_rx);
        assert_eq!(alice_frames.len(), 1);
        assert_eq!(bob_frames, alice_frames);
        let message: StoredMessageDto = serde_json::from_value(bob_frames[0].clone()).unwrap();
        assert_eq!(bob_frames[0]["type"], "chat");
        assert_eq!(message.content, "good morning");
        assert_eq!(message.user_id, "u1");
        assert_eq!(message.room_id, "lobby");
        assert_eq!(message.risk_level, RiskLevel::None);
        assert_eq!(message.profile.unwrap().nickname, "Alice");
    }

    #[tokio::test]
    async fn test_crisis_alert_only_to_author() {
        // テスト項目: crisis_alert は送信者にだけ届き、他のメンバーには chat だけが届く
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &chat_frame("I want to kill myself"))
            .await;

        // then (期待する結果):
        let alice_frames = drain(&mut alice_rx);
        let bob_frames = drain(&mut bob_rx);
        assert_eq!(alice_frames.len(), 2);
        assert_eq!(alice_frames[0]["type"], "chat");
        assert_eq!(alice_frames[0]["risk_level"], "critical");
        assert_eq!(alice_frames[1]["type"], "crisis_alert");
        assert_eq!(alice_frames[1]["riskLevel"], "critical");
        assert_eq!(
            alice_frames[1]["message"],
            json!(resources_for(RiskLevel::Critical))
        );
        assert_eq!(bob_frames.len(), 1);
        assert_eq!(bob_frames[0]["type"], "chat");
    }

    #[tokio::test]
    async fn test_persist_failure_sends_error_without_broadcast() {
        // テスト項目: 保存に失敗すると送信者に error が届き、ブロードキャストはされない
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store.expect_upsert_profile().returning(|_, _| Ok(()));
        store.expect_fetch_recent().returning(|_, _| Ok(Vec::new()));
        store
            .expect_append()
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));
        let harness = create_harness(Arc::new(store));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &chat_frame("hello"))
            .await;

        // then (期待する結果):
        assert_eq!(
            drain(&mut alice_rx),
            vec![json!({"type": "error", "message": "Failed to save message"})]
        );
        assert!(drain(&mut bob_rx).is_empty());
        assert!(matches!(alice.state(), SessionState::InRoom(_)));
    }

    #[tokio::test]
    async fn test_history_is_ascending_and_capped_at_fifty() {
        // テスト項目: 参加時の history は古い順で最大 50 件
        // given (前提条件):
        let clock = Arc::new(FixedClock::new(1_000));
        let store = Arc::new(InMemoryMessageStore::new(clock.clone()));
        let harness = create_harness(store);
        let (mut alice, mut alice_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        for i in 0..55 {
            harness
                .relay
                .handle_text(&mut alice, &chat_frame(&format!("m{i}")))
                .await;
            clock.advance(1);
        }
        let (mut bob, mut bob_rx) = connect(&harness).await;

        // when (操作):
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;

        // then (期待する結果):
        let frames = drain(&mut bob_rx);
        let messages = frames[0]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 50);
        assert_eq!(messages[0]["content"], "m5");
        assert_eq!(messages[49]["content"], "m54");
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // テスト項目: 別ルームの chat は届かない
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("a", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("b", "u2", "Bob"))
            .await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &chat_frame("only for a"))
            .await;

        // then (期待する結果):
        assert_eq!(drain(&mut alice_rx).len(), 1);
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_members() {
        // テスト項目: leave で退出通知が残りのメンバーに届き、状態は Connected に戻る
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, r#"{"type":"leave"}"#)
            .await;

        // then (期待する結果):
        let bob_frames = drain(&mut bob_rx);
        assert_eq!(bob_frames.len(), 1);
        assert_eq!(bob_frames[0]["type"], "leave");
        assert_eq!(bob_frames[0]["userId"], "u1");
        assert!(drain(&mut alice_rx).is_empty());
        assert_eq!(alice.state(), &SessionState::Connected);
        assert_eq!(harness.registry.members(&lobby()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_leave_without_room_is_noop() {
        // テスト項目: 未参加での leave は何もしない
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, r#"{"type":"leave"}"#)
            .await;

        // then (期待する結果):
        assert!(drain(&mut alice_rx).is_empty());
        assert_eq!(alice.state(), &SessionState::Connected);
    }

    #[tokio::test]
    async fn test_join_other_room_leaves_previous_one() {
        // テスト項目: 参加中に別ルームへ join すると元のルームから退出する
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &join_frame("garden", "u1", "Alice"))
            .await;

        // then (期待する結果):
        assert_eq!(drain(&mut bob_rx)[0]["type"], "leave");
        assert_eq!(harness.registry.members(&lobby()).await.len(), 1);
        assert_eq!(
            alice.room().map(|c| c.room_id.as_str()),
            Some("garden")
        );
    }

    #[tokio::test]
    async fn test_disconnect_is_implicit_leave() {
        // テスト項目: 参加中の切断で退出通知が届き、メンバーとセッション一覧から消える
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, _alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut bob_rx);

        // when (操作):
        harness.relay.disconnect(&mut alice).await;

        // then (期待する結果):
        let bob_frames = drain(&mut bob_rx);
        assert_eq!(bob_frames.len(), 1);
        assert_eq!(bob_frames[0]["type"], "leave");
        assert_eq!(alice.state(), &SessionState::Closed);
        assert_eq!(harness.registry.members(&lobby()).await.len(), 1);
        assert_eq!(harness.directory.count().await, 1);

        // 切断後のフレームは無視される
        harness
            .relay
            .handle_text(&mut alice, &chat_frame("late"))
            .await;
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_rejoin_same_room_only_resends_history() {
        // テスト項目: 参加中のルームへの再 join では leave / join が配信されず、history だけが届く
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;

        // then (期待する結果):
        let alice_frames = drain(&mut alice_rx);
        assert_eq!(alice_frames.len(), 1);
        assert_eq!(alice_frames[0]["type"], "history");
        assert!(drain(&mut bob_rx).is_empty());
        assert_eq!(harness.registry.members(&lobby()).await.len(), 2);
        assert!(matches!(alice.state(), SessionState::InRoom(_)));
    }

    #[tokio::test]
    async fn test_rejoin_with_new_nickname_announces_change() {
        // テスト項目: 同じルームでもニックネームを変えた再 join は leave → join として配信される
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        let (mut bob, mut bob_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Ally"))
            .await;

        // then (期待する結果):
        let bob_frames = drain(&mut bob_rx);
        assert_eq!(bob_frames.len(), 2);
        assert_eq!(bob_frames[0]["type"], "leave");
        assert_eq!(bob_frames[0]["nickname"], "Alice");
        assert_eq!(bob_frames[1]["type"], "join");
        assert_eq!(bob_frames[1]["nickname"], "Ally");
        assert_eq!(harness.registry.members(&lobby()).await.len(), 2);
    }

    #[tokio::test]
    async fn test_history_profile_matches_live_chat() {
        // テスト項目: 後から参加した人の history に含まれる表示情報が、ライブ配信時の chat と一致する
        // given (前提条件):
        let harness = create_harness(Arc::new(InMemoryMessageStore::default()));
        let (mut alice, mut alice_rx) = connect(&harness).await;
        harness
            .relay
            .handle_text(&mut alice, &join_frame("lobby", "u1", "Alice"))
            .await;
        drain(&mut alice_rx);
        harness
            .relay
            .handle_text(&mut alice, &chat_frame("hello"))
            .await;
        let live = drain(&mut alice_rx);
        let (mut bob, mut bob_rx) = connect(&harness).await;

        // when (操作):
        harness
            .relay
            .handle_text(&mut bob, &join_frame("lobby", "u2", "Bob"))
            .await;

        // then (期待する結果):
        let history = &drain(&mut bob_rx)[0];
        assert_eq!(history["type"], "history");
        assert_eq!(history["messages"][0]["content"], "hello");
        assert_eq!(live[0]["profile"], json!({"nickname": "Alice", "avatar": null}));
        assert_eq!(history["messages"][0]["profile"], live[0]["profile"]);
    }
}
