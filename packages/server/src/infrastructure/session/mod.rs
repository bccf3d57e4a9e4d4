//! セッション一覧の実装
//!
//! - `websocket`: WebSocket 接続のハンドルを保持する実装

pub mod websocket;

pub use websocket::WebSocketSessionDirectory;
