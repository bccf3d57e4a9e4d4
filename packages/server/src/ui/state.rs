//! Shared application state handed to every axum handler.

use std::sync::Arc;

use yorisoi_shared::time::Clock;

use crate::usecase::{
    AuthenticateUseCase, CreateReportUseCase, GetFlaggedMessagesUseCase, GetReportsUseCase,
    GetRoomHistoryUseCase, GetRoomsUseCase,
};

use super::relay::ChatRelay;

pub struct AppState {
    /// ChatRelay（WebSocket フレームの処理）
    pub relay: Arc<ChatRelay>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomHistoryUseCase（保存済みメッセージ取得のユースケース）
    pub get_room_history_usecase: Arc<GetRoomHistoryUseCase>,
    /// GetFlaggedMessagesUseCase（要注意メッセージ取得のユースケース）
    pub get_flagged_messages_usecase: Arc<GetFlaggedMessagesUseCase>,
    /// CreateReportUseCase（通報作成のユースケース）
    pub create_report_usecase: Arc<CreateReportUseCase>,
    /// GetReportsUseCase（通報一覧取得のユースケース）
    pub get_reports_usecase: Arc<GetReportsUseCase>,
    /// AuthenticateUseCase（Bearer 認証のユースケース）
    pub authenticate_usecase: Arc<AuthenticateUseCase>,
    pub clock: Arc<dyn Clock>,
    /// `GET /api/rooms/{room_id}/messages` の既定件数
    pub history_limit: usize,
}
