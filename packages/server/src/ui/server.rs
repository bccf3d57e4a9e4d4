//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use yorisoi_shared::time::Clock;

use crate::{
    domain::SessionDirectory,
    usecase::{
        AuthenticateUseCase, CreateReportUseCase, GetFlaggedMessagesUseCase, GetReportsUseCase,
        GetRoomHistoryUseCase, GetRoomsUseCase, LivenessMonitor,
    },
};

use super::{
    handler::{
        create_report, get_crisis_resources, get_flagged_messages, get_reports,
        get_room_messages, get_rooms, health_check, websocket_handler,
    },
    relay::ChatRelay,
    signal::shutdown_signal,
    state::AppState,
};

/// Room-scoped WebSocket chat relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(relay, liveness, directory, ...);
/// server.run("127.0.0.1".to_string(), 3001).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// LivenessMonitor（接続の生存確認）
    liveness: Arc<LivenessMonitor>,
    /// シャットダウン時に全セッションを閉じるためのセッション一覧
    directory: Arc<dyn SessionDirectory>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        relay: Arc<ChatRelay>,
        liveness: Arc<LivenessMonitor>,
        directory: Arc<dyn SessionDirectory>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_history_usecase: Arc<GetRoomHistoryUseCase>,
        get_flagged_messages_usecase: Arc<GetFlaggedMessagesUseCase>,
        create_report_usecase: Arc<CreateReportUseCase>,
        get_reports_usecase: Arc<GetReportsUseCase>,
        authenticate_usecase: Arc<AuthenticateUseCase>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                relay,
                get_rooms_usecase,
                get_room_history_usecase,
                get_flagged_messages_usecase,
                create_report_usecase,
                get_reports_usecase,
                authenticate_usecase,
                clock,
                history_limit,
            }),
            liveness,
            directory,
        }
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}/messages", get(get_room_messages))
            .route("/api/moderation/flagged", get(get_flagged_messages))
            .route(
                "/api/moderation/reports",
                post(create_report).get(get_reports),
            )
            .route("/api/resources/crisis", get(get_crisis_resources))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind `host:port` and serve until Ctrl+C / SIGTERM
    pub async fn run(self, host: String, port: u16) -> std::io::Result<()> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// The liveness monitor runs for the lifetime of the server. On shutdown
    /// every open session is terminated so that its connection task can finish.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let liveness_task = self.liveness.clone().spawn();
        let directory = self.directory.clone();

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                for session in directory.snapshot().await {
                    session.terminate();
                }
            })
            .await;

        liveness_task.abort();
        tracing::info!("Server shutdown complete");
        result
    }
}
