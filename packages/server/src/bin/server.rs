//! Yorisoi chat relay server.
//!
//! Room-scoped WebSocket chat with crisis screening of every message.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yorisoi-server
//! cargo run --bin yorisoi-server -- --host 0.0.0.0 --port 3001 --api-token secret=carol:moderator
//! HUGGINGFACE_API_TOKEN=hf_xxx cargo run --bin yorisoi-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use yorisoi_server::{
    config::{DEFAULT_INFERENCE_URL, FLAGGED_LIMIT, InferenceConfig, RelayConfig},
    domain::{EmotionClassifier, RiskLexicon},
    infrastructure::{
        auth::StaticTokenValidator,
        emotion::HuggingFaceEmotionClassifier,
        repository::{InMemoryMessageStore, InMemoryRoomRegistry},
        session::WebSocketSessionDirectory,
    },
    ui::{ChatRelay, Server},
    usecase::{
        AuthenticateUseCase, ClassifyMessageUseCase, CreateReportUseCase,
        GetFlaggedMessagesUseCase, GetReportsUseCase, GetRoomHistoryUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, LivenessMonitor, SendMessageUseCase,
    },
};
use yorisoi_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "yorisoi-server")]
#[command(about = "Room-scoped WebSocket chat relay with crisis screening", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "YORISOI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "YORISOI_PORT", default_value = "3001")]
    port: u16,

    /// HuggingFace API token. Without it messages are screened by keywords only.
    #[arg(long, env = "HUGGINGFACE_API_TOKEN")]
    inference_token: Option<String>,

    /// Emotion model inference endpoint
    #[arg(long, env = "YORISOI_INFERENCE_URL", default_value = DEFAULT_INFERENCE_URL)]
    inference_url: String,

    /// Timeout for one inference request in milliseconds
    #[arg(long, default_value = "5000")]
    inference_timeout_ms: u64,

    /// API bearer token as TOKEN=USER_ID[:EMAIL][:moderator] (repeatable)
    #[arg(long = "api-token")]
    api_tokens: Vec<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let relay_config = RelayConfig::default();

    // Initialize dependencies in order:
    // 1. Infrastructure (store, registry, session table, collaborators)
    // 2. UseCases
    // 3. ChatRelay
    // 4. Server

    // 1. Infrastructure
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(InMemoryMessageStore::new(clock.clone()));
    let registry = Arc::new(InMemoryRoomRegistry::new());
    let directory = Arc::new(WebSocketSessionDirectory::new());

    let emotion: Option<Arc<dyn EmotionClassifier>> = match args.inference_token {
        Some(api_token) => {
            let config = InferenceConfig {
                endpoint: args.inference_url,
                api_token,
                timeout: Duration::from_millis(args.inference_timeout_ms),
            };
            match HuggingFaceEmotionClassifier::new(config) {
                Ok(classifier) => {
                    tracing::info!("Emotion inference enabled");
                    Some(Arc::new(classifier) as Arc<dyn EmotionClassifier>)
                }
                Err(e) => {
                    tracing::warn!("Emotion inference disabled: {}", e);
                    None
                }
            }
        }
        None => {
            tracing::info!("No inference token configured, using keyword screening only");
            None
        }
    };

    let validator = match StaticTokenValidator::from_entries(&args.api_tokens) {
        Ok(validator) => validator,
        Err(e) => {
            tracing::error!("Invalid --api-token: {}", e);
            std::process::exit(2);
        }
    };

    // 2. UseCases
    let classify_usecase = Arc::new(ClassifyMessageUseCase::new(RiskLexicon::default(), emotion));
    let get_room_history_usecase = Arc::new(GetRoomHistoryUseCase::new(store.clone()));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        store.clone(),
        get_room_history_usecase.clone(),
        relay_config.history_limit,
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(registry.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        classify_usecase,
        store.clone(),
        registry.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_flagged_messages_usecase =
        Arc::new(GetFlaggedMessagesUseCase::new(store.clone(), FLAGGED_LIMIT));
    let create_report_usecase = Arc::new(CreateReportUseCase::new(store.clone()));
    let get_reports_usecase = Arc::new(GetReportsUseCase::new(store.clone()));
    let authenticate_usecase = Arc::new(AuthenticateUseCase::new(Arc::new(validator)));
    let liveness = Arc::new(LivenessMonitor::new(
        directory.clone(),
        relay_config.heartbeat_interval,
    ));

    // 3. ChatRelay
    let relay = Arc::new(ChatRelay::new(
        join_room_usecase,
        leave_room_usecase,
        send_message_usecase,
        directory.clone(),
        clock.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        relay,
        liveness,
        directory,
        get_rooms_usecase,
        get_room_history_usecase,
        get_flagged_messages_usecase,
        create_report_usecase,
        get_reports_usecase,
        authenticate_usecase,
        clock,
        relay_config.history_limit,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
