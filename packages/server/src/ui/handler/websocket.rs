//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{domain::Outbound, ui::state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the session's outbound queue into the WebSocket sink.
///
/// Text frames come from private replies and room broadcasts; pings come from
/// the liveness monitor.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let message = match outbound {
                Outbound::Text(text) => Message::Text(text.into()),
                Outbound::Ping => Message::Ping(Bytes::new()),
            };
            if sender.send(message).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let mut session = state.relay.connect(tx).await;
    let handle = session.handle().clone();
    let mut send_task = pusher_loop(rx, sender);

    // Frames are handled one at a time; termination is only observed between
    // frames so an in-flight classify/persist always completes.
    loop {
        let next = tokio::select! {
            _ = handle.terminated() => {
                tracing::debug!("Session '{}' terminated", handle.id());
                break;
            }
            _ = &mut send_task => {
                tracing::debug!("Writer for session '{}' stopped", handle.id());
                break;
            }
            next = receiver.next() => next,
        };

        let message = match next {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                tracing::error!("WebSocket error on session '{}': {}", handle.id(), e);
                break;
            }
            None => break,
        };

        handle.mark_alive();
        match message {
            Message::Text(text) => {
                tracing::debug!("Session '{}' received: {}", handle.id(), text.as_str());
                state.relay.handle_text(&mut session, text.as_str()).await;
            }
            Message::Pong(_) => {
                tracing::trace!("Session '{}' answered liveness ping", handle.id());
            }
            Message::Ping(_) => {
                // axum answers pings itself
            }
            Message::Binary(_) => {
                tracing::debug!("Ignoring binary frame on session '{}'", handle.id());
            }
            Message::Close(_) => {
                tracing::info!("Session '{}' requested close", handle.id());
                break;
            }
        }
    }

    state.relay.disconnect(&mut session).await;
    send_task.abort();
}
