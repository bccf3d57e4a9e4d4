//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    create_report, get_crisis_resources, get_flagged_messages, get_reports, get_room_messages,
    get_rooms, health_check,
};
pub use websocket::websocket_handler;
