//! UI layer: the chat relay and its axum server.

mod handler;
pub mod relay;
mod server;
mod signal;
pub mod state;

pub use relay::ChatRelay;
pub use server::Server;
