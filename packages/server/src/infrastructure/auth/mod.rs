//! TokenValidator の実装

pub mod static_token;

pub use static_token::{StaticTokenValidator, TokenEntryError};
