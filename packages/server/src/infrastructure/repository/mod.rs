//! Repository 実装（メッセージストア / Room Registry）

pub mod inmemory;

pub use inmemory::{InMemoryMessageStore, InMemoryRoomRegistry};
