//! Utilities shared by the Yorisoi binaries and tests.

pub mod logger;
pub mod time;
