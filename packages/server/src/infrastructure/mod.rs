//! Infrastructure layer: concrete collaborators and wire DTOs.

pub mod auth;
pub mod dto;
pub mod emotion;
pub mod repository;
pub mod session;
