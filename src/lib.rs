//! Marketplace - listing service
//!
//! Clients upload items (name, category, image) and read them back by id
//! or in bulk. Images are stored and served by the SHA-256 of their bytes.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use error::{Error, Result};
pub use state::AppState;
