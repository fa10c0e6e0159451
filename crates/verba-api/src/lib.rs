pub mod auth;
pub mod closer;
pub mod config;
pub mod deck;
pub mod error;
pub mod flashcard;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod node;
pub mod normalization;
pub mod router;
pub mod state;
pub mod tracing;
pub mod user;
pub mod validation;
pub mod words;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
