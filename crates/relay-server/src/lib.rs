//! # relay-server
//!
//! Process wiring for the ban relay plus a small admin HTTP API built with Axum.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, run, start_relay, RelayRuntime};
pub use state::AppState;
