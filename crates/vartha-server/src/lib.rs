//! Vartha Server
//!
//! HTTP/JSON front end for the Telugu news classifier. The model registry is
//! loaded once before the listener is bound and shared read-only with every
//! request through the axum state.

pub mod cli;
pub mod config;
pub mod server;
pub mod state;

pub use cli::Cli;
pub use config::ServiceConfig;
pub use server::{build_app, run_server, AppError};
pub use state::AppState;
