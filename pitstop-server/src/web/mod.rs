//! Web layer for the cycling route planner.
//!
//! Provides the JSON API consumed by the browser frontend.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
