//! Web layer for the schedule service.
//!
//! One JSON endpoint, `/api/parse`, open to cross-origin browser callers.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
