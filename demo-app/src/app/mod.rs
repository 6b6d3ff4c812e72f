//! App commands - Types, Context, and Handlers

mod context;
mod handlers;
mod types;

pub use context::AppContext;
pub use handlers::create_cli;
pub use types::{HealthResponse, User};
