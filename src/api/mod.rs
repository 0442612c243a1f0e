//! API layer - HTML pages, health probes and middleware

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use router::{create_router, create_router_with_metrics};
pub use state::AppState;
