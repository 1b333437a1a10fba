//! HTTP surface for the chart engine.
//!
//! Handlers are thin: they validate query parameters, run the synchronous
//! pipeline on the blocking pool under a deadline and map errors onto JSON
//! responses.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
