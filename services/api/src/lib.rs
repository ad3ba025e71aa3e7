//! HTTP service for ESG energy and waste reporting
//!
//! Exposes authenticated CRUD routes for energy and waste records, the
//! organization-wide statistics views, and CSV exports. Storage is either
//! PostgreSQL or process memory, selected at startup.

pub mod config;
pub mod error;
pub mod export;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
