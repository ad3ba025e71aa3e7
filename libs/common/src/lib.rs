//! Common library for the ESG reporting application
//!
//! This crate provides shared infrastructure used by the services of the
//! ESG reporting application: PostgreSQL connectivity and the database
//! error taxonomy.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::from_env()?;
//! let pool = init_pool(&config).await?;
//! let is_healthy = health_check(&pool).await?;
//! println!("Database health check: {}", is_healthy);
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod error;
