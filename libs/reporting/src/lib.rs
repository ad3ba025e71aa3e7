//! Domain library for the ESG reporting application
//!
//! This crate holds everything about energy and waste records that does not
//! touch the network or the database: the data model, input validation,
//! display-ID allocation, list filtering and the statistics engine that
//! feeds the dashboard and analytics views.

pub mod filter;
pub mod models;
pub mod record_id;
pub mod stats;
pub mod validation;
