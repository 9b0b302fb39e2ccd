//! Shared types, errors, and configuration for the day-end engine.
//!
//! This crate provides common types used across all other crates:
//! - Typed integer IDs for contracts, installments, accounts and transactions
//! - Application-wide error types
//! - Configuration management, including the chart-of-accounts mapping

pub mod config;
pub mod error;
pub mod types;


pub use config::{AppConfig, ChartOfAccountsConfig, DatabaseConfig, DayEndConfig};
pub use error::AppError;
