//! Core business logic for the day-end engine.
//!
//! This crate contains pure business logic with ZERO database dependencies.
//! Storage is reached through the `DayEndStore` trait, implemented by the
//! `dayend-db` crate.
//!
//! # Modules
//!
//! - `dayend` - Arrears classification, journal construction and the run

pub mod dayend;
