//! `SeaORM` entities for the day-end schema.

pub mod account;
pub mod account_transaction;
pub mod contract;
pub mod contract_financial;
pub mod contract_schedule;
pub mod transaction;
