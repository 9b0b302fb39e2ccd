//! Day-end arrears and provisioning.
//!
//! For every rental installment that falls due, the day-end run moves the
//! installment to arrears receivable, routes its interest to income or
//! suspense, provisions capital when a contract deteriorates, and advances
//! the contract's recovery status.
//!
//! # Modules
//!
//! - `types` - Installment, financial snapshot, status and run scope types
//! - `accounts` - Chart-of-accounts mapping
//! - `classifier` - Arrears age and the decision table
//! - `journal` - Journal entry construction and posting lines
//! - `validation` - Balance checks on journal entries
//! - `transition` - Pure application of a decision to a snapshot
//! - `store` - Storage seam used by the run
//! - `runner` - Run orchestration
//! - `error` - Day-end error types

pub mod accounts;
pub mod classifier;
pub mod error;
pub mod journal;
pub mod runner;
pub mod store;
pub mod transition;
pub mod types;
pub mod validation;

#[cfg(test)]
mod classifier_props;

pub use accounts::{ChartOfAccounts, LedgerAccount};
pub use classifier::{
    AgeBucket, Classification, Decision, InterestRouting, ProvisionAction, arrears_age, classify,
    decide,
};
pub use error::DayEndError;
pub use journal::{EntryType, JournalBuilder, JournalEntry, JournalTotals, PostingLine, posting_lines};
pub use runner::{DayEndRunner, RunReport};
pub use store::{DayEndStore, TransactionHeader};
pub use transition::{FinancialUpdate, Transition, apply_decision};
pub use types::{ContractFinancial, DueInstallment, RecoveryStatus, RunScope, UpdatedContractRecord};
pub use validation::validate_entries;
