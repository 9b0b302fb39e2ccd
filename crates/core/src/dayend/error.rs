//! Day-end error types.
//!
//! Every error aborts the run. The caller owns the enclosing database
//! transaction and is expected to roll it back and re-run wholesale once the
//! cause is fixed.

use rust_decimal::Decimal;
use thiserror::Error;

use dayend_shared::AppError;
use dayend_shared::types::ContractId;

/// Errors that can occur during a day-end run.
#[derive(Debug, Error)]
pub enum DayEndError {
    // ========== Data Integrity Errors ==========
    /// A contract with a due installment has no financial snapshot.
    #[error("Contract financial not found for contract {0}")]
    ContractFinancialNotFound(ContractId),

    /// The stored recovery status id is not one of the known stages.
    #[error("Unknown recovery status id: {0}")]
    InvalidRecoveryStatus(i32),

    /// The snapshot cannot be placed in the decision table.
    #[error("Contract {contract_id} cannot be classified: {reason}")]
    UnclassifiableContract {
        /// The contract being classified.
        contract_id: ContractId,
        /// Why classification failed.
        reason: String,
    },

    // ========== Posting Errors ==========
    /// Journal entries for one installment do not balance.
    #[error("Journal entries are not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntries {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// A journal entry carries a negative amount.
    #[error("Journal entry amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    // ========== Request Errors ==========
    /// A manual run was requested without a contract id.
    #[error("Manual day-end run requires a contract id")]
    ManualRunWithoutContract,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl DayEndError {
    /// Returns the error code for logs and run reports.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ContractFinancialNotFound(_) => "CONTRACT_FINANCIAL_NOT_FOUND",
            Self::InvalidRecoveryStatus(_) => "INVALID_RECOVERY_STATUS",
            Self::UnclassifiableContract { .. } => "UNCLASSIFIABLE_CONTRACT",
            Self::UnbalancedEntries { .. } => "UNBALANCED_ENTRIES",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::ManualRunWithoutContract => "MANUAL_RUN_WITHOUT_CONTRACT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if the error points at bad persisted data rather than
    /// an infrastructure failure.
    #[must_use]
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::ContractFinancialNotFound(_)
                | Self::InvalidRecoveryStatus(_)
                | Self::UnclassifiableContract { .. }
        )
    }
}

impl From<DayEndError> for AppError {
    fn from(err: DayEndError) -> Self {
        match err {
            DayEndError::ContractFinancialNotFound(_) => Self::NotFound(err.to_string()),
            DayEndError::InvalidRecoveryStatus(_) | DayEndError::UnclassifiableContract { .. } => {
                Self::DataIntegrity(err.to_string())
            }
            DayEndError::UnbalancedEntries { .. } | DayEndError::NegativeAmount(_) => {
                Self::Internal(err.to_string())
            }
            DayEndError::ManualRunWithoutContract => Self::Validation(err.to_string()),
            DayEndError::Database(msg) => Self::Database(msg),
        }
    }
}
