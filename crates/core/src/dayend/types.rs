//! Day-end domain types.
//!
//! These are the typed views of the loan schema the engine works with:
//! the installment being issued, the contract's financial snapshot, and the
//! per-installment audit record returned to the caller.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use dayend_shared::types::{ContractId, InstallmentId};

use super::error::DayEndError;

/// Delinquency stage of a loan contract.
///
/// Stages only ever move forward:
/// - Active → Arrears
/// - Arrears → NPL
/// - NPL → BadDebtProvisioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStatus {
    /// Contract is performing.
    Active,
    /// Contract has unpaid installments.
    Arrears,
    /// Non-performing loan.
    Npl,
    /// Outstanding capital is fully provisioned (terminal).
    BadDebtProvisioned,
}

impl RecoveryStatus {
    /// Returns the database id of the status.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Active => 1,
            Self::Arrears => 2,
            Self::Npl => 3,
            Self::BadDebtProvisioned => 4,
        }
    }

    /// Looks a status up by its database id.
    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Active),
            2 => Some(Self::Arrears),
            3 => Some(Self::Npl),
            4 => Some(Self::BadDebtProvisioned),
            _ => None,
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Arrears => "arrears",
            Self::Npl => "npl",
            Self::BadDebtProvisioned => "bad_debt_provisioned",
        }
    }
}

impl TryFrom<i32> for RecoveryStatus {
    type Error = DayEndError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(DayEndError::InvalidRecoveryStatus(id))
    }
}

impl fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rental installment due for its day-end entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueInstallment {
    /// Schedule row id.
    pub id: InstallmentId,
    /// Contract the installment belongs to.
    pub contract_id: ContractId,
    /// Capital portion of the installment.
    pub capital: Decimal,
    /// Interest portion of the installment.
    pub interest: Decimal,
    /// Date the installment falls due.
    pub due_date: NaiveDate,
}

impl DueInstallment {
    /// Full installment amount (capital + interest).
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.capital + self.interest
    }
}

/// Financial snapshot of a contract, one per contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFinancial {
    /// Whether the contract's schedule is still running.
    pub active: bool,
    /// Current delinquency stage.
    pub recovery_status: RecoveryStatus,
    /// Arrears are doubtful of recovery.
    pub doubtful: bool,
    /// Scheduled payment per period.
    pub payment: Decimal,
    /// Cumulative capital moved to arrears.
    pub capital_arrears: Decimal,
    /// Cumulative interest moved to arrears.
    pub interest_arrears: Decimal,
    /// Cumulative capital provisioned as bad debt.
    pub capital_provisioned: Decimal,
    /// Due date of the last scheduled rental.
    pub schedule_end_date: NaiveDate,
}

impl ContractFinancial {
    /// Total arrears (capital + interest).
    #[must_use]
    pub fn arrears(&self) -> Decimal {
        self.capital_arrears + self.interest_arrears
    }
}

/// Status change produced by one processed installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedContractRecord {
    /// The contract that was processed.
    pub contract_id: ContractId,
    /// Recovery status before the installment was applied.
    pub recovery_status: RecoveryStatus,
    /// Recovery status after the installment was applied.
    pub updated_recovery_status: RecoveryStatus,
}

impl UpdatedContractRecord {
    /// Returns true if the installment moved the contract to a new stage.
    #[must_use]
    pub fn status_changed(&self) -> bool {
        self.recovery_status != self.updated_recovery_status
    }
}

/// Which contracts a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "contract_id")]
pub enum RunScope {
    /// Every contract with due installments.
    AllContracts,
    /// A single contract, for manual re-runs.
    SingleContract(ContractId),
}

impl RunScope {
    /// Builds the scope from the manual flag and optional contract filter.
    ///
    /// # Errors
    ///
    /// Returns `DayEndError::ManualRunWithoutContract` when a manual run has
    /// no contract to run for.
    pub fn from_request(manual: bool, contract: Option<ContractId>) -> Result<Self, DayEndError> {
        match (manual, contract) {
            (true, Some(contract_id)) => Ok(Self::SingleContract(contract_id)),
            (true, None) => Err(DayEndError::ManualRunWithoutContract),
            (false, _) => Ok(Self::AllContracts),
        }
    }

    /// Returns the contract filter, if any.
    #[must_use]
    pub const fn contract(&self) -> Option<ContractId> {
        match self {
            Self::AllContracts => None,
            Self::SingleContract(contract_id) => Some(*contract_id),
        }
    }
}

impl fmt::Display for RunScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllContracts => f.write_str("all"),
            Self::SingleContract(contract_id) => write!(f, "contract:{contract_id}"),
        }
    }
}
