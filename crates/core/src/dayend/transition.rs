//! Pure state transition for one installment.
//!
//! `apply_decision` takes the prior snapshot and the classification and
//! returns everything the writer needs: the journal entries, the column
//! update, the next snapshot and the audit record. Nothing here touches
//! storage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classifier::{Classification, ProvisionAction};
use super::error::DayEndError;
use super::journal::{JournalBuilder, JournalEntry};
use super::types::{ContractFinancial, DueInstallment, RecoveryStatus, UpdatedContractRecord};
use super::validation::validate_entries;

/// Column changes to a contract's financial row.
///
/// Increments are applied as `column = column + amount`; the optional
/// fields are only written when they change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialUpdate {
    /// Added to cumulative capital arrears.
    pub capital_arrears_increase: Decimal,
    /// Added to cumulative interest arrears.
    pub interest_arrears_increase: Decimal,
    /// New recovery status.
    pub recovery_status: Option<RecoveryStatus>,
    /// New doubtful flag.
    pub doubtful: Option<bool>,
    /// Added to cumulative provisioned capital.
    pub capital_provisioned_increase: Option<Decimal>,
    /// Added to the bad-debt share of provisioned capital.
    pub bad_debt_provisioned_increase: Option<Decimal>,
    /// The schedule has run out; mark the contract inactive.
    pub deactivate: bool,
}

impl FinancialUpdate {
    /// Returns the snapshot after this update.
    #[must_use]
    pub fn apply_to(&self, snapshot: &ContractFinancial) -> ContractFinancial {
        ContractFinancial {
            active: snapshot.active && !self.deactivate,
            recovery_status: self.recovery_status.unwrap_or(snapshot.recovery_status),
            doubtful: self.doubtful.unwrap_or(snapshot.doubtful),
            payment: snapshot.payment,
            capital_arrears: snapshot.capital_arrears + self.capital_arrears_increase,
            interest_arrears: snapshot.interest_arrears + self.interest_arrears_increase,
            capital_provisioned: snapshot.capital_provisioned
                + self.capital_provisioned_increase.unwrap_or_default(),
            schedule_end_date: snapshot.schedule_end_date,
        }
    }
}

/// Everything produced by applying a decision to one installment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Age and decision the transition was built from.
    pub classification: Classification,
    /// Provision amount posted (zero when none).
    pub provision: Decimal,
    /// Journal entries to post.
    pub entries: Vec<JournalEntry>,
    /// Column update for the contract's financial row.
    pub update: FinancialUpdate,
    /// Snapshot after the update.
    pub next: ContractFinancial,
    /// Audit record for the run report.
    pub record: UpdatedContractRecord,
}

/// Applies a classified decision to the prior snapshot.
///
/// `provision` is the amount computed for the decision's provisioning action
/// and is ignored when the decision does not provision.
///
/// # Errors
///
/// Returns an error if the resulting journal entries do not validate.
pub fn apply_decision(
    builder: &JournalBuilder<'_>,
    snapshot: &ContractFinancial,
    installment: &DueInstallment,
    classification: Classification,
    provision: Decimal,
) -> Result<Transition, DayEndError> {
    let decision = classification.decision;
    let provision = match decision.provision {
        ProvisionAction::None => Decimal::ZERO,
        _ => provision,
    };

    let entries = builder.build(&decision, installment, snapshot.interest_arrears, provision);
    validate_entries(&entries)?;

    let provisioned = (provision > Decimal::ZERO).then_some(provision);
    let update = FinancialUpdate {
        capital_arrears_increase: installment.capital,
        interest_arrears_increase: installment.interest,
        recovery_status: (decision.next_status != snapshot.recovery_status)
            .then_some(decision.next_status),
        doubtful: (decision.next_doubtful != snapshot.doubtful).then_some(decision.next_doubtful),
        capital_provisioned_increase: provisioned,
        bad_debt_provisioned_increase: provisioned
            .filter(|_| decision.provision == ProvisionAction::TopUpToFull),
        deactivate: installment.due_date == snapshot.schedule_end_date,
    };

    let next = update.apply_to(snapshot);
    let record = UpdatedContractRecord {
        contract_id: installment.contract_id,
        recovery_status: snapshot.recovery_status,
        updated_recovery_status: next.recovery_status,
    };

    Ok(Transition {
        classification,
        provision,
        entries,
        update,
        next,
        record,
    })
}
