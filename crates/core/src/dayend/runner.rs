//! Day-end run orchestration.
//!
//! Installments are processed strictly in loader order, one at a time. A
//! later installment of the same contract reads the arrears written by an
//! earlier one, so there is no parallelism across contracts. The first error
//! aborts the run; the caller rolls back the enclosing transaction.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info};

use dayend_shared::DayEndConfig;
use dayend_shared::types::UserId;

use super::accounts::ChartOfAccounts;
use super::classifier::classify;
use super::error::DayEndError;
use super::journal::{JournalBuilder, posting_lines};
use super::store::{DayEndStore, TransactionHeader};
use super::transition::apply_decision;
use super::types::{DueInstallment, RunScope, UpdatedContractRecord};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Cutoff date the run processed up to.
    pub cutoff: NaiveDate,
    /// Contracts the run covered.
    pub scope: RunScope,
    /// One record per processed installment, in processing order.
    pub updated_contracts: Vec<UpdatedContractRecord>,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl RunReport {
    /// Number of installments processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.updated_contracts.len()
    }

    /// Records whose installment moved the contract to a new stage.
    pub fn status_changes(&self) -> impl Iterator<Item = &UpdatedContractRecord> {
        self.updated_contracts
            .iter()
            .filter(|record| record.status_changed())
    }
}

/// Runs the day-end program against a store.
#[derive(Debug, Clone)]
pub struct DayEndRunner {
    chart: ChartOfAccounts,
    posting_user: UserId,
}

impl DayEndRunner {
    /// Creates a runner posting to `chart` on behalf of `posting_user`.
    #[must_use]
    pub const fn new(chart: ChartOfAccounts, posting_user: UserId) -> Self {
        Self {
            chart,
            posting_user,
        }
    }

    /// Creates a runner from the day-end configuration section.
    #[must_use]
    pub fn from_config(config: &DayEndConfig) -> Self {
        Self::new(
            ChartOfAccounts::from(&config.accounts),
            UserId::new(config.posting_user_id),
        )
    }

    /// Processes every due installment in scope.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the store or by classification.
    /// No partial report is returned.
    pub async fn run<S>(
        &self,
        store: &S,
        cutoff: NaiveDate,
        scope: RunScope,
    ) -> Result<RunReport, DayEndError>
    where
        S: DayEndStore + ?Sized,
    {
        let started = Instant::now();

        let installments = store.due_installments(cutoff, scope).await?;
        info!(
            cutoff = %cutoff,
            scope = %scope,
            due = installments.len(),
            "Starting day-end run"
        );

        let mut updated_contracts = Vec::with_capacity(installments.len());
        for installment in &installments {
            let record = self.process_installment(store, installment).await?;
            updated_contracts.push(record);
        }

        let report = RunReport {
            cutoff,
            scope,
            updated_contracts,
            elapsed: started.elapsed(),
        };
        info!(
            processed = report.processed(),
            status_changes = report.status_changes().count(),
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Day-end run complete"
        );

        Ok(report)
    }

    async fn process_installment<S>(
        &self,
        store: &S,
        installment: &DueInstallment,
    ) -> Result<UpdatedContractRecord, DayEndError>
    where
        S: DayEndStore + ?Sized,
    {
        let contract_id = installment.contract_id;
        let snapshot = store
            .contract_financial(contract_id)
            .await?
            .ok_or(DayEndError::ContractFinancialNotFound(contract_id))?;

        let classification = classify(&snapshot, installment)?;
        let decision = classification.decision;

        let provision = if decision.provision.requires_capital_receivable() {
            let receivable = store.capital_receivable(contract_id).await?;
            decision
                .provision
                .amount(receivable, snapshot.capital_provisioned)
        } else {
            Decimal::ZERO
        };

        let builder = JournalBuilder::new(&self.chart);
        let transition =
            apply_decision(&builder, &snapshot, installment, classification, provision)?;

        debug!(
            installment_id = %installment.id,
            contract_id = %contract_id,
            age = %classification.age,
            interest = ?decision.interest,
            provision = %transition.provision,
            entries = transition.entries.len(),
            "Installment classified"
        );

        let header = TransactionHeader::day_end(self.posting_user, installment, Local::now());
        let transaction_id = store.insert_transaction(&header).await?;
        store
            .insert_postings(transaction_id, &posting_lines(&transition.entries))
            .await?;
        store
            .update_contract_financial(contract_id, &transition.update)
            .await?;
        store.mark_installment_issued(installment.id).await?;

        if transition.record.status_changed() {
            info!(
                contract_id = %contract_id,
                from = %transition.record.recovery_status,
                to = %transition.record.updated_recovery_status,
                "Recovery status changed"
            );
        }
        if transition.update.deactivate {
            info!(contract_id = %contract_id, "Schedule ended, contract marked inactive");
        }

        Ok(transition.record)
    }
}
