//! Day-end repository: the `SeaORM` implementation of `DayEndStore`.
//!
//! Every statement runs on the caller's open transaction. Arrears and
//! provisioning columns are updated with `column = column + ?` so a later
//! installment of the same contract builds on the earlier one.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use dayend_core::dayend::{
    ContractFinancial, DayEndError, DayEndStore, DueInstallment, FinancialUpdate, PostingLine,
    RecoveryStatus, RunScope, TransactionHeader,
};
use dayend_shared::types::{ContractId, InstallmentId, TransactionId};

use crate::entities::contract_schedule::RENTAL_INSTALLMENT_TYPE;
use crate::entities::{account_transaction, contract_financial, contract_schedule, transaction};

/// Day-end repository bound to one database transaction.
#[derive(Debug, Clone, Copy)]
pub struct DayEndRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> DayEndRepository<'a> {
    /// Creates a repository writing through `txn`.
    #[must_use]
    pub const fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

fn db_error(err: DbErr) -> DayEndError {
    DayEndError::Database(err.to_string())
}

/// Maps a schedule row to a due installment.
#[must_use]
pub fn due_installment(model: contract_schedule::Model) -> DueInstallment {
    DueInstallment {
        id: InstallmentId::new(model.id),
        contract_id: ContractId::new(model.contract_id),
        capital: model.capital,
        interest: model.interest,
        due_date: model.monthly_date,
    }
}

/// Maps a financial row to a snapshot.
///
/// # Errors
///
/// Returns `DayEndError::InvalidRecoveryStatus` for an unknown status id.
pub fn financial_snapshot(
    model: contract_financial::Model,
) -> Result<ContractFinancial, DayEndError> {
    Ok(ContractFinancial {
        active: model.active,
        recovery_status: RecoveryStatus::try_from(model.recovery_status_id)?,
        doubtful: model.doubtful,
        payment: model.payment,
        capital_arrears: model.capital_arrears,
        interest_arrears: model.interest_arrears,
        capital_provisioned: model.capital_provisioned,
        schedule_end_date: model.financial_schedule_end_date,
    })
}

#[async_trait]
impl DayEndStore for DayEndRepository<'_> {
    async fn due_installments(
        &self,
        cutoff: NaiveDate,
        scope: RunScope,
    ) -> Result<Vec<DueInstallment>, DayEndError> {
        let mut query = contract_schedule::Entity::find()
            .filter(contract_schedule::Column::DailyEntryIssued.eq(false))
            .filter(contract_schedule::Column::MonthlyDate.lte(cutoff))
            .filter(contract_schedule::Column::ContractInstallmentTypeId.eq(RENTAL_INSTALLMENT_TYPE));

        if let Some(contract_id) = scope.contract() {
            query = query.filter(contract_schedule::Column::ContractId.eq(contract_id.into_inner()));
        }

        let rows = query
            .order_by_asc(contract_schedule::Column::ContractId)
            .order_by_asc(contract_schedule::Column::MonthlyDate)
            .order_by_asc(contract_schedule::Column::Id)
            .all(self.txn)
            .await
            .map_err(db_error)?;

        debug!(cutoff = %cutoff, scope = %scope, rows = rows.len(), "Loaded due installments");
        Ok(rows.into_iter().map(due_installment).collect())
    }

    async fn contract_financial(
        &self,
        contract_id: ContractId,
    ) -> Result<Option<ContractFinancial>, DayEndError> {
        contract_financial::Entity::find_by_id(contract_id.into_inner())
            .one(self.txn)
            .await
            .map_err(db_error)?
            .map(financial_snapshot)
            .transpose()
    }

    async fn capital_receivable(&self, contract_id: ContractId) -> Result<Decimal, DayEndError> {
        let outstanding = Expr::col(contract_schedule::Column::Capital)
            .sub(Expr::col(contract_schedule::Column::CapitalPaid));

        let total: Option<Option<Decimal>> = contract_schedule::Entity::find()
            .select_only()
            .column_as(SimpleExpr::from(Func::sum(outstanding)), "capital_receivable")
            .filter(contract_schedule::Column::ContractId.eq(contract_id.into_inner()))
            .filter(contract_schedule::Column::ContractInstallmentTypeId.eq(RENTAL_INSTALLMENT_TYPE))
            .into_tuple()
            .one(self.txn)
            .await
            .map_err(db_error)?;

        Ok(total.flatten().unwrap_or_default())
    }

    async fn insert_transaction(
        &self,
        header: &TransactionHeader,
    ) -> Result<TransactionId, DayEndError> {
        let row = transaction::ActiveModel {
            user_id: Set(header.user_id.into_inner()),
            datetime: Set(header.recorded_at),
            posting_date: Set(header.posting_date),
            contract_id: Set(Some(header.contract_id.into_inner())),
            remark: Set(header.remark.clone()),
            ..Default::default()
        }
        .insert(self.txn)
        .await
        .map_err(db_error)?;

        Ok(TransactionId::new(row.id))
    }

    async fn insert_postings(
        &self,
        transaction_id: TransactionId,
        lines: &[PostingLine],
    ) -> Result<(), DayEndError> {
        if lines.is_empty() {
            return Ok(());
        }

        let rows = lines.iter().map(|line| account_transaction::ActiveModel {
            transaction_id: Set(transaction_id.into_inner()),
            account_id: Set(line.account_id.into_inner()),
            entry_type: Set(line.entry_type.as_str().to_string()),
            amount: Set(line.amount),
            ..Default::default()
        });

        account_transaction::Entity::insert_many(rows)
            .exec(self.txn)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn update_contract_financial(
        &self,
        contract_id: ContractId,
        update: &FinancialUpdate,
    ) -> Result<(), DayEndError> {
        use contract_financial::Column;

        let mut statement = contract_financial::Entity::update_many()
            .col_expr(
                Column::CapitalArrears,
                Expr::col(Column::CapitalArrears).add(update.capital_arrears_increase),
            )
            .col_expr(
                Column::InterestArrears,
                Expr::col(Column::InterestArrears).add(update.interest_arrears_increase),
            );

        if let Some(status) = update.recovery_status {
            statement = statement.col_expr(Column::RecoveryStatusId, Expr::value(status.id()));
        }
        if let Some(doubtful) = update.doubtful {
            statement = statement.col_expr(Column::Doubtful, Expr::value(doubtful));
        }
        if let Some(amount) = update.capital_provisioned_increase {
            statement = statement.col_expr(
                Column::CapitalProvisioned,
                Expr::col(Column::CapitalProvisioned).add(amount),
            );
        }
        if let Some(amount) = update.bad_debt_provisioned_increase {
            statement = statement.col_expr(
                Column::CapitalProvisionedBdp,
                Expr::col(Column::CapitalProvisionedBdp).add(amount),
            );
        }
        if update.deactivate {
            statement = statement.col_expr(Column::Active, Expr::value(false));
        }

        let result = statement
            .filter(Column::ContractId.eq(contract_id.into_inner()))
            .exec(self.txn)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(DayEndError::ContractFinancialNotFound(contract_id));
        }

        Ok(())
    }

    async fn mark_installment_issued(
        &self,
        installment_id: InstallmentId,
    ) -> Result<(), DayEndError> {
        let result = contract_schedule::Entity::update_many()
            .col_expr(contract_schedule::Column::DailyEntryIssued, Expr::value(true))
            .filter(contract_schedule::Column::Id.eq(installment_id.into_inner()))
            .exec(self.txn)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(DayEndError::Database(format!(
                "schedule row {installment_id} not found"
            )));
        }

        Ok(())
    }
}
