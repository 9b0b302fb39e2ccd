//! Storage seam for the day-end run.
//!
//! The run reads and writes through `DayEndStore`. Implementations are bound
//! to one open database transaction; the run never begins, commits or rolls
//! it back.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dayend_shared::types::{ContractId, InstallmentId, TransactionId, UserId};

use super::error::DayEndError;
use super::journal::PostingLine;
use super::transition::FinancialUpdate;
use super::types::{ContractFinancial, DueInstallment, RunScope};

/// Header row for the transaction recording one installment's postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// User the postings are attributed to.
    pub user_id: UserId,
    /// Wall-clock time of posting, second precision.
    pub recorded_at: NaiveDateTime,
    /// Accounting date of the posting.
    pub posting_date: NaiveDate,
    /// Contract the postings belong to.
    pub contract_id: ContractId,
    /// Free-text remark.
    pub remark: String,
}

impl TransactionHeader {
    /// Builds the header for an installment's day-end entry.
    ///
    /// Both timestamps are taken from the wall clock of `now`'s zone, so a
    /// run shortly after local midnight posts on the new local date.
    #[must_use]
    pub fn day_end<Tz: TimeZone>(
        user_id: UserId,
        installment: &DueInstallment,
        now: DateTime<Tz>,
    ) -> Self {
        let recorded_at = now.naive_local();
        Self {
            user_id,
            recorded_at: recorded_at.with_nanosecond(0).unwrap_or(recorded_at),
            posting_date: recorded_at.date(),
            contract_id: installment.contract_id,
            remark: format!("DAY END {} [{}]", installment.id, installment.contract_id),
        }
    }
}

/// Typed reads and single-statement writes used by the day-end run.
#[async_trait]
pub trait DayEndStore: Send + Sync {
    /// Unissued rental installments due on or before `cutoff`, ordered by
    /// contract then due date.
    async fn due_installments(
        &self,
        cutoff: NaiveDate,
        scope: RunScope,
    ) -> Result<Vec<DueInstallment>, DayEndError>;

    /// The contract's financial snapshot, if one exists.
    async fn contract_financial(
        &self,
        contract_id: ContractId,
    ) -> Result<Option<ContractFinancial>, DayEndError>;

    /// Unpaid scheduled capital across the contract's rentals.
    async fn capital_receivable(&self, contract_id: ContractId) -> Result<Decimal, DayEndError>;

    /// Inserts a transaction header and returns its id.
    async fn insert_transaction(
        &self,
        header: &TransactionHeader,
    ) -> Result<TransactionId, DayEndError>;

    /// Inserts one ledger row per posting line.
    async fn insert_postings(
        &self,
        transaction_id: TransactionId,
        lines: &[PostingLine],
    ) -> Result<(), DayEndError>;

    /// Applies a column update to the contract's financial row.
    async fn update_contract_financial(
        &self,
        contract_id: ContractId,
        update: &FinancialUpdate,
    ) -> Result<(), DayEndError>;

    /// Flags the installment's day-end entry as issued.
    async fn mark_installment_issued(
        &self,
        installment_id: InstallmentId,
    ) -> Result<(), DayEndError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_day_end_header() {
        let installment = DueInstallment {
            id: InstallmentId::new(5012),
            contract_id: ContractId::new(77),
            capital: dec!(50),
            interest: dec!(10),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        let now = Utc
            .with_ymd_and_hms(2024, 1, 16, 23, 30, 5)
            .unwrap()
            .with_nanosecond(123_000_000)
            .unwrap();

        let header = TransactionHeader::day_end(UserId::new(1), &installment, now);

        assert_eq!(header.remark, "DAY END 5012 [77]");
        assert_eq!(header.contract_id, ContractId::new(77));
        assert_eq!(header.posting_date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        assert_eq!(header.recorded_at.nanosecond(), 0);
        assert_eq!(header.recorded_at.second(), 5);
    }

    #[test]
    fn test_day_end_header_uses_local_wall_clock() {
        let installment = DueInstallment {
            id: InstallmentId::new(5012),
            contract_id: ContractId::new(77),
            capital: dec!(50),
            interest: dec!(10),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
        };
        // 00:30 on the 17th at UTC+05:30 is still the 16th in UTC
        let colombo = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let now = colombo.with_ymd_and_hms(2024, 1, 17, 0, 30, 0).unwrap();
        assert_eq!(
            now.naive_utc().date(),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );

        let header = TransactionHeader::day_end(UserId::new(1), &installment, now);

        assert_eq!(header.posting_date, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(header.recorded_at.hour(), 0);
        assert_eq!(header.recorded_at.minute(), 30);
    }
}
