//! Journal entry construction for day-end postings.
//!
//! A journal entry names one account and carries a debit, a credit, or
//! (never in practice) both. Each populated side becomes one posting line
//! tagged `DR` or `CR` in the ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use dayend_shared::types::AccountId;

use super::accounts::{ChartOfAccounts, LedgerAccount};
use super::classifier::{Decision, InterestRouting, ProvisionAction};
use super::types::DueInstallment;

/// Side of a posting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// Debit side.
    #[serde(rename = "DR")]
    Debit,
    /// Credit side.
    #[serde(rename = "CR")]
    Credit,
}

impl EntryType {
    /// Returns the ledger type tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "DR",
            Self::Credit => "CR",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal entry line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Role of the account in the day-end postings.
    pub account: LedgerAccount,
    /// Account id the line posts to.
    pub account_id: AccountId,
    /// Debit amount, if any.
    pub debit: Option<Decimal>,
    /// Credit amount, if any.
    pub credit: Option<Decimal>,
}

impl JournalEntry {
    /// Yields one posting line per populated side, debit first.
    pub fn postings(&self) -> impl Iterator<Item = PostingLine> + '_ {
        let debit = self.debit.map(|amount| PostingLine {
            account_id: self.account_id,
            entry_type: EntryType::Debit,
            amount,
        });
        let credit = self.credit.map(|amount| PostingLine {
            account_id: self.account_id,
            entry_type: EntryType::Credit,
            amount,
        });
        debit.into_iter().chain(credit)
    }
}

/// A single ledger row: account, side, amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    /// Account posted to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Amount, fixed-point.
    pub amount: Decimal,
}

/// Totals of a journal entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalTotals {
    /// Sum of all debits.
    pub debit: Decimal,
    /// Sum of all credits.
    pub credit: Decimal,
}

impl JournalTotals {
    /// Sums the debits and credits of a list of entries.
    #[must_use]
    pub fn of(entries: &[JournalEntry]) -> Self {
        let debit = entries.iter().filter_map(|e| e.debit).sum();
        let credit = entries.iter().filter_map(|e| e.credit).sum();
        Self { debit, credit }
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// Flattens journal entries into ledger posting lines, in order.
#[must_use]
pub fn posting_lines(entries: &[JournalEntry]) -> Vec<PostingLine> {
    entries.iter().flat_map(JournalEntry::postings).collect()
}

/// Builds the journal entries for a classified installment.
#[derive(Debug, Clone, Copy)]
pub struct JournalBuilder<'a> {
    chart: &'a ChartOfAccounts,
}

impl<'a> JournalBuilder<'a> {
    /// Creates a builder posting to the given chart of accounts.
    #[must_use]
    pub const fn new(chart: &'a ChartOfAccounts) -> Self {
        Self { chart }
    }

    /// Produces the ordered entries for one installment.
    ///
    /// 1. Receivable → Receivable-Arrears by the full installment amount
    /// 2. Unearned interest → Income or Suspense by the installment interest
    /// 3. Interest income → Suspense by the prior interest arrears, on reclassification
    /// 4. Bad-debt provision pair by `provision`, when the decision provisions
    ///
    /// Pairs with a zero amount are left out. A negative amount (prepaid
    /// interest arrears) is posted as the reversed pair by its absolute value.
    #[must_use]
    pub fn build(
        &self,
        decision: &Decision,
        installment: &DueInstallment,
        interest_arrears: Decimal,
        provision: Decimal,
    ) -> Vec<JournalEntry> {
        let mut entries = Vec::with_capacity(8);

        self.transfer(
            &mut entries,
            LedgerAccount::ReceivableArrears,
            LedgerAccount::Receivable,
            installment.amount(),
        );

        let interest_account = match decision.interest {
            InterestRouting::Income => LedgerAccount::InterestIncome,
            InterestRouting::Suspense => LedgerAccount::SuspenseInterest,
        };
        self.transfer(
            &mut entries,
            LedgerAccount::UnearnedInterest,
            interest_account,
            installment.interest,
        );

        if decision.reclassify_interest_arrears {
            self.transfer(
                &mut entries,
                LedgerAccount::InterestIncome,
                LedgerAccount::SuspenseInterest,
                interest_arrears,
            );
        }

        if decision.provision != ProvisionAction::None {
            self.transfer(
                &mut entries,
                LedgerAccount::BadDebtProvision,
                LedgerAccount::ProvisionForBadDebt,
                provision,
            );
        }

        entries
    }

    fn transfer(
        &self,
        entries: &mut Vec<JournalEntry>,
        debit: LedgerAccount,
        credit: LedgerAccount,
        amount: Decimal,
    ) {
        if amount.is_zero() {
            return;
        }
        let (debit, credit) = if amount.is_sign_negative() {
            (credit, debit)
        } else {
            (debit, credit)
        };
        let amount = amount.abs();
        entries.push(self.debit(debit, amount));
        entries.push(self.credit(credit, amount));
    }

    fn debit(&self, account: LedgerAccount, amount: Decimal) -> JournalEntry {
        JournalEntry {
            account,
            account_id: self.chart.id(account),
            debit: Some(amount),
            credit: None,
        }
    }

    fn credit(&self, account: LedgerAccount, amount: Decimal) -> JournalEntry {
        JournalEntry {
            account,
            account_id: self.chart.id(account),
            debit: None,
            credit: Some(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dayend::classifier::decide;
    use crate::dayend::types::RecoveryStatus;
    use chrono::NaiveDate;
    use dayend_shared::types::{ContractId, InstallmentId};
    use rust_decimal_macros::dec;

    fn installment(capital: Decimal, interest: Decimal) -> DueInstallment {
        DueInstallment {
            id: InstallmentId::new(1),
            contract_id: ContractId::new(1),
            capital,
            interest,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    fn sides(entries: &[JournalEntry]) -> Vec<(LedgerAccount, EntryType, Decimal)> {
        entries
            .iter()
            .flat_map(|e| {
                e.postings()
                    .map(|p| (e.account, p.entry_type, p.amount))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn test_income_routing_scenario_a() {
        let chart = ChartOfAccounts::default();
        let decision = decide(RecoveryStatus::Active, false, dec!(0.6));
        let entries =
            JournalBuilder::new(&chart).build(&decision, &installment(dec!(50), dec!(10)), dec!(0), dec!(0));

        assert_eq!(
            sides(&entries),
            vec![
                (LedgerAccount::ReceivableArrears, EntryType::Debit, dec!(60)),
                (LedgerAccount::Receivable, EntryType::Credit, dec!(60)),
                (LedgerAccount::UnearnedInterest, EntryType::Debit, dec!(10)),
                (LedgerAccount::InterestIncome, EntryType::Credit, dec!(10)),
            ]
        );
        assert_eq!(entries[0].account_id, AccountId::new(192));
        assert_eq!(entries[1].account_id, AccountId::new(185));
    }

    #[test]
    fn test_suspense_routing() {
        let chart = ChartOfAccounts::default();
        let decision = decide(RecoveryStatus::Arrears, true, dec!(5.6));
        let entries =
            JournalBuilder::new(&chart).build(&decision, &installment(dec!(50), dec!(10)), dec!(0), dec!(0));

        assert_eq!(
            sides(&entries)[2..],
            [
                (LedgerAccount::UnearnedInterest, EntryType::Debit, dec!(10)),
                (LedgerAccount::SuspenseInterest, EntryType::Credit, dec!(10)),
            ]
        );
    }

    #[test]
    fn test_reclassification_and_provision() {
        let chart = ChartOfAccounts::default();
        let decision = decide(RecoveryStatus::Arrears, false, dec!(6.5));
        let entries = JournalBuilder::new(&chart).build(
            &decision,
            &installment(dec!(50), dec!(10)),
            dec!(120),
            dec!(750.25),
        );

        assert_eq!(
            sides(&entries),
            vec![
                (LedgerAccount::ReceivableArrears, EntryType::Debit, dec!(60)),
                (LedgerAccount::Receivable, EntryType::Credit, dec!(60)),
                (LedgerAccount::UnearnedInterest, EntryType::Debit, dec!(10)),
                (LedgerAccount::SuspenseInterest, EntryType::Credit, dec!(10)),
                (LedgerAccount::InterestIncome, EntryType::Debit, dec!(120)),
                (LedgerAccount::SuspenseInterest, EntryType::Credit, dec!(120)),
                (LedgerAccount::BadDebtProvision, EntryType::Debit, dec!(750.25)),
                (LedgerAccount::ProvisionForBadDebt, EntryType::Credit, dec!(750.25)),
            ]
        );
        assert!(JournalTotals::of(&entries).is_balanced());
    }

    #[test]
    fn test_negative_interest_arrears_posts_reversed_pair() {
        let chart = ChartOfAccounts::default();
        let decision = decide(RecoveryStatus::Arrears, false, dec!(7.55));
        let entries = JournalBuilder::new(&chart).build(
            &decision,
            &installment(dec!(50), dec!(10)),
            dec!(-5),
            dec!(100),
        );

        assert_eq!(
            sides(&entries)[4..6],
            [
                (LedgerAccount::SuspenseInterest, EntryType::Debit, dec!(5)),
                (LedgerAccount::InterestIncome, EntryType::Credit, dec!(5)),
            ]
        );
        assert!(JournalTotals::of(&entries).is_balanced());
    }

    #[test]
    fn test_provision_ignored_without_provision_action() {
        let chart = ChartOfAccounts::default();
        let decision = decide(RecoveryStatus::Npl, true, dec!(3));
        let entries = JournalBuilder::new(&chart).build(
            &decision,
            &installment(dec!(50), dec!(10)),
            dec!(0),
            dec!(999),
        );
        assert_eq!(entries.len(), 4);
        assert!(
            entries
                .iter()
                .all(|e| e.account != LedgerAccount::BadDebtProvision)
        );
    }

    #[test]
    fn test_zero_interest_skips_interest_pair() {
        let chart = ChartOfAccounts::default();
        let decision = decide(RecoveryStatus::Active, false, dec!(0.5));
        let entries =
            JournalBuilder::new(&chart).build(&decision, &installment(dec!(50), dec!(0)), dec!(0), dec!(0));
        assert_eq!(entries.len(), 2);
        assert_eq!(JournalTotals::of(&entries).debit, dec!(50));
    }

    #[test]
    fn test_custom_chart_is_used() {
        let config = dayend_shared::ChartOfAccountsConfig {
            interest_income: 4000,
            ..Default::default()
        };
        let chart = ChartOfAccounts::from(&config);
        let decision = decide(RecoveryStatus::Active, false, dec!(0));
        let entries =
            JournalBuilder::new(&chart).build(&decision, &installment(dec!(50), dec!(10)), dec!(0), dec!(0));
        assert_eq!(entries[3].account_id, AccountId::new(4000));
    }

    #[test]
    fn test_posting_lines_skip_empty_sides() {
        let entry = JournalEntry {
            account: LedgerAccount::Receivable,
            account_id: AccountId::new(185),
            debit: None,
            credit: Some(dec!(60)),
        };
        let lines = posting_lines(std::slice::from_ref(&entry));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].entry_type, EntryType::Credit);
        assert_eq!(lines[0].entry_type.as_str(), "CR");
    }

    #[test]
    fn test_entry_with_both_sides_yields_two_lines() {
        let entry = JournalEntry {
            account: LedgerAccount::Receivable,
            account_id: AccountId::new(185),
            debit: Some(dec!(1)),
            credit: Some(dec!(1)),
        };
        let lines: Vec<_> = entry.postings().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].entry_type, EntryType::Debit);
        assert_eq!(lines[1].entry_type, EntryType::Credit);
    }
}
