//! Chart-of-accounts mapping for day-end postings.

use serde::{Deserialize, Serialize};

use dayend_shared::ChartOfAccountsConfig;
use dayend_shared::types::AccountId;

/// Ledger accounts touched by day-end postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAccount {
    /// Interest billed but not yet earned (liability).
    UnearnedInterest,
    /// Earned interest (revenue).
    InterestIncome,
    /// Performing rental receivable (asset).
    Receivable,
    /// Rental receivable in arrears (asset).
    ReceivableArrears,
    /// Interest held in suspense (liability).
    SuspenseInterest,
    /// Bad debt provision (expense).
    BadDebtProvision,
    /// Provision for bad debt (contra-asset).
    ProvisionForBadDebt,
}

/// Resolves ledger accounts to the deployment's account ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOfAccounts {
    unearned_interest: AccountId,
    interest_income: AccountId,
    receivable: AccountId,
    receivable_arrears: AccountId,
    suspense_interest: AccountId,
    bad_debt_provision: AccountId,
    provision_for_bad_debt: AccountId,
}

impl ChartOfAccounts {
    /// Returns the account id mapped to a ledger account.
    #[must_use]
    pub const fn id(&self, account: LedgerAccount) -> AccountId {
        match account {
            LedgerAccount::UnearnedInterest => self.unearned_interest,
            LedgerAccount::InterestIncome => self.interest_income,
            LedgerAccount::Receivable => self.receivable,
            LedgerAccount::ReceivableArrears => self.receivable_arrears,
            LedgerAccount::SuspenseInterest => self.suspense_interest,
            LedgerAccount::BadDebtProvision => self.bad_debt_provision,
            LedgerAccount::ProvisionForBadDebt => self.provision_for_bad_debt,
        }
    }
}

impl From<&ChartOfAccountsConfig> for ChartOfAccounts {
    fn from(config: &ChartOfAccountsConfig) -> Self {
        Self {
            unearned_interest: AccountId::new(config.unearned_interest),
            interest_income: AccountId::new(config.interest_income),
            receivable: AccountId::new(config.receivable),
            receivable_arrears: AccountId::new(config.receivable_arrears),
            suspense_interest: AccountId::new(config.suspense_interest),
            bad_debt_provision: AccountId::new(config.bad_debt_provision),
            provision_for_bad_debt: AccountId::new(config.provision_for_bad_debt),
        }
    }
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        Self::from(&ChartOfAccountsConfig::default())
    }
}
