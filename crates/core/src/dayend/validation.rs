//! Business rule validation for day-end journal entries.

use rust_decimal::Decimal;

use super::error::DayEndError;
use super::journal::{JournalEntry, JournalTotals};

/// Validates that a set of journal entries can be posted.
///
/// An empty list is accepted (nothing to post). Otherwise every amount must
/// be non-negative and debits must equal credits.
///
/// # Errors
///
/// Returns an error if an amount is negative or the entries are not balanced.
pub fn validate_entries(entries: &[JournalEntry]) -> Result<JournalTotals, DayEndError> {
    for entry in entries {
        for amount in entry.debit.iter().chain(entry.credit.iter()) {
            if *amount < Decimal::ZERO {
                return Err(DayEndError::NegativeAmount(*amount));
            }
        }
    }

    let totals = JournalTotals::of(entries);
    if !totals.is_balanced() {
        return Err(DayEndError::UnbalancedEntries {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}
