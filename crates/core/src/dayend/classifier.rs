//! Age-of-arrears classification.
//!
//! The age of a contract is the number of scheduled payments it is behind:
//!
//! ```text
//! age = (capital_arrears + interest_arrears + capital + interest) / payment
//! ```
//!
//! The decision table maps `(status, doubtful, age bucket)` to the interest
//! routing, the provisioning action and the next recovery status. The match
//! in [`decide`] is exhaustive, so every snapshot with a known status and a
//! positive payment gets a decision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::DayEndError;
use super::types::{ContractFinancial, DueInstallment, RecoveryStatus};

/// Age at which an arrears contract becomes non-performing.
pub const NPL_AGE: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Age at which a non-performing contract is fully provisioned.
pub const BAD_DEBT_AGE: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Where the installment's interest is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestRouting {
    /// Recognize as interest income.
    Income,
    /// Hold in suspense.
    Suspense,
}

/// Capital provisioning triggered by a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionAction {
    /// Nothing to provision.
    None,
    /// Provision half of the outstanding capital.
    HalfOutstandingCapital,
    /// Top the provision up to the full outstanding capital.
    TopUpToFull,
}

impl ProvisionAction {
    /// Returns true if the action needs the contract's capital receivable.
    #[must_use]
    pub const fn requires_capital_receivable(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Computes the amount to provision.
    ///
    /// `capital_receivable` is the sum of unpaid scheduled capital across the
    /// contract's rentals; `capital_provisioned` is what is already provisioned.
    /// The result is rounded to 2 decimals and never negative.
    #[must_use]
    pub fn amount(self, capital_receivable: Decimal, capital_provisioned: Decimal) -> Decimal {
        let raw = match self {
            Self::None => return Decimal::ZERO,
            Self::HalfOutstandingCapital => capital_receivable / Decimal::TWO,
            Self::TopUpToFull => capital_receivable - capital_provisioned,
        };
        round_amount(raw).max(Decimal::ZERO)
    }
}

/// Rounds a monetary amount to 2 decimals, midpoint away from zero.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Age buckets relevant to the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    /// `age <= 0`
    Current,
    /// `0 < age < 6`
    Overdue,
    /// `6 <= age < 12`
    NonPerforming,
    /// `age >= 12`
    Loss,
}

impl AgeBucket {
    /// Places an age in its bucket.
    #[must_use]
    pub fn of(age: Decimal) -> Self {
        if age <= Decimal::ZERO {
            Self::Current
        } else if age < NPL_AGE {
            Self::Overdue
        } else if age < BAD_DEBT_AGE {
            Self::NonPerforming
        } else {
            Self::Loss
        }
    }
}

/// The outcome of classifying one installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Where the installment interest goes.
    pub interest: InterestRouting,
    /// Move the contract's accumulated interest arrears from income to suspense.
    pub reclassify_interest_arrears: bool,
    /// Capital provisioning to post.
    pub provision: ProvisionAction,
    /// Recovery status after the installment.
    pub next_status: RecoveryStatus,
    /// Doubtful flag after the installment.
    pub next_doubtful: bool,
}

impl Decision {
    const fn hold(interest: InterestRouting, status: RecoveryStatus, doubtful: bool) -> Self {
        Self {
            interest,
            reclassify_interest_arrears: false,
            provision: ProvisionAction::None,
            next_status: status,
            next_doubtful: doubtful,
        }
    }
}

/// Result of classification: the computed age and the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Payments behind, including the installment being issued.
    pub age: Decimal,
    /// Decision-table outcome.
    pub decision: Decision,
}

/// Computes the arrears age for an installment.
///
/// # Errors
///
/// Returns `DayEndError::UnclassifiableContract` if the scheduled payment is
/// not positive, since the age is undefined then.
pub fn arrears_age(
    snapshot: &ContractFinancial,
    installment: &DueInstallment,
) -> Result<Decimal, DayEndError> {
    let unclassifiable = |reason: String| DayEndError::UnclassifiableContract {
        contract_id: installment.contract_id,
        reason,
    };

    if snapshot.payment <= Decimal::ZERO {
        return Err(unclassifiable(format!(
            "scheduled payment must be positive, got {}",
            snapshot.payment
        )));
    }

    let behind = snapshot.arrears() + installment.amount();
    behind
        .checked_div(snapshot.payment)
        .ok_or_else(|| unclassifiable("arrears age overflows".to_string()))
}

/// Applies the decision table.
#[must_use]
pub fn decide(status: RecoveryStatus, doubtful: bool, age: Decimal) -> Decision {
    use AgeBucket::{Current, Loss, NonPerforming, Overdue};
    use InterestRouting::{Income, Suspense};
    use RecoveryStatus::{Active, Arrears, BadDebtProvisioned, Npl};

    match (status, doubtful, AgeBucket::of(age)) {
        (Active, _, Current) => Decision::hold(Income, Active, doubtful),
        (Active, _, Overdue | NonPerforming | Loss) => Decision::hold(Income, Arrears, doubtful),

        (Arrears, true, NonPerforming | Loss) => Decision {
            interest: Suspense,
            reclassify_interest_arrears: false,
            provision: ProvisionAction::HalfOutstandingCapital,
            next_status: Npl,
            next_doubtful: true,
        },
        (Arrears, true, Current | Overdue) => Decision::hold(Suspense, Arrears, true),
        (Arrears, false, NonPerforming | Loss) => Decision {
            interest: Suspense,
            reclassify_interest_arrears: true,
            provision: ProvisionAction::HalfOutstandingCapital,
            next_status: Npl,
            next_doubtful: true,
        },
        (Arrears, false, Current | Overdue) => Decision::hold(Income, Arrears, false),

        (Npl, _, Loss) => Decision {
            interest: Suspense,
            reclassify_interest_arrears: false,
            provision: ProvisionAction::TopUpToFull,
            next_status: BadDebtProvisioned,
            next_doubtful: doubtful,
        },
        (Npl, _, Current | Overdue | NonPerforming) => Decision::hold(Suspense, Npl, doubtful),

        (BadDebtProvisioned, _, _) => Decision::hold(Suspense, BadDebtProvisioned, doubtful),
    }
}

/// Computes the age and applies the decision table for one installment.
///
/// # Errors
///
/// Returns `DayEndError::UnclassifiableContract` if the age is undefined.
pub fn classify(
    snapshot: &ContractFinancial,
    installment: &DueInstallment,
) -> Result<Classification, DayEndError> {
    let age = arrears_age(snapshot, installment)?;
    let decision = decide(snapshot.recovery_status, snapshot.doubtful, age);
    Ok(Classification { age, decision })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dayend_shared::types::{ContractId, InstallmentId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn snapshot(status: RecoveryStatus, doubtful: bool, arrears: Decimal) -> ContractFinancial {
        ContractFinancial {
            active: true,
            recovery_status: status,
            doubtful,
            payment: dec!(100),
            capital_arrears: arrears,
            interest_arrears: Decimal::ZERO,
            capital_provisioned: Decimal::ZERO,
            schedule_end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        }
    }

    fn installment() -> DueInstallment {
        DueInstallment {
            id: InstallmentId::new(1),
            contract_id: ContractId::new(1),
            capital: dec!(50),
            interest: dec!(10),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_arrears_age_scenario_a() {
        let age = arrears_age(&snapshot(RecoveryStatus::Active, false, dec!(0)), &installment());
        assert_eq!(age.unwrap(), dec!(0.6));
    }

    #[test]
    fn test_arrears_age_sums_both_arrears() {
        let mut cf = snapshot(RecoveryStatus::Arrears, true, dec!(300));
        cf.interest_arrears = dec!(200);
        assert_eq!(arrears_age(&cf, &installment()).unwrap(), dec!(5.6));
    }

    #[test]
    fn test_arrears_age_rejects_zero_payment() {
        let mut cf = snapshot(RecoveryStatus::Active, false, dec!(0));
        cf.payment = Decimal::ZERO;
        assert!(matches!(
            arrears_age(&cf, &installment()),
            Err(DayEndError::UnclassifiableContract { .. })
        ));
    }

    #[rstest]
    #[case(dec!(-1), AgeBucket::Current)]
    #[case(dec!(0), AgeBucket::Current)]
    #[case(dec!(0.01), AgeBucket::Overdue)]
    #[case(dec!(5.99), AgeBucket::Overdue)]
    #[case(dec!(6), AgeBucket::NonPerforming)]
    #[case(dec!(11.99), AgeBucket::NonPerforming)]
    #[case(dec!(12), AgeBucket::Loss)]
    #[case(dec!(40), AgeBucket::Loss)]
    fn test_age_bucket_boundaries(#[case] age: Decimal, #[case] expected: AgeBucket) {
        assert_eq!(AgeBucket::of(age), expected);
    }

    #[rstest]
    // Active
    #[case(RecoveryStatus::Active, false, dec!(0), InterestRouting::Income, false, ProvisionAction::None, RecoveryStatus::Active, false)]
    #[case(RecoveryStatus::Active, false, dec!(0.6), InterestRouting::Income, false, ProvisionAction::None, RecoveryStatus::Arrears, false)]
    #[case(RecoveryStatus::Active, true, dec!(7), InterestRouting::Income, false, ProvisionAction::None, RecoveryStatus::Arrears, true)]
    // Arrears, doubtful
    #[case(RecoveryStatus::Arrears, true, dec!(6), InterestRouting::Suspense, false, ProvisionAction::HalfOutstandingCapital, RecoveryStatus::Npl, true)]
    #[case(RecoveryStatus::Arrears, true, dec!(5.6), InterestRouting::Suspense, false, ProvisionAction::None, RecoveryStatus::Arrears, true)]
    // Arrears, not doubtful
    #[case(RecoveryStatus::Arrears, false, dec!(6), InterestRouting::Suspense, true, ProvisionAction::HalfOutstandingCapital, RecoveryStatus::Npl, true)]
    #[case(RecoveryStatus::Arrears, false, dec!(13), InterestRouting::Suspense, true, ProvisionAction::HalfOutstandingCapital, RecoveryStatus::Npl, true)]
    #[case(RecoveryStatus::Arrears, false, dec!(5.99), InterestRouting::Income, false, ProvisionAction::None, RecoveryStatus::Arrears, false)]
    // NPL
    #[case(RecoveryStatus::Npl, true, dec!(12.1), InterestRouting::Suspense, false, ProvisionAction::TopUpToFull, RecoveryStatus::BadDebtProvisioned, true)]
    #[case(RecoveryStatus::Npl, true, dec!(11.9), InterestRouting::Suspense, false, ProvisionAction::None, RecoveryStatus::Npl, true)]
    #[case(RecoveryStatus::Npl, false, dec!(0), InterestRouting::Suspense, false, ProvisionAction::None, RecoveryStatus::Npl, false)]
    // BDP
    #[case(RecoveryStatus::BadDebtProvisioned, true, dec!(30), InterestRouting::Suspense, false, ProvisionAction::None, RecoveryStatus::BadDebtProvisioned, true)]
    #[case(RecoveryStatus::BadDebtProvisioned, false, dec!(-2), InterestRouting::Suspense, false, ProvisionAction::None, RecoveryStatus::BadDebtProvisioned, false)]
    #[allow(clippy::too_many_arguments)]
    fn test_decision_table(
        #[case] status: RecoveryStatus,
        #[case] doubtful: bool,
        #[case] age: Decimal,
        #[case] interest: InterestRouting,
        #[case] reclassify: bool,
        #[case] provision: ProvisionAction,
        #[case] next_status: RecoveryStatus,
        #[case] next_doubtful: bool,
    ) {
        let decision = decide(status, doubtful, age);
        assert_eq!(decision.interest, interest);
        assert_eq!(decision.reclassify_interest_arrears, reclassify);
        assert_eq!(decision.provision, provision);
        assert_eq!(decision.next_status, next_status);
        assert_eq!(decision.next_doubtful, next_doubtful);
    }

    #[test]
    fn test_half_provision_rounds_to_cents() {
        assert_eq!(
            ProvisionAction::HalfOutstandingCapital.amount(dec!(1000.05), dec!(0)),
            dec!(500.03)
        );
        assert_eq!(
            ProvisionAction::HalfOutstandingCapital.amount(dec!(1000), dec!(250)),
            dec!(500)
        );
    }

    #[test]
    fn test_top_up_provision() {
        assert_eq!(
            ProvisionAction::TopUpToFull.amount(dec!(1000), dec!(500)),
            dec!(500)
        );
        assert_eq!(
            ProvisionAction::TopUpToFull.amount(dec!(1000.005), dec!(500)),
            dec!(500.01)
        );
    }

    #[test]
    fn test_top_up_never_negative() {
        assert_eq!(
            ProvisionAction::TopUpToFull.amount(dec!(400), dec!(500)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_no_provision_is_zero() {
        assert_eq!(ProvisionAction::None.amount(dec!(1000), dec!(0)), Decimal::ZERO);
        assert!(!ProvisionAction::None.requires_capital_receivable());
        assert!(ProvisionAction::TopUpToFull.requires_capital_receivable());
    }
}
