//! Property-based tests for the decision table and journal construction.
//!
//! Covers status monotonicity, the debit/credit sum invariant and
//! provisioning monotonicity.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use dayend_shared::types::{ContractId, InstallmentId};

use super::accounts::ChartOfAccounts;
use super::classifier::{InterestRouting, ProvisionAction, classify, decide};
use super::journal::{JournalBuilder, JournalTotals};
use super::transition::apply_decision;
use super::types::{ContractFinancial, DueInstallment, RecoveryStatus};
use super::validation::validate_entries;

/// Strategy to generate a non-negative amount (0.00 to 100,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate interest arrears, negative when interest was prepaid.
fn interest_arrears() -> impl Strategy<Value = Decimal> {
    (-100_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a positive scheduled payment.
fn payment() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an age between -10 and 30.
fn age() -> impl Strategy<Value = Decimal> {
    (-1_000i64..3_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn status() -> impl Strategy<Value = RecoveryStatus> {
    prop_oneof![
        Just(RecoveryStatus::Active),
        Just(RecoveryStatus::Arrears),
        Just(RecoveryStatus::Npl),
        Just(RecoveryStatus::BadDebtProvisioned),
    ]
}

prop_compose! {
    fn snapshot()(
        recovery_status in status(),
        doubtful in any::<bool>(),
        payment in payment(),
        capital_arrears in amount(),
        interest_arrears in interest_arrears(),
        capital_provisioned in amount(),
    ) -> ContractFinancial {
        ContractFinancial {
            active: true,
            recovery_status,
            doubtful,
            payment,
            capital_arrears,
            interest_arrears,
            capital_provisioned,
            schedule_end_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        }
    }
}

prop_compose! {
    fn installment()(capital in amount(), interest in amount()) -> DueInstallment {
        DueInstallment {
            id: InstallmentId::new(1),
            contract_id: ContractId::new(1),
            capital,
            interest,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The classifier never moves a contract backwards.
    #[test]
    fn prop_status_never_regresses(status in status(), doubtful in any::<bool>(), age in age()) {
        let decision = decide(status, doubtful, age);
        prop_assert!(decision.next_status >= status);
    }

    /// Once doubtful, always doubtful.
    #[test]
    fn prop_doubtful_never_cleared(status in status(), age in age()) {
        let decision = decide(status, true, age);
        prop_assert!(decision.next_doubtful);
    }

    /// Active contracts always recognize income; they move to arrears exactly
    /// when the age is positive.
    #[test]
    fn prop_active_routes_to_income(doubtful in any::<bool>(), age in age()) {
        let decision = decide(RecoveryStatus::Active, doubtful, age);
        prop_assert_eq!(decision.interest, InterestRouting::Income);
        prop_assert_eq!(decision.provision, ProvisionAction::None);
        if age <= Decimal::ZERO {
            prop_assert_eq!(decision.next_status, RecoveryStatus::Active);
        } else {
            prop_assert_eq!(decision.next_status, RecoveryStatus::Arrears);
        }
    }

    /// Every produced entry list balances and validates.
    #[test]
    fn prop_entries_balance(
        snapshot in snapshot(),
        installment in installment(),
        provision in amount(),
    ) {
        let chart = ChartOfAccounts::default();
        let classification = classify(&snapshot, &installment).unwrap();
        let entries = JournalBuilder::new(&chart).build(
            &classification.decision,
            &installment,
            snapshot.interest_arrears,
            provision,
        );
        let totals = JournalTotals::of(&entries);
        prop_assert!(totals.is_balanced(), "{:?}", totals);
        prop_assert!(validate_entries(&entries).is_ok());
    }

    /// Provisioned capital never decreases through a transition.
    #[test]
    fn prop_provisioning_monotonic(
        snapshot in snapshot(),
        installment in installment(),
        receivable in amount(),
    ) {
        let chart = ChartOfAccounts::default();
        let classification = classify(&snapshot, &installment).unwrap();
        let provision = classification
            .decision
            .provision
            .amount(receivable, snapshot.capital_provisioned);
        let transition = apply_decision(
            &JournalBuilder::new(&chart),
            &snapshot,
            &installment,
            classification,
            provision,
        )
        .unwrap();

        prop_assert!(transition.next.capital_provisioned >= snapshot.capital_provisioned);
        prop_assert!(transition.next.recovery_status >= snapshot.recovery_status);
        prop_assert_eq!(
            transition.next.capital_arrears,
            snapshot.capital_arrears + installment.capital
        );
    }

    /// The top-up provision is the outstanding difference rounded to cents.
    #[test]
    fn prop_top_up_rounding(
        provisioned in amount(),
        extra_millis in 0i64..100_000_000i64,
    ) {
        let receivable = provisioned + Decimal::new(extra_millis, 3);
        let expected = ((receivable - provisioned) * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            / Decimal::ONE_HUNDRED;

        prop_assert_eq!(
            ProvisionAction::TopUpToFull.amount(receivable, provisioned),
            expected
        );
    }
}
