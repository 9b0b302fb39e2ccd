//! Database seeder for day-end development and testing.
//!
//! Seeds one demo contract per recovery stage, each with a 24-month rental
//! schedule that started a year ago, so a day-end run has something to post.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Local, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use dayend_core::dayend::{RecoveryStatus, classifier::round_amount};
use dayend_db::entities::{contract, contract_financial, contract_schedule};
use dayend_shared::AppConfig;

/// Number of monthly rentals per demo contract.
const TERM_MONTHS: u32 = 24;
/// Months of the term already elapsed.
const ELAPSED_MONTHS: u32 = 12;

/// A demo contract and how far behind it is.
struct DemoContract {
    reference: &'static str,
    status: RecoveryStatus,
    doubtful: bool,
    months_behind: u32,
}

const DEMO_CONTRACTS: [DemoContract; 5] = [
    DemoContract {
        reference: "DEMO-ACTIVE",
        status: RecoveryStatus::Active,
        doubtful: false,
        months_behind: 0,
    },
    DemoContract {
        reference: "DEMO-ARREARS",
        status: RecoveryStatus::Arrears,
        doubtful: false,
        months_behind: 5,
    },
    DemoContract {
        reference: "DEMO-DOUBTFUL",
        status: RecoveryStatus::Arrears,
        doubtful: true,
        months_behind: 3,
    },
    DemoContract {
        reference: "DEMO-NPL",
        status: RecoveryStatus::Npl,
        doubtful: true,
        months_behind: 11,
    },
    DemoContract {
        reference: "DEMO-BDP",
        status: RecoveryStatus::BadDebtProvisioned,
        doubtful: true,
        months_behind: 12,
    },
];

fn capital() -> Decimal {
    Decimal::new(400, 0)
}

fn interest() -> Decimal {
    Decimal::new(100, 0)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = dayend_db::connect(&config.database)
        .await
        .expect("Failed to connect to database");

    let today = Local::now().date_naive();
    let first_due = today
        .with_day(1)
        .and_then(|d| d.checked_sub_months(Months::new(ELAPSED_MONTHS)))
        .expect("Failed to compute schedule start");

    println!("Seeding demo contracts...");
    for demo in &DEMO_CONTRACTS {
        seed_contract(&db, demo, first_due).await;
    }

    println!("Seeding complete!");
}

/// Due date of the `n`th rental.
fn due_date(first_due: NaiveDate, n: u32) -> NaiveDate {
    first_due
        .checked_add_months(Months::new(n))
        .unwrap_or(first_due)
}

/// Seeds one demo contract with its schedule and financial row.
async fn seed_contract(db: &DatabaseConnection, demo: &DemoContract, first_due: NaiveDate) {
    // Check if contract already exists
    if contract::Entity::find()
        .filter(contract::Column::Reference.eq(demo.reference))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  {} already exists, skipping...", demo.reference);
        return;
    }

    let created = contract::ActiveModel {
        reference: Set(demo.reference.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await;

    let contract = match created {
        Ok(contract) => contract,
        Err(e) => {
            eprintln!("Failed to insert contract {}: {e}", demo.reference);
            return;
        }
    };

    // Rentals before the last `months_behind` elapsed ones are paid; every
    // elapsed rental except the current month has had its day-end entry.
    let paid_until = ELAPSED_MONTHS.saturating_sub(demo.months_behind);
    let mut outstanding = Decimal::ZERO;

    for n in 0..TERM_MONTHS {
        let paid = n < paid_until;
        let capital_paid = if paid { capital() } else { Decimal::ZERO };
        outstanding += capital() - capital_paid;

        let row = contract_schedule::ActiveModel {
            contract_id: Set(contract.id),
            contract_installment_type_id: Set(contract_schedule::RENTAL_INSTALLMENT_TYPE),
            monthly_date: Set(due_date(first_due, n)),
            capital: Set(capital()),
            interest: Set(interest()),
            capital_paid: Set(capital_paid),
            interest_paid: Set(if paid { interest() } else { Decimal::ZERO }),
            daily_entry_issued: Set(n < ELAPSED_MONTHS),
            ..Default::default()
        };

        if let Err(e) = row.insert(db).await {
            eprintln!("Failed to insert schedule row {n} for {}: {e}", demo.reference);
        }
    }

    let behind = Decimal::from(demo.months_behind);
    let (provisioned, provisioned_bdp) = match demo.status {
        RecoveryStatus::Active | RecoveryStatus::Arrears => (Decimal::ZERO, Decimal::ZERO),
        RecoveryStatus::Npl => (round_amount(outstanding / Decimal::TWO), Decimal::ZERO),
        RecoveryStatus::BadDebtProvisioned => {
            let half = round_amount(outstanding / Decimal::TWO);
            (outstanding, outstanding - half)
        }
    };

    let financial = contract_financial::ActiveModel {
        contract_id: Set(contract.id),
        active: Set(true),
        recovery_status_id: Set(demo.status.id()),
        doubtful: Set(demo.doubtful),
        payment: Set(capital() + interest()),
        capital_arrears: Set(capital() * behind),
        interest_arrears: Set(interest() * behind),
        capital_provisioned: Set(provisioned),
        capital_provisioned_bdp: Set(provisioned_bdp),
        financial_schedule_end_date: Set(due_date(first_due, TERM_MONTHS - 1)),
    };

    if let Err(e) = financial.insert(db).await {
        eprintln!("Failed to insert financial row for {}: {e}", demo.reference);
    } else {
        println!(
            "  Created {} ({}, {} months behind)",
            demo.reference, demo.status, demo.months_behind
        );
    }
}
