//! Day-end schema migration.
//!
//! Creates the lookup tables, contracts, the contract schedule, the contract
//! financial snapshot and the double-entry ledger the day-end run posts to.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: LOOKUPS
        // ============================================================
        db.execute_unprepared(LOOKUPS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 2: CONTRACTS
        // ============================================================
        db.execute_unprepared(CONTRACTS_SQL).await?;
        db.execute_unprepared(CONTRACT_SCHEDULE_SQL).await?;
        db.execute_unprepared(CONTRACT_FINANCIAL_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(LEDGER_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const LOOKUPS_SQL: &str = r"
CREATE TABLE recovery_status (
    id INTEGER PRIMARY KEY,
    name VARCHAR(50) NOT NULL UNIQUE
);

INSERT INTO recovery_status (id, name) VALUES
    (1, 'Active'),
    (2, 'Arrears'),
    (3, 'NPL'),
    (4, 'Bad Debt Provisioned');

CREATE TABLE contract_installment_type (
    id INTEGER PRIMARY KEY,
    name VARCHAR(50) NOT NULL UNIQUE
);

INSERT INTO contract_installment_type (id, name) VALUES
    (1, 'Rental'),
    (2, 'Charge');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE account (
    id BIGINT PRIMARY KEY,
    name VARCHAR(100) NOT NULL
);

-- Default chart; deployments with their own mapping insert their accounts
INSERT INTO account (id, name) VALUES
    (185, 'Receivable'),
    (188, 'Unearned Interest'),
    (190, 'Interest Income'),
    (192, 'Receivable Arrears'),
    (194, 'Suspense Interest'),
    (195, 'Bad Debt Provision'),
    (196, 'Provision For Bad Debt');
";

const CONTRACTS_SQL: &str = r"
CREATE TABLE contract (
    id BIGSERIAL PRIMARY KEY,
    reference VARCHAR(50) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CONTRACT_SCHEDULE_SQL: &str = r"
CREATE TABLE contract_schedule (
    id BIGSERIAL PRIMARY KEY,
    contract_id BIGINT NOT NULL REFERENCES contract(id) ON DELETE CASCADE,
    contract_installment_type_id INTEGER NOT NULL REFERENCES contract_installment_type(id),
    monthly_date DATE NOT NULL,
    capital NUMERIC(19, 4) NOT NULL DEFAULT 0,
    interest NUMERIC(19, 4) NOT NULL DEFAULT 0,
    capital_paid NUMERIC(19, 4) NOT NULL DEFAULT 0,
    interest_paid NUMERIC(19, 4) NOT NULL DEFAULT 0,
    daily_entry_issued BOOLEAN NOT NULL DEFAULT false,
    CONSTRAINT chk_schedule_amounts CHECK (capital >= 0 AND interest >= 0),
    CONSTRAINT chk_schedule_paid CHECK (capital_paid >= 0 AND interest_paid >= 0)
);

-- Due-installment selection
CREATE INDEX idx_contract_schedule_due ON contract_schedule(contract_id, monthly_date)
    WHERE daily_entry_issued = false AND contract_installment_type_id = 1;
";

const CONTRACT_FINANCIAL_SQL: &str = r"
CREATE TABLE contract_financial (
    contract_id BIGINT PRIMARY KEY REFERENCES contract(id) ON DELETE CASCADE,
    active BOOLEAN NOT NULL DEFAULT true,
    recovery_status_id INTEGER NOT NULL DEFAULT 1 REFERENCES recovery_status(id),
    doubtful BOOLEAN NOT NULL DEFAULT false,
    payment NUMERIC(19, 4) NOT NULL,
    capital_arrears NUMERIC(19, 4) NOT NULL DEFAULT 0,
    interest_arrears NUMERIC(19, 4) NOT NULL DEFAULT 0,
    capital_provisioned NUMERIC(19, 4) NOT NULL DEFAULT 0,
    capital_provisioned_bdp NUMERIC(19, 4) NOT NULL DEFAULT 0,
    financial_schedule_end_date DATE NOT NULL,
    CONSTRAINT chk_financial_provisioned CHECK (capital_provisioned >= capital_provisioned_bdp)
);
";

const LEDGER_SQL: &str = r#"
CREATE TABLE "transaction" (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL,
    datetime TIMESTAMP NOT NULL,
    posting_date DATE NOT NULL,
    contract_id BIGINT REFERENCES contract(id),
    remark TEXT NOT NULL DEFAULT ''
);

CREATE INDEX idx_transaction_contract ON "transaction"(contract_id, posting_date);

CREATE TABLE account_transaction (
    id BIGSERIAL PRIMARY KEY,
    transaction_id BIGINT NOT NULL REFERENCES "transaction"(id) ON DELETE CASCADE,
    account_id BIGINT NOT NULL REFERENCES account(id),
    type VARCHAR(2) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    CONSTRAINT chk_account_transaction_type CHECK (type IN ('DR', 'CR')),
    CONSTRAINT chk_account_transaction_amount CHECK (amount > 0)
);

CREATE INDEX idx_account_transaction_txn ON account_transaction(transaction_id);
CREATE INDEX idx_account_transaction_account ON account_transaction(account_id);
"#;

const DROP_ALL_SQL: &str = r#"
DROP TABLE IF EXISTS account_transaction CASCADE;
DROP TABLE IF EXISTS "transaction" CASCADE;
DROP TABLE IF EXISTS contract_financial CASCADE;
DROP TABLE IF EXISTS contract_schedule CASCADE;
DROP TABLE IF EXISTS contract CASCADE;
DROP TABLE IF EXISTS account CASCADE;
DROP TABLE IF EXISTS contract_installment_type CASCADE;
DROP TABLE IF EXISTS recovery_status CASCADE;
"#;
