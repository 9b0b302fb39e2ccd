//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Day-end run configuration.
    #[serde(default)]
    pub dayend: DayEndConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

/// Day-end run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DayEndConfig {
    /// User recorded on every transaction header the run creates.
    #[serde(default = "default_posting_user_id")]
    pub posting_user_id: i64,
    /// Ledger account ids the journal entries post to.
    #[serde(default)]
    pub accounts: ChartOfAccountsConfig,
}

impl Default for DayEndConfig {
    fn default() -> Self {
        Self {
            posting_user_id: default_posting_user_id(),
            accounts: ChartOfAccountsConfig::default(),
        }
    }
}

fn default_posting_user_id() -> i64 {
    1
}

/// Chart-of-accounts mapping for day-end postings.
///
/// Defaults match the production chart; deployments with a different chart
/// override individual ids through `DAYEND__DAYEND__ACCOUNTS__*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartOfAccountsConfig {
    /// Unearned interest (liability).
    pub unearned_interest: i64,
    /// Interest income (revenue).
    pub interest_income: i64,
    /// Performing rental receivable (asset).
    pub receivable: i64,
    /// Receivable in arrears (asset).
    pub receivable_arrears: i64,
    /// Interest in suspense (liability).
    pub suspense_interest: i64,
    /// Bad debt provision (expense).
    pub bad_debt_provision: i64,
    /// Provision for bad debt (contra-asset).
    pub provision_for_bad_debt: i64,
}

impl Default for ChartOfAccountsConfig {
    fn default() -> Self {
        Self {
            unearned_interest: 188,
            interest_income: 190,
            receivable: 185,
            receivable_arrears: 192,
            suspense_interest: 194,
            bad_debt_provision: 195,
            provision_for_bad_debt: 196,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DAYEND").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
