//! Application handle tying configuration, storage and the clock together.

use std::{path::PathBuf, sync::Arc};

use tracing::info;

use budget_config::{Config, ConfigManager};
use budget_core::{BalanceBreakdown, Clock, SystemClock, Wallet, WalletStorage};
use budget_domain::OwnerId;
use budget_storage_json::JsonWalletStorage;

use crate::BudgetError;

/// Entry point for front ends: hands out wallets bound to the configured storage.
pub struct Budget {
    config: Config,
    storage: Arc<dyn WalletStorage>,
    clock: Arc<dyn Clock>,
}

impl Budget {
    /// Opens JSON storage under the configured data root.
    pub fn open(config: Config) -> Result<Self, BudgetError> {
        config.validate()?;
        let root = config.resolve_data_root();
        let storage = JsonWalletStorage::with_default_month_start(
            root.clone(),
            config.default_month_start,
        )?;
        info!("wallet storage opened at {}", root.display());
        Ok(Self::with_storage(config, Arc::new(storage)))
    }

    /// Loads `<base>/config/config.json` (defaults when absent), installs tracing with
    /// its log filter and opens storage from it.
    pub fn from_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        let manager = ConfigManager::with_base_dir(base)?;
        let config = manager.load()?;
        crate::init_from_config(&config);
        Self::open(config)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn WalletStorage>) -> Self {
        Self {
            config,
            storage,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> Arc<dyn WalletStorage> {
        Arc::clone(&self.storage)
    }

    /// Acquires the owner's wallet, computing balances with the configured day table.
    pub fn wallet_for_owner(
        &self,
        owner: OwnerId,
        create_if_absent: bool,
    ) -> Result<Wallet, BudgetError> {
        let wallet = Wallet::for_owner(self.storage(), owner, create_if_absent)?;
        Ok(wallet.with_day_table(self.config.day_table))
    }

    pub fn balance_now(&self, wallet: &Wallet) -> Result<i64, BudgetError> {
        Ok(wallet.balance(self.clock.now())?)
    }

    pub fn breakdown_now(&self, wallet: &Wallet) -> Result<BalanceBreakdown, BudgetError> {
        Ok(wallet.balance_breakdown(self.clock.now())?)
    }
}
