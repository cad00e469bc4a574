//! Front-end facing wallet handle.

use std::{fmt, sync::Arc};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use budget_domain::{
    ActualTransaction, BillingWindow, DayTable, OwnerId, RegularTransaction, WalletId, WalletInfo,
};

use crate::{
    billing_window::ensure_billing_day, storage::WalletStorage, BalanceBreakdown, BalanceService,
    BillingWindowResolver, CoreError, RegularTransactionRegistry,
};

/// A wallet bound to the storage collaborator that holds its records.
pub struct Wallet {
    info: WalletInfo,
    storage: Arc<dyn WalletStorage>,
    balances: BalanceService,
}

impl Wallet {
    pub fn new(info: WalletInfo, storage: Arc<dyn WalletStorage>) -> Self {
        Self {
            info,
            storage,
            balances: BalanceService::default(),
        }
    }

    pub fn with_day_table(mut self, day_table: DayTable) -> Self {
        self.balances = BalanceService::new(day_table);
        self
    }

    /// Acquires the owner's wallet, provisioning it when `create_if_absent` is set.
    pub fn for_owner(
        storage: Arc<dyn WalletStorage>,
        owner: OwnerId,
        create_if_absent: bool,
    ) -> Result<Self, CoreError> {
        info!("acquiring wallet for owner {}", owner);
        let info = match storage.wallet_for_owner(owner, create_if_absent) {
            Ok(Some(info)) => info,
            Ok(None) => {
                warn!("no wallet for owner {}", owner);
                return Err(CoreError::WalletNotFound(owner));
            }
            Err(err) => {
                warn!("could not get wallet for owner {}: {}", owner, err);
                return Err(err.into());
            }
        };
        Ok(Self::new(info, storage))
    }

    pub fn id(&self) -> &WalletId {
        &self.info.id
    }

    pub fn month_start(&self) -> u32 {
        self.info.month_start
    }

    pub fn info(&self) -> &WalletInfo {
        &self.info
    }

    pub fn add_transaction(&self, transaction: ActualTransaction) -> Result<(), CoreError> {
        self.storage
            .add_actual_transaction(&self.info.id, &transaction)?;
        Ok(())
    }

    pub fn add_regular_transaction(&self, transaction: RegularTransaction) -> Result<(), CoreError> {
        RegularTransactionRegistry::add(self.storage.as_ref(), &self.info.id, transaction)
    }

    pub fn remove_regular_transaction(
        &self,
        transaction: &RegularTransaction,
    ) -> Result<(), CoreError> {
        RegularTransactionRegistry::remove(self.storage.as_ref(), &self.info.id, transaction)
    }

    pub fn regular_transactions(&self) -> Result<Vec<RegularTransaction>, CoreError> {
        Ok(self.storage.regular_transactions(&self.info.id)?)
    }

    pub fn planned_monthly_income(&self) -> Result<i64, CoreError> {
        RegularTransactionRegistry::planned_monthly_income(self.storage.as_ref(), &self.info.id)
    }

    pub fn current_window(&self, at: NaiveDateTime) -> Result<BillingWindow, CoreError> {
        BillingWindowResolver::resolve(self.info.month_start, at)
    }

    pub fn balance(&self, at: NaiveDateTime) -> Result<i64, CoreError> {
        self.balances.balance(self.storage.as_ref(), &self.info, at)
    }

    pub fn balance_breakdown(&self, at: NaiveDateTime) -> Result<BalanceBreakdown, CoreError> {
        self.balances.breakdown(self.storage.as_ref(), &self.info, at)
    }

    /// Moves the billing-cycle start. The in-memory value only changes once storage
    /// accepted it.
    pub fn set_month_start(&mut self, day: u32) -> Result<(), CoreError> {
        ensure_billing_day("month_start", day)?;
        if let Err(err) = self.storage.set_wallet_info(&self.info.id, day) {
            warn!(
                "could not update wallet `{}` month start from {} to {}, keeping original: {}",
                self.info.id, self.info.month_start, day, err
            );
            return Err(err.into());
        }
        info!(
            "wallet `{}` month start moved from {} to {}",
            self.info.id, self.info.month_start, day
        );
        self.info.month_start = day;
        Ok(())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("info", &self.info)
            .field("balances", &self.balances)
            .finish_non_exhaustive()
    }
}
