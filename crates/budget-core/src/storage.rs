use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use chrono::NaiveDateTime;
use tracing::debug;

use budget_domain::{
    ActualTransaction, OwnerId, RegularTransaction, WalletId, WalletInfo, MIN_BILLING_DAY,
};

use crate::StorageError;

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence collaborator the engine reads plans and realized activity from.
///
/// Implementations own record layout, retention and consistency. The engine
/// performs no retries and no cross-call atomicity of its own.
pub trait WalletStorage: Send + Sync {
    fn regular_transactions(&self, wallet: &WalletId) -> StorageResult<Vec<RegularTransaction>>;
    fn add_regular_transaction(
        &self,
        wallet: &WalletId,
        transaction: &RegularTransaction,
    ) -> StorageResult<()>;
    fn remove_regular_transaction(
        &self,
        wallet: &WalletId,
        transaction: &RegularTransaction,
    ) -> StorageResult<()>;
    /// Realized transactions with `from <= time < to`. Fails when `to < from`.
    fn actual_transactions(
        &self,
        wallet: &WalletId,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StorageResult<Vec<ActualTransaction>>;
    fn add_actual_transaction(
        &self,
        wallet: &WalletId,
        transaction: &ActualTransaction,
    ) -> StorageResult<()>;
    fn set_wallet_info(&self, wallet: &WalletId, month_start: u32) -> StorageResult<()>;
    /// Looks up the owner's wallet, provisioning one when `create_if_absent` is set.
    fn wallet_for_owner(
        &self,
        owner: OwnerId,
        create_if_absent: bool,
    ) -> StorageResult<Option<WalletInfo>>;
}

/// Checks the half-open range contract shared by every storage implementation.
pub fn ensure_range(from: NaiveDateTime, to: NaiveDateTime) -> StorageResult<()> {
    if to < from {
        Err(StorageError::InvalidRange { from, to })
    } else {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct WalletRecord {
    info: Option<WalletInfo>,
    regular: Vec<RegularTransaction>,
    actual: Vec<ActualTransaction>,
}

#[derive(Debug, Default)]
struct MemoryState {
    owners: HashMap<OwnerId, WalletId>,
    wallets: HashMap<WalletId, WalletRecord>,
}

/// Process-local storage, useful for embedding the engine and for tests.
#[derive(Debug)]
pub struct MemoryWalletStorage {
    state: Mutex<MemoryState>,
    default_month_start: u32,
}

impl Default for MemoryWalletStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWalletStorage {
    pub fn new() -> Self {
        Self::with_default_month_start(MIN_BILLING_DAY)
    }

    pub fn with_default_month_start(default_month_start: u32) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            default_month_start,
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StorageError::Backend("memory storage lock poisoned".into()))
    }
}

impl WalletStorage for MemoryWalletStorage {
    fn regular_transactions(&self, wallet: &WalletId) -> StorageResult<Vec<RegularTransaction>> {
        let state = self.lock()?;
        Ok(state
            .wallets
            .get(wallet)
            .map(|record| record.regular.clone())
            .unwrap_or_default())
    }

    fn add_regular_transaction(
        &self,
        wallet: &WalletId,
        transaction: &RegularTransaction,
    ) -> StorageResult<()> {
        let mut state = self.lock()?;
        state
            .wallets
            .entry(wallet.clone())
            .or_default()
            .regular
            .push(transaction.clone());
        Ok(())
    }

    fn remove_regular_transaction(
        &self,
        wallet: &WalletId,
        transaction: &RegularTransaction,
    ) -> StorageResult<()> {
        let mut state = self.lock()?;
        if let Some(record) = state.wallets.get_mut(wallet) {
            record.regular.retain(|existing| existing != transaction);
        }
        Ok(())
    }

    fn actual_transactions(
        &self,
        wallet: &WalletId,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StorageResult<Vec<ActualTransaction>> {
        ensure_range(from, to)?;
        let state = self.lock()?;
        Ok(state
            .wallets
            .get(wallet)
            .map(|record| {
                record
                    .actual
                    .iter()
                    .filter(|txn| from <= txn.time && txn.time < to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn add_actual_transaction(
        &self,
        wallet: &WalletId,
        transaction: &ActualTransaction,
    ) -> StorageResult<()> {
        let mut state = self.lock()?;
        state
            .wallets
            .entry(wallet.clone())
            .or_default()
            .actual
            .push(transaction.clone());
        Ok(())
    }

    fn set_wallet_info(&self, wallet: &WalletId, month_start: u32) -> StorageResult<()> {
        let mut state = self.lock()?;
        let record = state.wallets.entry(wallet.clone()).or_default();
        match record.info.as_mut() {
            Some(info) => info.month_start = month_start,
            None => record.info = Some(WalletInfo::new(wallet.clone(), month_start)),
        }
        Ok(())
    }

    fn wallet_for_owner(
        &self,
        owner: OwnerId,
        create_if_absent: bool,
    ) -> StorageResult<Option<WalletInfo>> {
        let mut state = self.lock()?;
        if let Some(id) = state.owners.get(&owner).cloned() {
            let info = state
                .wallets
                .get(&id)
                .and_then(|record| record.info.clone())
                .unwrap_or_else(|| WalletInfo::new(id, self.default_month_start));
            return Ok(Some(info));
        }
        if !create_if_absent {
            return Ok(None);
        }
        let info = WalletInfo::new(WalletId::generate(), self.default_month_start);
        debug!("provisioned in-memory wallet `{}` for owner {}", info.id, owner);
        state.owners.insert(owner, info.id.clone());
        state.wallets.insert(
            info.id.clone(),
            WalletRecord {
                info: Some(info.clone()),
                ..WalletRecord::default()
            },
        );
        Ok(Some(info))
    }
}
