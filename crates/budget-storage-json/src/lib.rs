//! Filesystem-backed JSON persistence for wallets.
//!
//! Layout under the storage root:
//! * `owners.json` maps owner ids to wallet ids;
//! * `wallets/<wallet>.json` holds one wallet's settings, plans and realized activity.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use budget_core::{
    storage::{ensure_range, StorageResult, WalletStorage},
    StorageError,
};
use budget_domain::{
    is_billing_day, ActualTransaction, OwnerId, RegularTransaction, WalletId, WalletInfo,
    MIN_BILLING_DAY,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

const FILE_EXTENSION: &str = "json";
const OWNERS_FILE: &str = "owners.json";
const WALLETS_DIR: &str = "wallets";
const TMP_SUFFIX: &str = "tmp";

/// On-disk shape of a single wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletDocument {
    pub info: WalletInfo,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub regular: Vec<RegularTransaction>,
    #[serde(default)]
    pub actual: Vec<ActualTransaction>,
}

impl WalletDocument {
    fn new(id: WalletId, month_start: u32) -> Self {
        Self {
            info: WalletInfo::new(id, month_start),
            created_at: Utc::now(),
            regular: Vec::new(),
            actual: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OwnerIndex {
    #[serde(default)]
    owners: BTreeMap<i64, WalletId>,
}

/// Stores every wallet as a JSON document. Writes go through a temp file and a rename.
///
/// A process-wide lock serializes read-modify-write cycles; separate processes sharing
/// one root are not coordinated.
#[derive(Debug)]
pub struct JsonWalletStorage {
    root: PathBuf,
    default_month_start: u32,
    write_lock: Mutex<()>,
}

impl JsonWalletStorage {
    pub fn new(root: PathBuf) -> StorageResult<Self> {
        Self::with_default_month_start(root, MIN_BILLING_DAY)
    }

    pub fn with_default_month_start(root: PathBuf, default_month_start: u32) -> StorageResult<Self> {
        if !is_billing_day(default_month_start) {
            return Err(StorageError::Backend(format!(
                "default month start {} is outside 1..=28",
                default_month_start
            )));
        }
        fs::create_dir_all(root.join(WALLETS_DIR))?;
        Ok(Self {
            root,
            default_month_start,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn wallet_path(&self, wallet: &WalletId) -> PathBuf {
        self.root
            .join(WALLETS_DIR)
            .join(format!("{}.{}", canonical_name(wallet.as_str()), FILE_EXTENSION))
    }

    fn owners_path(&self) -> PathBuf {
        self.root.join(OWNERS_FILE)
    }

    /// Loads a wallet document; a wallet with no file yet is empty.
    pub fn load_wallet(&self, wallet: &WalletId) -> StorageResult<WalletDocument> {
        let path = self.wallet_path(wallet);
        let Some(document) = read_json::<WalletDocument>(&path)? else {
            return Ok(WalletDocument::new(wallet.clone(), self.default_month_start));
        };
        if !is_billing_day(document.info.month_start) {
            return Err(StorageError::Corrupt(format!(
                "month start {} of wallet `{}` is out of range",
                document.info.month_start, wallet
            )));
        }
        Ok(document)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StorageError::Backend("wallet storage lock poisoned".into()))
    }

    fn update_wallet<F>(&self, wallet: &WalletId, apply: F) -> StorageResult<()>
    where
        F: FnOnce(&mut WalletDocument),
    {
        let _guard = self.lock()?;
        let mut document = self.load_wallet(wallet)?;
        apply(&mut document);
        let path = self.wallet_path(wallet);
        debug!("writing wallet `{}` to {}", wallet, path.display());
        write_json(&path, &document)
    }

    fn load_owners(&self) -> StorageResult<OwnerIndex> {
        Ok(read_json(&self.owners_path())?.unwrap_or_default())
    }
}

impl WalletStorage for JsonWalletStorage {
    fn regular_transactions(&self, wallet: &WalletId) -> StorageResult<Vec<RegularTransaction>> {
        Ok(self.load_wallet(wallet)?.regular)
    }

    fn add_regular_transaction(
        &self,
        wallet: &WalletId,
        transaction: &RegularTransaction,
    ) -> StorageResult<()> {
        self.update_wallet(wallet, |doc| doc.regular.push(transaction.clone()))
    }

    fn remove_regular_transaction(
        &self,
        wallet: &WalletId,
        transaction: &RegularTransaction,
    ) -> StorageResult<()> {
        self.update_wallet(wallet, |doc| {
            doc.regular.retain(|existing| existing != transaction)
        })
    }

    fn actual_transactions(
        &self,
        wallet: &WalletId,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StorageResult<Vec<ActualTransaction>> {
        ensure_range(from, to)?;
        let mut found: Vec<_> = self
            .load_wallet(wallet)?
            .actual
            .into_iter()
            .filter(|txn| from <= txn.time && txn.time < to)
            .collect();
        found.sort_by_key(|txn| txn.time);
        Ok(found)
    }

    fn add_actual_transaction(
        &self,
        wallet: &WalletId,
        transaction: &ActualTransaction,
    ) -> StorageResult<()> {
        self.update_wallet(wallet, |doc| doc.actual.push(transaction.clone()))
    }

    fn set_wallet_info(&self, wallet: &WalletId, month_start: u32) -> StorageResult<()> {
        self.update_wallet(wallet, |doc| doc.info.month_start = month_start)
    }

    fn wallet_for_owner(
        &self,
        owner: OwnerId,
        create_if_absent: bool,
    ) -> StorageResult<Option<WalletInfo>> {
        let _guard = self.lock()?;
        let mut index = self.load_owners()?;
        if let Some(id) = index.owners.get(&owner.0) {
            return Ok(Some(self.load_wallet(id)?.info));
        }
        if !create_if_absent {
            return Ok(None);
        }

        let mut id = WalletId::generate();
        while self.wallet_path(&id).exists() {
            debug!("wallet `{}` exists, trying another id", id);
            id = WalletId::generate();
        }
        let document = WalletDocument::new(id.clone(), self.default_month_start);
        write_json(&self.wallet_path(&id), &document)?;
        index.owners.insert(owner.0, id.clone());
        write_json(&self.owners_path(), &index)?;
        info!("wallet `{}` has been created for owner {}", id, owner);
        Ok(Some(document.info))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|err| StorageError::Serde(format!("{}: {}", path.display(), err)))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|err| StorageError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Maps a wallet id onto a file stem. `[a-z0-9-]` is kept and every other
/// byte becomes `_xx`, so distinct ids never share a file.
fn canonical_name(name: &str) -> String {
    if name.is_empty() {
        return "_".into();
    }
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("_{:02x}", byte)),
        }
    }
    encoded
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
