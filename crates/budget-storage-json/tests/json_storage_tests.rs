use std::{fs, sync::Arc};

use budget_core::{storage::WalletStorage, StorageError, Wallet};
use budget_domain::{ActualTransaction, OwnerId, RegularTransaction, WalletId};
use budget_storage_json::JsonWalletStorage;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;

fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

#[test]
fn json_storage_persists_plans_across_instances() {
    let dir = tempdir().expect("tempdir");
    let wallet = WalletId::new("persisted");
    let plan = RegularTransaction::new("rent", -800, 1);

    {
        let storage = JsonWalletStorage::new(dir.path().to_path_buf()).expect("create storage");
        storage
            .add_regular_transaction(&wallet, &plan)
            .expect("add plan");
        assert!(storage.wallet_path(&wallet).exists());
    }

    let reopened = JsonWalletStorage::new(dir.path().to_path_buf()).expect("reopen storage");
    assert_eq!(
        reopened.regular_transactions(&wallet).expect("load plans"),
        vec![plan.clone()]
    );

    reopened
        .remove_regular_transaction(&wallet, &plan)
        .expect("remove plan");
    assert!(reopened
        .regular_transactions(&wallet)
        .expect("load plans")
        .is_empty());
}

#[test]
fn json_storage_filters_actual_transactions_by_half_open_range() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonWalletStorage::new(dir.path().to_path_buf()).expect("create storage");
    let wallet = WalletId::new("range");
    for (day, value) in [(9, -1), (1, -2), (5, -3)] {
        storage
            .add_actual_transaction(
                &wallet,
                &ActualTransaction::unlabeled(value, at(3, day, 0)).with_raw_text("card"),
            )
            .expect("add actual");
    }

    let found = storage
        .actual_transactions(&wallet, at(3, 1, 0), at(3, 9, 0))
        .expect("query");
    let values: Vec<_> = found.iter().map(|txn| txn.value).collect();
    assert_eq!(values, vec![-2, -3]);
    assert_eq!(found[0].raw_text, "card");

    let err = storage
        .actual_transactions(&wallet, at(3, 9, 0), at(3, 1, 0))
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidRange { .. }));
}

#[test]
fn json_storage_provisions_one_wallet_per_owner() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonWalletStorage::with_default_month_start(dir.path().to_path_buf(), 25)
        .expect("create storage");

    assert!(storage
        .wallet_for_owner(OwnerId(100), false)
        .expect("lookup")
        .is_none());

    let created = storage
        .wallet_for_owner(OwnerId(100), true)
        .expect("create")
        .expect("wallet");
    assert_eq!(created.month_start, 25);

    let other = storage
        .wallet_for_owner(OwnerId(200), true)
        .expect("create")
        .expect("wallet");
    assert_ne!(created.id, other.id);

    let reopened = JsonWalletStorage::new(dir.path().to_path_buf()).expect("reopen storage");
    let found = reopened
        .wallet_for_owner(OwnerId(100), false)
        .expect("lookup")
        .expect("wallet");
    assert_eq!(found, created);
}

#[test]
fn json_storage_persists_month_start() {
    let dir = tempdir().expect("tempdir");
    let storage = Arc::new(JsonWalletStorage::new(dir.path().to_path_buf()).expect("create"));

    let mut wallet = Wallet::for_owner(storage.clone(), OwnerId(1), true).expect("wallet");
    wallet.set_month_start(15).expect("set month start");

    let again = Wallet::for_owner(storage, OwnerId(1), false).expect("wallet");
    assert_eq!(again.month_start(), 15);
}

#[test]
fn json_storage_rejects_out_of_range_stored_month_start() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonWalletStorage::new(dir.path().to_path_buf()).expect("create storage");
    let wallet = WalletId::new("corrupt");
    storage.set_wallet_info(&wallet, 5).expect("write info");

    let path = storage.wallet_path(&wallet);
    let raw = fs::read_to_string(&path).expect("read file");
    fs::write(&path, raw.replace("\"month_start\": 5", "\"month_start\": 31")).expect("corrupt");

    let err = storage.regular_transactions(&wallet).unwrap_err();
    assert!(matches!(err, StorageError::Corrupt(_)));
}

#[test]
fn json_storage_reports_unreadable_documents() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonWalletStorage::new(dir.path().to_path_buf()).expect("create storage");
    let wallet = WalletId::new("garbage");
    fs::write(storage.wallet_path(&wallet), "{ not json").expect("write garbage");

    let err = storage.regular_transactions(&wallet).unwrap_err();
    assert!(matches!(err, StorageError::Serde(_)));
}

#[test]
fn json_storage_keeps_ids_differing_in_case_or_punctuation_apart() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonWalletStorage::new(dir.path().to_path_buf()).expect("create storage");
    let upper = WalletId::new("Alice");
    let dotted = WalletId::new("x.y");
    storage
        .add_regular_transaction(&upper, &RegularTransaction::new("rent", -800, 1))
        .expect("add rent");
    storage
        .add_regular_transaction(&dotted, &RegularTransaction::new("salary", 100, 1))
        .expect("add salary");

    for other in [WalletId::new("alice"), WalletId::new("x_y")] {
        assert!(storage
            .regular_transactions(&other)
            .expect("load plans")
            .is_empty());
    }
    assert_ne!(
        storage.wallet_path(&upper),
        storage.wallet_path(&WalletId::new("alice"))
    );
    assert_ne!(
        storage.wallet_path(&dotted),
        storage.wallet_path(&WalletId::new("x_y"))
    );
    assert_eq!(storage.regular_transactions(&upper).expect("load").len(), 1);
    assert_eq!(storage.regular_transactions(&dotted).expect("load").len(), 1);
}
