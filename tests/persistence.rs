//! Integration tests for buyback list persistence

use std::fs;

use testresult::TestResult;

use buyback::{
    buyback::{BUYBACK_LIST_KEY, BuybackItem, BuybackListStore},
    catalog::{CatalogStore, Condition},
    storage::{PersistentStore, StorageScope},
};

#[test]
fn list_is_restored_from_disk() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = CatalogStore::bundled()?;
    let satsumas = catalog.product("10001").ok_or("missing SATSUMAS")?;
    let vaniljstang = catalog.product("10002").ok_or("missing VANILJSTÅNG")?;

    let saved = {
        let store = BuybackListStore::new(PersistentStore::on_disk(dir.path())?);

        store.add_item(satsumas, Condition::LikeNew)?;
        store.add_item(vaniljstang, Condition::VeryGood)?;
        store.add_item(satsumas, Condition::LikeNew)?;

        store.items()
    };

    let restored = BuybackListStore::new(PersistentStore::on_disk(dir.path())?);

    assert_eq!(restored.items(), saved);
    assert_eq!(restored.item_count(), 3);
    assert_eq!(restored.line_count(), 2);

    Ok(())
}

#[test]
fn snapshot_uses_camel_case_and_iso_timestamps() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = CatalogStore::bundled()?;
    let storage = PersistentStore::on_disk(dir.path())?;
    let store = BuybackListStore::new(storage.clone());

    store.add_item(
        catalog.product("10001").ok_or("missing SATSUMAS")?,
        Condition::LikeNew,
    )?;

    let raw = fs::read_to_string(dir.path().join(format!("{BUYBACK_LIST_KEY}.json")))?;
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    let item = json.get(0).ok_or("snapshot should hold one item")?;

    assert_eq!(item["condition"], "LIKE_NEW");
    assert_eq!(item["product"]["catalogNumber"], "502.581.56");
    assert!(item.get("memberPrice").is_some());
    assert!(
        item["addedAt"].as_str().is_some_and(|ts| ts.ends_with('Z')),
        "timestamps are stored as ISO 8601 UTC"
    );

    let items: Option<Vec<BuybackItem>> = storage.get(StorageScope::Durable, BUYBACK_LIST_KEY);

    assert_eq!(items.as_ref().map(Vec::len), Some(1));

    Ok(())
}

#[test]
fn corrupt_snapshot_starts_empty() -> TestResult {
    let dir = tempfile::tempdir()?;

    fs::write(
        dir.path().join(format!("{BUYBACK_LIST_KEY}.json")),
        "{ not json",
    )?;

    let store = BuybackListStore::new(PersistentStore::on_disk(dir.path())?);

    assert!(store.is_empty());

    Ok(())
}

#[test]
fn clearing_persists_empty_list() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = CatalogStore::bundled()?;

    {
        let store = BuybackListStore::new(PersistentStore::on_disk(dir.path())?);

        store.add_item(
            catalog.product("10001").ok_or("missing SATSUMAS")?,
            Condition::LikeNew,
        )?;
        store.clear_list();
    }

    let restored = BuybackListStore::new(PersistentStore::on_disk(dir.path())?);

    assert!(restored.is_empty());

    Ok(())
}
