//! Integration tests for the store, query engine and stats cache together

use catalog_core::{query, Item, ItemStore, NewItem, QueryParams, StatsCache};
use tempfile::tempdir;

fn fruit(name: &str, price: f64) -> NewItem {
    NewItem {
        name: name.to_string(),
        price,
        category: "Fruit".to_string(),
    }
}

#[tokio::test]
async fn test_created_items_are_searchable_in_insertion_order() {
    let dir = tempdir().unwrap();
    let store = ItemStore::new(dir.path().join("items.json"));
    store.ensure_exists().await.unwrap();

    for (name, price) in [("Apple", 1.5), ("Banana", 1.0), ("Crab Apple", 0.5)] {
        store.create(fruit(name, price)).await.unwrap();
    }

    let items = store.read_all().await.unwrap();
    let page = query(&items, &QueryParams::new(Some("apple".to_string()), 1, 10));

    let names: Vec<_> = page.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Apple", "Crab Apple"]);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_stats_follow_writes_but_not_reads() {
    let dir = tempdir().unwrap();
    let store = ItemStore::new(dir.path().join("items.json"));
    store
        .write_all(&[Item {
            id: 1,
            name: "Apple".to_string(),
            price: 1.5,
            category: "Fruit".to_string(),
        }])
        .await
        .unwrap();

    let cache = StatsCache::new();
    let first = cache.get(&store).await.unwrap();

    // Reads leave the file untouched
    store.read_all().await.unwrap();
    store.find(1).await.unwrap();
    let second = cache.get(&store).await.unwrap();
    assert_eq!(first, second);

    store.create(fruit("Banana", 2.5)).await.unwrap();
    let third = cache.get(&store).await.unwrap();
    assert_eq!(third.total, 2);
    assert_eq!(third.average_price, 2.0);
}

#[tokio::test]
async fn test_ids_stay_unique_across_rapid_creates() {
    let dir = tempdir().unwrap();
    let store = ItemStore::new(dir.path().join("items.json"));
    store.ensure_exists().await.unwrap();

    let mut ids = Vec::new();
    for i in 0..20 {
        ids.push(store.create(fruit(&format!("Fruit {i}"), 1.0)).await.unwrap().id);
    }

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}
