use junction_dns_application::ports::RouteStore;
use junction_dns_domain::{RouteKind, RoutePolicy};
use junction_dns_infrastructure::{init_schema, SqliteRouteStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

async fn memory_store() -> (SqliteRouteStore, SqlitePool) {
    // A single connection keeps every query on the same in-memory db.
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    (SqliteRouteStore::new(pool.clone()), pool)
}

fn policy(domain: &str) -> RoutePolicy {
    RoutePolicy {
        domain: domain.to_string(),
        kind: RouteKind::Static,
        active: true,
        nameservers: Vec::new(),
        addresses: vec!["93.184.216.34".parse().unwrap()],
        cnames: vec!["alias.example".to_string()],
        txts: vec![vec!["hello".to_string()]],
    }
}

#[tokio::test]
async fn put_then_get_round_trips_every_field() {
    let (store, _pool) = memory_store().await;
    let original = policy("example.com");

    store.put(&original).await.unwrap();
    let loaded = store.get("example.com").await.unwrap().unwrap();

    assert_eq!(loaded, original);
}

#[tokio::test]
async fn get_missing_key_returns_none() {
    let (store, _pool) = memory_store().await;
    assert!(store.get("absent.example").await.unwrap().is_none());
}

#[tokio::test]
async fn put_overwrites_existing_record() {
    let (store, _pool) = memory_store().await;
    store.put(&policy("example.com")).await.unwrap();

    let mut updated = policy("example.com");
    updated.active = false;
    updated.kind = RouteKind::Forwarding;
    store.put(&updated).await.unwrap();

    let loaded = store.get("example.com").await.unwrap().unwrap();
    assert_eq!(loaded, updated);

    let all = store.list().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn corrupt_record_reads_as_absent() {
    let (store, pool) = memory_store().await;
    sqlx::query("INSERT INTO routes (domain, policy) VALUES (?, ?)")
        .bind("broken.example")
        .bind(vec![0xffu8, 0x13, 0x37])
        .execute(&pool)
        .await
        .unwrap();

    assert!(store.get("broken.example").await.unwrap().is_none());
}

#[tokio::test]
async fn list_returns_records_ordered_and_skips_corrupt_ones() {
    let (store, pool) = memory_store().await;
    store.put(&policy("b.example")).await.unwrap();
    store.put(&policy("a.example")).await.unwrap();
    sqlx::query("INSERT INTO routes (domain, policy) VALUES (?, ?)")
        .bind("c.example")
        .bind(vec![0xffu8])
        .execute(&pool)
        .await
        .unwrap();

    let all = store.list().await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].domain, "a.example");
    assert_eq!(all[1].domain, "b.example");
}
