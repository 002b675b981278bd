//! Runs against a live Postgres. Start one and run with
//! `DATABASE_URL=postgres://... cargo test --test pg_store -- --ignored --test-threads=1`.

use telemetry_store::db::PgStore;
use telemetry_store::model::NewGpsRecord;
use telemetry_store::store::GpsStore;

fn reading(satellites: i32) -> NewGpsRecord {
    NewGpsRecord {
        latitude: 18.7883,
        longitude: 98.9853,
        altitude: 310.0,
        speed: 12.4,
        satellites,
        timestamp: None,
    }
}

async fn connect() -> PgStore {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| telemetry_store::config::DEFAULT_DATABASE_URL.to_string());
    PgStore::connect(&url).await.expect("postgres reachable")
}

#[tokio::test]
#[ignore]
async fn test_pg_insert_page_and_delete() {
    let store = connect().await;
    store.delete_all().await.unwrap();

    let first = store.insert(reading(4)).await.unwrap();
    for satellites in 5..=14 {
        store.insert(reading(satellites)).await.unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 11);

    let page = store.find_page(0, 10).await.unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(page[0], first);

    let last = store.find_page(10, 10).await.unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].satellites, 14);

    assert_eq!(store.delete_all().await.unwrap(), 11);
    assert_eq!(store.delete_all().await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 0);

    store.close().await;
}
