use super::*;

use tempfile::TempDir;

use crate::test_support::{descriptor_body, FixtureFetcher};

fn catalog_fetcher() -> FixtureFetcher {
    FixtureFetcher::with_catalog(vec![(
        "vert.x/rest-http/vertx-rest.yaml".to_string(),
        descriptor_body(),
    )])
}

#[tokio::test]
async fn test_start_publishes_a_first_snapshot_before_returning() {
    let root = TempDir::new().unwrap();
    let config = CatalogConfig::new(root.path().join("catalog"));

    let service = CatalogService::start(config, Arc::new(catalog_fetcher()))
        .await
        .unwrap();

    assert_eq!(service.missions(), vec![Mission::new("rest-http")]);
    assert_eq!(
        service.runtimes(&Mission::new("rest-http")),
        vec![Runtime::new("vert.x")]
    );
    let booster = service
        .find_booster(&Mission::new("rest-http"), &Runtime::new("vert.x"))
        .unwrap()
        .unwrap();
    assert_eq!(booster.id(), "vertx-rest");
    service.stop().await;
}

#[tokio::test]
async fn test_start_fails_when_the_catalog_sync_fails() {
    let root = TempDir::new().unwrap();
    let config = CatalogConfig::new(root.path().join("catalog"));

    let result = CatalogService::start(config, Arc::new(FixtureFetcher::failing_sync())).await;

    assert!(matches!(result, Err(Error::Fetch(_))));
}

#[tokio::test]
async fn test_failed_rebuild_keeps_the_previous_snapshot() {
    let root = TempDir::new().unwrap();
    let config = CatalogConfig::new(root.path().join("catalog"));
    let service = CatalogService::start(config.clone(), Arc::new(catalog_fetcher()))
        .await
        .unwrap();
    let store = service.store();
    let before = store.snapshot();

    let result = rebuild(config, Arc::new(FixtureFetcher::failing_sync())).await;

    assert!(result.is_err());
    // Nothing was published: readers still see the identical snapshot.
    assert!(Arc::ptr_eq(&before, &store.snapshot()));
    service.stop().await;
}

#[tokio::test]
async fn test_periodic_refresh_publishes_new_entries() {
    let root = TempDir::new().unwrap();
    let fetcher = catalog_fetcher().with_later_catalog(vec![(
        "spring-boot/crud/spring-crud.yaml".to_string(),
        descriptor_body(),
    )]);
    let config = CatalogConfig::new(root.path().join("catalog"))
        .with_index_period(Some(Duration::from_millis(50)));
    let service = CatalogService::start(config, Arc::new(fetcher))
        .await
        .unwrap();
    let store = service.store();
    assert_eq!(store.boosters().len(), 1);

    let mut grew = false;
    for _ in 0..100 {
        if store.boosters().len() == 2 {
            grew = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert!(grew, "refresh never published the new entry");
    service.stop().await;
}

#[tokio::test]
async fn test_stop_halts_the_refresh_loop() {
    let root = TempDir::new().unwrap();
    let fetcher = Arc::new(catalog_fetcher());
    let config = CatalogConfig::new(root.path().join("catalog"))
        .with_index_period(Some(Duration::from_millis(50)));
    let service = CatalogService::start(config, Arc::clone(&fetcher) as Arc<dyn RepoFetcher>)
        .await
        .unwrap();
    let store = service.store();

    service.stop().await;

    let synced = fetcher.sync_count();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(fetcher.sync_count(), synced);
    // The published snapshot survives the service.
    assert_eq!(store.boosters().len(), 1);
}
