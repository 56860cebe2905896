/// Behavioural tests for `CatStore` implementations
///
/// The in-memory store always runs. The MongoDB store runs only when
/// TEST_MONGO_URI is set, against a throwaway collection:
/// export TEST_MONGO_URI="mongodb://localhost:27017/"

use std::env;
use taskboard_cats::{CatStore, MemoryCatStore, MongoCatStore, MongoConfig, NewCat};
use uuid::Uuid;

async fn barsik_scenario(store: &dyn CatStore) {
    store
        .create(NewCat::new("barsik", 3, ["rudy"]))
        .await
        .expect("Failed to create cat");

    let barsik = store.find_by_name("barsik").await.unwrap().expect("barsik should exist");
    assert_eq!(barsik.age, 3);
    assert_eq!(barsik.features, vec!["rudy"]);

    assert!(store.add_feature("barsik", "plays").await.unwrap());
    let barsik = store.find_by_name("barsik").await.unwrap().unwrap();
    assert_eq!(barsik.features, vec!["rudy", "plays"]);

    assert_eq!(store.delete_by_name("barsik").await.unwrap(), 1);
    assert!(store.find_by_name("barsik").await.unwrap().is_none());
}

async fn full_crud(store: &dyn CatStore) {
    for (name, age) in [("murzik", 2), ("pushok", 1), ("murka", 4)] {
        store.create(NewCat::new(name, age, ["grey"])).await.unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 3);
    let mut names: Vec<String> = store
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["murka", "murzik", "pushok"]);

    assert!(store.update_age("murka", 5).await.unwrap());
    assert_eq!(store.find_by_name("murka").await.unwrap().unwrap().age, 5);
    assert!(!store.update_age("bayun", 5).await.unwrap());

    assert_eq!(store.delete_all().await.unwrap(), 3);
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_barsik_scenario() {
    barsik_scenario(&MemoryCatStore::new()).await;
}

#[tokio::test]
async fn test_memory_full_crud() {
    full_crud(&MemoryCatStore::new()).await;
}

async fn mongo_store() -> Option<MongoCatStore> {
    let uri = env::var("TEST_MONGO_URI").ok()?;
    let config = MongoConfig {
        uri,
        database: "taskboard_test".to_string(),
        collection: format!("cats_{}", Uuid::new_v4().simple()),
        server_selection_timeout_ms: 2000,
    };
    Some(MongoCatStore::connect(&config).await.expect("Failed to connect to MongoDB"))
}

#[tokio::test]
async fn test_mongo_barsik_scenario() {
    let Some(store) = mongo_store().await else {
        eprintln!("skipping: set TEST_MONGO_URI to run MongoDB tests");
        return;
    };
    barsik_scenario(&store).await;
    store.delete_all().await.unwrap();
}

#[tokio::test]
async fn test_mongo_full_crud() {
    let Some(store) = mongo_store().await else {
        eprintln!("skipping: set TEST_MONGO_URI to run MongoDB tests");
        return;
    };
    full_crud(&store).await;
}

#[tokio::test]
async fn test_mongo_unreachable_server_fails_fast() {
    if env::var("TEST_MONGO_URI").is_err() {
        eprintln!("skipping: set TEST_MONGO_URI to run MongoDB tests");
        return;
    }

    let config = MongoConfig {
        uri: "mongodb://127.0.0.1:1/".to_string(),
        server_selection_timeout_ms: 200,
        ..Default::default()
    };
    assert!(MongoCatStore::connect(&config).await.is_err());
}
