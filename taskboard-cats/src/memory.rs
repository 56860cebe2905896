/// In-process cat store
///
/// Keeps cats in insertion order behind a `tokio::sync::RwLock`. Ids are
/// 24-character hex strings from a counter, shaped like MongoDB ObjectIds.
/// Useful for tests and for running the demo without a server.

use crate::store::{Cat, CatResult, CatStore, NewCat};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryCatStore {
    cats: RwLock<Vec<Cat>>,
    next_id: AtomicU64,
}

impl MemoryCatStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> String {
        format!("{:024x}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl CatStore for MemoryCatStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create(&self, cat: NewCat) -> CatResult<String> {
        let id = self.allocate_id();
        self.cats.write().await.push(Cat {
            id: id.clone(),
            name: cat.name,
            age: cat.age,
            features: cat.features,
        });
        Ok(id)
    }

    async fn find_all(&self) -> CatResult<Vec<Cat>> {
        Ok(self.cats.read().await.clone())
    }

    async fn count(&self) -> CatResult<u64> {
        Ok(self.cats.read().await.len() as u64)
    }

    async fn find_by_name(&self, name: &str) -> CatResult<Option<Cat>> {
        Ok(self.cats.read().await.iter().find(|c| c.name == name).cloned())
    }

    async fn update_age(&self, name: &str, age: i32) -> CatResult<bool> {
        let mut cats = self.cats.write().await;
        match cats.iter_mut().find(|c| c.name == name) {
            Some(cat) => {
                cat.age = age;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_feature(&self, name: &str, feature: &str) -> CatResult<bool> {
        let mut cats = self.cats.write().await;
        match cats.iter_mut().find(|c| c.name == name) {
            Some(cat) => {
                cat.features.push(feature.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_name(&self, name: &str) -> CatResult<u64> {
        let mut cats = self.cats.write().await;
        match cats.iter().position(|c| c.name == name) {
            Some(index) => {
                cats.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_all(&self) -> CatResult<u64> {
        let mut cats = self.cats.write().await;
        let deleted = cats.len() as u64;
        cats.clear();
        Ok(deleted)
    }
}
