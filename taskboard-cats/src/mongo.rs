/// MongoDB-backed cat store
///
/// Documents have the shape:
///
/// ```json
/// { "_id": ObjectId("..."), "name": "barsik", "age": 3, "features": ["ginger"] }
/// ```
///
/// The connection is verified with a `ping` when the store is built, so an
/// unreachable server fails fast (after the server selection timeout) instead
/// of on the first operation.
///
/// # Example
///
/// ```no_run
/// use taskboard_cats::{CatStore, MongoCatStore, MongoConfig, NewCat};
///
/// # async fn example() -> taskboard_cats::CatResult<()> {
/// let store = MongoCatStore::connect(&MongoConfig::from_env()?).await?;
/// let id = store.create(NewCat::new("barsik", 3, ["ginger"])).await?;
/// println!("Added cat with id: {id}");
/// # Ok(())
/// # }
/// ```

use crate::config::MongoConfig;
use crate::store::{Cat, CatResult, CatStore, CatStoreError, NewCat};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Stored document layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    age: i32,
    #[serde(default)]
    features: Vec<String>,
}

impl From<CatDocument> for Cat {
    fn from(doc: CatDocument) -> Self {
        Cat {
            id: doc.id.to_hex(),
            name: doc.name,
            age: doc.age,
            features: doc.features,
        }
    }
}

fn new_cat_document(cat: &NewCat) -> Document {
    doc! {
        "name": &cat.name,
        "age": cat.age,
        "features": cat.features.clone(),
    }
}

fn inserted_id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cat store over a MongoDB collection
#[derive(Clone)]
pub struct MongoCatStore {
    cats: Collection<CatDocument>,
    raw: Collection<Document>,
}

impl MongoCatStore {
    /// Connects and verifies the server responds to `ping`
    ///
    /// # Errors
    ///
    /// Returns `CatStoreError::Connection` if the server cannot be reached
    /// within the configured server selection timeout.
    pub async fn connect(config: &MongoConfig) -> CatResult<Self> {
        info!(
            database = %config.database,
            collection = %config.collection,
            "Connecting to MongoDB"
        );

        let mut options = ClientOptions::parse(&config.uri).await?;
        options.server_selection_timeout =
            Some(Duration::from_millis(config.server_selection_timeout_ms));
        options.app_name = Some("taskboard".to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);

        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| CatStoreError::Connection(e.to_string()))?;

        info!("MongoDB connection verified");

        Ok(Self {
            cats: database.collection::<CatDocument>(&config.collection),
            raw: database.collection::<Document>(&config.collection),
        })
    }
}

#[async_trait]
impl CatStore for MongoCatStore {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn create(&self, cat: NewCat) -> CatResult<String> {
        let result = self.raw.insert_one(new_cat_document(&cat), None).await?;
        let id = inserted_id_string(&result.inserted_id);
        debug!(%id, name = %cat.name, "Inserted cat");
        Ok(id)
    }

    async fn find_all(&self) -> CatResult<Vec<Cat>> {
        let documents: Vec<CatDocument> = self.cats.find(None, None).await?.try_collect().await?;
        Ok(documents.into_iter().map(Cat::from).collect())
    }

    async fn count(&self) -> CatResult<u64> {
        Ok(self.raw.count_documents(doc! {}, None).await?)
    }

    async fn find_by_name(&self, name: &str) -> CatResult<Option<Cat>> {
        let document = self.cats.find_one(doc! { "name": name }, None).await?;
        Ok(document.map(Cat::from))
    }

    async fn update_age(&self, name: &str, age: i32) -> CatResult<bool> {
        let result = self
            .raw
            .update_one(doc! { "name": name }, doc! { "$set": { "age": age } }, None)
            .await?;
        debug!(name, matched = result.matched_count, "Updated cat age");
        Ok(result.matched_count > 0)
    }

    async fn add_feature(&self, name: &str, feature: &str) -> CatResult<bool> {
        let result = self
            .raw
            .update_one(
                doc! { "name": name },
                doc! { "$push": { "features": feature } },
                None,
            )
            .await?;
        debug!(name, matched = result.matched_count, "Appended cat feature");
        Ok(result.matched_count > 0)
    }

    async fn delete_by_name(&self, name: &str) -> CatResult<u64> {
        let result = self.raw.delete_one(doc! { "name": name }, None).await?;
        Ok(result.deleted_count)
    }

    async fn delete_all(&self) -> CatResult<u64> {
        let result = self.raw.delete_many(doc! {}, None).await?;
        info!(deleted = result.deleted_count, "Deleted all cats");
        Ok(result.deleted_count)
    }
}
