//! MongoDB-backed todo store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::StoreError;

use super::types::{NewTodo, Todo, TodoId, TodoPatch};
use super::{StorageOp, TodoStore};

/// Todo as stored in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: bool,
    #[serde(rename = "createdAt")]
    created_at: DateTime,
}

impl From<TodoDocument> for Todo {
    fn from(doc: TodoDocument) -> Self {
        Self {
            id: TodoId::from_object_id(doc.id),
            title: doc.title,
            description: doc.description,
            completed: doc.completed,
            created_at: to_offset_date_time(doc.created_at),
        }
    }
}

impl TodoId {
    fn from_object_id(oid: ObjectId) -> Self {
        Self::from_store(oid.to_hex())
    }

    fn to_object_id(&self) -> Result<ObjectId, StoreError> {
        ObjectId::parse_str(self.as_str()).map_err(|_| StoreError::InvalidId(self.to_string()))
    }
}

fn to_offset_date_time(dt: DateTime) -> OffsetDateTime {
    let nanos = i128::from(dt.timestamp_millis()) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// `$set` document for the supplied fields of a patch.
fn set_document(patch: &TodoPatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = &patch.title {
        set.insert("title", title.as_str());
    }
    if let Some(description) = &patch.description {
        set.insert("description", description.as_str());
    }
    if let Some(completed) = patch.completed {
        set.insert("completed", completed);
    }
    set
}

/// Todo store over one MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoTodoStore {
    /// Driver client (owns the connection pool).
    client: Client,
    /// Database holding the collection.
    db: Database,
    /// Todo collection.
    todos: Collection<TodoDocument>,
}

impl MongoTodoStore {
    /// Create a store from configuration.
    ///
    /// The driver connects lazily; call [`TodoStore::ping`] to verify the
    /// server is reachable.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongo_uri)
            .await
            .map_err(|e| StoreError::storage(StorageOp::Ping, e))?;
        let db = client.database(&config.mongo_db);
        let todos = db.collection::<TodoDocument>(&config.mongo_collection);

        debug!(db = %config.mongo_db, collection = %config.mongo_collection, "MongoDB client created");

        Ok(Self { client, db, todos })
    }

    /// Remove every todo. Used by integration tests to reset state.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = self
            .todos
            .delete_many(doc! {})
            .await
            .map_err(|e| StoreError::storage(StorageOp::Delete, e))?;
        Ok(result.deleted_count)
    }
}

#[async_trait]
impl TodoStore for MongoTodoStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        let cursor = self
            .todos
            .find(doc! {})
            .await
            .map_err(|e| StoreError::storage(StorageOp::Find, e))?;

        let docs: Vec<TodoDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| StoreError::storage(StorageOp::Find, e))?;

        Ok(docs.into_iter().map(Todo::from).collect())
    }

    #[instrument(skip(self, todo))]
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let doc = TodoDocument {
            id: ObjectId::new(),
            title: todo.title,
            description: todo.description,
            completed: false,
            created_at: DateTime::now(),
        };

        self.todos
            .insert_one(&doc)
            .await
            .map_err(|e| StoreError::storage(StorageOp::Create, e))?;

        Ok(doc.into())
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let oid = id.to_object_id()?;
        let found = self
            .todos
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|e| StoreError::storage(StorageOp::Find, e))?;

        Ok(found.map(Todo::from))
    }

    #[instrument(skip(self, id, patch), fields(id = %id))]
    async fn update_fields(&self, id: &TodoId, patch: &TodoPatch) -> Result<Option<Todo>, StoreError> {
        let oid = id.to_object_id()?;
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .todos
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set_document(patch) })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| StoreError::storage(StorageOp::Update, e))?;

        Ok(updated.map(Todo::from))
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn delete_by_id(&self, id: &TodoId) -> Result<bool, StoreError> {
        let oid = id.to_object_id()?;
        let result = self
            .todos
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|e| StoreError::storage(StorageOp::Delete, e))?;

        Ok(result.deleted_count > 0)
    }

    async fn count_active(&self) -> Result<u64, StoreError> {
        self.todos
            .count_documents(doc! { "completed": false })
            .await
            .map_err(|e| StoreError::storage(StorageOp::Count, e))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::storage(StorageOp::Ping, e))
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
