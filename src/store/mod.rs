//! Storage gateway for todo documents.
//!
//! This module handles:
//! - Todo types and identifier validation
//! - The `TodoStore` trait handlers talk to
//! - MongoDB-backed store
//! - In-memory store for tests and local runs

pub mod memory;
pub mod mongo;
pub mod types;

use async_trait::async_trait;
use strum::Display;

use crate::error::StoreError;

pub use memory::{InMemoryTodoStore, MemoryConfig};
pub use mongo::MongoTodoStore;
pub use types::{NewTodo, Todo, TodoId, TodoPatch};

/// Storage operation name, used to tag failures and label error counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StorageOp {
    Find,
    Create,
    Update,
    Delete,
    Count,
    Ping,
}

/// Operations over one collection of todo documents.
///
/// Every method is a single round trip to the backing store. Implementations
/// never retry; the first failure surfaces as `StoreError::Storage`.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// All todos, in storage order.
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError>;

    /// Persist a new todo. The store assigns `id` and `created_at`;
    /// `completed` always starts false.
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// Apply the supplied fields of `patch` and return the updated todo,
    /// or `None` if no todo has this id.
    async fn update_fields(&self, id: &TodoId, patch: &TodoPatch) -> Result<Option<Todo>, StoreError>;

    /// Hard delete. Returns true if a todo was removed.
    async fn delete_by_id(&self, id: &TodoId) -> Result<bool, StoreError>;

    /// Number of todos with `completed == false`.
    async fn count_active(&self) -> Result<u64, StoreError>;

    /// Lightweight reachability check.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release the underlying connection.
    async fn close(&self);
}
