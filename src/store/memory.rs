//! In-memory todo store for tests and local runs.
//!
//! Behaves like the MongoDB store (ObjectId-style ids, insertion order,
//! millisecond timestamps) without a server. Failures can be injected to
//! exercise the error paths.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::error::StoreError;

use super::types::{NewTodo, Todo, TodoId, TodoPatch};
use super::{StorageOp, TodoStore};

/// Configuration for in-memory store behavior.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    /// Whether every data operation fails.
    pub fail_operations: bool,
    /// Whether only updates fail.
    pub fail_update: bool,
    /// Whether only the active-count query fails.
    pub fail_count: bool,
    /// Whether ping fails.
    pub unreachable: bool,
}

/// In-memory todo store.
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    /// Todos in insertion order.
    todos: RwLock<Vec<Todo>>,
    fail_operations: AtomicBool,
    fail_update: AtomicBool,
    fail_count: AtomicBool,
    unreachable: AtomicBool,
    closed: AtomicBool,
    /// Number of operations that reached the store.
    calls: AtomicUsize,
}

impl InMemoryTodoStore {
    /// Create an empty, healthy store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with custom configuration.
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            fail_operations: AtomicBool::new(config.fail_operations),
            fail_update: AtomicBool::new(config.fail_update),
            fail_count: AtomicBool::new(config.fail_count),
            unreachable: AtomicBool::new(config.unreachable),
            ..Self::default()
        }
    }

    /// Make every subsequent data operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail_operations.store(failing, Ordering::SeqCst);
    }

    /// Make subsequent updates fail (or succeed again).
    pub fn set_update_failing(&self, failing: bool) {
        self.fail_update.store(failing, Ordering::SeqCst);
    }

    /// Make subsequent active-count queries fail (or succeed again).
    pub fn set_count_failing(&self, failing: bool) {
        self.fail_count.store(failing, Ordering::SeqCst);
    }

    /// Make ping fail (or succeed again).
    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Number of operations that reached the store.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn enter(&self, op: StorageOp) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failing = match op {
            StorageOp::Ping => self.unreachable.load(Ordering::SeqCst),
            StorageOp::Count => {
                self.fail_operations.load(Ordering::SeqCst) || self.fail_count.load(Ordering::SeqCst)
            }
            StorageOp::Update => {
                self.fail_operations.load(Ordering::SeqCst) || self.fail_update.load(Ordering::SeqCst)
            }
            _ => self.fail_operations.load(Ordering::SeqCst),
        };

        if failing {
            return Err(StoreError::storage(op, "injected in-memory failure"));
        }

        Ok(())
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        self.enter(StorageOp::Find).await?;
        Ok(self.todos.read().await.clone())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        self.enter(StorageOp::Create).await?;

        let now = OffsetDateTime::now_utc();
        let created_at = now
            .replace_nanosecond(u32::from(now.millisecond()) * 1_000_000)
            .unwrap_or(now);

        let todo = Todo {
            id: TodoId::from_store(ObjectId::new().to_hex()),
            title: todo.title,
            description: todo.description,
            completed: false,
            created_at,
        };

        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        self.enter(StorageOp::Find).await?;
        Ok(self.todos.read().await.iter().find(|t| &t.id == id).cloned())
    }

    async fn update_fields(&self, id: &TodoId, patch: &TodoPatch) -> Result<Option<Todo>, StoreError> {
        self.enter(StorageOp::Update).await?;

        let mut todos = self.todos.write().await;
        Ok(todos.iter_mut().find(|t| &t.id == id).map(|todo| {
            patch.apply_to(todo);
            todo.clone()
        }))
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<bool, StoreError> {
        self.enter(StorageOp::Delete).await?;

        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| &t.id != id);
        Ok(todos.len() < before)
    }

    async fn count_active(&self) -> Result<u64, StoreError> {
        self.enter(StorageOp::Count).await?;
        let active = self.todos.read().await.iter().filter(|t| !t.completed).count();
        Ok(active as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter(StorageOp::Ping).await
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
