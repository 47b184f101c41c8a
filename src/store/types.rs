//! Todo types shared by every store.

use std::fmt;

use time::OffsetDateTime;

use crate::error::StoreError;

/// Length of a hex-encoded MongoDB ObjectId.
pub const TODO_ID_LEN: usize = 24;

/// Validated todo identifier (24 hex characters).
///
/// Only constructed through [`TodoId::parse`] or by a store, so a `TodoId`
/// in hand is always safe to pass to the query layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TodoId(String);

impl TodoId {
    /// Validate a client-supplied identifier.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        if raw.len() == TODO_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(StoreError::InvalidId(raw.to_string()))
        }
    }

    /// Wrap an identifier minted by a store.
    pub(super) fn from_store(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted todo.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: OffsetDateTime,
}

/// Fields accepted on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Whether applying this patch moves `current` from incomplete to complete.
    pub fn completes(&self, current: &Todo) -> bool {
        self.completed == Some(true) && !current.completed
    }

    /// Apply the supplied fields to `todo` in place.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}
