//! Remote todo service abstraction.
//!
//! The reducer never talks to a transport directly; it captures a service
//! handle from its environment inside effect futures.

use crate::error::ServiceError;
use crate::types::{OwnerId, Todo, TodoDraft, TodoId};
use std::future::Future;

/// CRUD operations offered by the remote source of truth
///
/// Calls have no timeout and are never retried by the engine.
///
/// # Example
///
/// ```ignore
/// let todos = service.fetch_all(owner).await?;
/// let created = service.create(TodoDraft::new("Milk", owner)).await?;
/// ```
pub trait TodoService: Send + Sync + 'static {
    /// Fetch every todo belonging to `owner_id`
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the request fails.
    fn fetch_all(
        &self,
        owner_id: OwnerId,
    ) -> impl Future<Output = Result<Vec<Todo>, ServiceError>> + Send;

    /// Persist a new todo and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the service rejects the draft.
    fn create(&self, draft: TodoDraft)
    -> impl Future<Output = Result<Todo, ServiceError>> + Send;

    /// Replace the stored record with the same id
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the service rejects the update.
    fn update(&self, todo: Todo) -> impl Future<Output = Result<Todo, ServiceError>> + Send;

    /// Remove a todo
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the service rejects the delete.
    fn delete(&self, id: TodoId) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
