//! In-memory todo service for tests and offline demos.

use crate::error::ServiceError;
use crate::service::TodoService;
use crate::types::{OwnerId, Todo, TodoDraft, TodoId};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// A call received by [`MockTodoService`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceCall {
    /// `fetch_all`
    FetchAll(OwnerId),
    /// `create`
    Create(TodoDraft),
    /// `update`
    Update(Todo),
    /// `delete`
    Delete(TodoId),
}

#[derive(Debug, Default)]
struct Failures {
    fetch: bool,
    create: bool,
    update: HashSet<TodoId>,
    update_all: bool,
    delete: HashSet<TodoId>,
    delete_all: bool,
}

#[derive(Debug)]
struct Inner {
    todos: Vec<Todo>,
    next_id: u64,
    calls: Vec<ServiceCall>,
    failures: Failures,
}

/// Mock todo service.
///
/// Stores todos in memory, assigns increasing ids and records every call.
/// Failures can be injected per operation, or per id for updates and deletes.
#[derive(Debug, Clone)]
pub struct MockTodoService {
    inner: Arc<Mutex<Inner>>,
}

impl MockTodoService {
    /// Create an empty mock service; the first created todo gets id 1
    #[must_use]
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    /// Create a mock service holding `todos`
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(Mutex::new(Inner {
                todos,
                next_id,
                calls: Vec::new(),
                failures: Failures::default(),
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `fetch_all` fail
    pub fn fail_fetch(&self) {
        self.lock().failures.fetch = true;
    }

    /// Make `create` fail
    pub fn fail_create(&self) {
        self.lock().failures.create = true;
    }

    /// Make `update` fail for `id`
    pub fn fail_update_for(&self, id: TodoId) {
        self.lock().failures.update.insert(id);
    }

    /// Make every `update` fail
    pub fn fail_updates(&self) {
        self.lock().failures.update_all = true;
    }

    /// Make `delete` fail for `id`
    pub fn fail_delete_for(&self, id: TodoId) {
        self.lock().failures.delete.insert(id);
    }

    /// Make every `delete` fail
    pub fn fail_deletes(&self) {
        self.lock().failures.delete_all = true;
    }

    /// Stop injecting failures
    pub fn heal(&self) {
        self.lock().failures = Failures::default();
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.lock().calls.clone()
    }

    /// Number of `create` calls received
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.count(|call| matches!(call, ServiceCall::Create(_)))
    }

    /// Number of `update` calls received
    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.count(|call| matches!(call, ServiceCall::Update(_)))
    }

    /// Number of `delete` calls received
    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.count(|call| matches!(call, ServiceCall::Delete(_)))
    }

    fn count(&self, predicate: impl Fn(&ServiceCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    /// Todos currently stored
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }
}

impl Default for MockTodoService {
    fn default() -> Self {
        Self::new()
    }
}

fn injected(operation: &str) -> ServiceError {
    ServiceError::Status {
        status: 500,
        body: format!("injected {operation} failure"),
    }
}

impl TodoService for MockTodoService {
    fn fetch_all(
        &self,
        owner_id: OwnerId,
    ) -> impl Future<Output = Result<Vec<Todo>, ServiceError>> + Send {
        let service = self.clone();

        async move {
            let mut inner = service.lock();
            inner.calls.push(ServiceCall::FetchAll(owner_id));

            if inner.failures.fetch {
                return Err(injected("fetch"));
            }

            Ok(inner
                .todos
                .iter()
                .filter(|todo| todo.owner_id == owner_id)
                .cloned()
                .collect())
        }
    }

    fn create(&self, draft: TodoDraft) -> impl Future<Output = Result<Todo, ServiceError>> + Send {
        let service = self.clone();

        async move {
            let mut inner = service.lock();
            inner.calls.push(ServiceCall::Create(draft.clone()));

            if inner.failures.create {
                return Err(injected("create"));
            }

            let todo = Todo {
                id: TodoId::new(inner.next_id),
                title: draft.title,
                completed: draft.completed,
                owner_id: draft.owner_id,
            };
            inner.next_id += 1;
            inner.todos.push(todo.clone());

            Ok(todo)
        }
    }

    fn update(&self, todo: Todo) -> impl Future<Output = Result<Todo, ServiceError>> + Send {
        let service = self.clone();

        async move {
            let mut inner = service.lock();
            inner.calls.push(ServiceCall::Update(todo.clone()));

            if inner.failures.update_all || inner.failures.update.contains(&todo.id) {
                return Err(injected("update"));
            }

            match inner.todos.iter_mut().find(|stored| stored.id == todo.id) {
                Some(stored) => {
                    *stored = todo.clone();
                    Ok(todo)
                },
                None => Err(ServiceError::Status {
                    status: 404,
                    body: format!("todo {} not found", todo.id),
                }),
            }
        }
    }

    fn delete(&self, id: TodoId) -> impl Future<Output = Result<(), ServiceError>> + Send {
        let service = self.clone();

        async move {
            let mut inner = service.lock();
            inner.calls.push(ServiceCall::Delete(id));

            if inner.failures.delete_all || inner.failures.delete.contains(&id) {
                return Err(injected("delete"));
            }

            inner.todos.retain(|todo| todo.id != id);
            Ok(())
        }
    }
}
