//! Derived view state.
//!
//! Everything here is a pure function of the canonical collection and the
//! filter; nothing is cached.

use crate::types::{FilterMode, Todo, TodoId, TodoState};
use std::collections::BTreeSet;

/// Todos matching `filter`, in collection order
#[must_use]
pub fn visible_todos(todos: &[Todo], filter: FilterMode) -> Vec<&Todo> {
    todos.iter().filter(|todo| filter.matches(todo)).collect()
}

/// Number of todos not yet completed
#[must_use]
pub fn active_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|todo| !todo.completed).count()
}

/// Number of completed todos
#[must_use]
pub fn completed_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|todo| todo.completed).count()
}

/// Whether no todo is active; true for an empty collection
#[must_use]
pub fn all_completed(todos: &[Todo]) -> bool {
    active_count(todos) == 0
}

/// Whether at least one todo is completed
#[must_use]
pub fn has_completed(todos: &[Todo]) -> bool {
    todos.iter().any(|todo| todo.completed)
}

/// Whether the collection is non-empty
#[must_use]
pub const fn has_todos(todos: &[Todo]) -> bool {
    !todos.is_empty()
}

/// Snapshot of everything a presentation layer renders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoView {
    /// Selected filter
    pub filter: FilterMode,
    /// Todos matching the filter, in collection order
    pub visible: Vec<Todo>,
    /// Todo whose create is in flight, shown after the list
    pub placeholder: Option<Todo>,
    /// Ids with a pending round trip
    pub in_flight: BTreeSet<TodoId>,
    /// Number of active todos
    pub active_count: usize,
    /// Number of completed todos
    pub completed_count: usize,
    /// Whether every todo is completed
    pub all_completed: bool,
    /// Whether any todo is completed
    pub has_completed: bool,
    /// Whether there are todos at all
    pub has_todos: bool,
    /// Visible notification message
    pub notification: Option<String>,
}

impl TodoView {
    /// Derive the view from canonical state
    #[must_use]
    pub fn derive(state: &TodoState) -> Self {
        let todos = state.todos.as_slice();
        Self {
            filter: state.filter,
            visible: visible_todos(todos, state.filter)
                .into_iter()
                .cloned()
                .collect(),
            placeholder: state.placeholder.clone(),
            in_flight: state.in_flight.clone(),
            active_count: active_count(todos),
            completed_count: completed_count(todos),
            all_completed: all_completed(todos),
            has_completed: has_completed(todos),
            has_todos: has_todos(todos),
            notification: state.notification.message().map(str::to_owned),
        }
    }

    /// Whether `id` should be rendered as busy
    #[must_use]
    pub fn is_busy(&self, id: TodoId) -> bool {
        self.in_flight.contains(&id)
    }
}
