//! Domain types for the todo list.
//!
//! The canonical collection mirrors what the remote service has confirmed.
//! A single optimistic placeholder and a set of in-flight ids sit beside it
//! while round trips are pending.

use crate::error::ServiceError;
use crate::notification::NotificationState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the remote service
///
/// `0` is reserved for the optimistic placeholder and never appears in the
/// canonical collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Id carried by a todo that has not been persisted yet
    pub const PLACEHOLDER: Self = Self(0);

    /// Creates a `TodoId` from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this is the placeholder id
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Owner of every todo in a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Creates an `OwnerId` from a raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A todo as confirmed by the remote service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Service-assigned id
    pub id: TodoId,
    /// Trimmed, non-empty title
    pub title: String,
    /// Completion flag
    pub completed: bool,
    /// Owner, constant for the session
    #[serde(rename = "userId")]
    pub owner_id: OwnerId,
}

impl Todo {
    /// Build the optimistic placeholder shown while a create is pending
    #[must_use]
    pub fn placeholder(title: impl Into<String>, owner_id: OwnerId) -> Self {
        Self {
            id: TodoId::PLACEHOLDER,
            title: title.into(),
            completed: false,
            owner_id,
        }
    }

    /// Copy of this todo with `completed` set
    #[must_use]
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }

    /// Copy of this todo with a new title
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// Payload for creating a todo; the service assigns the id
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDraft {
    /// Trimmed, non-empty title
    pub title: String,
    /// Owner of the new todo
    #[serde(rename = "userId")]
    pub owner_id: OwnerId,
    /// Always `false` for new todos
    pub completed: bool,
}

impl TodoDraft {
    /// Draft for a new, active todo
    #[must_use]
    pub fn new(title: impl Into<String>, owner_id: OwnerId) -> Self {
        Self {
            title: title.into(),
            owner_id,
            completed: false,
        }
    }
}

/// Which subset of the collection is visible
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every todo
    #[default]
    All,
    /// Todos that are not completed
    Active,
    /// Completed todos
    Completed,
}

impl FilterMode {
    /// Whether a todo belongs to this filter's subset
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    /// Lowercase name used in URLs and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown filter name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filter '{0}', expected all, active or completed")]
pub struct ParseFilterError(String);

impl FromStr for FilterMode {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// Kind of remote operation a settlement belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Fetch of the whole collection
    Load,
    /// Create of one todo
    Create,
    /// Update of one todo
    Update,
    /// Delete of one todo
    Delete,
}

impl OperationKind {
    /// Notification shown when an operation of this kind fails
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Unable to load todos",
            Self::Create => "Unable to add a todo",
            Self::Update => "Unable to update a todo",
            Self::Delete => "Unable to delete a todo",
        }
    }
}

/// Outcome of a remote call, as seen by presentation layers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Which operation settled
    pub kind: OperationKind,
    /// Todo the operation targeted, when there is one
    pub id: Option<TodoId>,
    /// Whether the service accepted the operation
    pub succeeded: bool,
}

impl Settlement {
    /// Whether input focus should return to the new-todo field
    ///
    /// True after create and delete settlements, whatever the outcome.
    #[must_use]
    pub const fn restores_focus(&self) -> bool {
        matches!(self.kind, OperationKind::Create | OperationKind::Delete)
    }
}

/// Everything the reducer reacts to
///
/// Intents come from the user; settlements are fed back by the runtime when a
/// remote call completes; `NotificationExpired` is fed back by the auto-clear
/// timer.
#[derive(Clone, Debug, PartialEq)]
pub enum TodoAction {
    // ========== Intents ==========
    /// Fetch the whole collection for the configured owner
    Load,
    /// Create a todo from user input (trimmed before use)
    Create {
        /// Raw title
        title: String,
    },
    /// Persist a full replacement record
    Update {
        /// Record with the id of an existing todo
        todo: Todo,
    },
    /// Delete one todo
    Delete {
        /// Todo to delete
        id: TodoId,
    },
    /// Delete every completed todo
    ClearCompleted,
    /// Complete every active todo, or reactivate all when all are completed
    ToggleAll,
    /// Flip the completion flag of one todo
    Toggle {
        /// Todo to flip
        id: TodoId,
    },
    /// Change a title; an empty title deletes the todo
    Rename {
        /// Todo to rename
        id: TodoId,
        /// Raw new title
        title: String,
    },
    /// Select the visible subset
    SetFilter {
        /// New filter
        filter: FilterMode,
    },
    /// Hide the notification now
    DismissNotification,

    // ========== Settlements ==========
    /// Collection fetched
    Loaded {
        /// Full collection, in service order
        todos: Vec<Todo>,
    },
    /// Collection fetch failed
    LoadFailed {
        /// Cause
        error: ServiceError,
    },
    /// Create accepted
    Created {
        /// Todo with its service-assigned id
        todo: Todo,
    },
    /// Create rejected
    CreateFailed {
        /// Cause
        error: ServiceError,
    },
    /// Update accepted
    Updated {
        /// Todo the update targeted
        id: TodoId,
        /// Record as stored by the service
        todo: Todo,
    },
    /// Update rejected
    UpdateFailed {
        /// Todo the update targeted
        id: TodoId,
        /// Cause
        error: ServiceError,
    },
    /// Delete accepted
    Deleted {
        /// Removed todo
        id: TodoId,
    },
    /// Delete rejected
    DeleteFailed {
        /// Todo the delete targeted
        id: TodoId,
        /// Cause
        error: ServiceError,
    },

    // ========== Timers ==========
    /// Auto-clear timer fired for a notification version
    NotificationExpired {
        /// Version the timer was armed for
        version: u64,
    },
}

impl TodoAction {
    /// Settlement signal carried by this action, if it is a settlement
    #[must_use]
    pub fn settlement(&self) -> Option<Settlement> {
        let (kind, id, succeeded) = match self {
            Self::Loaded { .. } => (OperationKind::Load, None, true),
            Self::LoadFailed { .. } => (OperationKind::Load, None, false),
            Self::Created { todo } => (OperationKind::Create, Some(todo.id), true),
            Self::CreateFailed { .. } => (OperationKind::Create, None, false),
            Self::Updated { id, .. } => (OperationKind::Update, Some(*id), true),
            Self::UpdateFailed { id, .. } => (OperationKind::Update, Some(*id), false),
            Self::Deleted { id } => (OperationKind::Delete, Some(*id), true),
            Self::DeleteFailed { id, .. } => (OperationKind::Delete, Some(*id), false),
            _ => return None,
        };

        Some(Settlement {
            kind,
            id,
            succeeded,
        })
    }
}

/// State owned by the reconciliation reducer
#[derive(Clone, Debug)]
pub struct TodoState {
    /// Owner whose todos are synchronized
    pub owner_id: OwnerId,
    /// Canonical collection in display order
    pub todos: Vec<Todo>,
    /// Todo shown while its create is in flight
    pub placeholder: Option<Todo>,
    /// Ids with at least one pending update or delete
    pub in_flight: BTreeSet<TodoId>,
    /// Selected subset
    pub filter: FilterMode,
    /// Current user-visible error
    pub notification: NotificationState,
}

impl TodoState {
    /// Empty state for an owner
    #[must_use]
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            todos: Vec::new(),
            placeholder: None,
            in_flight: BTreeSet::new(),
            filter: FilterMode::All,
            notification: NotificationState::default(),
        }
    }

    /// Looks up a todo in the canonical collection
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Whether a round trip is pending for `id`
    #[must_use]
    pub fn is_in_flight(&self, id: TodoId) -> bool {
        self.in_flight.contains(&id)
    }

    /// Whether no create, update or delete is waiting for the service
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.placeholder.is_none() && self.in_flight.is_empty()
    }

    /// Replaces the todo with `id`, keeping its position
    ///
    /// Returns `false` when no todo has that id.
    pub fn replace(&mut self, id: TodoId, todo: Todo) -> bool {
        match self.todos.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => {
                *existing = todo;
                true
            },
            None => false,
        }
    }

    /// Removes the todo with `id`, returning whether one was removed
    pub fn remove(&mut self, id: TodoId) -> bool {
        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != id);
        self.todos.len() != before
    }
}
