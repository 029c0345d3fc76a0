//! Reconciliation reducer for the todo list.
//!
//! Intents mutate local state and describe remote calls; settlements fold the
//! service's answer back into the latest state. Remote errors never escape:
//! they are logged and turned into a notification.

use crate::error::{ServiceError, TodoError};
use crate::notification::{self, DEFAULT_NOTIFICATION_TIMEOUT};
use crate::service::TodoService;
use crate::types::{OperationKind, OwnerId, Todo, TodoAction, TodoDraft, TodoId, TodoState};
use crate::view;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use todo_sync_core::{
    SmallVec, async_effect,
    effect::Effect,
    environment::{Clock, SystemClock},
    reducer::Reducer,
    smallvec,
};

/// Environment dependencies for the todo reducer
pub struct TodoEnvironment<S> {
    /// Remote source of truth
    pub service: Arc<S>,
    /// Clock for notification timestamps
    pub clock: Arc<dyn Clock>,
    /// How long notifications stay visible
    pub notification_timeout: Duration,
}

impl<S: TodoService> TodoEnvironment<S> {
    /// Creates an environment with the system clock and default timeout
    #[must_use]
    pub fn new(service: S) -> Self {
        Self {
            service: Arc::new(service),
            clock: Arc::new(SystemClock),
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the notification timeout
    #[must_use]
    pub const fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }
}

impl<S> Clone for TodoEnvironment<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            clock: Arc::clone(&self.clock),
            notification_timeout: self.notification_timeout,
        }
    }
}

/// Reducer for the todo list
pub struct TodoReducer<S> {
    _service: PhantomData<fn() -> S>,
}

impl<S> TodoReducer<S> {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _service: PhantomData,
        }
    }
}

impl<S> Default for TodoReducer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for TodoReducer<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for TodoReducer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TodoReducer")
    }
}

type Effects = SmallVec<[Effect<TodoAction>; 4]>;

fn load_effect<S: TodoService>(service: &Arc<S>, owner_id: OwnerId) -> Effect<TodoAction> {
    let service = Arc::clone(service);
    async_effect! {
        match service.fetch_all(owner_id).await {
            Ok(todos) => Some(TodoAction::Loaded { todos }),
            Err(error) => Some(TodoAction::LoadFailed { error }),
        }
    }
}

fn create_effect<S: TodoService>(service: &Arc<S>, draft: TodoDraft) -> Effect<TodoAction> {
    let service = Arc::clone(service);
    async_effect! {
        match service.create(draft).await {
            Ok(todo) => Some(TodoAction::Created { todo }),
            Err(error) => Some(TodoAction::CreateFailed { error }),
        }
    }
}

fn update_effect<S: TodoService>(service: &Arc<S>, todo: Todo) -> Effect<TodoAction> {
    let service = Arc::clone(service);
    async_effect! {
        let id = todo.id;
        match service.update(todo).await {
            Ok(todo) => Some(TodoAction::Updated { id, todo }),
            Err(error) => Some(TodoAction::UpdateFailed { id, error }),
        }
    }
}

fn delete_effect<S: TodoService>(service: &Arc<S>, id: TodoId) -> Effect<TodoAction> {
    let service = Arc::clone(service);
    async_effect! {
        match service.delete(id).await {
            Ok(()) => Some(TodoAction::Deleted { id }),
            Err(error) => Some(TodoAction::DeleteFailed { id, error }),
        }
    }
}

impl<S: TodoService> TodoReducer<S> {
    /// Show `message` and arm its auto-clear timer
    fn notify(state: &mut TodoState, env: &TodoEnvironment<S>, message: &str) -> Effects {
        let version = state.notification.raise(message, env.clock.now());
        smallvec![notification::auto_clear(version, env.notification_timeout)]
    }

    /// Log a remote failure and show the message for its operation kind
    fn absorb_failure(
        state: &mut TodoState,
        env: &TodoEnvironment<S>,
        kind: OperationKind,
        id: Option<TodoId>,
        error: &ServiceError,
    ) -> Effects {
        match id {
            Some(id) => tracing::warn!(?kind, %id, %error, "Remote call failed"),
            None => tracing::warn!(?kind, %error, "Remote call failed"),
        }
        Self::notify(state, env, kind.failure_message())
    }

    fn create(state: &mut TodoState, env: &TodoEnvironment<S>, title: &str) -> Effects {
        let title = title.trim();
        if title.is_empty() {
            tracing::debug!("Rejected create with empty title");
            return Self::notify(state, env, &TodoError::EmptyTitle.to_string());
        }

        if let Some(pending) = &state.placeholder {
            tracing::warn!(
                pending = %pending.title,
                "Ignored create while another create is in flight"
            );
            return SmallVec::new();
        }

        tracing::debug!(%title, "Creating todo");
        let mut effects = Effects::new();
        // A new add starts with a clean slate
        if state.notification.is_visible() {
            state.notification.dismiss();
            effects.push(notification::cancel_auto_clear());
        }

        state.placeholder = Some(Todo::placeholder(title, state.owner_id));
        effects.push(create_effect(
            &env.service,
            TodoDraft::new(title, state.owner_id),
        ));
        effects
    }

    fn update(state: &mut TodoState, env: &TodoEnvironment<S>, todo: Todo) -> Effects {
        if state.get(todo.id).is_none() {
            tracing::debug!(id = %todo.id, "Ignored update of unknown todo");
            return SmallVec::new();
        }

        tracing::debug!(id = %todo.id, completed = todo.completed, "Updating todo");
        state.in_flight.insert(todo.id);
        smallvec![update_effect(&env.service, todo)]
    }

    fn delete(state: &mut TodoState, env: &TodoEnvironment<S>, id: TodoId) -> Effects {
        if state.get(id).is_none() {
            tracing::debug!(%id, "Ignored delete of unknown todo");
            return SmallVec::new();
        }

        tracing::debug!(%id, "Deleting todo");
        state.in_flight.insert(id);
        smallvec![delete_effect(&env.service, id)]
    }

    fn clear_completed(state: &mut TodoState, env: &TodoEnvironment<S>) -> Effects {
        let ids: Vec<TodoId> = state
            .todos
            .iter()
            .filter(|todo| todo.completed)
            .map(|todo| todo.id)
            .collect();

        if ids.is_empty() {
            return SmallVec::new();
        }

        tracing::debug!(count = ids.len(), "Clearing completed todos");
        state.in_flight.extend(ids.iter().copied());
        smallvec![Effect::merge(
            ids.into_iter()
                .map(|id| delete_effect(&env.service, id))
                .collect()
        )]
    }

    fn toggle_all(state: &mut TodoState, env: &TodoEnvironment<S>) -> Effects {
        // All completed: reactivate everything. Otherwise complete the rest.
        let complete = !view::all_completed(&state.todos);
        let targets: Vec<Todo> = state
            .todos
            .iter()
            .filter(|todo| todo.completed != complete)
            .map(|todo| todo.with_completed(complete))
            .collect();

        if targets.is_empty() {
            return SmallVec::new();
        }

        tracing::debug!(count = targets.len(), complete, "Toggling all todos");
        state.in_flight.extend(targets.iter().map(|todo| todo.id));
        smallvec![Effect::merge(
            targets
                .into_iter()
                .map(|todo| update_effect(&env.service, todo))
                .collect()
        )]
    }

    fn rename(
        state: &mut TodoState,
        env: &TodoEnvironment<S>,
        id: TodoId,
        title: &str,
    ) -> Effects {
        let Some(todo) = state.get(id) else {
            tracing::debug!(%id, "Ignored rename of unknown todo");
            return SmallVec::new();
        };

        let title = title.trim();
        if title == todo.title {
            return SmallVec::new();
        }
        if title.is_empty() {
            return Self::delete(state, env, id);
        }

        let renamed = todo.with_title(title);
        Self::update(state, env, renamed)
    }
}

impl<S: TodoService> Reducer for TodoReducer<S> {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment<S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Intents ==========
            TodoAction::Load => {
                tracing::debug!(owner_id = %state.owner_id, "Loading todos");
                smallvec![load_effect(&env.service, state.owner_id)]
            },
            TodoAction::Create { title } => Self::create(state, env, &title),
            TodoAction::Update { todo } => Self::update(state, env, todo),
            TodoAction::Delete { id } => Self::delete(state, env, id),
            TodoAction::ClearCompleted => Self::clear_completed(state, env),
            TodoAction::ToggleAll => Self::toggle_all(state, env),
            TodoAction::Toggle { id } => match state.get(id) {
                Some(todo) => {
                    let toggled = todo.with_completed(!todo.completed);
                    Self::update(state, env, toggled)
                },
                None => {
                    tracing::debug!(%id, "Ignored toggle of unknown todo");
                    SmallVec::new()
                },
            },
            TodoAction::Rename { id, title } => Self::rename(state, env, id, &title),
            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },
            TodoAction::DismissNotification => {
                state.notification.dismiss();
                smallvec![notification::cancel_auto_clear()]
            },

            // ========== Settlements ==========
            TodoAction::Loaded { todos } => {
                tracing::debug!(count = todos.len(), "Todos loaded");
                state.todos = todos;
                SmallVec::new()
            },
            TodoAction::LoadFailed { error } => {
                Self::absorb_failure(state, env, OperationKind::Load, None, &error)
            },
            TodoAction::Created { todo } => {
                tracing::debug!(id = %todo.id, "Todo created");
                state.placeholder = None;
                state.todos.push(todo);
                SmallVec::new()
            },
            TodoAction::CreateFailed { error } => {
                state.placeholder = None;
                Self::absorb_failure(state, env, OperationKind::Create, None, &error)
            },
            TodoAction::Updated { id, todo } => {
                state.in_flight.remove(&id);
                if todo.id != id {
                    tracing::warn!(%id, returned = %todo.id, "Service answered update with another id");
                }
                if !state.replace(id, todo) {
                    tracing::debug!(%id, "Updated todo is no longer in the collection");
                }
                SmallVec::new()
            },
            TodoAction::UpdateFailed { id, error } => {
                state.in_flight.remove(&id);
                Self::absorb_failure(state, env, OperationKind::Update, Some(id), &error)
            },
            TodoAction::Deleted { id } => {
                state.in_flight.remove(&id);
                state.remove(id);
                SmallVec::new()
            },
            TodoAction::DeleteFailed { id, error } => {
                state.in_flight.remove(&id);
                Self::absorb_failure(state, env, OperationKind::Delete, Some(id), &error)
            },

            // ========== Timers ==========
            TodoAction::NotificationExpired { version } => {
                if state.notification.expire(version) {
                    tracing::trace!(version, "Notification cleared");
                }
                SmallVec::new()
            },
        }
    }
}
