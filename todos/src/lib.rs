//! Client-side todo list kept in sync with a remote CRUD service.
//!
//! The reducer owns the canonical collection and treats the remote service as
//! the source of truth:
//!
//! - Optimistic creation through a single placeholder
//! - Per-item and bulk updates and deletes with in-flight tracking
//! - Error notifications that clear themselves after a timeout
//! - Filtered views and counts derived on demand
//!
//! # Quick Start
//!
//! ```no_run
//! use todos::{HttpTodoService, OwnerId, TodoAction, TodoEnvironment, TodoReducer, TodoState, TodoView};
//! use todo_sync_runtime::Store;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let owner = OwnerId::new(42);
//! let env = TodoEnvironment::new(HttpTodoService::new("https://mate.academy/students-api"));
//! let store = Store::new(TodoState::new(owner), TodoReducer::new(), env);
//!
//! store
//!     .send_and_wait_for(TodoAction::Load, |a| a.settlement().is_some(), Duration::from_secs(10))
//!     .await?;
//!
//! store.send(TodoAction::Create { title: " Buy milk ".to_string() }).await?;
//!
//! let view = store.state(TodoView::derive).await;
//! println!("{} items left", view.active_count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod mocks;
pub mod notification;
pub mod reducer;
pub mod service;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::TodoConfig;
pub use error::{ConfigError, ServiceError, TodoError};
pub use http::HttpTodoService;
pub use mocks::MockTodoService;
pub use notification::NotificationState;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use service::TodoService;
pub use types::{
    FilterMode, OperationKind, OwnerId, Settlement, Todo, TodoAction, TodoDraft, TodoId, TodoState,
};
pub use view::TodoView;

/// Store running the todo reducer against service `S`
pub type TodoStore<S> =
    todo_sync_runtime::Store<TodoState, TodoAction, TodoEnvironment<S>, TodoReducer<S>>;
