//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants, particularly
//! for remote calls whose result is fed back into the reducer.

/// Create an `Effect::Future` from an async block body
///
/// The body is wrapped in `async move` and must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use todo_sync_core::async_effect;
///
/// async_effect! {
///     match service.delete(id).await {
///         Ok(()) => Some(TodoAction::Deleted { id }),
///         Err(error) => Some(TodoAction::DeleteFailed { id, error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use todo_sync_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(3),
///     action: TodoAction::NotificationExpired { version }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}
