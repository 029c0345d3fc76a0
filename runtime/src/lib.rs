//! # Todo Sync Runtime
//!
//! Runtime implementation for the todo sync architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Cancellation Registry**: Aborts running effects keyed by [`EffectId`]
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_runtime::Store;
//!
//! let store = Store::new(
//!     TodoState::new(owner_id),
//!     TodoReducer::new(),
//!     environment,
//! );
//!
//! // Send an action
//! store.send(TodoAction::Load).await?;
//!
//! // Read state
//! let count = store.state(|s| s.todos.len()).await;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use todo_sync_core::effect::{Effect, EffectId};
use todo_sync_core::reducer::Reducer;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
///
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of actions buffered for slow observers of the action broadcast
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects started by
/// that action. Actions fed back by those effects get handles of their own,
/// which are not tracked here.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(TodoAction::Load).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The fetch has settled and its result action has been reduced
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle and the tracking used by effect execution
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    ///
    /// Cancelled effects count as complete.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, so nothing can still be running
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics
/// or is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Poll interval while shutdown waits for effects to drain
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Running cancellable effects, keyed by id; each entry carries a token so a
/// finished task only removes itself.
type CancellationRegistry = Arc<Mutex<HashMap<EffectId, Vec<(u64, AbortHandle)>>>>;

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicU64, AtomicUsize, CancellationRegistry,
        DecrementGuard, Duration, Effect, EffectHandle, EffectId, EffectTracking, HashMap,
        Mutex, Ordering, PoisonError, Reducer, RwLock, SHUTDOWN_POLL_INTERVAL, StoreConfig,
        StoreError,
    };
    use futures::future::{BoxFuture, join_all};
    use tokio::sync::broadcast;
    use tokio::task::JoinHandle;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop and cancellation)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        default_shutdown_timeout: Duration,
        cancellations: CancellationRegistry,
        next_cancellation_token: Arc<AtomicU64>,
        /// Action broadcast channel for observing actions produced by effects.
        ///
        /// All actions produced by effects (e.g., settlements of remote calls)
        /// are broadcast to observers. Presentation layers subscribe here to
        /// react to settlements without reaching into the reducer.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default()`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                default_shutdown_timeout: config.default_shutdown_timeout,
                cancellations: Arc::new(Mutex::new(HashMap::new())),
                next_cancellation_token: Arc::new(AtomicU64::new(0)),
                action_broadcast,
            }
        }

        /// The shutdown timeout this store was configured with
        #[must_use]
        pub const fn default_shutdown_timeout(&self) -> Duration {
            self.default_shutdown_timeout
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Stop accepting actions and wait for running effects to drain
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] with the number of effects
        /// still running when `timeout` elapses first.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Shutting down store");
            self.shutdown.store(true, Ordering::Release);

            let drained = tokio::time::timeout(timeout, async {
                while self.pending_effects() > 0 {
                    tokio::time::sleep(SHUTDOWN_POLL_INTERVAL).await;
                }
            })
            .await;

            if drained.is_err() {
                let pending = self.pending_effects();
                tracing::error!(pending, "Shutdown timed out");
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tracing::info!("Store shut down");
            Ok(())
        }

        /// Reduce `action` against the latest state and start its effects
        ///
        /// The reducer runs under the state write lock. Effects run on spawned
        /// tasks; the returned handle tracks the ones started here.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);
            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                effects
            };

            tracing::trace!(count = effects.len(), "Starting effects");
            for effect in effects {
                self.execute_effect_internal(effect, &tracking);
            }

            Ok(handle)
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, then waits for the
        /// first action produced by an effect that matches the predicate.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        ///
        /// # Example
        ///
        /// ```ignore
        /// let settled = store.send_and_wait_for(
        ///     TodoAction::Delete { id },
        ///     |a| matches!(a, TodoAction::Deleted { .. } | TodoAction::DeleteFailed { .. }),
        ///     Duration::from_secs(10),
        /// ).await?;
        /// ```
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(
                                skipped = skipped,
                                "Action observer lagged, continuing to wait"
                            );
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// The initial action passed to `send()` is not broadcast; only the
        /// actions fed back by effects are.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Abort every running effect registered under `id`
        ///
        /// Returns how many effects were aborted.
        pub fn cancel(&self, id: EffectId) -> usize {
            let aborted = {
                let mut registry = self
                    .cancellations
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                Self::abort_registered(&mut registry, id)
            };

            if aborted > 0 {
                tracing::trace!(effect_id = %id, aborted, "Cancelled running effects");
                // Note: effect counts fit comfortably in u64
                metrics::counter!("store.effects.cancelled").increment(aborted as u64);
            }

            aborted
        }

        fn abort_registered(
            registry: &mut HashMap<EffectId, Vec<(u64, tokio::task::AbortHandle)>>,
            id: EffectId,
        ) -> usize {
            registry.remove(&id).map_or(0, |running| {
                for (_, handle) in &running {
                    handle.abort();
                }
                running.len()
            })
        }

        /// Feed an action produced by an effect back into the store
        ///
        /// Observers are notified after the action has been reduced, so state
        /// read on receipt already reflects it.
        async fn feed_back(&self, action: A) {
            if let Err(error) = self.send(action.clone()).await {
                tracing::warn!(error = %error, "Dropped action produced by effect");
            }

            // Broadcast to observers (presentation layers, tests)
            let _ = self.action_broadcast.send(action);
        }

        /// Spawn a task that counts towards both the action's handle and shutdown
        fn spawn_tracked<F>(&self, tracking: &EffectTracking, task: F) -> JoinHandle<()>
        where
            F: std::future::Future<Output = ()> + Send + 'static,
        {
            tracking.increment();
            let guard = DecrementGuard(tracking.clone());

            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            tokio::spawn(async move {
                let _guard = guard;
                let _pending_guard = pending_guard;
                task.await;
            })
        }

        /// Start a cancellable effect and register it under `id`
        ///
        /// The registry lock is held while spawning so the task cannot
        /// unregister itself before it has been registered.
        fn spawn_cancellable(
            &self,
            id: EffectId,
            cancel_in_flight: bool,
            effect: Effect<A>,
            tracking: &EffectTracking,
        ) -> JoinHandle<()> {
            let mut registry = self
                .cancellations
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if cancel_in_flight {
                let aborted = Self::abort_registered(&mut registry, id);
                if aborted > 0 {
                    tracing::trace!(effect_id = %id, aborted, "Cancelled in-flight effects");
                    metrics::counter!("store.effects.cancelled").increment(aborted as u64);
                }
            }

            let token = self.next_cancellation_token.fetch_add(1, Ordering::Relaxed);
            let store = self.clone();
            let task = self.spawn_tracked(tracking, async move {
                store.clone().run_to_completion(effect).await;

                let mut registry = store
                    .cancellations
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Some(running) = registry.get_mut(&id) {
                    running.retain(|(t, _)| *t != token);
                    if running.is_empty() {
                        registry.remove(&id);
                    }
                }
            });

            registry
                .entry(id)
                .or_default()
                .push((token, task.abort_handle()));

            task
        }

        /// Drive an effect until it and everything it spawned inline has finished
        fn run_to_completion(self, effect: Effect<A>) -> BoxFuture<'static, ()> {
            Box::pin(async move {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => {
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            self.feed_back(action).await;
                        } else {
                            tracing::trace!("Effect::Future completed with no action");
                        }
                    },
                    Effect::Delay { duration, action } => {
                        tokio::time::sleep(duration).await;
                        tracing::trace!("Effect::Delay completed, sending action");
                        self.feed_back(*action).await;
                    },
                    Effect::Parallel(effects) => {
                        join_all(
                            effects
                                .into_iter()
                                .map(|effect| self.clone().run_to_completion(effect)),
                        )
                        .await;
                    },
                    Effect::Sequential(effects) => {
                        for effect in effects {
                            self.clone().run_to_completion(effect).await;
                        }
                    },
                    Effect::Cancellable {
                        id,
                        cancel_in_flight,
                        effect,
                    } => {
                        let (mut handle, tracking) = EffectHandle::new();
                        let _ = self.spawn_cancellable(id, cancel_in_flight, *effect, &tracking);
                        drop(tracking);
                        handle.wait().await;
                    },
                    Effect::Cancel(id) => {
                        self.cancel(id);
                    },
                }
            })
        }

        /// Start `effect`, counting it against `tracking`
        ///
        /// `Parallel` children are started individually; a panicking task is
        /// isolated and [`DecrementGuard`] keeps the counters right on panic
        /// and on abort.
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: &EffectTracking) {
            metrics::counter!("store.effects.executed", "type" => effect_kind(&effect))
                .increment(1);

            match effect {
                Effect::None => {},
                Effect::Parallel(effects) => {
                    for effect in effects {
                        self.execute_effect_internal(effect, tracking);
                    }
                },
                Effect::Cancellable {
                    id,
                    cancel_in_flight,
                    effect,
                } => {
                    tracing::trace!(effect_id = %id, cancel_in_flight, "Starting cancellable effect");
                    let _ = self.spawn_cancellable(id, cancel_in_flight, *effect, tracking);
                },
                Effect::Cancel(id) => {
                    self.cancel(id);
                },
                effect @ (Effect::Future(_) | Effect::Delay { .. } | Effect::Sequential(_)) => {
                    let store = self.clone();
                    let _ = self.spawn_tracked(tracking, store.run_to_completion(effect));
                },
            }
        }
    }

    /// Metric label for an effect variant
    const fn effect_kind<A>(effect: &Effect<A>) -> &'static str {
        match effect {
            Effect::None => "none",
            Effect::Future(_) => "future",
            Effect::Delay { .. } => "delay",
            Effect::Parallel(_) => "parallel",
            Effect::Sequential(_) => "sequential",
            Effect::Cancellable { .. } => "cancellable",
            Effect::Cancel(_) => "cancel",
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                default_shutdown_timeout: self.default_shutdown_timeout,
                cancellations: Arc::clone(&self.cancellations),
                next_cancellation_token: Arc::clone(&self.next_cancellation_token),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

// Test module
#[cfg(test)]
mod tests {
    use super::*;
    use todo_sync_core::{SmallVec, smallvec};

    const TICKER: EffectId = EffectId::new("ticker");

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceDelayedAction,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        ProducePanickingEffect,
        StartTicker,
        RestartTicker,
        StopTicker,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    fn increment_later(ms: u64) -> Effect<TestAction> {
        Effect::Delay {
            duration: Duration::from_millis(ms),
            action: Box::new(TestAction::Increment),
        }
    }

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async {
                        Some(TestAction::Increment)
                    }))]
                },
                TestAction::ProduceDelayedAction => smallvec![increment_later(10)],
                TestAction::ProduceParallelEffects => {
                    smallvec![Effect::Parallel(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    ])]
                },
                TestAction::ProduceSequentialEffects => {
                    smallvec![Effect::Sequential(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Decrement) })),
                    ])]
                },
                TestAction::ProducePanickingEffect => {
                    #[allow(clippy::panic)] // Intentional panic for testing error handling
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("Intentional panic in effect for testing");
                        }))]
                    }
                },
                TestAction::StartTicker => {
                    smallvec![increment_later(100).cancellable(TICKER, false)]
                },
                TestAction::RestartTicker => {
                    smallvec![increment_later(100).cancellable(TICKER, true)]
                },
                TestAction::StopTicker => smallvec![Effect::Cancel(TICKER)],
            }
        }
    }

    fn new_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_send_action() -> Result<(), StoreError> {
        let store = new_store();

        store.send(TestAction::Increment).await?;
        store.send(TestAction::Increment).await?;
        store.send(TestAction::Decrement).await?;
        store.send(TestAction::NoOp).await?;

        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_future() -> Result<(), StoreError> {
        let store = new_store();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_delay() -> Result<(), StoreError> {
        let store = new_store();

        let mut handle = store.send(TestAction::ProduceDelayedAction).await?;

        // Value should still be 0 immediately
        assert_eq!(store.state(|s| s.value).await, 0);

        handle.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_parallel() -> Result<(), StoreError> {
        let store = new_store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await?;
        handle.wait().await;
        assert_eq!(handle.pending(), 0);

        assert_eq!(store.state(|s| s.value).await, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_sequential() -> Result<(), StoreError> {
        let store = new_store();

        let mut handle = store.send(TestAction::ProduceSequentialEffects).await?;
        handle.wait().await;

        // Net result: +1 +1 -1 = 1
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test]
    #[allow(clippy::panic)] // Tests are allowed to panic on failures
    async fn test_concurrent_sends() {
        let store = new_store();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TestAction::Increment).await;
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                panic!("concurrent send task panicked: {e}");
            }
        }

        assert_eq!(store.state(|s| s.value).await, 10);
    }

    #[tokio::test]
    async fn test_store_clone_shares_state() -> Result<(), StoreError> {
        let store1 = new_store();
        let store2 = store1.clone();

        store1.send(TestAction::Increment).await?;
        assert_eq!(store2.state(|s| s.value).await, 1);

        store2.send(TestAction::Increment).await?;
        assert_eq!(store1.state(|s| s.value).await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = new_store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await?;
        handle.wait().await;

        // Store still works after an effect panicked
        store.send(TestAction::Increment).await?;
        assert_eq!(store.state(|s| s.value).await, 1);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_running_effect() -> Result<(), StoreError> {
        let store = new_store();

        let mut ticker = store.send(TestAction::StartTicker).await?;
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.send(TestAction::StopTicker).await?;

        ticker.wait().await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.state(|s| s.value).await, 0);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight_keeps_only_latest() -> Result<(), StoreError> {
        let store = new_store();

        store.send(TestAction::RestartTicker).await?;
        tokio::time::sleep(Duration::from_millis(60)).await;
        let mut latest = store.send(TestAction::RestartTicker).await?;

        // The first ticker would have fired at t=100
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(store.state(|s| s.value).await, 0);

        latest.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_cancel_in_flight_both_run() -> Result<(), StoreError> {
        let store = new_store();

        let mut first = store.send(TestAction::StartTicker).await?;
        let mut second = store.send(TestAction::StartTicker).await?;
        first.wait().await;
        second.wait().await;

        assert_eq!(store.state(|s| s.value).await, 2);
        // Finished effects no longer count as cancellable
        assert_eq!(store.cancel(TICKER), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = new_store();

        store.shutdown(Duration::from_secs(1)).await?;

        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_waits_for_running_effects() -> Result<(), StoreError> {
        let store = new_store();

        store.send(TestAction::StartTicker).await?;
        store.shutdown(Duration::from_secs(1)).await?;

        assert_eq!(store.pending_effects(), 0);
        // The ticker's action arrived after shutdown began and was dropped
        assert_eq!(store.state(|s| s.value).await, 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_timeout() -> Result<(), StoreError> {
        let store = new_store();

        store.send(TestAction::StartTicker).await?;
        let result = store.shutdown(Duration::from_millis(20)).await;

        assert!(matches!(result, Err(StoreError::ShutdownTimeout(1))));
        Ok(())
    }

    #[test]
    fn test_store_config_builder() {
        let config = StoreConfig::default()
            .with_broadcast_capacity(64)
            .with_shutdown_timeout(Duration::from_secs(5));

        assert_eq!(config.broadcast_capacity, 64);
        assert_eq!(config.default_shutdown_timeout, Duration::from_secs(5));
    }

}
