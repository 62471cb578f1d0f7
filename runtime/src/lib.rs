//! # Devconnect Runtime
//!
//! Runtime implementation for the devconnect reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back
//!   to reducers
//! - **Cancellation Registry**: Aborts pending `Cancellable` effects by id
//!
//! ## Example
//!
//! ```ignore
//! use devconnect_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use devconnect_core::effect::{Effect, EffectId};
use devconnect_core::reducer::Reducer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, watch, Notify, RwLock};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
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
        ///
        /// The action broadcast channel was closed, typically because the
        /// store is shutting down.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of one
/// action to complete.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All direct effects from Action::Start are now complete
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
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

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all direct effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all direct effects to complete, up to a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires before the
    /// effects complete.
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

/// Internal: effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect
/// panics.
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

type CancellationMap = Arc<Mutex<HashMap<EffectId, Arc<Notify>>>>;

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
    cancellations: CancellationMap,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// All actions produced by effects (e.g., from `Effect::Future`) are
    /// broadcast to observers. This enables HTTP request-response patterns.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + Clone + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Default action broadcast capacity is 16; increase with
    /// [`Store::with_broadcast_capacity`] if observers frequently lag.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new Store with custom action broadcast capacity
    ///
    /// # Arguments
    ///
    /// - `initial_state`: The starting state for the store
    /// - `reducer`: The reducer implementation (business logic)
    /// - `environment`: Injected dependencies
    /// - `capacity`: Action broadcast channel capacity
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            cancellations: Arc::new(Mutex::new(HashMap::new())),
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires write lock on state
    /// 2. Calls reducer with (state, action, environment)
    /// 3. Executes returned effects asynchronously
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// `send()` returns after starting effect execution, not completion;
    /// use the returned [`EffectHandle`] to wait. Multiple concurrent
    /// `send()` calls serialize at the reducer level.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        tracing::debug!("Processing action");

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        tracing::trace!("Reducer completed, executing {} effects", effects.len());
        for effect in effects {
            self.execute_effect_internal(effect, tracking.clone());
        }

        Ok(handle)
    }

    /// Send an action and wait for a matching result action
    ///
    /// This method is designed for request-response patterns (HTTP, RPC).
    /// It subscribes to the action broadcast, sends the initial action,
    /// then waits for an action matching the predicate.
    ///
    /// Subscription happens BEFORE sending to avoid race conditions. Only
    /// actions produced by effects are broadcast, not the initial action.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: timeout expired before a matching action
    /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
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
                    Ok(_) => {} // Not the action we want, keep waiting
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow consumer; if the terminal action was dropped
                        // the timeout will catch it
                        tracing::warn!(skipped, "Action observer lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    }
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by effects of this store
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let alert_count = store.state(|s| s.alerts.alerts.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Sets the shutdown flag (rejecting new actions), then waits for
    /// pending effects to complete, polling until the timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before
    /// all pending effects complete.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");

        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timeout");
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Register a cancellation token under an id, replacing (and firing) any
    /// previous registration for the same id.
    fn register_cancellation(&self, id: EffectId) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        let previous = {
            let mut map = match self.cancellations.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            map.insert(id, Arc::clone(&notify))
        };
        // Re-registering an id aborts the effect it previously referred to
        if let Some(previous) = previous {
            previous.notify_one();
        }
        notify
    }

    /// Drop a registration, but only if it still belongs to `notify`
    /// (a newer registration under the same id must survive).
    fn clear_cancellation(&self, id: &EffectId, notify: &Arc<Notify>) {
        let mut map = match self.cancellations.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if map.get(id).is_some_and(|current| Arc::ptr_eq(current, notify)) {
            map.remove(id);
        }
    }

    /// Execute an effect with tracking
    ///
    /// **Reducer panics**: propagate (fail fast) - reducers should be pure
    /// functions that do not panic.
    ///
    /// **Effect execution failures**: log and continue. Effects are
    /// fire-and-forget; the [`DecrementGuard`] keeps counters consistent
    /// even on panic.
    #[allow(clippy::needless_pass_by_value)] // tracking is cloned, pass by value is intentional
    #[allow(clippy::too_many_lines)]
    fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
            }
            Effect::Future(fut) => {
                tracing::trace!("Executing Effect::Future");
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let tracking_clone = tracking.clone();
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking_clone);
                    let _pending_guard = pending_guard;

                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action");
                        let _ = store.action_broadcast.send(action.clone());
                        let _ = store.send(action).await;
                    }
                });
            }
            Effect::Delay { duration, action } => {
                tracing::trace!(?duration, "Executing Effect::Delay");
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let tracking_clone = tracking.clone();
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking_clone);
                    let _pending_guard = pending_guard;

                    tokio::time::sleep(duration).await;
                    let _ = store.action_broadcast.send((*action).clone());
                    let _ = store.send(*action).await;
                });
            }
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                for effect in effects {
                    self.execute_effect_internal(effect, tracking.clone());
                }
            }
            Effect::Sequential(effects) => {
                let effect_count = effects.len();
                tracing::trace!("Executing Effect::Sequential with {} effects", effect_count);

                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let tracking_clone = tracking.clone();
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking_clone);
                    let _pending_guard = pending_guard;

                    // Execute effects one by one, waiting for each to complete
                    for (idx, effect) in effects.into_iter().enumerate() {
                        tracing::trace!("Sequential effect {} of {}", idx + 1, effect_count);

                        let (mut sub_handle, sub_tracking) = EffectHandle::new();
                        store.execute_effect_internal(effect, sub_tracking);
                        sub_handle.wait().await;
                    }
                });
            }
            Effect::Cancellable { id, effect } => {
                self.execute_cancellable(id, *effect, tracking);
            }
            Effect::Cancel(id) => {
                tracing::trace!(%id, "Executing Effect::Cancel");
                let removed = {
                    let mut map = match self.cancellations.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    map.remove(&id)
                };
                if let Some(notify) = removed {
                    notify.notify_one();
                }
            }
        }
    }

    /// Run a `Delay` or `Future` effect under a cancellation token.
    ///
    /// Other effect shapes are not interruptible mid-flight; they execute
    /// normally and the registration is ignored.
    fn execute_cancellable(&self, id: EffectId, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::Delay { duration, action } => {
                tracing::trace!(%id, ?duration, "Executing cancellable Effect::Delay");
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let notify = self.register_cancellation(id.clone());
                let tracking_clone = tracking.clone();
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking_clone);
                    let _pending_guard = pending_guard;

                    tokio::select! {
                        () = tokio::time::sleep(duration) => {
                            store.clear_cancellation(&id, &notify);
                            let _ = store.action_broadcast.send((*action).clone());
                            let _ = store.send(*action).await;
                        }
                        () = notify.notified() => {
                            tracing::trace!(%id, "Delayed effect cancelled");
                        }
                    }
                });
            }
            Effect::Future(fut) => {
                tracing::trace!(%id, "Executing cancellable Effect::Future");
                tracking.increment();

                self.pending_effects.fetch_add(1, Ordering::SeqCst);
                let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                let notify = self.register_cancellation(id.clone());
                let tracking_clone = tracking.clone();
                let store = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking_clone);
                    let _pending_guard = pending_guard;

                    tokio::select! {
                        result = fut => {
                            store.clear_cancellation(&id, &notify);
                            if let Some(action) = result {
                                let _ = store.action_broadcast.send(action.clone());
                                let _ = store.send(action).await;
                            }
                        }
                        () = notify.notified() => {
                            tracing::trace!(%id, "Future effect cancelled");
                        }
                    }
                });
            }
            other => {
                tracing::warn!(%id, "Effect shape is not cancellable, executing as-is");
                self.execute_effect_internal(other, tracking);
            }
        }
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
            cancellations: Arc::clone(&self.cancellations),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use devconnect_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
    use std::time::Duration;

    #[derive(Debug, Clone, Default)]
    struct TickState {
        ticks: u32,
        pings: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TickAction {
        /// Schedule a tick after the given delay under a cancellation id
        Schedule { id: String, delay_ms: u64 },
        /// Cancel a scheduled tick
        Abort { id: String },
        /// The delayed action
        Tick,
        /// Run an async computation producing Ping
        Spawn,
        Ping,
    }

    #[derive(Clone)]
    struct TickReducer;

    impl Reducer for TickReducer {
        type State = TickState;
        type Action = TickAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TickAction::Schedule { id, delay_ms } => {
                    smallvec![Effect::cancellable(
                        EffectId::new(id),
                        Effect::Delay {
                            duration: Duration::from_millis(delay_ms),
                            action: Box::new(TickAction::Tick),
                        },
                    )]
                }
                TickAction::Abort { id } => smallvec![Effect::Cancel(EffectId::new(id))],
                TickAction::Tick => {
                    state.ticks += 1;
                    SmallVec::new()
                }
                TickAction::Spawn => {
                    smallvec![Effect::Future(Box::pin(async { Some(TickAction::Ping) }))]
                }
                TickAction::Ping => {
                    state.pings += 1;
                    SmallVec::new()
                }
            }
        }
    }

    fn store() -> Store<TickState, TickAction, (), TickReducer> {
        Store::new(TickState::default(), TickReducer, ())
    }

    #[tokio::test]
    async fn send_runs_reducer_and_future_effects() {
        let store = store();
        let mut handle = store.send(TickAction::Spawn).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        // The feedback action is processed by a spawned task; wait for it
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.state(|s| s.pings).await, 1);
    }

    #[tokio::test]
    async fn delayed_action_fires_after_duration() {
        let store = store();
        store
            .send(TickAction::Schedule {
                id: "t1".into(),
                delay_ms: 20,
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(store.state(|s| s.ticks).await, 1);
    }

    #[tokio::test]
    async fn cancelled_delay_never_fires() {
        let store = store();
        store
            .send(TickAction::Schedule {
                id: "t1".into(),
                delay_ms: 100,
            })
            .await
            .unwrap();
        store.send(TickAction::Abort { id: "t1".into() }).await.unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(store.state(|s| s.ticks).await, 0);
    }

    #[tokio::test]
    async fn cancel_unknown_id_is_noop() {
        let store = store();
        store.send(TickAction::Abort { id: "nope".into() }).await.unwrap();
        assert_eq!(store.state(|s| s.ticks).await, 0);
    }

    #[tokio::test]
    async fn send_and_wait_for_matches_feedback_action() {
        let store = store();
        let result = store
            .send_and_wait_for(
                TickAction::Spawn,
                |a| matches!(a, TickAction::Ping),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(result, TickAction::Ping);
    }

    #[tokio::test]
    async fn send_and_wait_for_times_out_without_match() {
        let store = store();
        let result = store
            .send_and_wait_for(
                TickAction::Tick,
                |a| matches!(a, TickAction::Ping),
                Duration::from_millis(50),
            )
            .await;
        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();
        let result = store.send(TickAction::Tick).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }
}
