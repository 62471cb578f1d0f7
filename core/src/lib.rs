//! # Devconnect Core
//!
//! Core traits and types for the devconnect reducer architecture.
//!
//! This crate provides the fundamental abstractions shared by the client
//! state layer and the Store runtime:
//!
//! - **State**: owned domain state for a feature slice
//! - **Action**: all possible inputs to a reducer (commands and events)
//! - **Reducer**: pure function `(State, Action, Environment) → Effects`
//! - **Effect**: side effect descriptions (values, not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for AlertReducer {
    ///     type State = AlertsSlice;
    ///     type Action = ClientAction;
    ///     type Environment = ClientEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut AlertsSlice,
    ///         action: ClientAction,
    ///         env: &ClientEnvironment,
    ///     ) -> SmallVec<[Effect<ClientAction>; 4]> {
    ///         match action {
    ///             ClientAction::ShowAlert { .. } => { /* ... */ }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifier for a cancellable effect.
    ///
    /// Cancellation is keyed by value: dispatching `Effect::Cancel(id)`
    /// aborts any still-pending effect registered under the same id.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct EffectId(pub String);

    impl EffectId {
        /// Create an effect id from anything string-like.
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[allow(missing_docs)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into
        /// the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// An effect that can be aborted before it completes.
        ///
        /// The wrapped effect runs normally unless `Effect::Cancel` with the
        /// same id is dispatched first. Re-registering an id replaces the
        /// previous registration.
        Cancellable {
            /// Cancellation key
            id: EffectId,
            /// The effect to run under that key
            effect: Box<Effect<Action>>,
        },

        /// Abort a pending `Cancellable` effect by id.
        ///
        /// A no-op when nothing is registered under the id.
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an effect so it can be aborted via `Effect::Cancel(id)`.
        #[must_use]
        pub fn cancellable(id: EffectId, effect: Effect<Action>) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(effect),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Fixed clock for deterministic tests.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        /// The instant this clock always reports.
        pub time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock pinned to the given instant.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }
}
