//! # Devconnect Client
//!
//! Client-side state synchronization for the devconnect API.
//!
//! The global store is an explicit state struct ([`state::ClientState`])
//! with one pure reducer per slice, combined by
//! [`reducers::ClientReducer`] and driven by the Store runtime. Actions
//! are the only way to change state:
//!
//! ```text
//! UI command → reducer → Effect::Future(gateway call)
//!                  ↓                 ↓
//!            state update     result/error event → reducer → state update
//! ```
//!
//! Each command performs exactly one HTTP round trip and resolves to one
//! typed result or error event. There is no retry, de-duplication, or
//! in-flight cancellation; issuing a command twice produces two round
//! trips and two dispatch sequences.
//!
//! ## Example
//!
//! ```ignore
//! use devconnect_client::prelude::*;
//! use devconnect_runtime::Store;
//!
//! let tokens = FileTokenCache::new("~/.devconnect-token".into());
//! let gateway = HttpGateway::new("http://localhost:5000", tokens.clone());
//! let store = Store::new(
//!     ClientState::restored(tokens.load().await),
//!     ClientReducer::new(),
//!     ClientEnvironment::new(gateway, tokens),
//! );
//!
//! store.send(ClientAction::Login { email, password }).await?;
//! ```

pub mod actions;
pub mod environment;
pub mod gateway;
pub mod http;
pub mod mocks;
pub mod reducers;
pub mod state;
pub mod token_cache;

// Re-export main types for convenience
pub use actions::ClientAction;
pub use environment::ClientEnvironment;
pub use gateway::{ApiFailure, ApiGateway};
pub use reducers::ClientReducer;
pub use state::ClientState;
pub use token_cache::{FileTokenCache, MemoryTokenCache, TokenCache};

/// Convenience imports for wiring a client store.
pub mod prelude {
    pub use crate::actions::{ClientAction, EducationForm, ExperienceForm, ProfileForm};
    pub use crate::environment::ClientEnvironment;
    pub use crate::gateway::{ApiFailure, ApiGateway};
    pub use crate::http::HttpGateway;
    pub use crate::reducers::ClientReducer;
    pub use crate::state::{AlertSeverity, ClientState};
    pub use crate::token_cache::{FileTokenCache, MemoryTokenCache, TokenCache};
}
