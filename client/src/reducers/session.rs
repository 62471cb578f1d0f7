//! Session (auth slice) reducer.
//!
//! Commands become one HTTP round trip each through the gateway; success
//! persists the token as an effect and chains the identity load plus a
//! welcome alert, failure clears the persisted token. Registration and
//! login are the same two-outcome machine with different alert text.

use std::marker::PhantomData;

use devconnect_core::effect::Effect;
use devconnect_core::reducer::Reducer;
use devconnect_core::{smallvec, SmallVec};

use crate::actions::ClientAction;
use crate::environment::ClientEnvironment;
use crate::gateway::ApiGateway;
use crate::reducers::emit;
use crate::state::{AlertSeverity, AuthSlice};
use crate::token_cache::TokenCache;

/// Auth slice reducer.
#[derive(Clone, Debug)]
pub struct SessionReducer<A, T> {
    _phantom: PhantomData<(A, T)>,
}

impl<A, T> SessionReducer<A, T> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A, T> Default for SessionReducer<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T> SessionReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    /// Reset the slice to logged-out and clear the persisted token.
    fn sign_out(
        state: &mut AuthSlice,
        env: &ClientEnvironment<A, T>,
    ) -> SmallVec<[Effect<ClientAction>; 4]> {
        state.token = None;
        state.is_authenticated = Some(false);
        state.loading = false;
        state.user = None;

        let tokens = env.tokens.clone();
        smallvec![Effect::Future(Box::pin(async move {
            tokens.clear().await;
            None
        }))]
    }

    /// Store a fresh token, persist it, then chain the identity load and a
    /// success alert.
    fn sign_in(
        state: &mut AuthSlice,
        env: &ClientEnvironment<A, T>,
        token: String,
        alert: &str,
    ) -> SmallVec<[Effect<ClientAction>; 4]> {
        state.token = Some(token.clone());
        state.is_authenticated = Some(true);
        state.loading = false;

        let tokens = env.tokens.clone();
        smallvec![
            Effect::Future(Box::pin(async move {
                tokens.save(token).await;
                None
            })),
            emit(ClientAction::LoadCurrentUser),
            emit(ClientAction::ShowAlert {
                message: alert.to_string(),
                severity: AlertSeverity::Success,
            }),
        ]
    }

    /// One danger alert per validation message.
    fn validation_alerts(errors: Vec<String>) -> SmallVec<[Effect<ClientAction>; 4]> {
        errors
            .into_iter()
            .map(|message| {
                emit(ClientAction::ShowAlert {
                    message,
                    severity: AlertSeverity::Danger,
                })
            })
            .collect()
    }
}

impl<A, T> Reducer for SessionReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    type State = AuthSlice;
    type Action = ClientAction;
    type Environment = ClientEnvironment<A, T>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Commands
            // ═══════════════════════════════════════════════════════════
            ClientAction::LoadCurrentUser => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.current_user().await {
                        Ok(user) => Some(ClientAction::UserLoaded { user }),
                        Err(failure) => {
                            tracing::debug!(%failure, "identity load failed");
                            Some(ClientAction::AuthFailed)
                        }
                    }
                }))]
            }

            ClientAction::Register {
                name,
                email,
                password,
            } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.register(name, email, password).await {
                        Ok(token) => Some(ClientAction::RegisterSucceeded { token }),
                        Err(failure) => Some(ClientAction::RegisterFailed {
                            errors: failure.errors,
                        }),
                    }
                }))]
            }

            ClientAction::Login { email, password } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.login(email, password).await {
                        Ok(token) => Some(ClientAction::LoginSucceeded { token }),
                        Err(failure) => Some(ClientAction::LoginFailed {
                            errors: failure.errors,
                        }),
                    }
                }))]
            }

            ClientAction::Logout | ClientAction::AccountDeleted => Self::sign_out(state, env),

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            ClientAction::UserLoaded { user } => {
                state.is_authenticated = Some(true);
                state.loading = false;
                state.user = Some(user);
                SmallVec::new()
            }

            ClientAction::RegisterSucceeded { token } => {
                Self::sign_in(state, env, token, "Welcome")
            }

            ClientAction::LoginSucceeded { token } => {
                Self::sign_in(state, env, token, "Successfully logged in")
            }

            ClientAction::AuthFailed => Self::sign_out(state, env),

            ClientAction::RegisterFailed { errors } | ClientAction::LoginFailed { errors } => {
                let mut effects = Self::sign_out(state, env);
                effects.extend(Self::validation_alerts(errors));
                effects
            }

            _ => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ApiFailure;
    use crate::mocks::MockGateway;
    use crate::state::CurrentUser;
    use crate::token_cache::MemoryTokenCache;
    use devconnect_testing::{assertions, ReducerTest};

    type TestReducer = SessionReducer<MockGateway, MemoryTokenCache>;

    fn test_env() -> ClientEnvironment<MockGateway, MemoryTokenCache> {
        ClientEnvironment::new(MockGateway::new(), MemoryTokenCache::new())
    }

    fn current_user() -> CurrentUser {
        CurrentUser {
            id: "u1".to_string(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            avatar: "ava".to_string(),
        }
    }

    #[test]
    fn register_command_produces_one_request_effect() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(AuthSlice::default())
            .when_action(ClientAction::Register {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .then_state(|state| {
                // Commands do not transition state; only events do
                assert_eq!(state.is_authenticated, None);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn login_success_authenticates_and_chains_followups() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(AuthSlice::default())
            .when_action(ClientAction::LoginSucceeded {
                token: "jwt".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.token.as_deref(), Some("jwt"));
                assert_eq!(state.is_authenticated, Some(true));
                assert!(!state.loading);
            })
            .then_effects(|effects| {
                // persist token + LoadCurrentUser + success alert
                assertions::assert_effects_count(effects, 3);
            })
            .run();
    }

    #[test]
    fn user_loaded_fills_the_slice() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(AuthSlice {
                token: Some("jwt".to_string()),
                ..AuthSlice::default()
            })
            .when_action(ClientAction::UserLoaded {
                user: current_user(),
            })
            .then_state(|state| {
                assert_eq!(state.is_authenticated, Some(true));
                assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some("A"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn auth_failure_clears_everything() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(AuthSlice {
                token: Some("jwt".to_string()),
                is_authenticated: Some(true),
                loading: false,
                user: Some(current_user()),
            })
            .when_action(ClientAction::AuthFailed)
            .then_state(|state| {
                assert_eq!(state.token, None);
                assert_eq!(state.is_authenticated, Some(false));
                assert_eq!(state.user, None);
            })
            .then_effects(|effects| {
                // the token-clear effect
                assertions::assert_effects_count(effects, 1);
            })
            .run();
    }

    #[test]
    fn register_failure_fans_out_one_alert_per_error() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(AuthSlice::default())
            .when_action(ClientAction::RegisterFailed {
                errors: vec!["Name is empty".to_string(), "Enter valid email".to_string()],
            })
            .then_state(|state| assert_eq!(state.is_authenticated, Some(false)))
            .then_effects(|effects| {
                // token clear + two alerts
                assertions::assert_effects_count(effects, 3);
            })
            .run();
    }

    #[test]
    fn failed_gateway_call_surfaces_error_event() {
        // ApiFailure carries the validation list into the failure event
        let failure = ApiFailure {
            status: 400,
            message: "Bad Request".to_string(),
            errors: vec!["User already exists".to_string()],
        };
        let env = ClientEnvironment::new(
            MockGateway::new().with_token(Err(failure)),
            MemoryTokenCache::new(),
        );

        ReducerTest::new(TestReducer::new())
            .with_env(env)
            .given_state(AuthSlice::default())
            .when_action(ClientAction::Register {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }
}
