//! Alerts reducer.
//!
//! Alerts self-destruct: raising one schedules a cancellable delayed
//! `AlertExpired` under an id derived from the alert, and dismissing early
//! cancels that timer. The caller never has to clean up.

use std::marker::PhantomData;
use std::time::Duration;

use devconnect_core::effect::{Effect, EffectId};
use devconnect_core::reducer::Reducer;
use devconnect_core::{smallvec, SmallVec};
use uuid::Uuid;

use crate::actions::ClientAction;
use crate::environment::ClientEnvironment;
use crate::gateway::ApiGateway;
use crate::state::{Alert, AlertsSlice};
use crate::token_cache::TokenCache;

/// Default alert lifetime, matching the original client's 5-second window.
const DEFAULT_TTL: Duration = Duration::from_secs(5);

fn timer_id(alert: Uuid) -> EffectId {
    EffectId::new(format!("alert:{alert}"))
}

/// Alerts slice reducer.
#[derive(Clone, Debug)]
pub struct AlertReducer<A, T> {
    ttl: Duration,
    _phantom: PhantomData<(A, T)>,
}

impl<A, T> AlertReducer<A, T> {
    /// Create a reducer with the default 5-second lifetime.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            _phantom: PhantomData,
        }
    }

    /// Create a reducer with a custom lifetime.
    #[must_use]
    pub const fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            _phantom: PhantomData,
        }
    }
}

impl<A, T> Default for AlertReducer<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T> Reducer for AlertReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    type State = AlertsSlice;
    type Action = ClientAction;
    type Environment = ClientEnvironment<A, T>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ClientAction::ShowAlert { message, severity } => {
                let id = Uuid::new_v4();
                state.alerts.push(Alert {
                    id,
                    message,
                    severity,
                });

                smallvec![Effect::cancellable(
                    timer_id(id),
                    Effect::Delay {
                        duration: self.ttl,
                        action: Box::new(ClientAction::AlertExpired { id }),
                    },
                )]
            }

            ClientAction::AlertExpired { id } => {
                state.alerts.retain(|alert| alert.id != id);
                SmallVec::new()
            }

            ClientAction::DismissAlert { id } => {
                state.alerts.retain(|alert| alert.id != id);
                smallvec![Effect::Cancel(timer_id(id))]
            }

            _ => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockGateway;
    use crate::state::AlertSeverity;
    use crate::token_cache::MemoryTokenCache;
    use devconnect_testing::{assertions, ReducerTest};

    type TestReducer = AlertReducer<MockGateway, MemoryTokenCache>;

    fn test_env() -> ClientEnvironment<MockGateway, MemoryTokenCache> {
        ClientEnvironment::new(MockGateway::new(), MemoryTokenCache::new())
    }

    #[test]
    fn show_alert_schedules_cancellable_expiry() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(AlertsSlice::default())
            .when_action(ClientAction::ShowAlert {
                message: "Welcome".to_string(),
                severity: AlertSeverity::Success,
            })
            .then_state(|state| {
                assert_eq!(state.alerts.len(), 1);
                assert_eq!(state.alerts[0].message, "Welcome");
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assert!(matches!(effects[0], Effect::Cancellable { .. }));
            })
            .run();
    }

    #[test]
    fn expiry_removes_only_that_alert() {
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();
        let state = AlertsSlice {
            alerts: vec![
                Alert {
                    id: keep,
                    message: "stays".to_string(),
                    severity: AlertSeverity::Info,
                },
                Alert {
                    id: drop,
                    message: "goes".to_string(),
                    severity: AlertSeverity::Danger,
                },
            ],
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ClientAction::AlertExpired { id: drop })
            .then_state(move |state| {
                assert_eq!(state.alerts.len(), 1);
                assert_eq!(state.alerts[0].id, keep);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn dismiss_cancels_the_timer() {
        let id = Uuid::new_v4();
        let state = AlertsSlice {
            alerts: vec![Alert {
                id,
                message: "bye".to_string(),
                severity: AlertSeverity::Info,
            }],
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ClientAction::DismissAlert { id })
            .then_state(|state| assert!(state.alerts.is_empty()))
            .then_effects(move |effects| {
                assertions::assert_has_cancel_effect(effects, &timer_id(id));
            })
            .run();
    }

    #[test]
    fn unrelated_actions_are_identity() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(AlertsSlice::default())
            .when_action(ClientAction::FetchPosts)
            .then_state(|state| assert!(state.alerts.is_empty()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
