//! Profile slice reducer.
//!
//! Fetches, the create-or-update upsert, sub-entity management, the GitHub
//! repo listing, and account deletion. `FetchProfiles` clears the slice
//! before requesting so stale data never shows during navigation.

use std::marker::PhantomData;

use devconnect_core::effect::Effect;
use devconnect_core::reducer::Reducer;
use devconnect_core::{smallvec, SmallVec};

use crate::actions::ClientAction;
use crate::environment::ClientEnvironment;
use crate::gateway::{ApiFailure, ApiGateway};
use crate::reducers::emit;
use crate::state::{AlertSeverity, ProfileSlice, SliceError};
use crate::token_cache::TokenCache;

fn failed(failure: ApiFailure) -> ClientAction {
    ClientAction::ProfileFailed {
        message: failure.message,
        status: failure.status,
        errors: failure.errors,
    }
}

/// Profile slice reducer.
#[derive(Clone, Debug)]
pub struct ProfileReducer<A, T> {
    _phantom: PhantomData<(A, T)>,
}

impl<A, T> ProfileReducer<A, T> {
    /// Create a new profile reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A, T> Default for ProfileReducer<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T> Reducer for ProfileReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    type State = ProfileSlice;
    type Action = ClientAction;
    type Environment = ClientEnvironment<A, T>;

    #[allow(clippy::too_many_lines)]
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
            ClientAction::FetchCurrentProfile => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.my_profile().await {
                        Ok(profile) => ClientAction::ProfileLoaded { profile },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::FetchProfiles => {
                // Stale-data guard: reset before fetching
                state.clear();
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.profiles().await {
                        Ok(profiles) => ClientAction::ProfilesLoaded { profiles },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::FetchProfileByUser { user_id } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.profile_by_user(user_id).await {
                        Ok(profile) => ClientAction::ProfileLoaded { profile },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::FetchGithubRepos { username } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.github_repos(username).await {
                        Ok(repos) => ClientAction::ReposLoaded { repos },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::SaveProfile { form, editing } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.save_profile(form).await {
                        Ok(profile) => ClientAction::ProfileSaved { profile, editing },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::AddExperience { form } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.add_experience(form).await {
                        Ok(profile) => ClientAction::ProfileUpdated {
                            profile,
                            notice: "Experience added".to_string(),
                        },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::AddEducation { form } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.add_education(form).await {
                        Ok(profile) => ClientAction::ProfileUpdated {
                            profile,
                            notice: "Education added".to_string(),
                        },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::DeleteExperience { id } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.delete_experience(id).await {
                        Ok(profile) => ClientAction::ProfileUpdated {
                            profile,
                            notice: "Experience removed".to_string(),
                        },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::DeleteEducation { id } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.delete_education(id).await {
                        Ok(profile) => ClientAction::ProfileUpdated {
                            profile,
                            notice: "Education removed".to_string(),
                        },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::DeleteAccount => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.delete_account().await {
                        Ok(()) => ClientAction::AccountDeleted,
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            ClientAction::ProfileLoaded { profile } => {
                state.profile = Some(profile);
                state.loading = false;
                SmallVec::new()
            }

            ClientAction::ProfilesLoaded { profiles } => {
                state.profiles = profiles;
                state.loading = false;
                SmallVec::new()
            }

            ClientAction::ProfileSaved { profile, editing } => {
                state.profile = Some(profile);
                state.loading = false;
                let message = if editing {
                    "Profile updated"
                } else {
                    "Profile created"
                };
                smallvec![emit(ClientAction::ShowAlert {
                    message: message.to_string(),
                    severity: AlertSeverity::Success,
                })]
            }

            ClientAction::ProfileUpdated { profile, notice } => {
                state.profile = Some(profile);
                state.loading = false;
                smallvec![emit(ClientAction::ShowAlert {
                    message: notice,
                    severity: AlertSeverity::Success,
                })]
            }

            ClientAction::ReposLoaded { repos } => {
                state.repos = repos;
                state.loading = false;
                SmallVec::new()
            }

            ClientAction::ProfileCleared | ClientAction::Logout => {
                state.clear();
                SmallVec::new()
            }

            ClientAction::AccountDeleted => {
                state.clear();
                smallvec![emit(ClientAction::ShowAlert {
                    message: "Your account has been permanently deleted".to_string(),
                    severity: AlertSeverity::Info,
                })]
            }

            ClientAction::ProfileFailed {
                message,
                status,
                errors,
            } => {
                state.profile = None;
                state.loading = false;
                state.error = Some(SliceError { message, status });

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

            _ => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockGateway;
    use crate::state::{OwnerRef, ProfileData};
    use crate::token_cache::MemoryTokenCache;
    use devconnect_testing::{assertions, ReducerTest};

    type TestReducer = ProfileReducer<MockGateway, MemoryTokenCache>;

    fn test_env() -> ClientEnvironment<MockGateway, MemoryTokenCache> {
        ClientEnvironment::new(MockGateway::new(), MemoryTokenCache::new())
    }

    fn profile() -> ProfileData {
        ProfileData {
            user: OwnerRef::Id("u1".to_string()),
            status: "Dev".to_string(),
            skills: vec!["js".to_string(), "go".to_string()],
            company: None,
            website: None,
            location: None,
            bio: None,
            github_username: None,
            social: serde_json::Value::Null,
            experience: vec![],
            education: vec![],
        }
    }

    #[test]
    fn fetch_profiles_clears_before_requesting() {
        let dirty = ProfileSlice {
            profile: Some(profile()),
            profiles: vec![profile()],
            repos: vec![],
            loading: false,
            error: Some(SliceError {
                message: "old".to_string(),
                status: 500,
            }),
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(dirty)
            .when_action(ClientAction::FetchProfiles)
            .then_state(|state| {
                assert!(state.profile.is_none());
                assert!(state.loading);
                assert!(state.error.is_none());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn profile_loaded_fills_slice() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(ProfileSlice::default())
            .when_action(ClientAction::ProfileLoaded { profile: profile() })
            .then_state(|state| {
                assert!(!state.loading);
                assert_eq!(
                    state.profile.as_ref().map(|p| p.status.as_str()),
                    Some("Dev")
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn saved_profile_raises_created_or_updated_alert() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(ProfileSlice::default())
            .when_action(ClientAction::ProfileSaved {
                profile: profile(),
                editing: false,
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn failure_stores_error_and_fans_out_alerts() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(ProfileSlice::default())
            .when_action(ClientAction::ProfileFailed {
                message: "Bad Request".to_string(),
                status: 400,
                errors: vec!["Status is required".to_string(), "Skills is required".to_string()],
            })
            .then_state(|state| {
                assert_eq!(
                    state.error,
                    Some(SliceError {
                        message: "Bad Request".to_string(),
                        status: 400,
                    })
                );
                assert!(state.profile.is_none());
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 2))
            .run();
    }

    #[test]
    fn account_deleted_clears_and_notifies() {
        let populated = ProfileSlice {
            profile: Some(profile()),
            ..ProfileSlice::default()
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(populated)
            .when_action(ClientAction::AccountDeleted)
            .then_state(|state| assert!(state.profile.is_none()))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }
}
