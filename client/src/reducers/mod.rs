//! Client reducers.
//!
//! One pure reducer per slice, combined by [`ClientReducer`], which routes
//! each action to its owning slice. A handful of actions touch two slices
//! (logout and account deletion clear both auth and profile); the router
//! sends those through both reducers and concatenates the effects.

pub mod alerts;
pub mod posts;
pub mod profile;
pub mod session;

use devconnect_core::effect::Effect;
use devconnect_core::reducer::Reducer;
use devconnect_core::SmallVec;

use crate::actions::ClientAction;
use crate::environment::ClientEnvironment;
use crate::gateway::ApiGateway;
use crate::state::ClientState;
use crate::token_cache::TokenCache;

pub use alerts::AlertReducer;
pub use posts::PostsReducer;
pub use profile::ProfileReducer;
pub use session::SessionReducer;

/// Effect that immediately feeds another action back into the store.
///
/// This is how one slice chains work owned by another slice (success
/// alerts, the load-identity follow-up) without reaching into its state.
pub(crate) fn emit(action: ClientAction) -> Effect<ClientAction> {
    Effect::Future(Box::pin(async move { Some(action) }))
}

/// Unified client reducer.
///
/// Routes actions to the owning slice reducer.
#[derive(Clone, Debug)]
pub struct ClientReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    session: SessionReducer<A, T>,
    profile: ProfileReducer<A, T>,
    posts: PostsReducer<A, T>,
    alerts: AlertReducer<A, T>,
}

impl<A, T> ClientReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    /// Create a reducer with default slice configurations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: SessionReducer::new(),
            profile: ProfileReducer::new(),
            posts: PostsReducer::new(),
            alerts: AlertReducer::new(),
        }
    }

    /// Override the alert time-to-live (test hook).
    #[must_use]
    pub fn with_alert_ttl(mut self, ttl: std::time::Duration) -> Self {
        self.alerts = AlertReducer::with_ttl(ttl);
        self
    }
}

impl<A, T> Default for ClientReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T> Reducer for ClientReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    type State = ClientState;
    type Action = ClientAction;
    type Environment = ClientEnvironment<A, T>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // Terminal session transitions also clear the profile slice so
            // the next account never sees stale data
            ClientAction::Logout | ClientAction::AccountDeleted => {
                let mut effects = self.session.reduce(&mut state.auth, action.clone(), env);
                effects.extend(self.profile.reduce(&mut state.profile, action, env));
                effects
            }

            // Session slice
            ClientAction::LoadCurrentUser
            | ClientAction::Register { .. }
            | ClientAction::Login { .. }
            | ClientAction::UserLoaded { .. }
            | ClientAction::AuthFailed
            | ClientAction::RegisterSucceeded { .. }
            | ClientAction::RegisterFailed { .. }
            | ClientAction::LoginSucceeded { .. }
            | ClientAction::LoginFailed { .. } => {
                self.session.reduce(&mut state.auth, action, env)
            }

            // Profile slice
            ClientAction::FetchCurrentProfile
            | ClientAction::FetchProfiles
            | ClientAction::FetchProfileByUser { .. }
            | ClientAction::FetchGithubRepos { .. }
            | ClientAction::SaveProfile { .. }
            | ClientAction::AddExperience { .. }
            | ClientAction::AddEducation { .. }
            | ClientAction::DeleteExperience { .. }
            | ClientAction::DeleteEducation { .. }
            | ClientAction::DeleteAccount
            | ClientAction::ProfileLoaded { .. }
            | ClientAction::ProfilesLoaded { .. }
            | ClientAction::ProfileSaved { .. }
            | ClientAction::ProfileUpdated { .. }
            | ClientAction::ReposLoaded { .. }
            | ClientAction::ProfileCleared
            | ClientAction::ProfileFailed { .. } => {
                self.profile.reduce(&mut state.profile, action, env)
            }

            // Posts slice
            ClientAction::FetchPosts
            | ClientAction::FetchPost { .. }
            | ClientAction::CreatePost { .. }
            | ClientAction::DeletePost { .. }
            | ClientAction::LikePost { .. }
            | ClientAction::UnlikePost { .. }
            | ClientAction::AddComment { .. }
            | ClientAction::DeleteComment { .. }
            | ClientAction::PostsLoaded { .. }
            | ClientAction::PostLoaded { .. }
            | ClientAction::PostCreated { .. }
            | ClientAction::PostDeleted { .. }
            | ClientAction::LikesUpdated { .. }
            | ClientAction::CommentsUpdated { .. }
            | ClientAction::PostFailed { .. } => self.posts.reduce(&mut state.posts, action, env),

            // Alerts slice
            ClientAction::ShowAlert { .. }
            | ClientAction::DismissAlert { .. }
            | ClientAction::AlertExpired { .. } => {
                self.alerts.reduce(&mut state.alerts, action, env)
            }
        }
    }
}
