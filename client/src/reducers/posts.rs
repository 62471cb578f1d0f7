//! Posts slice reducer.
//!
//! Feed and single-post state. Like and comment events carry the server's
//! authoritative lists and are applied to both the feed entry and the open
//! post, whichever match.

use std::marker::PhantomData;

use devconnect_core::effect::Effect;
use devconnect_core::reducer::Reducer;
use devconnect_core::{smallvec, SmallVec};

use crate::actions::ClientAction;
use crate::environment::ClientEnvironment;
use crate::gateway::{ApiFailure, ApiGateway};
use crate::reducers::emit;
use crate::state::{AlertSeverity, PostsSlice, SliceError};
use crate::token_cache::TokenCache;

fn failed(failure: ApiFailure) -> ClientAction {
    ClientAction::PostFailed {
        message: failure.message,
        status: failure.status,
    }
}

/// Posts slice reducer.
#[derive(Clone, Debug)]
pub struct PostsReducer<A, T> {
    _phantom: PhantomData<(A, T)>,
}

impl<A, T> PostsReducer<A, T> {
    /// Create a new posts reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A, T> Default for PostsReducer<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T> Reducer for PostsReducer<A, T>
where
    A: ApiGateway + Clone + 'static,
    T: TokenCache + Clone + 'static,
{
    type State = PostsSlice;
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
            ClientAction::FetchPosts => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.posts().await {
                        Ok(posts) => ClientAction::PostsLoaded { posts },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::FetchPost { id } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.post(id).await {
                        Ok(post) => ClientAction::PostLoaded { post },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::CreatePost { text } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.create_post(text).await {
                        Ok(post) => ClientAction::PostCreated { post },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::DeletePost { id } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.delete_post(id.clone()).await {
                        Ok(()) => ClientAction::PostDeleted { id },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::LikePost { id } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.like_post(id.clone()).await {
                        Ok(likes) => ClientAction::LikesUpdated { post_id: id, likes },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::UnlikePost { id } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.unlike_post(id.clone()).await {
                        Ok(likes) => ClientAction::LikesUpdated { post_id: id, likes },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::AddComment { post_id, text } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.add_comment(post_id.clone(), text).await {
                        Ok(comments) => ClientAction::CommentsUpdated {
                            post_id,
                            comments,
                            notice: "Comment added".to_string(),
                        },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            ClientAction::DeleteComment {
                post_id,
                comment_id,
            } => {
                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    Some(match api.delete_comment(post_id.clone(), comment_id).await {
                        Ok(comments) => ClientAction::CommentsUpdated {
                            post_id,
                            comments,
                            notice: "Comment removed".to_string(),
                        },
                        Err(failure) => failed(failure),
                    })
                }))]
            }

            // ═══════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════
            ClientAction::PostsLoaded { posts } => {
                state.posts = posts;
                state.loading = false;
                SmallVec::new()
            }

            ClientAction::PostLoaded { post } => {
                state.post = Some(post);
                state.loading = false;
                SmallVec::new()
            }

            ClientAction::PostCreated { post } => {
                state.posts.insert(0, post);
                state.loading = false;
                smallvec![emit(ClientAction::ShowAlert {
                    message: "Post created".to_string(),
                    severity: AlertSeverity::Success,
                })]
            }

            ClientAction::PostDeleted { id } => {
                state.posts.retain(|post| post.id != id);
                smallvec![emit(ClientAction::ShowAlert {
                    message: "Post removed".to_string(),
                    severity: AlertSeverity::Danger,
                })]
            }

            ClientAction::LikesUpdated { post_id, likes } => {
                if let Some(post) = state.posts.iter_mut().find(|p| p.id == post_id) {
                    post.likes = likes.clone();
                }
                if let Some(post) = state.post.as_mut().filter(|p| p.id == post_id) {
                    post.likes = likes;
                }
                SmallVec::new()
            }

            ClientAction::CommentsUpdated {
                post_id,
                comments,
                notice,
            } => {
                if let Some(post) = state.posts.iter_mut().find(|p| p.id == post_id) {
                    post.comments = comments.clone();
                }
                if let Some(post) = state.post.as_mut().filter(|p| p.id == post_id) {
                    post.comments = comments;
                }
                smallvec![emit(ClientAction::ShowAlert {
                    message: notice,
                    severity: AlertSeverity::Success,
                })]
            }

            ClientAction::PostFailed { message, status } => {
                state.error = Some(SliceError { message, status });
                state.loading = false;
                SmallVec::new()
            }

            _ => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockGateway;
    use crate::state::{LikeData, PostData};
    use crate::token_cache::MemoryTokenCache;
    use devconnect_testing::{assertions, ReducerTest};

    type TestReducer = PostsReducer<MockGateway, MemoryTokenCache>;

    fn test_env() -> ClientEnvironment<MockGateway, MemoryTokenCache> {
        ClientEnvironment::new(MockGateway::new(), MemoryTokenCache::new())
    }

    fn post(id: &str) -> PostData {
        PostData {
            id: id.to_string(),
            user: "u1".to_string(),
            text: "hello".to_string(),
            name: "A".to_string(),
            avatar: "ava".to_string(),
            likes: vec![],
            comments: vec![],
            date: "2026-08-07T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn posts_loaded_replaces_feed() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(PostsSlice::default())
            .when_action(ClientAction::PostsLoaded {
                posts: vec![post("p1"), post("p2")],
            })
            .then_state(|state| {
                assert_eq!(state.posts.len(), 2);
                assert!(!state.loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn created_post_is_prepended_with_alert() {
        let existing = PostsSlice {
            posts: vec![post("old")],
            ..PostsSlice::default()
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(existing)
            .when_action(ClientAction::PostCreated { post: post("new") })
            .then_state(|state| {
                assert_eq!(state.posts[0].id, "new");
                assert_eq!(state.posts.len(), 2);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn likes_update_targets_matching_post_everywhere() {
        let mut open = post("p1");
        open.likes = vec![];
        let slice = PostsSlice {
            posts: vec![post("p1"), post("p2")],
            post: Some(open),
            loading: false,
            error: None,
        };
        let likes = vec![LikeData {
            user: "u2".to_string(),
        }];

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(slice)
            .when_action(ClientAction::LikesUpdated {
                post_id: "p1".to_string(),
                likes,
            })
            .then_state(|state| {
                assert_eq!(state.posts[0].likes.len(), 1);
                assert_eq!(state.posts[1].likes.len(), 0);
                assert_eq!(state.post.as_ref().map(|p| p.likes.len()), Some(1));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn deleted_post_leaves_the_feed() {
        let slice = PostsSlice {
            posts: vec![post("p1"), post("p2")],
            ..PostsSlice::default()
        };

        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(slice)
            .when_action(ClientAction::PostDeleted {
                id: "p1".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.posts.len(), 1);
                assert_eq!(state.posts[0].id, "p2");
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn failure_records_message_and_status() {
        ReducerTest::new(TestReducer::new())
            .with_env(test_env())
            .given_state(PostsSlice::default())
            .when_action(ClientAction::PostFailed {
                message: "Not Found".to_string(),
                status: 404,
            })
            .then_state(|state| {
                assert_eq!(
                    state.error,
                    Some(SliceError {
                        message: "Not Found".to_string(),
                        status: 404,
                    })
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
