//! Social feed store.

use crocus_cache::{Cache, Persisted};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::account::User;
use crate::error::CommerceError;
use crate::ids::{CommentId, PostId, UserId};
use crate::social::{LikePolicy, NewComment, Post, PostAuthor};
use crate::store::impl_persisted_store;

/// Persisted feed state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostsState {
    /// Posts, newest first.
    pub posts: Vec<Post>,
}

impl PostsState {
    fn find_mut(&mut self, post_id: &PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| &p.id == post_id)
    }
}

/// The social feed: posts, likes and comments.
///
/// Loading and error flags are view state and are never persisted.
#[derive(Debug)]
pub struct PostsStore {
    inner: Persisted<PostsState>,
    policy: LikePolicy,
    loading: bool,
    error: Option<String>,
}

impl PostsStore {
    /// Create an empty feed persisted under `key`.
    pub fn new(cache: Cache, key: impl Into<String>, policy: LikePolicy) -> Self {
        Self {
            inner: Persisted::new(cache, key),
            policy,
            loading: false,
            error: None,
        }
    }

    /// Prepend a new post and return its id.
    pub fn add_post(
        &mut self,
        author: PostAuthor,
        content: impl Into<String>,
        images: Vec<String>,
    ) -> PostId {
        let post = Post::new(author, content, images);
        let id = post.id.clone();
        info!(post_id = %id, user_id = %post.author.user_id, "post created");
        self.inner.mutate(|s| {
            s.posts.insert(0, post);
            true
        });
        id
    }

    /// Like a post according to the configured [`LikePolicy`].
    pub fn like_post(&mut self, post_id: &PostId, user_id: &UserId) -> bool {
        let policy = self.policy;
        self.inner.mutate(|s| match s.find_mut(post_id) {
            Some(post) => post.like(user_id, policy),
            None => false,
        })
    }

    /// Remove a user's like; the counter never goes below zero.
    pub fn unlike_post(&mut self, post_id: &PostId, user_id: &UserId) -> bool {
        let policy = self.policy;
        self.inner.mutate(|s| match s.find_mut(post_id) {
            Some(post) => post.unlike(user_id, policy),
            None => false,
        })
    }

    /// Append a comment, stamping its id and creation time.
    ///
    /// Returns `None` when the post does not exist.
    pub fn add_comment(&mut self, post_id: &PostId, comment: NewComment) -> Option<CommentId> {
        let mut added = None;
        self.inner.mutate(|s| match s.find_mut(post_id) {
            Some(post) => {
                let comment = comment.stamp();
                added = Some(comment.id.clone());
                post.comments.push(comment);
                true
            }
            None => false,
        });
        added
    }

    /// Posts written by `user_id`, newest first.
    pub fn user_posts(&self, user_id: &UserId) -> Vec<&Post> {
        self.posts()
            .iter()
            .filter(|p| &p.author.user_id == user_id)
            .collect()
    }

    /// Remove a post without any ownership check.
    pub fn delete_post(&mut self, post_id: &PostId) -> bool {
        let deleted = self.inner.mutate(|s| {
            let len_before = s.posts.len();
            s.posts.retain(|p| &p.id != post_id);
            s.posts.len() < len_before
        });
        if deleted {
            info!(post_id = %post_id, "post deleted");
        }
        deleted
    }

    /// Remove a post on behalf of `actor`, who must be its author or an admin.
    pub fn delete_post_as(&mut self, post_id: &PostId, actor: &User) -> Result<bool, CommerceError> {
        let Some(post) = self.post(post_id) else {
            return Ok(false);
        };

        if !actor.can_moderate(&post.author.user_id) {
            debug!(post_id = %post_id, actor = %actor.id, "delete refused");
            return Err(CommerceError::Forbidden(format!(
                "user {} may not delete post {}",
                actor.id, post_id
            )));
        }

        Ok(self.delete_post(post_id))
    }

    /// Replace the whole feed, e.g. after fetching it.
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.inner.replace(PostsState { posts });
    }

    pub fn is_liked(&self, post_id: &PostId, user_id: &UserId) -> bool {
        self.post(post_id)
            .map(|p| p.is_liked_by(user_id))
            .unwrap_or(false)
    }

    pub fn post(&self, post_id: &PostId) -> Option<&Post> {
        self.posts().iter().find(|p| &p.id == post_id)
    }

    /// All posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.inner.state().posts
    }

    pub fn like_policy(&self) -> LikePolicy {
        self.policy
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl_persisted_store!(PostsStore);
