//! Post and comment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::User;
use crate::ids::{CommentId, PostId, UserId};

/// How repeated likes from one user are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LikePolicy {
    /// Every like call counts, even from a user who already liked the post.
    #[default]
    Tally,
    /// A user's like counts once; repeated likes are ignored.
    Idempotent,
}

impl LikePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikePolicy::Tally => "tally",
            LikePolicy::Idempotent => "idempotent",
        }
    }
}

/// Author fields denormalised onto posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostAuthor {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "userName")]
    pub name: String,
    #[serde(rename = "userAvatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl PostAuthor {
    pub fn new(user_id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            avatar: None,
        }
    }
}

impl From<&User> for PostAuthor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// A comment on a post. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    #[serde(flatten)]
    pub author: PostAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A comment before the store stamps its id and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub author: PostAuthor,
    pub content: String,
}

impl NewComment {
    pub fn new(author: PostAuthor, content: impl Into<String>) -> Self {
        Self {
            author,
            content: content.into(),
        }
    }

    pub(crate) fn stamp(self) -> Comment {
        Comment {
            id: CommentId::generate(),
            author: self.author,
            content: self.content,
            created_at: Utc::now(),
        }
    }
}

/// A post in the social feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(flatten)]
    pub author: PostAuthor,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Like counter.
    #[serde(default)]
    pub likes: u32,
    /// Users who liked, in like order.
    #[serde(default)]
    pub liked_by: Vec<UserId>,
    /// Comments, oldest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a post with no likes or comments.
    pub fn new(author: PostAuthor, content: impl Into<String>, images: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::generate(),
            author,
            content: content.into(),
            images,
            likes: 0,
            liked_by: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.liked_by.contains(user_id)
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Record a like from `user_id`.
    pub fn like(&mut self, user_id: &UserId, policy: LikePolicy) -> bool {
        if policy == LikePolicy::Idempotent && self.is_liked_by(user_id) {
            return false;
        }
        self.likes = self.likes.saturating_add(1);
        self.liked_by.push(user_id.clone());
        true
    }

    /// Withdraw one like from `user_id`.
    ///
    /// Removes a single entry from `liked_by`, so a user who liked twice
    /// under [`LikePolicy::Tally`] still has one like left. Users who never
    /// liked the post change nothing under either policy, keeping `likes`
    /// equal to the length of `liked_by`.
    pub fn unlike(&mut self, user_id: &UserId, _policy: LikePolicy) -> bool {
        let Some(index) = self.liked_by.iter().position(|id| id == user_id) else {
            return false;
        };
        self.liked_by.remove(index);
        self.likes = self.likes.saturating_sub(1);
        true
    }

    /// Whether the like counter matches the likers list.
    pub fn like_count_consistent(&self) -> bool {
        self.likes as usize == self.liked_by.len()
    }
}
