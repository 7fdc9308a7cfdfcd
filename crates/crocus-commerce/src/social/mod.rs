//! Social feed module.

mod post;
mod store;

pub use post::{Comment, LikePolicy, NewComment, Post, PostAuthor};
pub use store::{PostsState, PostsStore};
