//! In-memory store backing every store trait.
//!
//! Mirrors the PostgreSQL schema rules that handlers rely on: unique emails,
//! unique follow/like pairs, foreign keys, and cascading deletes. Used by the
//! HTTP tests and for running the service without a database.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{CommentStore, FollowFilter, FollowStore, LikeStore, PostStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{
    Comment, CommentLike, Follow, NewPost, NewUser, Post, PostLike, User, UserUpdate,
};
use crate::pagination::Page;

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    users: BTreeMap<i64, User>,
    follows: BTreeMap<i64, Follow>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    post_likes: BTreeMap<i64, PostLike>,
    comment_likes: BTreeMap<i64, CommentLike>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self, id: i64) -> Result<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::NotFound("user not found".to_string()))
        }
    }

    fn remove_comment(&mut self, id: i64) -> bool {
        let removed = self.comments.remove(&id).is_some();
        if removed {
            self.comment_likes.retain(|_, like| like.comment_id != id);
        }
        removed
    }

    fn remove_post(&mut self, id: i64) -> bool {
        let removed = self.posts.remove(&id).is_some();
        if removed {
            let comment_ids: Vec<i64> = self
                .comments
                .values()
                .filter(|c| c.post_id == id)
                .map(|c| c.id)
                .collect();
            for comment_id in comment_ids {
                self.remove_comment(comment_id);
            }
            self.post_likes.retain(|_, like| like.post_id != id);
        }
        removed
    }

    fn remove_user(&mut self, id: i64) -> bool {
        let removed = self.users.remove(&id).is_some();
        if removed {
            self.follows
                .retain(|_, f| f.follower_id != id && f.user_id != id);
            let post_ids: Vec<i64> = self
                .posts
                .values()
                .filter(|p| p.user_id == id)
                .map(|p| p.id)
                .collect();
            for post_id in post_ids {
                self.remove_post(post_id);
            }
            let comment_ids: Vec<i64> = self
                .comments
                .values()
                .filter(|c| c.user_id == id)
                .map(|c| c.id)
                .collect();
            for comment_id in comment_ids {
                self.remove_comment(comment_id);
            }
            self.post_likes.retain(|_, like| like.user_id != id);
            self.comment_likes.retain(|_, like| like.user_id != id);
        }
        removed
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: &Page) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let data = items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(0))
        .collect();
    (data, total)
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut state = self.lock()?;
        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("email already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: state.next_id(),
            created_at: now,
            updated_at: now,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            bio: String::new(),
            profile_image_url: String::new(),
            is_private: false,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, page: &Page) -> Result<(Vec<User>, i64)> {
        let state = self.lock()?;
        let users = state
            .users
            .values()
            .filter(|u| page.matches_keyword(&[u.username.as_str(), u.bio.as_str()]))
            .cloned()
            .collect();
        Ok(paginate(users, page))
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        let mut state = self.lock()?;
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(bio) = update.bio {
            user.bio = bio;
        }
        if let Some(url) = update.profile_image_url {
            user.profile_image_url = url;
        }
        if let Some(is_private) = update.is_private {
            user.is_private = is_private;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.remove_user(id))
    }
}

#[async_trait]
impl FollowStore for MemoryStore {
    async fn follow(&self, follower_id: i64, user_id: i64) -> Result<Follow> {
        let mut state = self.lock()?;
        state.require_user(follower_id)?;
        state.require_user(user_id)?;
        if follower_id == user_id {
            return Err(AppError::BadRequest("can not follow yourself".to_string()));
        }
        if state
            .follows
            .values()
            .any(|f| f.follower_id == follower_id && f.user_id == user_id)
        {
            return Err(AppError::Conflict("already following".to_string()));
        }

        let follow = Follow {
            id: state.next_id(),
            created_at: Utc::now(),
            follower_id,
            user_id,
        };
        state.follows.insert(follow.id, follow.clone());
        Ok(follow)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Follow>> {
        Ok(self.lock()?.follows.get(&id).cloned())
    }

    async fn unfollow(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.follows.remove(&id).is_some())
    }

    async fn is_following(&self, follower_id: i64, followee_id: i64) -> Result<bool> {
        Ok(self
            .lock()?
            .follows
            .values()
            .any(|f| f.follower_id == follower_id && f.user_id == followee_id))
    }

    async fn list(&self, filter: FollowFilter, page: &Page) -> Result<(Vec<Follow>, i64)> {
        let state = self.lock()?;
        let follows = state
            .follows
            .values()
            .filter(|f| filter.follower_id.map_or(true, |id| f.follower_id == id))
            .filter(|f| filter.user_id.map_or(true, |id| f.user_id == id))
            .cloned()
            .collect();
        Ok(paginate(follows, page))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, new_post: NewPost) -> Result<Post> {
        let mut state = self.lock()?;
        state.require_user(new_post.user_id)?;

        let post = Post {
            id: state.next_id(),
            created_at: Utc::now(),
            title: new_post.title,
            content: new_post.content,
            user_id: new_post.user_id,
            media: new_post.media,
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        Ok(self.lock()?.posts.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: i64, page: &Page) -> Result<(Vec<Post>, i64)> {
        let state = self.lock()?;
        // Ids grow monotonically, so reverse id order is newest first.
        let posts = state
            .posts
            .values()
            .rev()
            .filter(|p| p.user_id == user_id)
            .filter(|p| page.matches_keyword(&[p.title.as_str(), p.content.as_str()]))
            .cloned()
            .collect();
        Ok(paginate(posts, page))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.remove_post(id))
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create(&self, post_id: i64, user_id: i64, content: &str) -> Result<Comment> {
        let mut state = self.lock()?;
        if !state.posts.contains_key(&post_id) {
            return Err(AppError::NotFound("post not found".to_string()));
        }
        state.require_user(user_id)?;

        let comment = Comment {
            id: state.next_id(),
            created_at: Utc::now(),
            post_id,
            user_id,
            content: content.to_string(),
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        Ok(self.lock()?.comments.get(&id).cloned())
    }

    async fn list_by_post(&self, post_id: i64, page: &Page) -> Result<(Vec<Comment>, i64)> {
        let state = self.lock()?;
        let comments = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        Ok(paginate(comments, page))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.remove_comment(id))
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn like_post(&self, post_id: i64, user_id: i64) -> Result<PostLike> {
        let mut state = self.lock()?;
        if !state.posts.contains_key(&post_id) {
            return Err(AppError::NotFound("post not found".to_string()));
        }
        state.require_user(user_id)?;
        if state
            .post_likes
            .values()
            .any(|l| l.post_id == post_id && l.user_id == user_id)
        {
            return Err(AppError::Conflict("already liked".to_string()));
        }

        let like = PostLike {
            id: state.next_id(),
            created_at: Utc::now(),
            post_id,
            user_id,
        };
        state.post_likes.insert(like.id, like.clone());
        Ok(like)
    }

    async fn get_post_like(&self, id: i64) -> Result<Option<PostLike>> {
        Ok(self.lock()?.post_likes.get(&id).cloned())
    }

    async fn list_post_likes(&self, post_id: i64) -> Result<Vec<PostLike>> {
        Ok(self
            .lock()?
            .post_likes
            .values()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn unlike_post(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.post_likes.remove(&id).is_some())
    }

    async fn like_comment(&self, comment_id: i64, user_id: i64) -> Result<CommentLike> {
        let mut state = self.lock()?;
        if !state.comments.contains_key(&comment_id) {
            return Err(AppError::NotFound("comment not found".to_string()));
        }
        state.require_user(user_id)?;
        if state
            .comment_likes
            .values()
            .any(|l| l.comment_id == comment_id && l.user_id == user_id)
        {
            return Err(AppError::Conflict("already liked".to_string()));
        }

        let like = CommentLike {
            id: state.next_id(),
            created_at: Utc::now(),
            comment_id,
            user_id,
        };
        state.comment_likes.insert(like.id, like.clone());
        Ok(like)
    }

    async fn get_comment_like(&self, id: i64) -> Result<Option<CommentLike>> {
        Ok(self.lock()?.comment_likes.get(&id).cloned())
    }

    async fn unlike_comment(&self, id: i64) -> Result<bool> {
        Ok(self.lock()?.comment_likes.remove(&id).is_some())
    }
}
