use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use super::{parse_id, visible_post_with, MessageResponse};
use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUserId, UserId};
use crate::models::NewPost;
use crate::pagination::{Page, PageQuery, PageResponse};

pub const MAX_MEDIA_PER_POST: usize = 9;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[serde(default)]
    pub media: Vec<String>,
}

/// Caller's own posts, newest first
/// GET /api/v1/post?pageNum=&pageSize=&keyword=
pub async fn list_posts(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = Page::from(&query.into_inner());
    let (posts, total) = state.posts.list_by_user(user_id.0, &page).await?;
    Ok(HttpResponse::Ok().json(PageResponse::new(&page, total, posts)))
}

/// Single post, subject to the author's privacy setting. The caller's token is
/// only checked when the author is private.
/// GET /api/v1/post/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    actor: OptionalUserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path, "invalid post id")?;
    let post = visible_post_with(&state, move || actor.resolve(), post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/v1/post
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if req.media.is_empty() || req.media.len() > MAX_MEDIA_PER_POST {
        return Err(AppError::BadRequest(
            "please upload at least one and no more than 9 media".to_string(),
        ));
    }

    let post = state
        .posts
        .create(NewPost {
            user_id: user_id.0,
            title: req.title,
            content: req.content,
            media: req.media,
        })
        .await?;

    tracing::info!(post_id = post.id, user_id = user_id.0, media = post.media.len(), "post created");
    Ok(HttpResponse::Created().json(post))
}

/// DELETE /api/v1/post/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path, "invalid post id")?;

    let post = state
        .posts
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    if post.user_id != user_id.0 {
        return Err(AppError::Authorization(
            "no permission to delete this post".to_string(),
        ));
    }

    state.posts.delete(post_id).await?;
    tracing::info!(post_id, user_id = user_id.0, "post deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("post deleted successfully")))
}
