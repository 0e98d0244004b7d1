use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::{parse_id, visible_post, MessageResponse};
use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::UserId;

// ============================================
// Response Structs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeSummary {
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeListResponse {
    pub likes: Vec<LikeSummary>,
    pub total: usize,
}

// ============================================
// Handler Functions
// ============================================

/// Likes on a post
/// GET /api/v1/post/{post_id}/like
pub async fn list_post_likes(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path, "invalid post id")?;
    visible_post(&state, Some(user_id.0), post_id).await?;

    let likes: Vec<LikeSummary> = state
        .likes
        .list_post_likes(post_id)
        .await?
        .into_iter()
        .map(|like| LikeSummary {
            id: like.id,
            user_id: like.user_id,
        })
        .collect();

    Ok(HttpResponse::Ok().json(LikeListResponse {
        total: likes.len(),
        likes,
    }))
}

/// Like a post
/// POST /api/v1/post/{post_id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path, "invalid post id")?;
    visible_post(&state, Some(user_id.0), post_id).await?;

    let like = state.likes.like_post(post_id, user_id.0).await?;
    tracing::info!(post_like_id = like.id, post_id, user_id = user_id.0, "post liked");
    Ok(HttpResponse::Created().json(like))
}

/// Like a comment
/// POST /api/v1/post/{post_id}/comment/{comment_id}/like
pub async fn like_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let post_id = parse_id(&raw_post_id, "invalid post id")?;
    let comment_id = parse_id(&raw_comment_id, "invalid comment id")?;

    visible_post(&state, Some(user_id.0), post_id).await?;

    let comment = state
        .comments
        .get_by_id(comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
    if comment.post_id != post_id {
        return Err(AppError::BadRequest(
            "comment does not belong to the post".to_string(),
        ));
    }

    let like = state.likes.like_comment(comment_id, user_id.0).await?;
    tracing::info!(comment_like_id = like.id, comment_id, user_id = user_id.0, "comment liked");
    Ok(HttpResponse::Created().json(like))
}

/// Remove a post like
/// DELETE /api/v1/post_like/{post_like_id}
pub async fn unlike_post(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let like_id = parse_id(&path, "invalid post like id")?;

    let like = state
        .likes
        .get_post_like(like_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post like not found".to_string()))?;
    if like.user_id != user_id.0 {
        return Err(AppError::Authorization("no permission to unlike".to_string()));
    }

    visible_post(&state, Some(user_id.0), like.post_id).await?;

    state.likes.unlike_post(like_id).await?;
    tracing::info!(post_like_id = like_id, user_id = user_id.0, "post unliked");
    Ok(HttpResponse::Ok().json(MessageResponse::new("unlike post success")))
}

/// Remove a comment like
/// DELETE /api/v1/comment_like/{comment_like_id}
pub async fn unlike_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let like_id = parse_id(&path, "invalid comment like id")?;

    let like = state
        .likes
        .get_comment_like(like_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment like not found".to_string()))?;
    if like.user_id != user_id.0 {
        return Err(AppError::Authorization("no permission to unlike".to_string()));
    }

    let comment = state
        .comments
        .get_by_id(like.comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
    visible_post(&state, Some(user_id.0), comment.post_id).await?;

    state.likes.unlike_comment(like_id).await?;
    tracing::info!(comment_like_id = like_id, user_id = user_id.0, "comment unliked");
    Ok(HttpResponse::Ok().json(MessageResponse::new("unlike comment success")))
}
