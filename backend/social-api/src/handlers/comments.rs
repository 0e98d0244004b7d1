use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use super::{parse_id, visible_post, MessageResponse};
use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::pagination::{Page, PageQuery, PageResponse};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

/// Comments on a post, oldest first
/// GET /api/v1/post/{post_id}/comment
pub async fn list_comments(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path, "invalid post id")?;
    visible_post(&state, Some(user_id.0), post_id).await?;

    let page = Page::from(&query.into_inner());
    let (comments, total) = state.comments.list_by_post(post_id, &page).await?;
    Ok(HttpResponse::Ok().json(PageResponse::new(&page, total, comments)))
}

/// POST /api/v1/post/{post_id}/comment
pub async fn create_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path, "invalid post id")?;
    let req = body.into_inner();
    req.validate()?;

    visible_post(&state, Some(user_id.0), post_id).await?;

    let comment = state
        .comments
        .create(post_id, user_id.0, &req.content)
        .await?;
    tracing::info!(comment_id = comment.id, post_id, user_id = user_id.0, "comment created");
    Ok(HttpResponse::Created().json(comment))
}

/// DELETE /api/v1/post/{post_id}/comment/{comment_id}
pub async fn delete_comment(
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
    if comment.user_id != user_id.0 {
        return Err(AppError::Authorization(
            "you are not the author of the comment".to_string(),
        ));
    }

    state.comments.delete(comment_id).await?;
    tracing::info!(comment_id, post_id, user_id = user_id.0, "comment deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("comment deleted successfully")))
}
