use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{parse_id, MessageResponse};
use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::pagination::{Page, PageQuery, PageResponse};
use crate::services::FollowFilter;

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub user_id: i64,
}

/// Filters for `GET /follow`. Read as strings; blank or invalid ids are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct FollowListQuery {
    pub follower_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(rename = "pageNum")]
    pub page_num: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

fn optional_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
}

impl FollowListQuery {
    fn filter(&self) -> FollowFilter {
        FollowFilter {
            follower_id: optional_id(self.follower_id.as_deref()),
            user_id: optional_id(self.user_id.as_deref()),
        }
    }

    fn page(&self) -> Page {
        Page::from(&PageQuery {
            page_num: self.page_num.clone(),
            page_size: self.page_size.clone(),
            keyword: None,
        })
    }
}

/// List follow edges
/// GET /api/v1/follow?follower_id=&user_id=&pageNum=&pageSize=
pub async fn list_follows(
    state: web::Data<AppState>,
    query: web::Query<FollowListQuery>,
) -> Result<HttpResponse> {
    let page = query.page();
    let (follows, total) = state.follows.list(query.filter(), &page).await?;
    Ok(HttpResponse::Ok().json(PageResponse::new(&page, total, follows)))
}

/// Follow a user
/// POST /api/v1/follow
pub async fn follow_user(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<FollowRequest>,
) -> Result<HttpResponse> {
    let followee_id = body.user_id;
    if followee_id == user_id.0 {
        return Err(AppError::BadRequest("can not follow yourself".to_string()));
    }

    state
        .users
        .get_by_id(followee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let follow = state.follows.follow(user_id.0, followee_id).await?;
    tracing::info!(
        follow_id = follow.id,
        follower_id = user_id.0,
        user_id = followee_id,
        "user followed"
    );
    Ok(HttpResponse::Ok().json(MessageResponse::new("follow user success")))
}

/// Remove a follow edge owned by the caller
/// DELETE /api/v1/follow/{follow_id}
pub async fn unfollow_user(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let follow_id = parse_id(&path, "invalid follow id")?;

    let follow = state
        .follows
        .get_by_id(follow_id)
        .await?
        .ok_or_else(|| AppError::NotFound("follow not found".to_string()))?;

    if follow.follower_id != user_id.0 {
        return Err(AppError::Authorization("not follower".to_string()));
    }

    state.follows.unfollow(follow_id).await?;
    tracing::info!(follow_id, follower_id = user_id.0, "user unfollowed");
    Ok(HttpResponse::Ok().json(MessageResponse::new("unfollow user success")))
}
