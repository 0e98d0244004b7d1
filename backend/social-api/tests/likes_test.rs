/// HTTP tests for post and comment likes
mod common;

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;
    use social_api::handlers::likes::LikeListResponse;
    use social_api::models::{CommentLike, PostLike};

    use crate::common::fixtures::{self, bearer, error_message};

    #[actix_web::test]
    async fn test_like_list_and_unlike_post() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (author, _) = fixtures::seed_user(&ctx.state, "author", false).await;
        let (fan, fan_token) = fixtures::seed_user(&ctx.state, "fan", false).await;
        let (_, other_token) = fixtures::seed_user(&ctx.state, "other", false).await;
        let post = fixtures::seed_post(&ctx.state, author.id, "Hello").await;
        let uri = format!("/api/v1/post/{}/like", post.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let like: PostLike = test::read_body_json(resp).await;
        assert_eq!(like.user_id, fan.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "already liked");

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&other_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let list: LikeListResponse = test::read_body_json(resp).await;
        assert_eq!(list.total, 1);
        assert_eq!(list.likes[0].user_id, fan.id);

        let unlike_uri = format!("/api/v1/post_like/{}", like.id);
        let req = test::TestRequest::delete()
            .uri(&unlike_uri)
            .insert_header(bearer(&other_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "no permission to unlike");

        let req = test::TestRequest::delete()
            .uri(&unlike_uri)
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&unlike_uri)
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "post like not found");
    }

    #[actix_web::test]
    async fn test_private_post_likes_require_follow() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (author, _) = fixtures::seed_user(&ctx.state, "author", true).await;
        let (_, stranger_token) = fixtures::seed_user(&ctx.state, "stranger", false).await;
        let post = fixtures::seed_post(&ctx.state, author.id, "Secret").await;
        let uri = format!("/api/v1/post/{}/like", post.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&stranger_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&stranger_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_unlike_rechecks_visibility_after_unfollow() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (author, _) = fixtures::seed_user(&ctx.state, "author", true).await;
        let (fan, fan_token) = fixtures::seed_user(&ctx.state, "fan", false).await;
        let follow = ctx.state.follows.follow(fan.id, author.id).await.unwrap();
        let post = fixtures::seed_post(&ctx.state, author.id, "Secret").await;
        let like = ctx.state.likes.like_post(post.id, fan.id).await.unwrap();

        ctx.state.follows.unfollow(follow.id).await.unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/post_like/{}", like.id))
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_comment_like_flow() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (author, _) = fixtures::seed_user(&ctx.state, "author", false).await;
        let (fan, fan_token) = fixtures::seed_user(&ctx.state, "fan", false).await;
        let post = fixtures::seed_post(&ctx.state, author.id, "Hello").await;
        let other_post = fixtures::seed_post(&ctx.state, author.id, "Other").await;
        let comment = ctx
            .state
            .comments
            .create(post.id, author.id, "thanks")
            .await
            .unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/post/{}/comment/{}/like", other_post.id, comment.id))
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "comment does not belong to the post");

        let uri = format!("/api/v1/post/{}/comment/{}/like", post.id, comment.id);
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let like: CommentLike = test::read_body_json(resp).await;
        assert_eq!(like.comment_id, comment.id);
        assert_eq!(like.user_id, fan.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/post/{}/comment/999/like", post.id))
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/comment_like/{}", like.id))
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/comment_like/{}", like.id))
            .insert_header(bearer(&fan_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "comment like not found");
    }
}
