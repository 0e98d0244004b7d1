/// HTTP tests for comments; visibility follows the parent post's author
mod common;

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};
    use social_api::models::Comment;

    use crate::common::fixtures::{self, bearer, error_message};

    #[actix_web::test]
    async fn test_comment_on_public_post() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (author, _) = fixtures::seed_user(&ctx.state, "author", false).await;
        let (reader, reader_token) = fixtures::seed_user(&ctx.state, "reader", false).await;
        let post = fixtures::seed_post(&ctx.state, author.id, "Hello").await;
        let uri = format!("/api/v1/post/{}/comment", post.id);

        for text in ["first", "second"] {
            let req = test::TestRequest::post()
                .uri(&uri)
                .insert_header(bearer(&reader_token))
                .set_json(json!({ "content": text }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let comment: Comment = test::read_body_json(resp).await;
            assert_eq!(comment.post_id, post.id);
            assert_eq!(comment.user_id, reader.id);
        }

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&reader_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total_records"], 2);
        // Oldest first.
        assert_eq!(body["data"][0]["content"], "first");
    }

    #[actix_web::test]
    async fn test_private_author_comments_require_follow() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (author, _) = fixtures::seed_user(&ctx.state, "author", true).await;
        let (follower, follower_token) = fixtures::seed_user(&ctx.state, "follower", false).await;
        let (_, stranger_token) = fixtures::seed_user(&ctx.state, "stranger", false).await;
        fixtures::seed_follow(&ctx.state, follower.id, author.id).await;
        let post = fixtures::seed_post(&ctx.state, author.id, "Secret").await;
        let uri = format!("/api/v1/post/{}/comment", post.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&stranger_token))
            .set_json(json!({ "content": "let me in" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&stranger_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&follower_token))
            .set_json(json!({ "content": "hi" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_comment_visibility_uses_post_author_not_commenter() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        // Public post author, private commenter.
        let (author, _) = fixtures::seed_user(&ctx.state, "author", false).await;
        let (commenter, _) = fixtures::seed_user(&ctx.state, "commenter", true).await;
        let (_, reader_token) = fixtures::seed_user(&ctx.state, "reader", false).await;
        let post = fixtures::seed_post(&ctx.state, author.id, "Hello").await;
        ctx.state
            .comments
            .create(post.id, commenter.id, "private person says hi")
            .await
            .unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/post/{}/comment", post.id))
            .insert_header(bearer(&reader_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total_records"], 1);
    }

    #[actix_web::test]
    async fn test_delete_comment_rules() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (author, author_token) = fixtures::seed_user(&ctx.state, "author", false).await;
        let (commenter, commenter_token) = fixtures::seed_user(&ctx.state, "commenter", false).await;
        let post = fixtures::seed_post(&ctx.state, author.id, "Hello").await;
        let other_post = fixtures::seed_post(&ctx.state, author.id, "Other").await;
        let comment = ctx
            .state
            .comments
            .create(post.id, commenter.id, "nice")
            .await
            .unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/post/{}/comment/{}", other_post.id, comment.id))
            .insert_header(bearer(&commenter_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "comment does not belong to the post");

        let uri = format!("/api/v1/post/{}/comment/{}", post.id, comment.id);
        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&author_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "you are not the author of the comment");

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&commenter_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&commenter_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "comment not found");
    }

    #[actix_web::test]
    async fn test_comment_on_missing_post() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (_, token) = fixtures::seed_user(&ctx.state, "reader", false).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/post/999/comment")
            .insert_header(bearer(&token))
            .set_json(json!({ "content": "hello?" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "post not found");
    }
}
