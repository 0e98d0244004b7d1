/// HTTP tests for the multipart upload endpoint
mod common;

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;
    use social_api::handlers::uploads::{UploadResponse, MAX_IMAGE_BYTES};
    use std::path::Path;

    use crate::common::fixtures::{self, bearer, error_message};

    const BOUNDARY: &str = "----social-api-test-boundary";
    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    // ============================================
    // Test Helpers
    // ============================================

    struct Part<'a> {
        name: &'a str,
        filename: &'a str,
        bytes: Vec<u8>,
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, part.filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            body.extend_from_slice(&part.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn png(size: usize) -> Vec<u8> {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(size.max(PNG_HEADER.len()), 0);
        bytes
    }

    fn upload_request(token: &str, parts: &[Part<'_>]) -> actix_http::Request {
        test::TestRequest::post()
            .uri("/api/v1/upload")
            .insert_header(bearer(token))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(parts))
            .to_request()
    }

    // ============================================
    // Tests
    // ============================================

    #[actix_web::test]
    async fn test_upload_image_is_stored_under_dated_folder() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (_, token) = fixtures::seed_user(&ctx.state, "uploader", false).await;

        let req = upload_request(
            &token,
            &[Part {
                name: "file",
                filename: "Holiday Pic.PNG",
                bytes: png(1024),
            }],
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: UploadResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "File uploaded successfully");

        let stored = Path::new(&body.filename);
        assert!(stored.starts_with(ctx.upload_dir.path()));
        assert!(body.filename.ends_with("-HolidayPic.png"));
        assert_eq!(std::fs::read(stored).unwrap().len(), 1024);

        let date_dir = stored.parent().unwrap().file_name().unwrap().to_str().unwrap();
        assert_eq!(date_dir, chrono::Utc::now().format("%Y-%m-%d").to_string());
    }

    #[actix_web::test]
    async fn test_rejects_unsupported_and_empty_files() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (_, token) = fixtures::seed_user(&ctx.state, "uploader", false).await;

        let req = upload_request(
            &token,
            &[Part {
                name: "file",
                filename: "notes.txt",
                bytes: b"just some text".to_vec(),
            }],
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "Unsupported file type");

        let req = upload_request(
            &token,
            &[Part {
                name: "file",
                filename: "empty.png",
                bytes: Vec::new(),
            }],
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "Uploaded file is empty");
    }

    #[actix_web::test]
    async fn test_rejects_more_than_one_file_or_wrong_field() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (_, token) = fixtures::seed_user(&ctx.state, "uploader", false).await;

        let req = upload_request(
            &token,
            &[
                Part {
                    name: "file",
                    filename: "a.png",
                    bytes: png(64),
                },
                Part {
                    name: "file",
                    filename: "b.png",
                    bytes: png(64),
                },
            ],
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "Only one file allowed to upload");

        let req = upload_request(
            &token,
            &[Part {
                name: "avatar",
                filename: "a.png",
                bytes: png(64),
            }],
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "Only one file allowed to upload");
    }

    #[actix_web::test]
    async fn test_rejects_oversized_image() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;
        let (_, token) = fixtures::seed_user(&ctx.state, "uploader", false).await;

        let req = upload_request(
            &token,
            &[Part {
                name: "file",
                filename: "huge.png",
                bytes: png(MAX_IMAGE_BYTES + 1),
            }],
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_message(&body), "File size exceeds limit");
    }

    #[actix_web::test]
    async fn test_upload_requires_token() {
        let ctx = fixtures::test_context();
        let app = fixtures::init_app(&ctx.state).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/upload")
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(&[]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
