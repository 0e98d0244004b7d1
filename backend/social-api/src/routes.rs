//! Route configuration
//!
//! Resources where every method needs a user are wrapped in
//! [`JwtAuthMiddleware`]. Resources that mix public and authenticated methods
//! rely on the `UserId` / `OptionalUserId` extractors instead.

use actix_cors::Cors;
use actix_web::{http::header, web};

use crate::config::CorsConfig;
use crate::error::AppError;
use crate::handlers::{comments, follows, health, likes, posts, uploads, users};
use crate::middleware::JwtAuthMiddleware;

const JSON_LIMIT_BYTES: usize = 1024 * 1024;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ping", web::get().to(health::ping))
        .route("/health", web::get().to(health::health))
        .route("/metrics", web::get().to(health::metrics_handler))
        .service(
            web::scope("/api/v1")
                .configure(configure_users)
                .configure(configure_follows)
                .configure(configure_posts)
                .configure(configure_likes)
                .service(
                    web::resource("/upload")
                        .wrap(JwtAuthMiddleware)
                        .route(web::post().to(uploads::upload_file)),
                ),
        );
}

fn configure_users(cfg: &mut web::ServiceConfig) {
    // Fixed segments must be registered before `/user/{user_id}`.
    cfg.service(
        web::resource("/user")
            .route(web::post().to(users::register))
            .route(web::get().to(users::list_users)),
    )
    .service(
        web::resource("/user/info")
            .wrap(JwtAuthMiddleware)
            .route(web::get().to(users::user_info)),
    )
    .service(web::resource("/user/login").route(web::post().to(users::login)))
    .service(
        web::resource("/user/logout")
            .wrap(JwtAuthMiddleware)
            .route(web::post().to(users::logout)),
    )
    .service(
        web::resource("/user/refresh")
            .wrap(JwtAuthMiddleware)
            .route(web::get().to(users::refresh)),
    )
    .service(
        web::resource("/user/{user_id}")
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user))
            .route(web::delete().to(users::delete_user)),
    );
}

fn configure_follows(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/follow")
            .route(web::get().to(follows::list_follows))
            .route(web::post().to(follows::follow_user)),
    )
    .service(
        web::resource("/follow/{follow_id}")
            .wrap(JwtAuthMiddleware)
            .route(web::delete().to(follows::unfollow_user)),
    );
}

fn configure_posts(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/post")
            .wrap(JwtAuthMiddleware)
            .route(web::get().to(posts::list_posts))
            .route(web::post().to(posts::create_post)),
    )
    .service(
        web::resource("/post/{post_id}")
            .route(web::get().to(posts::get_post))
            .route(web::delete().to(posts::delete_post)),
    )
    .service(
        web::resource("/post/{post_id}/comment")
            .wrap(JwtAuthMiddleware)
            .route(web::get().to(comments::list_comments))
            .route(web::post().to(comments::create_comment)),
    )
    .service(
        web::resource("/post/{post_id}/comment/{comment_id}")
            .wrap(JwtAuthMiddleware)
            .route(web::delete().to(comments::delete_comment)),
    );
}

fn configure_likes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/post/{post_id}/like")
            .wrap(JwtAuthMiddleware)
            .route(web::get().to(likes::list_post_likes))
            .route(web::post().to(likes::like_post)),
    )
    .service(
        web::resource("/post/{post_id}/comment/{comment_id}/like")
            .wrap(JwtAuthMiddleware)
            .route(web::post().to(likes::like_comment)),
    )
    .service(
        web::resource("/post_like/{post_like_id}")
            .wrap(JwtAuthMiddleware)
            .route(web::delete().to(likes::unlike_post)),
    )
    .service(
        web::resource("/comment_like/{comment_like_id}")
            .wrap(JwtAuthMiddleware)
            .route(web::delete().to(likes::unlike_comment)),
    );
}

/// JSON body extractor config; malformed bodies become `{"error": ...}` 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Build CORS configuration from allowed_origins
pub fn cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();
    for origin in &config.allowed_origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allow_any_method()
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600)
}
