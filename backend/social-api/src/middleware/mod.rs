pub mod jwt_auth;

pub use jwt_auth::JwtAuthMiddleware;

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

use crate::app_state::AppState;
use crate::error::AppError;

/// Authenticated user id.
///
/// Set by [`JwtAuthMiddleware`]; on routes without the middleware the header
/// is validated on extraction instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

/// Actor that may be anonymous, resolved on demand.
///
/// Extraction never fails. A missing header resolves to `None`; a header that
/// is present but invalid only fails once [`OptionalUserId::resolve`] is
/// called, so routes can skip authentication for public content.
#[derive(Debug)]
pub struct OptionalUserId(Result<Option<i64>, AppError>);

impl OptionalUserId {
    pub fn resolve(self) -> Result<Option<i64>, AppError> {
        self.0
    }
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".to_string()))
}

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(user_id) = req.extensions().get::<UserId>().copied() {
            return ready(Ok(user_id));
        }

        ready(app_state(req).and_then(|state| jwt_auth::authenticate_header(state, req.headers())))
    }
}

impl FromRequest for OptionalUserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let actor = if let Some(UserId(id)) = req.extensions().get::<UserId>().copied() {
            Ok(Some(id))
        } else if !req.headers().contains_key(AUTHORIZATION) {
            Ok(None)
        } else {
            app_state(req)
                .and_then(|state| jwt_auth::authenticate_header(state, req.headers()))
                .map(|UserId(id)| Some(id))
        };

        ready(Ok(OptionalUserId(actor)))
    }
}
