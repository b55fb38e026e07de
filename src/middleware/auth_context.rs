use std::future::{ready, Ready};

use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};

use crate::error::ApiError;
use crate::middleware::auth::Claims;

/// The caller identified by `AuthMiddleware`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<Claims>().and_then(|claims| {
            claims.sub.parse().ok().map(|user_id| AuthenticatedUser {
                user_id,
                email: claims.email.clone(),
            })
        });

        ready(user.ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()).into()))
    }
}
