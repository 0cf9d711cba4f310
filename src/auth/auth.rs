use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web::Data, FromRequest, HttpRequest,
};
use futures::future::{ready, Ready};

use crate::auth::jwt::{verify_token, TokenType};
use crate::config::Config;
use crate::model::role::Role;

/// The authenticated actor: resolved id + role, extracted from the bearer
/// token. Everything downstream trusts this pair.
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )))
            }
        };

        let claims = match verify_token(token, &config.jwt_secret) {
            Ok(c) => c,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        if claims.token_type != TokenType::Access {
            return ready(Err(ErrorUnauthorized("Access token required")));
        }

        ready(Ok(AuthUser {
            user_id: claims.user_id,
            username: claims.sub,
            role: claims.role,
        }))
    }
}

impl AuthUser {
    /// Holiday management is an HR/SuperAdmin concern.
    pub fn require_hr_or_super(&self) -> actix_web::Result<()> {
        if matches!(self.role, Role::SuperAdmin | Role::Hr) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("HR/SuperAdmin only"))
        }
    }
}
