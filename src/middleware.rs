use crate::auth_jwt::auth::Claims;
use crate::domain::Role;
use crate::errors::custom::{AuthError, CustomError};
use crate::services::orders::Caller;
use crate::state::AppState;
use actix_web::body::MessageBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use actix_web_lab::middleware::Next;
use std::future::{ready, Ready};

/******************************************/
// Bearer token check for protected scopes
/******************************************/
pub async fn jwt_auth_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| CustomError::from(AuthError::MissingToken))?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| CustomError::InternalError("application state missing".to_string()))?;
    let claims = state.jwt.verify_jwt(token).map_err(CustomError::from)?;

    req.extensions_mut().insert(claims);
    next.call(req).await
}

/// The caller behind a verified token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0.sub
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn caller(&self) -> Caller {
        Caller::new(self.0.role, self.0.sub)
    }

    /// The caller's account id, provided they act as `role`.
    pub fn require(&self, role: Role) -> Result<i32, CustomError> {
        if self.0.role == role {
            Ok(self.0.sub)
        } else {
            Err(AuthError::WrongRole(role).into())
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = CustomError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        ready(
            claims
                .map(AuthenticatedUser)
                .ok_or(CustomError::AuthenticationError(AuthError::MissingToken)),
        )
    }
}
