use crate::domain::{OrderStatus, Role};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Database Error: {0}")]
    DatabaseError(#[from] DbError),

    #[error("Blocking Error: {0}")]
    BlockingError(String),

    #[error("Hashing Error: {0}")]
    HashingError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Authentication Error: {0}")]
    AuthenticationError(#[from] AuthError),

    #[error("Order Error: {0}")]
    OrderError(#[from] OrderError),

    #[error("Review Error: {0}")]
    ReviewError(#[from] ReviewError),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Error: {0}")]
    InternalError(String),
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection Error: {0}")]
    ConnectionError(String),

    #[error("Query Error: {0}")]
    QueryBuilderError(String),

    #[error("Unique Violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign Key Violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Other Database Error: {0}")]
    Other(String),
}

impl From<DieselError> for DbError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DbError::UniqueViolation(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                DbError::ForeignKeyViolation(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                DbError::ConnectionError(info.message().to_string())
            }
            DieselError::QueryBuilderError(err) => DbError::QueryBuilderError(err.to_string()),
            other => DbError::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email {0} already exists")]
    DuplicateEmail(String),

    #[error("{0}")]
    InvalidUserType(String),

    #[error("User not found")]
    AccountNotFound,

    #[error("Account disabled, please contact support")]
    AccountDisabled,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Missing or invalid authorization header")]
    MissingToken,

    #[error("JWT Authentication Error: {0}")]
    JwtAuthenticationError(String),

    #[error("This action requires a {0} account")]
    WrongRole(Role),
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    InvalidStatus(String),

    #[error("Order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {0} has already been accepted by another delivery staff")]
    AlreadyAssigned(i32),

    #[error("Order {0} changed while it was being updated, please retry")]
    StatusChanged(i32),

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("All items must come from the same restaurant")]
    MixedRestaurants,

    #[error("Menu item {0} is not available")]
    ItemUnavailable(i32),

    #[error("You cannot set an order to {0}")]
    NotPermitted(OrderStatus),
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Only delivered orders can be reviewed")]
    NotDelivered,

    #[error("This order has already been reviewed")]
    AlreadyReviewed,

    #[error("{0}")]
    InvalidRating(String),
}

impl From<actix_web::error::BlockingError> for CustomError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        CustomError::BlockingError(err.to_string())
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match self {
            CustomError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CustomError::BlockingError(_)
            | CustomError::HashingError(_)
            | CustomError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::DatabaseError(err) => match err {
                DbError::UniqueViolation(_) | DbError::ForeignKeyViolation(_) => {
                    StatusCode::CONFLICT
                }
                DbError::ConnectionError(_) | DbError::QueryBuilderError(_) | DbError::Other(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            CustomError::AuthenticationError(err) => match err {
                AuthError::DuplicateEmail(_) => StatusCode::CONFLICT,
                AuthError::InvalidUserType(_) => StatusCode::BAD_REQUEST,
                AuthError::AccountNotFound
                | AuthError::InvalidPassword
                | AuthError::MissingToken
                | AuthError::JwtAuthenticationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::AccountDisabled | AuthError::WrongRole(_) => StatusCode::FORBIDDEN,
            },
            CustomError::OrderError(err) => match err {
                OrderError::InvalidStatus(_)
                | OrderError::EmptyOrder
                | OrderError::MixedRestaurants
                | OrderError::ItemUnavailable(_) => StatusCode::BAD_REQUEST,
                OrderError::InvalidTransition { .. }
                | OrderError::AlreadyAssigned(_)
                | OrderError::StatusChanged(_) => StatusCode::CONFLICT,
                OrderError::NotPermitted(_) => StatusCode::FORBIDDEN,
            },
            CustomError::ReviewError(err) => match err {
                ReviewError::NotDelivered | ReviewError::InvalidRating(_) => {
                    StatusCode::BAD_REQUEST
                }
                ReviewError::AlreadyReviewed => StatusCode::CONFLICT,
            },
            CustomError::NotFound(_) => StatusCode::NOT_FOUND,
            CustomError::Forbidden(_) => StatusCode::FORBIDDEN,
            CustomError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal details stay in the logs.
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            return HttpResponse::build(status).body("Internal Server Error");
        }
        HttpResponse::build(status).body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_do_not_leak_details() {
        let err = CustomError::DatabaseError(DbError::ConnectionError(
            "password authentication failed for user postgres".to_string(),
        ));
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_failures_map_to_expected_statuses() {
        let cases = [
            (AuthError::DuplicateEmail("a@b.co".into()), StatusCode::CONFLICT),
            (AuthError::InvalidPassword, StatusCode::UNAUTHORIZED),
            (AuthError::AccountDisabled, StatusCode::FORBIDDEN),
            (AuthError::WrongRole(Role::Customer), StatusCode::FORBIDDEN),
        ];
        for (err, expected) in cases {
            assert_eq!(CustomError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn internal_errors_are_server_errors() {
        let err = CustomError::InternalError("application state missing".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal Error: application state missing");
    }

    #[test]
    fn unique_violation_is_a_conflict() {
        let err = CustomError::from(DbError::UniqueViolation("dup".into()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
