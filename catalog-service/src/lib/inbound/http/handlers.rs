use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::category::errors::CategoryError;
use crate::domain::product::errors::ProductError;
use crate::user::errors::UserError;

pub mod auth;
pub mod categories;
pub mod health;
pub mod products;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    PayloadTooLarge(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UsernameAlreadyExists(_) => ApiError::Conflict("username taken".to_string()),
            UserError::InvalidCredentials => {
                ApiError::Unauthorized("invalid credentials".to_string())
            }
            UserError::InvalidUsername(_) | UserError::InvalidPassword(_) => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::InvalidUserId(_)
            | UserError::InvalidRole(_)
            | UserError::HashingFailed(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::InvalidName(e) => ApiError::BadRequest(e.to_string()),
            CategoryError::InvalidCategoryId(_) | CategoryError::NotFound(_) => {
                ApiError::NotFound("category not found".to_string())
            }
            CategoryError::AlreadyExists(_) => ApiError::Conflict("exists".to_string()),
            CategoryError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::InvalidProductId(_) | ProductError::NotFound(_) => {
                ApiError::NotFound("product not found".to_string())
            }
            ProductError::InvalidName(e) => ApiError::BadRequest(e.to_string()),
            ProductError::InvalidImageType(_) => {
                ApiError::BadRequest("invalid image type".to_string())
            }
            ProductError::InvalidPrice(_)
            | ProductError::InvalidCategoryId(_)
            | ProductError::MissingImage => ApiError::BadRequest(err.to_string()),
            ProductError::CategoryNotFound(_) => ApiError::UnprocessableEntity(err.to_string()),
            ProductError::ImageStorage(_)
            | ProductError::DatabaseError(_)
            | ProductError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("request body too large".to_string())
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Body of responses that only acknowledge an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::errors::ProductNameError;

    #[test]
    fn test_domain_errors_map_to_status_messages() {
        assert_eq!(
            ApiError::from(UserError::InvalidCredentials),
            ApiError::Unauthorized("invalid credentials".to_string())
        );
        assert_eq!(
            ApiError::from(CategoryError::AlreadyExists("Books".to_string())),
            ApiError::Conflict("exists".to_string())
        );
        assert_eq!(
            ApiError::from(ProductError::InvalidName(ProductNameError::Empty)),
            ApiError::BadRequest("name required".to_string())
        );
        assert_eq!(
            ApiError::from(ProductError::MissingImage),
            ApiError::BadRequest("at least one image required".to_string())
        );
        assert!(matches!(
            ApiError::from(ProductError::CategoryNotFound(String::new())),
            ApiError::UnprocessableEntity(_)
        ));
    }

    #[test]
    fn test_success_envelope_shape() {
        let body = ApiResponseBody::new(StatusCode::CREATED, MessageData::new("registered"));
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"status_code": 201, "data": {"message": "registered"}})
        );
    }
}
