use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use system::{BlueprintError, InvalidPointError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Blueprint(#[from] BlueprintError),
    #[error(transparent)]
    InvalidPoint(#[from] InvalidPointError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Blueprint(BlueprintError::NotFound(_))
            | ApiError::Blueprint(BlueprintError::AuthorNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Blueprint(BlueprintError::Persistence(_)) => StatusCode::BAD_REQUEST,
            ApiError::Blueprint(BlueprintError::Unavailable) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidPoint(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
            HttpResponse::build(status).body("An error occurred.")
        } else {
            HttpResponse::build(status).body(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_store_errors_to_status_codes() {
        let not_found: ApiError = BlueprintError::NotFound("alice/house".into()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Blueprint not found: alice/house");

        let no_author: ApiError = BlueprintError::AuthorNotFound("carol".into()).into();
        assert_eq!(no_author.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(no_author.to_string(), "Blueprints not found for author: carol");

        let duplicate: ApiError = BlueprintError::Persistence("dup".into()).into();
        assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);

        let unavailable: ApiError = BlueprintError::Unavailable.into();
        assert_eq!(
            unavailable.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
