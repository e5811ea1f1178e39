use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::service::TripError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Trip(#[from] TripError),
    #[error("request timed out")]
    Timeout,
    #[error("handler panicked: {0}")]
    Panic(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Trip(TripError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Trip(TripError::TripNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::Migrate(_)
            | AppError::Trip(TripError::Store(_))
            | AppError::Panic(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Trip(TripError::TripNotFound(_)) => "trip not found".to_string(),
            AppError::Timeout => {
                error!("request timed out");
                self.to_string()
            }
            _ if status.is_server_error() => {
                error!(error = ?self, "request failed");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::repository::RepoError;

    #[test]
    fn trip_errors_map_to_client_codes() {
        let invalid = AppError::from(TripError::InvalidInput("pickup is required".into()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let missing = AppError::from(TripError::TripNotFound(Uuid::new_v4()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let store = AppError::from(TripError::Store(RepoError::Store(sqlx::Error::PoolClosed)));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(AppError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            AppError::Panic("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let response =
            AppError::Database(sqlx::Error::Protocol("secret detail".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
