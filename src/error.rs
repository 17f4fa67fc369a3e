use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::templates;

pub type WebResult<T> = Result<T, WarblerError>;

#[derive(Debug, Error)]
pub enum WarblerError {
    #[error("password must not be empty")]
    InvalidPassword,
    #[error("page not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("session error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
}

impl WarblerError {
    /// True when the database rejected a duplicate value in a unique column.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            WarblerError::Database(e) => is_unique_violation(e),
            _ => false,
        }
    }
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl ResponseError for WarblerError {
    fn status_code(&self) -> StatusCode {
        match self {
            WarblerError::InvalidPassword => StatusCode::BAD_REQUEST,
            WarblerError::NotFound => StatusCode::NOT_FOUND,
            WarblerError::Forbidden => StatusCode::FORBIDDEN,
            WarblerError::Database(_) | WarblerError::Hash(_) | WarblerError::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let body = match self {
            WarblerError::NotFound => templates::errors::not_found(),
            WarblerError::Forbidden => templates::errors::forbidden(),
            _ if status.is_server_error() => templates::errors::server_error(),
            other => templates::errors::bad_request(&other.to_string()),
        };

        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body)
    }
}
