pub mod auth;
pub mod helper;
pub mod pages;
pub mod tasks;

use axum::http::Uri;

use crate::infra::errors::AppError;

pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}
