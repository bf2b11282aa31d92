// src/handlers/mod.rs

pub mod answer;
pub mod auth;
pub mod question;
pub mod quiz;
pub mod submission;

use crate::{error::AppError, utils::html::clean_html};

/// Sanitizes free text and rejects input that was nothing but markup.
pub(crate) fn sanitized(text: &str, field: &str) -> Result<String, AppError> {
    let clean = clean_html(text);
    if clean.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(clean)
}
