//! Error types for the route service boundary.

use thiserror::Error;

/// Route service error type.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No mask found for map '{0}'")]
    MaskNotFound(String),

    #[error("Mask error: {0}")]
    Mask(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Plan(#[from] marga_plan::PlanError),
}

impl From<toml::de::Error> for RouteError {
    fn from(e: toml::de::Error) -> Self {
        RouteError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
