//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod advisor;
pub mod audit;
pub mod businesses;
pub mod decisions;
pub mod forecast;
pub mod snapshots;
pub mod statements;

// Re-export all handlers for use in router
pub use advisor::*;
pub use audit::*;
pub use businesses::*;
pub use decisions::*;
pub use forecast::*;
pub use snapshots::*;
pub use statements::*;

use axum::extract::Request;

use crate::{AppError, MAX_BODY_SIZE};

/// Read and deserialize a JSON request body with a size limit
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    request: Request,
    limit: usize,
) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), limit)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))
}

/// Read a JSON body at the default size limit
pub(crate) async fn read_json_default<T: serde::de::DeserializeOwned>(
    request: Request,
) -> Result<T, AppError> {
    read_json(request, MAX_BODY_SIZE).await
}
