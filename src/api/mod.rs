pub mod analytics;
pub mod attendance;
pub mod courses;
pub mod verification;

use actix_web::web;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ApiError, StoreError};

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Duplicate submission detected")]
    pub error: String,
}

/// Runs a repository call on the blocking pool and maps its failure to
/// `message`.
pub(crate) async fn blocking<T, F>(message: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| ApiError::internal(message, e))?
        .map_err(|e| ApiError::from_store(message, e))
}
