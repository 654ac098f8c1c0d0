pub mod docs;
pub mod health;
pub mod users;

use crate::error::ApiError;

// used as the router fallback and as the fallback of every method router,
// so unknown paths and unsupported methods both get the same 404 body
pub async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}
