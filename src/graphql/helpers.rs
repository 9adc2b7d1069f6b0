use async_graphql::{ErrorExtensions, ID};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Helper to check a GraphQL ID is a quiz UUID
pub fn parse_id(id: &ID) -> AppResult<String> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| AppError::ValidationError("Invalid UUID format".to_string()))
}

/// Converts an `AppError` into a GraphQL error carrying its `code` extension.
pub fn gql<T>(result: AppResult<T>) -> async_graphql::Result<T> {
    result.map_err(|err| err.extend())
}
