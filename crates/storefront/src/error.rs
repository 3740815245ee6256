//! Unified error handling with Sentry integration.
//!
//! Mutations surface failures through the uniform `MutationResult` payload;
//! queries surface them as GraphQL errors carrying a `code` extension. Both
//! paths go through [`StoreError`], which owns the mapping to [`ErrorCode`]
//! and captures server-side failures to Sentry before responding.

use async_graphql::ErrorExtensions;
use thiserror::Error;

use clementine_core::ErrorCode;

use crate::db::RepositoryError;

/// Application-level error type for resolver paths.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// No authenticated user in the request context.
    #[error("authentication required")]
    Unauthenticated,

    /// A business rule rejected the operation.
    #[error("{}", .0.message())]
    Rejected(ErrorCode),
}

impl StoreError {
    /// The uniform code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::Internal,
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::Rejected(code) => *code,
        }
    }

    /// The message exposed to clients. Internal details are redacted.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Database(_) => ErrorCode::Internal.message().to_string(),
            Self::Unauthenticated | Self::Rejected(_) => self.to_string(),
        }
    }

    /// Capture server-side errors to Sentry; business rejections are not
    /// error conditions and are skipped.
    pub fn capture(&self) {
        if let Self::Database(inner) = self {
            let event_id = sentry::capture_error(inner);
            tracing::error!(
                error = %inner,
                sentry_event_id = %event_id,
                "Resolver error"
            );
        }
    }

    /// Convert into a GraphQL error carrying the `code` extension.
    ///
    /// A `From` impl would collide with async-graphql's blanket
    /// `Display` conversion, which drops the extension and skips Sentry
    /// capture, so query resolvers must call this explicitly.
    #[must_use]
    pub fn into_graphql(self) -> async_graphql::Error {
        self.capture();
        let code = self.code();
        async_graphql::Error::new(self.client_message())
            .extend_with(|_, ext| ext.set("code", code.as_str()))
    }
}

/// Result type alias for resolver internals.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_carry_their_code() {
        let err = StoreError::Rejected(ErrorCode::OutOfStock);
        assert_eq!(err.code(), ErrorCode::OutOfStock);
        assert_eq!(err.client_message(), "insufficient stock");
    }

    #[test]
    fn database_errors_are_redacted() {
        let err = StoreError::Database(RepositoryError::DataCorruption(
            "secret table detail".to_string(),
        ));
        assert_eq!(err.code(), ErrorCode::Internal);
        assert!(!err.client_message().contains("secret table detail"));
    }

    #[test]
    fn graphql_conversion_sets_the_code_extension() {
        let err = StoreError::Rejected(ErrorCode::OutOfStock).into_graphql();
        assert_eq!(err.message, "insufficient stock");
        assert!(err.extensions.is_some());
    }

    #[test]
    fn unauthenticated_maps_to_its_code() {
        let err = StoreError::Unauthenticated;
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
        assert_eq!(err.client_message(), "authentication required");
    }
}
