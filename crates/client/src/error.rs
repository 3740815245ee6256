//! Client-side error type.

use thiserror::Error;

use clementine_core::ErrorCode;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<graphql_client::Error>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A mutation came back with `success: false`.
    #[error("rejected ({}): {message}", code.as_str())]
    Rejected {
        /// Machine-readable failure code.
        code: ErrorCode,
        /// Human-readable message from the server.
        message: String,
    },

    /// The response envelope had neither data nor errors.
    #[error("GraphQL response contained no data")]
    MissingData,
}

impl ClientError {
    /// The failure code, when the server supplied one.
    ///
    /// GraphQL errors carry theirs in the `code` extension; mutation
    /// rejections carry it in the payload. Transport failures have none.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Rejected { code, .. } => Some(*code),
            Self::GraphQL(errors) => errors.iter().find_map(|e| {
                let ext = e.extensions.as_ref()?;
                serde_json::from_value(ext.get("code")?.clone()).ok()
            }),
            Self::Http(_) | Self::Parse(_) | Self::MissingData => None,
        }
    }
}

fn format_graphql_errors(errors: &[graphql_client::Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_exposes_its_code() {
        let err = ClientError::Rejected {
            code: ErrorCode::OutOfStock,
            message: "insufficient stock".to_string(),
        };
        assert_eq!(err.code(), Some(ErrorCode::OutOfStock));
        assert!(err.to_string().contains("OUT_OF_STOCK"));
    }

    #[test]
    fn graphql_error_code_comes_from_extensions() {
        let raw = serde_json::json!({
            "message": "authentication required",
            "extensions": { "code": "UNAUTHENTICATED" }
        });
        let error: graphql_client::Error = serde_json::from_value(raw).unwrap();
        let err = ClientError::GraphQL(vec![error]);
        assert_eq!(err.code(), Some(ErrorCode::Unauthenticated));
    }

    #[test]
    fn transport_errors_have_no_code() {
        assert_eq!(ClientError::MissingData.code(), None);
    }
}
