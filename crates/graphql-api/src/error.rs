use async_graphql::ErrorExtensions;
use domain::DomainError;
use infrastructure::StoreError;
use shared::AuthError;
use thiserror::Error;
use tracing::error;

/// リゾルバが返すエラー
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// `extensions.code` に載せるエラーコード
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Authentication(_) => "UNAUTHENTICATED",
            ApiError::Storage(_) | ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// クライアントに返すメッセージ（サーバー側の詳細は含めない）
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Storage(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                ApiError::Authentication(e.to_string())
            }
            AuthError::Signing(_) | AuthError::Hashing(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        if matches!(self, ApiError::Storage(_) | ApiError::Internal(_)) {
            error!(error = %self, "リクエスト処理中に内部エラーが発生");
        }

        let code = self.code();
        async_graphql::Error::new(self.client_message()).extend_with(|_, e| e.set("code", code))
    }
}

/// `Result<T, E>` を GraphQL のエラーに変換する
pub trait ResultExt<T> {
    fn extend_err(self) -> async_graphql::Result<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ApiError>,
{
    fn extend_err(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::NotFound("x".to_string()).code(), "NOT_FOUND");
        assert_eq!(ApiError::from(DomainError::Validation("x".to_string())).code(), "VALIDATION_ERROR");
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).code(), "UNAUTHENTICATED");
        assert_eq!(ApiError::from(AuthError::TokenExpired).code(), "UNAUTHENTICATED");
        assert_eq!(ApiError::from(AuthError::Hashing("x".to_string())).code(), "INTERNAL_ERROR");
        assert_eq!(ApiError::from(StoreError::SessionClosed).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_storage_details_are_hidden_from_clients() {
        let error = ApiError::from(StoreError::Connection("10.0.0.7:7687 refused".to_string()));

        assert_eq!(error.client_message(), "Internal server error");
        assert_eq!(error.extend().message, "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let error = ApiError::NotFound("Assignee 42".to_string());

        assert_eq!(error.client_message(), "Resource not found: Assignee 42");
    }
}
