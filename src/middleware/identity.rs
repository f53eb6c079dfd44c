use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header the gateway sets to the authenticated account's id
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// Authenticated caller, as asserted by the upstream gateway
///
/// Rejects with 401 when the header is absent, not a number, or not positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for AccountId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account_id = parts
            .headers
            .get(ACCOUNT_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .ok_or(AppError::Unauthorized)?;

        tracing::Span::current().record("account_id", account_id);

        Ok(AccountId(account_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<AccountId, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(ACCOUNT_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AccountId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_account_id() {
        assert_eq!(extract(Some("42")).await.unwrap(), AccountId(42));
    }

    #[tokio::test]
    async fn test_missing_or_invalid_account_id() {
        for header in [None, Some("abc"), Some("0"), Some("-3"), Some("")] {
            let err = extract(header).await.unwrap_err();
            assert!(matches!(err, AppError::Unauthorized), "header {:?}", header);
        }
    }
}
