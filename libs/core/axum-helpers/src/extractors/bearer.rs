//! Bearer-token caller identity extractor.
//!
//! The directory service uses asserted identity: the caller presents their
//! own user id as a bearer token and the domain layer resolves it against
//! the identity store. There is no token signing or expiry, so this
//! extractor only parses; deciding whether an identity is required belongs
//! to the access-control engine.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use std::convert::Infallible;
use uuid::Uuid;

/// Caller identity extracted from the `Authorization: Bearer <user-id>` header.
///
/// The inner value is `None` when the header is absent, not a bearer scheme,
/// or not a valid UUID. Extraction never rejects; an anonymous caller is a
/// domain-level concern, not a transport-level one.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Option<Uuid>);

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| token.trim().parse::<Uuid>().ok());

        Ok(CallerIdentity(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Option<Uuid> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let request = builder.body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let CallerIdentity(caller) = CallerIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        caller
    }

    #[tokio::test]
    async fn test_extracts_valid_bearer_uuid() {
        let id = Uuid::now_v7();
        let caller = extract(Some(&format!("Bearer {}", id))).await;
        assert_eq!(caller, Some(id));
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        assert_eq!(extract(None).await, None);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_anonymous() {
        assert_eq!(extract(Some("Basic dXNlcjpwYXNz")).await, None);
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_anonymous() {
        assert_eq!(extract(Some("Bearer not-a-uuid")).await, None);
    }
}
