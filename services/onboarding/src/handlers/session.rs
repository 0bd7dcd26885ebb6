//! Draft session token extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::error::OnboardingServiceError;

pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// The token handed out at draft submission, sent back in `x-session-token`.
///
/// Rejects with `InvalidSessionToken` (401) when the header is absent, blank
/// or not visible ASCII. Matching against the draft happens in the use case.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = OnboardingServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(SESSION_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        async move {
            token
                .map(Self)
                .ok_or(OnboardingServiceError::InvalidSessionToken)
        }
    }
}
