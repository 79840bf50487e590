//! Response source trait definition.

use crate::error::UpstreamError;
use crate::types::{ApiRequest, AuthHeader, RawResponse};
use async_trait::async_trait;

/// Trait for anything that can turn an API request into a raw payload.
///
/// Sources own transport, retries and timeouts. Callers treat the returned
/// body as an opaque, possibly very large string.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    /// Source name (e.g., "figma").
    fn name(&self) -> &str;

    /// Perform the request with the given credential header.
    async fn fetch(
        &self,
        request: ApiRequest,
        auth: &AuthHeader,
    ) -> Result<RawResponse, UpstreamError>;
}

// Compile-time check: ResponseSource must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn ResponseSource) {}
};
