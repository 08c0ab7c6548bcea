//! Error vocabulary shared by the third-party metadata ports.

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Failures raised by adapters that call external metadata providers.
    pub enum UpstreamError {
        /// The request never completed (DNS, TLS, connection reset).
        Transport { message: String } => "upstream transport failed: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } => "upstream request timed out: {message}",
        /// The provider throttled the request.
        RateLimited { message: String } => "upstream rate limited: {message}",
        /// The requested record does not exist upstream.
        NotFound { message: String } => "upstream record not found: {message}",
        /// The provider refused the request as malformed.
        Rejected { message: String } => "upstream rejected request: {message}",
        /// The payload did not match the expected shape.
        Decode { message: String } => "upstream payload could not be decoded: {message}",
        /// The adapter is missing credentials.
        NotConfigured { provider: String } => "{provider} is not configured",
    }
}

/// Translate an upstream failure into the API error surface.
///
/// `not_found` is the client-facing message for a missing record. A request
/// the provider refuses is the caller's fault. Every other failure becomes an
/// internal error; its detail is logged and redacted.
pub fn map_upstream_error(error: UpstreamError, not_found: &str) -> Error {
    match error {
        UpstreamError::NotFound { .. } => Error::not_found(not_found),
        UpstreamError::Rejected { message } => {
            Error::invalid_request(format!("metadata provider rejected the request: {message}"))
        }
        other => Error::internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case::missing(UpstreamError::not_found("movie 1"), ErrorCode::NotFound)]
    #[case::timeout(UpstreamError::timeout("tmdb"), ErrorCode::InternalError)]
    #[case::throttled(UpstreamError::rate_limited("tmdb"), ErrorCode::InternalError)]
    #[case::rejected(UpstreamError::rejected("page"), ErrorCode::InvalidRequest)]
    #[case::unconfigured(UpstreamError::not_configured("TMDB"), ErrorCode::InternalError)]
    fn maps_upstream_failures(#[case] error: UpstreamError, #[case] expected: ErrorCode) {
        assert_eq!(map_upstream_error(error, "Movie not found").code(), expected);
    }

    #[rstest]
    fn not_found_uses_caller_message() {
        let error = map_upstream_error(UpstreamError::not_found("x"), "Book not found");
        assert_eq!(error.message(), "Book not found");
    }
}
