//! API Middleware
//!
//! Request correlation, logging and security response headers.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use uuid::Uuid;

/// Header carrying the request correlation id
pub const CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Correlation id of the current request, available as a request extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

impl CorrelationId {
    /// Reuse the caller's id when it is a valid UUID, otherwise mint one
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(&CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);
        Self(id)
    }
}

// =========================================================================
// Header masking
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let masked_value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request logging
// =========================================================================

/// Request logging middleware
///
/// Attaches a [`CorrelationId`] to the request, logs request and response,
/// and echoes the id back in the `X-Correlation-Id` response header.
pub async fn logging_middleware(mut request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let headers = mask_headers_for_logging(request.headers());
    let correlation_id = CorrelationId::from_headers(request.headers());
    request.extensions_mut().insert(correlation_id);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = %correlation_id.0,
        headers = ?headers,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = %correlation_id.0,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&correlation_id.0.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }

    response
}

// =========================================================================
// Security headers
// =========================================================================

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     style-src 'self' 'unsafe-inline'; \
     script-src 'self'; \
     img-src 'self' data: https:; \
     connect-src 'self'; \
     font-src 'self'; \
     object-src 'none'; \
     media-src 'self'; \
     frame-src 'none'";

/// Headers set on every response, replacing any value a handler wrote
pub fn security_headers() -> [(HeaderName, HeaderValue); 5] {
    [
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        ),
        (
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer, strict-origin-when-cross-origin"),
        ),
        (
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ),
    ]
}

/// Layer [`security_headers`] onto `router`
pub fn with_security_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    security_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(name, value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("authorization", "Bearer secret".parse().unwrap());
        headers.insert("x-correlation-id", "abc".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let authorization = masked.iter().find(|(k, _)| k == "authorization");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");
        let correlation = masked.iter().find(|(k, _)| k == "x-correlation-id");

        assert_eq!(authorization.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
        assert_eq!(correlation.unwrap().1, "abc");
    }

    #[test]
    fn test_security_headers_are_valid() {
        let headers = security_headers();
        let names: Vec<&str> = headers.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(
            names,
            [
                "x-content-type-options",
                "x-frame-options",
                "strict-transport-security",
                "referrer-policy",
                "content-security-policy",
            ]
        );
        let csp = headers[4].1.to_str().unwrap();
        assert!(csp.starts_with("default-src 'self'; style-src"));
        assert!(csp.ends_with("frame-src 'none'"));
    }

    #[test]
    fn test_correlation_id_reused_when_valid() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert("x-correlation-id", id.to_string().parse().unwrap());

        assert_eq!(CorrelationId::from_headers(&headers), CorrelationId(id));
    }

    #[test]
    fn test_correlation_id_generated_when_missing_or_invalid() {
        let mut headers = HeaderMap::new();
        let generated = CorrelationId::from_headers(&headers);
        assert_ne!(generated.0, Uuid::nil());

        headers.insert("x-correlation-id", "not-a-uuid".parse().unwrap());
        let replaced = CorrelationId::from_headers(&headers);
        assert_ne!(replaced, generated);
    }
}
