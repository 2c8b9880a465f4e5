use axum::extract::State;
use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};

/// Which optional security headers to emit
#[derive(Clone, Copy, Debug, Default)]
pub struct SecurityHeaders {
    /// Send `Strict-Transport-Security`; only meaningful behind HTTPS
    pub hsts: bool,
}

impl SecurityHeaders {
    pub fn for_environment(is_production: bool) -> Self {
        Self {
            hsts: is_production,
        }
    }
}

/// Security headers middleware
///
/// Install with `axum::middleware::from_fn_with_state(SecurityHeaders, ..)`.
pub async fn security_headers_middleware(
    State(config): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if config.hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    // Pages are server-rendered with inline styles and no scripts
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(
            "default-src 'self'; script-src 'none'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; form-action 'self'",
        ),
    );

    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn headers_for(config: SecurityHeaders) -> axum::http::HeaderMap {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                config,
                security_headers_middleware,
            ));
        app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .headers()
            .clone()
    }

    #[tokio::test]
    async fn test_headers_present() {
        let headers = headers_for(SecurityHeaders::default()).await;

        assert_eq!(headers["X-Content-Type-Options"], "nosniff");
        assert_eq!(headers["X-Frame-Options"], "DENY");
        assert!(headers.contains_key("Content-Security-Policy"));
        assert!(!headers.contains_key("Strict-Transport-Security"));
    }

    #[tokio::test]
    async fn test_hsts_only_in_production() {
        let headers = headers_for(SecurityHeaders::for_environment(true)).await;
        assert!(headers.contains_key("Strict-Transport-Security"));
    }
}
