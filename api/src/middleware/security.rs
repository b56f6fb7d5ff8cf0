//! Security middleware: HTTPS enforcement, origin sanity checks and
//! hardening headers on every response.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue, ORIGIN},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use nexo_core::errors::DomainError;
use nexo_shared::config::{Environment, ServerConfig};
use std::{
    future::{ready, Ready},
    net::SocketAddr,
    rc::Rc,
    task::{Context, Poll},
};

use crate::handlers::ApiError;

const HARDENING_HEADERS: [(&str, &str); 5] = [
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("content-security-policy", "default-src 'none'; frame-ancestors 'none';"),
];

/// Security middleware factory
#[derive(Debug, Clone)]
pub struct SecurityMiddleware {
    enforce_https: bool,
    add_security_headers: bool,
    /// Peers whose `X-Forwarded-Proto` is believed
    trusted_proxies: Vec<String>,
}

impl SecurityMiddleware {
    /// Settings for a deployment environment
    ///
    /// Production enforces HTTPS; every environment but development adds the
    /// hardening headers.
    pub fn new(environment: Environment, server: &ServerConfig) -> Self {
        let middleware = Self {
            enforce_https: environment == Environment::Production,
            add_security_headers: environment != Environment::Development,
            trusted_proxies: server.trusted_proxies.clone(),
        };
        log::info!(
            "Security middleware configured: enforce_https={}, add_headers={}, trusted_proxies={:?}",
            middleware.enforce_https,
            middleware.add_security_headers,
            middleware.trusted_proxies
        );
        middleware
    }

    pub fn development() -> Self {
        Self {
            enforce_https: false,
            add_security_headers: false,
            trusted_proxies: Vec::new(),
        }
    }

    /// Headers only, no HTTPS enforcement
    pub fn headers_only() -> Self {
        Self {
            add_security_headers: true,
            ..Self::development()
        }
    }

}

impl Default for SecurityMiddleware {
    fn default() -> Self {
        Self::development()
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            settings: Rc::new(self.clone()),
        }))
    }
}

pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    settings: Rc<SecurityMiddleware>,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let settings = Rc::clone(&self.settings);

        Box::pin(async move {
            if let Some(rejection) = check_request(&req, &settings) {
                let response = rejection.error_response().map_into_right_body();
                return Ok(req.into_response(response));
            }

            let mut response = service.call(req).await?;
            if settings.add_security_headers {
                let headers = response.headers_mut();
                for (name, value) in HARDENING_HEADERS {
                    headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
                }
            }
            Ok(response.map_into_left_body())
        })
    }
}

fn check_request(req: &ServiceRequest, settings: &SecurityMiddleware) -> Option<ApiError> {
    if settings.enforce_https && !is_secure_request(req, &settings.trusted_proxies) {
        log::warn!("Insecure request blocked: {} {}", req.method(), req.path());
        return Some(ApiError::Domain(DomainError::forbidden("HTTPS required")));
    }

    match req.headers().get(ORIGIN) {
        Some(origin) if !is_valid_origin(origin) => {
            log::warn!("Invalid origin blocked: {:?} for {}", origin, req.path());
            Some(ApiError::BadRequest("Invalid request origin".to_string()))
        }
        _ => None,
    }
}

/// TLS listener, a loopback peer, or `X-Forwarded-Proto: https` from a
/// trusted proxy. `ConnectionInfo` is not used here since it already believes
/// forwarding headers from any client.
fn is_secure_request(req: &ServiceRequest, trusted_proxies: &[String]) -> bool {
    if req.app_config().secure() {
        return true;
    }
    let Some(peer) = req.peer_addr() else {
        return false;
    };
    if peer.ip().is_loopback() {
        return true;
    }

    let forwarded_https = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .map(|proto| proto.eq_ignore_ascii_case("https"))
        .unwrap_or(false);
    forwarded_https && is_trusted_proxy(&peer, trusted_proxies)
}

fn is_trusted_proxy(peer: &SocketAddr, trusted_proxies: &[String]) -> bool {
    let ip = peer.ip().to_string();
    let addr = peer.to_string();
    trusted_proxies
        .iter()
        .any(|trusted| *trusted == ip || *trusted == addr)
}

/// Well-formed web origin; the allow-list itself is enforced by CORS
fn is_valid_origin(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|origin| origin.starts_with("http://") || origin.starts_with("https://"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{call_service, init_service, TestRequest};
    use actix_web::{http::StatusCode, web, App, HttpResponse};

    #[test]
    fn test_trusted_proxy_matching() {
        let proxies = vec!["10.0.0.1".to_string(), "[fd00::1]:8443".to_string()];
        assert!(is_trusted_proxy(&"10.0.0.1:5000".parse().unwrap(), &proxies));
        assert!(!is_trusted_proxy(&"10.0.0.2:5000".parse().unwrap(), &proxies));
        assert!(is_trusted_proxy(&"[fd00::1]:8443".parse().unwrap(), &proxies));
    }

    #[test]
    fn test_origin_shape() {
        assert!(is_valid_origin(&HeaderValue::from_static("http://localhost:3000")));
        assert!(!is_valid_origin(&HeaderValue::from_static("file://evil")));
    }

    #[actix_web::test]
    async fn test_headers_added_when_enabled() {
        let app = init_service(
            App::new()
                .wrap(SecurityMiddleware::headers_only())
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = call_service(&app, TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
    }

    #[actix_web::test]
    async fn test_production_trusts_configured_proxy_only() {
        let mut server = ServerConfig::default();
        server.trusted_proxies = vec!["10.0.0.1".to_string()];
        let app = init_service(
            App::new()
                .wrap(SecurityMiddleware::new(Environment::Production, &server))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let forwarded = |peer: &str| {
            TestRequest::get()
                .uri("/")
                .insert_header(("host", "api.nexostore.com"))
                .insert_header(("x-forwarded-proto", "https"))
                .peer_addr(peer.parse().unwrap())
                .to_request()
        };
        let resp = call_service(&app, forwarded("10.0.0.1:5000")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("strict-transport-security"));

        let resp = call_service(&app, forwarded("10.0.0.9:5000")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let spoofed_host = TestRequest::get()
            .uri("/")
            .insert_header(("x-forwarded-host", "localhost"))
            .peer_addr("203.0.113.7:4000".parse().unwrap())
            .to_request();
        let resp = call_service(&app, spoofed_host).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let local = TestRequest::get()
            .uri("/")
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_request();
        assert_eq!(call_service(&app, local).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_malformed_origin_rejected() {
        let app = init_service(
            App::new()
                .wrap(SecurityMiddleware::development())
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = TestRequest::get()
            .uri("/")
            .insert_header((ORIGIN, "null"))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
