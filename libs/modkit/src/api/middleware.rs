use std::time::Duration;

use axum::{middleware::from_fn, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::api::request_id;

/// Options for the standard HTTP middleware stack.
#[derive(Debug, Clone)]
pub struct HttpStackOptions {
    /// Handler timeout; `None` disables it.
    pub timeout: Option<Duration>,
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
}

impl Default for HttpStackOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            cors_enabled: false,
            body_limit_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Wrap a router with the standard stack.
///
/// Order, outermost to innermost:
/// PropagateRequestId -> SetRequestId -> push_req_id_to_extensions -> Trace -> Timeout -> CORS -> BodyLimit
pub fn with_http_stack(router: Router, opts: &HttpStackOptions) -> Router {
    let mut router = router.layer(RequestBodyLimitLayer::new(opts.body_limit_bytes));

    if opts.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    if let Some(timeout) = opts.timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }

    let x_request_id = request_id::header();
    router
        .layer(request_id::create_trace_layer())
        .layer(from_fn(request_id::push_req_id_to_extensions))
        .layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            request_id::MakeReqId,
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id))
}
