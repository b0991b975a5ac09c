use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::log_out::log_out;
use super::handlers::me::me;
use super::handlers::refresh_tokens::refresh_tokens;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::middleware::authenticate as auth_middleware;
use crate::domain::session::ports::SessionServicePort;

pub struct AppState<S: SessionServicePort> {
    pub session_service: Arc<S>,
    pub cookie_secure: bool,
}

impl<S: SessionServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            session_service: Arc::clone(&self.session_service),
            cookie_secure: self.cookie_secure,
        }
    }
}

/// Build the HTTP router around a session service.
///
/// # Arguments
/// * `session_service` - Engine behind every route
/// * `cookie_secure` - Whether refresh cookies carry the `Secure` attribute
/// * `request_timeout` - Upper bound on handling time for a single request
pub fn create_router<S: SessionServicePort>(
    session_service: Arc<S>,
    cookie_secure: bool,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        session_service,
        cookie_secure,
    };

    let public_routes = Router::new()
        .route("/api/auth/sign-in", post(sign_in::<S>))
        .route("/api/auth/sign-up", post(sign_up::<S>))
        .route("/api/auth/refresh", post(refresh_tokens::<S>));

    let protected_routes = Router::new()
        .route("/api/auth/log-out", post(log_out::<S>))
        .route("/api/auth/me", get(me))
        .route("/api/auth/password", put(change_password::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
