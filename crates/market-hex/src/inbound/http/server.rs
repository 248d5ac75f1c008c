use axum::{routing::get, serve, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::handlers::*;
use crate::application::Services;
use market_types::ports::Repository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R> {
    pub services: Services<R>,
    pub config: HttpServerConfig,
}

/// All routes with request tracing, ready to be served.
pub fn router<R: Repository>(services: Services<R>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            let request_id = Uuid::new_v4();
            tracing::info_span!(
                "http_request",
                %request_id,
                method = %request.method(),
                uri
            )
        })
        .on_request(|request: &axum::extract::Request<_>, span: &tracing::Span| {
            tracing::info!(
                parent: span,
                method = %request.method(),
                uri = %request.uri(),
                "request"
            );
        })
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    status = %response.status(),
                    latency_ms = %latency.as_millis(),
                    "response"
                );
            },
        );

    Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users::<R>).post(create_user::<R>))
        .route(
            "/users/{id}",
            get(get_user::<R>)
                .put(update_user::<R>)
                .delete(delete_user::<R>),
        )
        .route("/orders", get(list_orders::<R>).post(create_order::<R>))
        .route(
            "/orders/{id}",
            get(get_order::<R>)
                .put(update_order::<R>)
                .delete(delete_order::<R>),
        )
        .route("/offers", get(list_offers::<R>).post(create_offer::<R>))
        .route(
            "/offers/{id}",
            get(get_offer::<R>)
                .put(update_offer::<R>)
                .delete(delete_offer::<R>),
        )
        .layer(trace_layer)
        .with_state(services)
}

impl<R: Repository> HttpServer<R> {
    pub async fn new(services: Services<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self { services, config })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` resolves, then lets in-flight requests finish.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.services);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}
