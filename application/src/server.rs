//! HTTP server exposing the GraphQL API.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::MatchedPath,
    routing::{on, MethodFilter},
    Extension, Router,
};
use axum_client_ip::InsecureClientIp;
use http::header::{HeaderValue, InvalidHeaderValue};
use juniper_axum::extract::JuniperRequest;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{api, config, Context, JuniperResponse, Service};

/// Builds the [`Router`] serving the GraphQL API of the provided [`Service`]
/// at `/graphql`.
///
/// # Errors
///
/// If any of the configured [CORS] origins is not a valid header value.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
pub fn router(
    service: Service,
    cors: &config::Cors,
) -> Result<Router, InvalidHeaderValue> {
    let schema = api::Schema::new(
        api::Query,
        api::Mutation,
        juniper::EmptySubscription::new(),
    );

    let trace = TraceLayer::new_for_http()
        .make_span_with(|r: &http::Request<_>| {
            tracing::info_span!(
                "HTTP request",
                http.client_ip = InsecureClientIp::from(
                    r.headers(),
                    r.extensions(),
                )
                .map(|ip| ip.0.to_string())
                .ok(),
                http.flavor = ?r.version(),
                http.host = r.uri().host(),
                http.method = r.method().as_str(),
                http.route = r
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str),
                http.target = r
                    .uri()
                    .path_and_query()
                    .map(http::uri::PathAndQuery::as_str),
                http.user_agent = r
                    .headers()
                    .get(http::header::USER_AGENT)
                    .and_then(|h| h.to_str().ok()),
                http.status_code = tracing::field::Empty,
            )
        })
        .on_response(
            |r: &http::Response<_>, dur: Duration, span: &tracing::Span| {
                let status = r.status();
                _ = span.record(
                    "http.status_code",
                    tracing::field::display(status.as_u16()),
                );

                let duration = format!("{}ms", dur.as_millis());
                if status.is_server_error() {
                    tracing::error!(duration);
                } else if status.is_client_error() {
                    tracing::warn!(duration);
                } else {
                    tracing::info!(duration);
                }
            },
        );

    Ok(Router::new()
        .route(
            "/graphql",
            on(MethodFilter::GET.or(MethodFilter::POST), graphql),
        )
        .layer(Extension(Arc::new(schema)))
        .layer(Extension(service))
        .layer(cors_layer(cors)?)
        .layer(trace))
}

/// Executes a GraphQL request.
async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    context: Context,
    JuniperRequest(request): JuniperRequest,
) -> JuniperResponse {
    let response = request.execute(&*schema, &context).await;
    JuniperResponse {
        status_code: context.error_status_code(),
        response,
    }
}

/// Builds the [`CorsLayer`] allowing the configured origins.
///
/// `*` among the origins allows any of them.
fn cors_layer(cors: &config::Cors) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = if cors.origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            cors.origins
                .iter()
                .map(|o| o.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()?,
        )
    };

    Ok(CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
        ])
        .allow_origin(origins))
}

#[cfg(test)]
mod spec {
    use super::cors_layer;
    use crate::config;

    #[test]
    fn allows_listed_origins() {
        let cors = config::Cors {
            origins: vec![
                "https://travel.example".to_owned(),
                "http://localhost:3000".to_owned(),
            ],
        };

        assert!(cors_layer(&cors).is_ok());
        assert!(cors_layer(&config::Cors::default()).is_ok());
    }

    #[test]
    fn rejects_malformed_origin() {
        let cors = config::Cors {
            origins: vec!["https://travel.example\n".to_owned()],
        };

        assert!(cors_layer(&cors).is_err());
    }
}
