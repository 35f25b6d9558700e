use std::{
    future::IntoFuture as _,
    io,
    sync::{Arc, OnceLock},
    time,
};

use application::{api, config, graphql, Args, Config};
use axum::{
    extract::MatchedPath,
    routing::{on, MethodFilter},
    Extension, Router,
};
use axum_client_ip::InsecureClientIp;
use futures::{future, TryFutureExt as _};
use service::{
    infra::{postgres, Postgres},
    Service,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer, SubscriberExt as _},
    registry::LookupSpan,
    util::SubscriberInitExt as _,
};

/// Levels written to `stderr` rather than `stdout`.
const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

/// Maximum level of the logged events, known once [`Config`] is loaded.
static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

postgres::embed_migrations!("../migrations");

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(log_layer(io::stdout, false))
        .with(log_layer(io::stderr, true))
        .init();

    _ = run().await;
}

/// Builds a log [`Layer`] writing either the [`STDERR_LEVELS`] or all the
/// other ones to the provided `writer`.
fn log_layer<S, W>(writer: W, errors: bool) -> impl Layer<S>
where
    S: log::Subscriber + for<'s> LookupSpan<'s>,
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(true)
        .with_thread_names(true)
        .with_writer(writer)
        .with_filter(filter_fn(move |meta| {
            let max = LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO);
            meta.is_span()
                || STDERR_LEVELS.contains(meta.level()) == errors
                    && max >= *meta.level()
        }))
}

/// Runs the dealership backend until the webserver or a background task
/// stops, or a shutdown signal is received.
async fn run() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        postgres,
        service,
        server,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("set once on startup"));

    let mut postgres =
        Postgres::new(&postgres.into()).map_err(|e| {
            log::error!("failed to initialize `Postgres` database: {e}");
        })?;

    let report = migrations::runner()
        .run_async(&mut postgres)
        .await
        .map_err(|e| {
            log::error!("failed to migrate database: {e}");
        })?;
    for m in report.applied_migrations() {
        log::info!("applied `{m}` database migration");
    }

    let (service, background) = Service::new(service.into(), postgres);

    let schema = api::Schema::new(
        api::Query,
        api::Mutation,
        juniper::EmptySubscription::new(),
    );

    let app = Router::new()
        .route(
            "/graphql",
            on(MethodFilter::GET.or(MethodFilter::POST), graphql),
        )
        .layer(Extension(Arc::new(schema)))
        .layer(Extension(service))
        .layer(cors(&server)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span::<axum::body::Body>())
                .on_response(response_logger::<axum::body::Body>()),
        );

    let addr = (server.host.clone(), server.port);
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        log::error!(
            "failed to listen on `{}:{}`: {e}",
            server.host,
            server.port,
        );
    })?;
    log::info!("listening on `{}:{}`", server.host, server.port);

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("failed to listen for shutdown signal: {e}");
                future::pending::<()>().await;
            }
            log::info!("shutting down");
        })
        .into_future()
        .map_err(|e| log::error!("webserver failed: {e}"));

    // Background tasks run forever, so the webserver stopping ends the run.
    future::select(Box::pin(serve), background.into_future().map_err(drop))
        .await
        .factor_first()
        .0
}

/// Builds the [`CorsLayer`] allowing the configured origins.
fn cors(server: &config::Server) -> Result<CorsLayer, ()> {
    server.cors.origins.iter().try_fold(
        CorsLayer::new()
            .allow_methods([
                http::Method::GET,
                http::Method::OPTIONS,
                http::Method::POST,
            ])
            .allow_headers([http::header::CONTENT_TYPE]),
        |cors, origin| {
            let origin = origin
                .parse::<http::header::HeaderValue>()
                .map_err(|e| {
                    log::error!("`{origin}` is not a valid CORS origin: {e}");
                })?;
            Ok(cors.allow_origin(origin))
        },
    )
}

/// Creates the [`log::Span`] of every HTTP request.
fn request_span<B>() -> impl MakeSpan<B> + Clone {
    |r: &http::Request<B>| {
        log::info_span!(
            "HTTP request",
            http.client_ip = InsecureClientIp::from(r.headers(), r.extensions())
                .map(|ip| ip.0.to_string())
                .ok(),
            http.flavor = ?r.version(),
            http.host = r.uri().host(),
            http.method = r.method().as_str(),
            http.route = r
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str),
            http.scheme = r.uri().scheme().map(http::uri::Scheme::as_str),
            http.target = r
                .uri()
                .path_and_query()
                .map(http::uri::PathAndQuery::as_str),
            http.user_agent = r
                .headers()
                .get("User-Agent")
                .and_then(|h| h.to_str().ok()),
            http.status_code = log::field::Empty,
        )
    }
}

/// Logs the status and the duration of every HTTP response.
fn response_logger<B>() -> impl OnResponse<B> + Clone {
    |r: &http::Response<B>, dur: time::Duration, span: &log::Span| {
        _ = span.record(
            "http.status_code",
            log::field::display(r.status().as_u16()),
        );
        let duration = format!("{}ms", dur.as_millis());
        if r.status().is_server_error() || r.status().is_client_error() {
            log::error!(duration = duration.as_str());
        } else {
            log::info!(duration = duration.as_str());
        }
    }
}
