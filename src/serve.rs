//! Purpose: Provide the HTTP/JSON API server for Planar.
//! Exports: `ServeConfig`, `serve`.
//! Role: Axum-based loopback server exposing invoice, price, and shape endpoints.
//! Invariants: Shape envelopes go through the shared codec paths; error kinds
//! map to statuses only here, never inside the core.
//! Invariants: Loopback-only unless explicitly allowed.
//! Notes: Request bodies are fully buffered before decode; the fast endpoint
//! therefore always sees one contiguous buffer.

use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, Path as AxumPath, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use planar::api::{
    Error, ErrorKind, ShapeCodec, dispatch, dispatch_batch, fastpath, now_rfc3339, unix_seconds,
};
use planar::billing::{Invoice, PriceQuery, PriceResponse};

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub max_body_bytes: u64,
    pub allow_non_loopback: bool,
}

struct AppState {
    codec: ShapeCodec,
    started_at: OffsetDateTime,
}

pub async fn serve(config: ServeConfig) -> Result<(), Error> {
    validate_config(&config)?;

    init_tracing();

    let max_body_bytes: usize = config
        .max_body_bytes
        .try_into()
        .map_err(|_| Error::new(ErrorKind::Usage).with_message("--max-body-bytes is too large"))?;

    let state = Arc::new(AppState {
        codec: ShapeCodec::new(),
        started_at: OffsetDateTime::now_utc(),
    });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/invoices", post(create_invoice))
        .route("/api/invoices/:id", get(get_invoice))
        .route("/api/prices", post(get_price))
        .route("/api/shapes", post(calculate_area))
        .route("/api/shapes/batch", post(calculate_area_batch))
        .route("/api/shapes/fast", post(calculate_area_fast))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to bind server")
                .with_source(err)
        })?;
    tracing::info!(bind = %config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("server failed")
                .with_source(err)
        })?;
    Ok(())
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => addr.is_loopback(),
        IpAddr::V6(addr) => addr.is_loopback(),
    }
}

fn validate_config(config: &ServeConfig) -> Result<(), Error> {
    if !is_loopback(config.bind.ip()) && !config.allow_non_loopback {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("non-loopback bind requires explicit opt-in")
            .with_hint("Re-run with --allow-non-loopback or use a loopback address."));
    }

    if config.max_body_bytes == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("--max-body-bytes must be greater than zero")
            .with_hint("Use a positive value like 1048576."));
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler");
        signal.recv().await;
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    ok: bool,
    #[serde(with = "unix_seconds")]
    started_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

async fn healthz(State(state): State<Arc<AppState>>) -> Response {
    json_response(&Health {
        ok: true,
        started_at: state.started_at,
    })
}

async fn create_invoice(Json(mut invoice): Json<Invoice>) -> Response {
    invoice.id = Uuid::new_v4().to_string();
    invoice.issued_date = Some(now_rfc3339());
    json_response(&invoice)
}

async fn get_invoice(AxumPath(id): AxumPath<String>) -> Response {
    json_response(&Invoice::sample(&id))
}

async fn get_price(Json(query): Json<PriceQuery>) -> Response {
    tracing::debug!(product_id = %query.product_id, region = %query.region, "price query");
    json_response(&PriceResponse::sample())
}

async fn calculate_area(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let shape = match state.codec.decode_shape(&body) {
        Ok(shape) => shape,
        Err(err) => return error_response(err),
    };
    let result = dispatch(&shape);
    match state.codec.encode_result(&result) {
        Ok(bytes) => raw_json_response(bytes),
        Err(err) => error_response(err),
    }
}

async fn calculate_area_batch(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let shapes = match state.codec.decode_batch(&body) {
        Ok(shapes) => shapes,
        Err(err) => return error_response(err),
    };
    let results = dispatch_batch(&shapes);
    match state.codec.encode_results(&results) {
        Ok(bytes) => raw_json_response(bytes),
        Err(err) => error_response(err),
    }
}

// The fast route deliberately shares no state with the codec above; both
// paths emit the same bytes for the same result.
async fn calculate_area_fast(body: Bytes) -> Response {
    let shape = match fastpath::decode_shape(&body) {
        Ok(shape) => shape,
        Err(err) => return error_response(err),
    };
    let result = dispatch(&shape);
    match fastpath::encode_result(&result) {
        Ok(bytes) => raw_json_response(bytes),
        Err(err) => error_response(err),
    }
}

fn json_response<T: Serialize>(payload: &T) -> Response {
    let mut response = Json(payload).into_response();
    response
        .headers_mut()
        .insert("planar-version", HeaderValue::from_static("0"));
    response
}

fn raw_json_response(bytes: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(bytes));
    response.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
        .headers_mut()
        .insert("planar-version", HeaderValue::from_static("0"));
    response
}

fn error_response(err: Error) -> Response {
    let status = match err.kind() {
        ErrorKind::Usage
        | ErrorKind::UnknownVariant
        | ErrorKind::InvalidPayload
        | ErrorKind::EmptyBody => StatusCode::BAD_REQUEST,
        ErrorKind::Io | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorEnvelope {
        error: ErrorBody {
            kind: format!("{:?}", err.kind()),
            message: err.message().unwrap_or("error").to_string(),
            hint: err.hint().map(str::to_string),
        },
    };
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert("planar-version", HeaderValue::from_static("0"));
    response
}
