use crate::api::content;
use crate::api::server::AppState;
use crate::interactions::dispatch::Outcome;
use crate::interactions::model::Interaction;
use crate::interactions::verify;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const SIGNATURE_HEADER: &str = "x-signature-ed25519";
const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/interactions", post(interactions))
        .route("/health", get(health))
        .route("/privacy", get(privacy))
        .route("/terms", get(terms))
        .route("/invite", get(invite))
        .route("/server", get(server))
        .route("/github", get(github))
        .route("/", get(root))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.api_timeout))
        .with_state(state)
}

async fn interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Verification runs over the raw bytes as received; the body is parsed only afterwards.
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    if !verify::verify(&body, signature, timestamp, &state.verifying_key) {
        tracing::debug!("rejected interaction with missing or invalid signature");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(err) => {
            tracing::debug!("unparseable interaction body: {err}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    state.dispatcher.dispatch(interaction).await.into_response()
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Reply(envelope) => Json(envelope).into_response(),
            Outcome::NotFound => StatusCode::NOT_FOUND.into_response(),
            Outcome::Failed => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            Outcome::Unimplemented => StatusCode::NOT_IMPLEMENTED.into_response(),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[allow(clippy::unused_async)]
async fn health() -> impl IntoResponse {
    (
        [(
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, proxy-revalidate",
        )],
        "OK",
    )
}

#[allow(clippy::unused_async)]
async fn privacy() -> &'static str {
    content::PRIVACY
}

#[allow(clippy::unused_async)]
async fn terms() -> &'static str {
    content::TERMS
}

#[allow(clippy::unused_async)]
async fn invite(State(state): State<AppState>) -> Response {
    moved(state.config.invite_url())
}

#[allow(clippy::unused_async)]
async fn server(State(state): State<AppState>) -> Response {
    moved(state.config.server_url.clone())
}

#[allow(clippy::unused_async)]
async fn github(State(state): State<AppState>) -> Response {
    moved(state.config.github_url.clone())
}

#[allow(clippy::unused_async)]
async fn root(State(state): State<AppState>) -> Response {
    moved(state.config.github_url.clone())
}

// axum's Redirect::permanent answers 308; the platform docs describe these as plain 301s.
fn moved(location: String) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}
