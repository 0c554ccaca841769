use super::types::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, ModelsResponse};
use crate::relay::{MODEL_LISTING_FAILURE_MESSAGE, Relay, RelayError};
use axum::{
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::Json,
};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn relay_error(err: &RelayError) -> ApiError {
    let status = match err {
        RelayError::MissingQuery => StatusCode::BAD_REQUEST,
        RelayError::MissingCredential | RelayError::Upstream(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_body(status, err.public_message())
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| {
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
}

/// An empty body, or one that is not declared as JSON, carries no `userQuery`.
/// Only a declared JSON body that fails to parse is rejected outright.
fn parse_chat_request(headers: &HeaderMap, body: &Bytes) -> Result<ChatRequest, JsonRejection> {
    if body.iter().all(u8::is_ascii_whitespace) || !has_json_content_type(headers) {
        return Ok(ChatRequest::default());
    }
    Json::<ChatRequest>::from_bytes(body).map(|Json(request)| request)
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = match parse_chat_request(&headers, &body) {
        Ok(request) => request,
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection.body_text());
            return Err(error_body(StatusCode::BAD_REQUEST, rejection.body_text()));
        }
    };

    let request_id = Uuid::new_v4();

    async move {
        info!("Received chat request");

        match state.relay.handle(request.user_query.as_deref()).await {
            Ok(text) => Ok(Json(ChatResponse { text })),
            Err(e) => {
                warn!("Chat request failed: {}", e.public_message());
                Err(relay_error(&e))
            }
        }
    }
    .instrument(info_span!("chat", %request_id))
    .await
}

pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    match state.relay.list_models().await {
        Ok(models) => Ok(Json(ModelsResponse {
            models: models.into_iter().map(|m| m.name).collect(),
        })),
        Err(RelayError::Upstream(_)) => Err(error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            MODEL_LISTING_FAILURE_MESSAGE,
        )),
        Err(e) => Err(relay_error(&e)),
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
