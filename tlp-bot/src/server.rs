use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use serenity::all::ChannelId;
use tracing::{error, info};

use crate::announce::Announcer;
use crate::render;

const EVENT_REQUEST_PATH: &str = "/api/event_request";
const HEALTH_PATH: &str = "/api/health";

pub struct ServerState {
    pub announcer: Arc<dyn Announcer>,
    pub event_request_channel: Option<ChannelId>,
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(
            EVENT_REQUEST_PATH,
            post(handle_event_request).fallback(|| async {
                error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
            }),
        )
        .route(HEALTH_PATH, get(|| async { "ok" }))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(state)
}

#[derive(Deserialize)]
struct EventRequest {
    #[serde(default)]
    link: Option<String>,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn handle_event_request(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Response {
    let link = match body {
        Ok(Json(EventRequest { link: Some(link) })) if !link.trim().is_empty() => link,
        _ => return error_response(StatusCode::BAD_REQUEST, "Missing link in payload"),
    };

    info!("event request received");

    let Some(channel) = state.event_request_channel else {
        error!("no event request channel configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send Discord message");
    };

    if let Err(err) = state
        .announcer
        .announce(channel, None, render::event_request(link.trim()))
        .await
    {
        error!(%err, "sending event request to Discord failed");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send Discord message");
    }

    Json(json!({
        "status": "ok",
        "message": "Event request sent successfully to Discord",
    }))
    .into_response()
}
