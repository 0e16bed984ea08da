use std::sync::Arc;

use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::device::actor::DeviceActor;
use crate::device::DeviceRole;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::session_factory::actor_client::SessionFactoryClient;
use crate::websocket::message::WsMessageOut;
use crate::websocket::send_error_and_close;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    id: String,
    room_code: String,
}

pub async fn create(State(session_factory): State<Arc<SessionFactoryClient>>) -> Response {
    match session_factory.create_session().await {
        Ok((id, room_code)) => {
            (StatusCode::OK, Json(CreateGameResponse { id, room_code })).into_response()
        }
        Err(error) => {
            log::error!("Could not create a Session. Error: '{error}'.");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The explainer device's websocket, looked up by session id.
pub async fn connect_main_device(
    State(session_factory): State<Arc<SessionFactoryClient>>,
    Path(game_id): Path<String>,
    websocket_upgrade: WebSocketUpgrade,
) -> Response {
    websocket_upgrade.on_upgrade(move |websocket| async move {
        match session_factory.get_session(&game_id).await {
            Ok(session) => DeviceActor::create(DeviceRole::Main, session, websocket).await,
            Err(error) => send_error_and_close(websocket, &error).await,
        }
    })
}

/// The timer device's websocket, looked up by room code. The join
/// mutation runs as part of the subscription.
pub async fn connect_timer_device(
    State(session_factory): State<Arc<SessionFactoryClient>>,
    Path(room_code): Path<String>,
    websocket_upgrade: WebSocketUpgrade,
) -> Response {
    websocket_upgrade.on_upgrade(move |websocket| async move {
        match session_factory.get_session_by_code(&room_code).await {
            Ok(session) => DeviceActor::create(DeviceRole::Timer, session, websocket).await,
            Err(error) => send_error_and_close(websocket, &error).await,
        }
    })
}

/// One-shot lookup used by the timer device before it joins.
pub async fn get_by_code(
    State(session_factory): State<Arc<SessionFactoryClient>>,
    Path(room_code): Path<String>,
) -> Response {
    let snapshot = match session_factory.get_session_by_code(&room_code).await {
        Ok(session) => session.snapshot().await,
        Err(error) => Err(error),
    };
    match snapshot {
        Ok(snapshot) => (StatusCode::OK, Json(WsMessageOut::from(snapshot))).into_response(),
        Err(Error::Domain(DomainError::RoomNotFound(room_code))) => {
            (StatusCode::NOT_FOUND, format!("No room uses the code {room_code}."))
                .into_response()
        }
        Err(error) => {
            log::error!("Could not read the Session. RoomCode: '{room_code}', Error: '{error}'.");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
