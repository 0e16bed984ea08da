pub mod message;

use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;

use crate::error::domain_error::DomainError;
use crate::error::Error;
use message::{WsMessageIn, WsMessageOut};

pub async fn send_error(websocket: &mut WebSocket, error: &Error) {
    let _ = send_message(websocket, &error_to_ws_error(error)).await;
}

pub async fn send_error_and_close(mut websocket: WebSocket, error: &Error) {
    // The websocket is going away, ignore any failure of this last send
    let _ = send_message(&mut websocket, &error_to_ws_error(error)).await;
    close(websocket).await;
}

pub async fn close(mut websocket: WebSocket) {
    if let Err(error) = websocket.close().await {
        log::error!("Could not close the WebSocket. Error: '{error}'.")
    }
}

pub fn parse_message(message: &str) -> Result<WsMessageIn, Error> {
    serde_json::from_str(message)
        .map_err(|error| Error::UnprocessableMessage(error.to_string(), message.to_string()))
}

pub async fn send_message<T>(websocket: &mut WebSocket, value: &T) -> Result<(), Error>
where
    T: ?Sized + Serialize,
{
    let message = serde_json::to_string(value).map_err(|error| {
        Error::log_and_create_internal(&format!(
            "Could not serialize the message. Error: '{error}'."
        ))
    })?;
    send_message_string(websocket, &message).await
}

pub async fn send_message_string(websocket: &mut WebSocket, value: &str) -> Result<(), Error> {
    websocket
        .send(Message::Text(value.to_string()))
        .await
        .map_err(|error| Error::WebsocketClosed(error.to_string()))
}

fn error_to_ws_error(error: &Error) -> WsMessageOut {
    let code = match error {
        Error::Domain(DomainError::RoomNotFound(_)) => "ROOM_NOT_FOUND",
        Error::Domain(DomainError::SessionDoesNotExist(_)) => "SESSION_DOES_NOT_EXIST",
        Error::Domain(DomainError::GameAlreadyFinished(_)) => "GAME_ALREADY_FINISHED",
        Error::Domain(DomainError::InvalidConfiguration(_, _)) => "INVALID_CONFIGURATION",
        Error::Domain(DomainError::InvalidTransition(_, _)) => "INVALID_TRANSITION",
        Error::Domain(DomainError::TeamDoesNotExist(_)) => "TEAM_DOES_NOT_EXIST",
        Error::Internal(_) => "INTERNAL_SERVER",
        Error::UnprocessableMessage(_, _) => "UNPROCESSABLE_MESSAGE",
        Error::WebsocketClosed(_) => "WEBSOCKET_CLOSED",
    };
    let detail = match error {
        Error::Domain(domain_error) => domain_error.to_string(),
        other => other.to_string(),
    };
    WsMessageOut::Error {
        code: code.to_string(),
        title: code.replace('_', " ").to_lowercase(),
        detail,
    }
}
