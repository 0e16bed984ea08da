use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::session::actor_client::SessionClient;
use crate::session_factory::actor::{SessionFactoryCommand, SessionFactoryResponse};

pub struct SessionFactoryClient {
    pub(super) session_factory_tx: Sender<SessionFactoryCommand>,
}

impl SessionFactoryClient {
    pub async fn create_session(&self) -> Result<(String, String), Error> {
        let (tx, rx): (
            OneshotSender<SessionFactoryResponse>,
            OneshotReceiver<SessionFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            SessionFactoryCommand::CreateSession {
                response_channel: tx,
            },
            "The SessionFactory is not alive. Can't create the Session",
        )
        .await?;

        match rx.await {
            Ok(SessionFactoryResponse::SessionCreated {
                session_id,
                room_code,
            }) => Ok((session_id, room_code)),
            response => Err(SessionFactoryClient::handle_response_error(response)),
        }
    }

    pub async fn remove_session(&self, session_id: &str) -> Result<(), Error> {
        self.send_command(
            SessionFactoryCommand::RemoveSession {
                session_id: session_id.to_string(),
            },
            "The SessionFactory channel is closed",
        )
        .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<SessionClient, Error> {
        let (tx, rx): (
            OneshotSender<SessionFactoryResponse>,
            OneshotReceiver<SessionFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            SessionFactoryCommand::GetSessionActor {
                session_id: session_id.to_string(),
                response_channel: tx,
            },
            "The SessionFactory channel is closed",
        )
        .await?;

        match rx.await {
            Ok(SessionFactoryResponse::SessionActor { session }) => Ok(session),
            response => Err(SessionFactoryClient::handle_response_error(response)),
        }
    }

    pub async fn get_session_by_code(&self, room_code: &str) -> Result<SessionClient, Error> {
        let (tx, rx): (
            OneshotSender<SessionFactoryResponse>,
            OneshotReceiver<SessionFactoryResponse>,
        ) = oneshot::channel();

        self.send_command(
            SessionFactoryCommand::GetSessionActorByCode {
                room_code: room_code.to_string(),
                response_channel: tx,
            },
            "The SessionFactory channel is closed",
        )
        .await?;

        match rx.await {
            Ok(SessionFactoryResponse::SessionActor { session }) => Ok(session),
            response => Err(SessionFactoryClient::handle_response_error(response)),
        }
    }

    async fn send_command(
        &self,
        command: SessionFactoryCommand,
        error_message: &str,
    ) -> Result<(), Error> {
        self.session_factory_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!("{error_message}. Error: '{error}'"))
        })
    }

    fn handle_response_error(response: Result<SessionFactoryResponse, RecvError>) -> Error {
        match response {
            Ok(SessionFactoryResponse::Error { error }) => error,
            Ok(unexpected_response) => Error::log_and_create_internal(&format!(
                "Received an unexpected SessionFactoryResponse. SessionFactoryResponse: '{unexpected_response}'."
            )),
            _ => Error::log_and_create_internal(
                "Sent a command to the SessionFactory actor, but the actor channel died.",
            ),
        }
    }
}
