use tokio::sync::broadcast;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::error::RecvError;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::device::DeviceRole;
use crate::error::Error;
use crate::session::actor::{SessionCommand, SessionEvent, SessionWideEvent};
use crate::session::{Difficulty, SessionSnapshot, TeamConfig};

#[derive(Clone, Debug)]
pub struct SessionClient {
    pub(super) session_tx: Sender<SessionCommand>,
}

impl SessionClient {
    /// Attaches a device to the session. A timer device also executes
    /// the join mutation, which a finished game rejects.
    pub async fn subscribe(&self, role: DeviceRole) -> Result<SessionWideEventReceiver, Error> {
        let (tx, rx): (OneshotSender<SessionEvent>, OneshotReceiver<SessionEvent>) =
            oneshot::channel();

        self.send_command(SessionCommand::Subscribe {
            role,
            response_tx: tx,
        })
        .await?;

        match rx.await {
            Ok(SessionEvent::Subscribed { broadcast_rx }) => {
                Ok(SessionWideEventReceiver { broadcast_rx })
            }
            event => Err(SessionClient::handle_event_error(event)),
        }
    }

    pub async fn device_disconnected(&self, role: DeviceRole) -> Result<(), Error> {
        self.send_command(SessionCommand::DeviceDisconnected { role })
            .await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, Error> {
        let (tx, rx): (OneshotSender<SessionEvent>, OneshotReceiver<SessionEvent>) =
            oneshot::channel();

        self.send_command(SessionCommand::GetSnapshot { response_tx: tx })
            .await?;

        match rx.await {
            Ok(SessionEvent::Snapshot(snapshot)) => Ok(snapshot),
            event => Err(SessionClient::handle_event_error(event)),
        }
    }

    pub async fn setup_teams(
        &self,
        teams: Vec<TeamConfig>,
        round_duration_seconds: u32,
        difficulty: Difficulty,
        target_score: i32,
    ) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::SetupTeams {
            teams,
            round_duration_seconds,
            difficulty,
            target_score,
            response_tx,
        })
        .await
    }

    pub async fn start_turn(&self, word: Option<String>) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::StartTurn { word, response_tx })
            .await
    }

    pub async fn mark_correct(&self, word: Option<String>) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::MarkCorrect { word, response_tx })
            .await
    }

    pub async fn mark_skip(&self, word: Option<String>) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::MarkSkip { word, response_tx })
            .await
    }

    pub async fn end_turn(&self) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::EndTurn { response_tx })
            .await
    }

    pub async fn award_steal(&self, team_id: Option<String>) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::AwardSteal {
            team_id,
            response_tx,
        })
        .await
    }

    pub async fn skip_steal(&self) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::SkipSteal { response_tx })
            .await
    }

    pub async fn end_game(&self) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::EndGame { response_tx })
            .await
    }

    pub async fn reset_game(&self) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::ResetGame { response_tx })
            .await
    }

    pub async fn update_team_score(&self, team_id: &str, new_score: i32) -> Result<(), Error> {
        self.execute(|response_tx| SessionCommand::UpdateTeamScore {
            team_id: team_id.to_string(),
            new_score,
            response_tx,
        })
        .await
    }

    async fn execute(
        &self,
        build_command: impl FnOnce(OneshotSender<SessionEvent>) -> SessionCommand,
    ) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<SessionEvent>, OneshotReceiver<SessionEvent>) =
            oneshot::channel();

        self.send_command(build_command(tx)).await?;

        match rx.await {
            Ok(SessionEvent::Ok) => Ok(()),
            event => Err(SessionClient::handle_event_error(event)),
        }
    }

    async fn send_command(&self, command: SessionCommand) -> Result<(), Error> {
        self.session_tx.send(command).await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The Session is not alive. Can't send the command. Error: '{error}'."
            ))
        })
    }

    fn handle_event_error(event: Result<SessionEvent, RecvError>) -> Error {
        match event {
            Ok(SessionEvent::Error { error }) => error,
            Ok(unexpected_event) => Error::log_and_create_internal(&format!(
                "Received an unexpected SessionEvent. SessionEvent: '{unexpected_event}'."
            )),
            _ => Error::log_and_create_internal(
                "Sent a command to the Session actor, but the actor channel died.",
            ),
        }
    }
}

pub struct SessionWideEventReceiver {
    broadcast_rx: broadcast::Receiver<SessionWideEvent>,
}

impl SessionWideEventReceiver {
    pub async fn next(&mut self) -> Result<SessionWideEvent, Error> {
        self.broadcast_rx.recv().await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The broadcast channel with the Session has been closed. Error: {error}."
            ))
        })
    }
}
