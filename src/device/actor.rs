use axum::extract::ws::{Message, WebSocket};
use std::time::Duration;
use tokio::select;
use tokio::time::error::Elapsed;
use tokio::time::timeout;

use crate::device::DeviceRole;
use crate::error::Error;
use crate::metrics::CONNECTED_DEVICES;
use crate::session::actor::SessionWideEvent;
use crate::session::actor_client::SessionClient;
use crate::session::actor_client::SessionWideEventReceiver;
use crate::websocket::close;
use crate::websocket::message::WsMessageIn;
use crate::websocket::message::WsMessageOut;
use crate::websocket::parse_message;
use crate::websocket::send_error;
use crate::websocket::send_message;
use crate::websocket::send_message_string;

/// Bridges one websocket to the session actor: forwards parsed device
/// commands in, pushes full-state snapshots out.
pub struct DeviceActor {
    role: DeviceRole,
    session: SessionClient,
    session_wide_event_receiver: SessionWideEventReceiver,
    websocket: WebSocket,
    inactivity_timeout: Duration,
}

impl DeviceActor {
    pub async fn create(role: DeviceRole, session: SessionClient, mut websocket: WebSocket) {
        match session.subscribe(role).await {
            Ok(session_wide_event_receiver) => {
                DeviceActor {
                    role,
                    session,
                    session_wide_event_receiver,
                    websocket,
                    inactivity_timeout: Duration::from_millis(2500),
                }
                .start()
                .await
            }
            Err(error) => {
                send_error(&mut websocket, &error).await;
                close(websocket).await;
            }
        }
    }

    async fn start(mut self) {
        CONNECTED_DEVICES.inc();

        loop {
            select! {
                session_wide_event = self.session_wide_event_receiver.next() => {
                    if let Err(error) = self.receive_session_wide_event(session_wide_event).await {
                        send_error(&mut self.websocket, &error).await;
                        if error.is_fatal() {
                            break;
                        }
                    }
                },
                websocket_message = timeout(self.inactivity_timeout, self.websocket.recv()) => {
                    if let Err(error) = self.receive_websocket_message(websocket_message).await {
                        send_error(&mut self.websocket, &error).await;
                        if error.is_fatal() {
                            break;
                        }
                    }
                },
            }
        }

        let _ = self.session.device_disconnected(self.role).await;
        close(self.websocket).await;
        CONNECTED_DEVICES.dec();
    }

    async fn receive_session_wide_event(
        &mut self,
        session_wide_event: Result<SessionWideEvent, Error>,
    ) -> Result<(), Error> {
        match session_wide_event {
            Ok(SessionWideEvent::SessionState { snapshot }) => {
                send_message(&mut self.websocket, &WsMessageOut::from(snapshot)).await
            }
            Err(error) => Err(error),
        }
    }

    async fn receive_websocket_message(
        &mut self,
        websocket_message: Result<Option<Result<Message, axum::Error>>, Elapsed>,
    ) -> Result<(), Error> {
        match websocket_message {
            Ok(Some(Ok(Message::Text(txt)))) => match txt.as_str() {
                "ping" => send_message_string(&mut self.websocket, "pong").await,
                message => match parse_message(message)? {
                    WsMessageIn::SetupTeams {
                        teams,
                        round_duration,
                        difficulty,
                        target_score,
                    } => {
                        self.session
                            .setup_teams(
                                teams.into_iter().map(|team| team.into()).collect(),
                                round_duration,
                                difficulty,
                                target_score,
                            )
                            .await
                    }
                    WsMessageIn::StartTurn { word } => self.session.start_turn(word).await,
                    WsMessageIn::MarkCorrect { word } => self.session.mark_correct(word).await,
                    WsMessageIn::MarkSkip { word } => self.session.mark_skip(word).await,
                    WsMessageIn::EndTurn => self.session.end_turn().await,
                    WsMessageIn::AwardSteal { team_id } => {
                        self.session.award_steal(team_id).await
                    }
                    WsMessageIn::SkipSteal => self.session.skip_steal().await,
                    WsMessageIn::EndGame => self.session.end_game().await,
                    WsMessageIn::ResetGame => self.session.reset_game().await,
                    WsMessageIn::UpdateTeamScore {
                        team_id,
                        new_score,
                    } => self.session.update_team_score(&team_id, new_score).await,
                },
            },
            // device said "close"
            Ok(Some(Ok(Message::Close(_)))) => {
                self.log_connection_lost("device sent 'Close' websocket frame");
                Err(Error::WebsocketClosed(
                    "device sent 'Close' websocket frame".to_string(),
                ))
            }
            // websocket was closed
            Ok(None) => {
                self.log_connection_lost("other end of websocket was closed abruptly");
                Err(Error::WebsocketClosed(
                    "other end of websocket was closed abruptly".to_string(),
                ))
            }
            // timeout without receiving anything from the device
            Err(_) => {
                self.log_connection_lost("connection timed out; missing 'ping' messages");
                Err(Error::WebsocketClosed(
                    "connection timed out; missing 'ping' messages".to_string(),
                ))
            }
            Ok(Some(Err(error))) => Err(Error::UnprocessableMessage(
                error.to_string(),
                "Message cannot be loaded".to_string(),
            )),
            Ok(Some(Ok(_))) => Err(Error::UnprocessableMessage(
                "Unsupported message type".to_string(),
                "Unsupported message type".to_string(),
            )),
        }
    }

    fn log_connection_lost(&self, reason: &str) {
        log::info!(
            "Connection with the {} device lost due to: {}. Stopping device actor.",
            self.role,
            reason,
        );
    }
}
