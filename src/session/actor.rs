use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast::error::SendError;
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{
    broadcast, mpsc,
    mpsc::{Receiver, Sender},
};
use tokio::time;

use crate::config::GameSettings;
use crate::device::DeviceRole;
use crate::error::Error;
use crate::metrics::ACTIVE_SESSIONS;
use crate::session::actor_client::SessionClient;
use crate::session::{Difficulty, Session, SessionSnapshot, TeamConfig};
use crate::session_factory::actor_client::SessionFactoryClient;
use crate::words::WordBank;

/// Owns one session record and applies mutations one at a time off its
/// mailbox, so two devices can never observe a partially applied
/// operation. Every committed command is followed by a full-state
/// broadcast to all subscribed devices.
pub struct SessionActor {
    session: Session,
    session_rx: Receiver<SessionCommand>,
    broadcast_tx: broadcast::Sender<SessionWideEvent>,
    session_factory: SessionFactoryClient,
    words: Arc<WordBank>,
    inactivity_timeout: Duration,
    connected_devices: usize,
}

impl SessionActor {
    pub fn spawn(
        id: &str,
        room_code: &str,
        settings: GameSettings,
        words: Arc<WordBank>,
        session_factory: SessionFactoryClient,
    ) -> SessionClient {
        let session = Session::new(id, room_code);
        let (session_tx, session_rx): (Sender<SessionCommand>, Receiver<SessionCommand>) =
            mpsc::channel(128);
        let (broadcast_tx, _): (
            broadcast::Sender<SessionWideEvent>,
            broadcast::Receiver<SessionWideEvent>,
        ) = broadcast::channel(32);

        tokio::spawn(
            SessionActor {
                session,
                session_rx,
                broadcast_tx,
                session_factory,
                words,
                inactivity_timeout: settings.inactivity_timeout(),
                connected_devices: 0,
            }
            .start(),
        );

        SessionClient { session_tx }
    }

    async fn start(mut self) {
        ACTIVE_SESSIONS.inc();

        loop {
            match time::timeout(self.inactivity_timeout, self.session_rx.recv()).await {
                Err(_) => {
                    if self.connected_devices == 0 {
                        log::info!(
                            "No activity detected in session {} after {} seconds. Stopping session actor.",
                            self.session.id(),
                            self.inactivity_timeout.as_secs()
                        );
                        break;
                    }
                }
                Ok(None) => {
                    log::info!("Session channel has been dropped. Stopping session actor.");
                    break;
                }
                Ok(Some(command)) => {
                    let response = self.handle_command(command);
                    if let Some((result, response_tx)) = response {
                        let event = match result {
                            Ok(event) => event,
                            Err(error) => SessionEvent::Error { error },
                        };
                        if let Err(event) = response_tx.send(event) {
                            log::error!(
                                "Sent a SessionEvent but the response channel is closed. SessionId: '{}', SessionEvent: '{event}'.",
                                self.session.id()
                            );
                        }
                    }
                    let _ = self.send_session_state();
                }
            }
        }

        self.stop_session().await;
        ACTIVE_SESSIONS.dec();
    }

    fn handle_command(
        &mut self,
        command: SessionCommand,
    ) -> Option<(Result<SessionEvent, Error>, OneshotSender<SessionEvent>)> {
        match command {
            SessionCommand::Subscribe { role, response_tx } => {
                let result = match role {
                    DeviceRole::Timer => self.session.join_timer_device(),
                    DeviceRole::Main => Ok(()),
                }
                .map(|_| {
                    self.connected_devices += 1;
                    SessionEvent::Subscribed {
                        broadcast_rx: self.broadcast_tx.subscribe(),
                    }
                });
                Some((result, response_tx))
            }
            SessionCommand::DeviceDisconnected { role } => {
                self.connected_devices = self.connected_devices.saturating_sub(1);
                log::info!(
                    "Device disconnected. SessionId: '{}', Role: '{role}', RemainingDevices: '{}'.",
                    self.session.id(),
                    self.connected_devices
                );
                None
            }
            SessionCommand::GetSnapshot { response_tx } => {
                Some((Ok(SessionEvent::Snapshot(self.session.snapshot())), response_tx))
            }
            SessionCommand::SetupTeams {
                teams,
                round_duration_seconds,
                difficulty,
                target_score,
                response_tx,
            } => {
                let result = self
                    .session
                    .setup_teams(teams, round_duration_seconds, difficulty, target_score)
                    .map(|_| SessionEvent::Ok);
                Some((result, response_tx))
            }
            SessionCommand::StartTurn { word, response_tx } => {
                let result = self.resolve_word(word).and_then(|word| {
                    self.session
                        .start_turn(&word, SessionActor::now_ms())
                        .map(|_| SessionEvent::Ok)
                });
                Some((result, response_tx))
            }
            SessionCommand::MarkCorrect { word, response_tx } => {
                let result = self.resolve_word(word).and_then(|word| {
                    self.session.mark_correct(&word).map(|_| SessionEvent::Ok)
                });
                Some((result, response_tx))
            }
            SessionCommand::MarkSkip { word, response_tx } => {
                let result = self.resolve_word(word).and_then(|word| {
                    self.session.mark_skip(&word).map(|_| SessionEvent::Ok)
                });
                Some((result, response_tx))
            }
            SessionCommand::EndTurn { response_tx } => {
                let result = self.session.end_turn().map(|_| SessionEvent::Ok);
                Some((result, response_tx))
            }
            SessionCommand::AwardSteal {
                team_id,
                response_tx,
            } => {
                let result = self
                    .session
                    .award_steal(team_id.as_deref())
                    .map(|_| SessionEvent::Ok);
                Some((result, response_tx))
            }
            SessionCommand::SkipSteal { response_tx } => {
                let result = self.session.skip_steal().map(|_| SessionEvent::Ok);
                Some((result, response_tx))
            }
            SessionCommand::EndGame { response_tx } => {
                let result = self.session.end_game().map(|_| SessionEvent::Ok);
                Some((result, response_tx))
            }
            SessionCommand::ResetGame { response_tx } => {
                let result = self.session.reset_game().map(|_| SessionEvent::Ok);
                Some((result, response_tx))
            }
            SessionCommand::UpdateTeamScore {
                team_id,
                new_score,
                response_tx,
            } => {
                let result = self
                    .session
                    .update_team_score(&team_id, new_score)
                    .map(|_| SessionEvent::Ok);
                Some((result, response_tx))
            }
        }
    }

    /// A device may send its own word with a turn command; otherwise
    /// the bank picks one the session has not shown yet.
    fn resolve_word(&self, word: Option<String>) -> Result<String, Error> {
        match word {
            Some(word) => Ok(word),
            None => self
                .words
                .pick(self.session.difficulty(), self.session.words_used())
                .ok_or_else(|| {
                    Error::log_and_create_internal(&format!(
                        "The word bank has no words for this difficulty. SessionId: '{}', Difficulty: '{:?}'.",
                        self.session.id(),
                        self.session.difficulty()
                    ))
                }),
        }
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_millis() as u64)
            .unwrap_or_default()
    }

    fn send_session_state(&self) -> Result<usize, SendError<SessionWideEvent>> {
        self.broadcast_tx.send(SessionWideEvent::SessionState {
            snapshot: self.session.snapshot(),
        })
    }

    async fn stop_session(self) {
        let session_id = self.session.id();
        if let Err(error) = self.session_factory.remove_session(session_id).await {
            log::error!("The SessionFactory channel is closed, can't remove the Session. SessionId: '{session_id}', Error: '{error}'.");
        }
    }
}

pub(crate) enum SessionCommand {
    Subscribe {
        role: DeviceRole,
        response_tx: OneshotSender<SessionEvent>,
    },
    DeviceDisconnected {
        role: DeviceRole,
    },
    GetSnapshot {
        response_tx: OneshotSender<SessionEvent>,
    },
    SetupTeams {
        teams: Vec<TeamConfig>,
        round_duration_seconds: u32,
        difficulty: Difficulty,
        target_score: i32,
        response_tx: OneshotSender<SessionEvent>,
    },
    StartTurn {
        word: Option<String>,
        response_tx: OneshotSender<SessionEvent>,
    },
    MarkCorrect {
        word: Option<String>,
        response_tx: OneshotSender<SessionEvent>,
    },
    MarkSkip {
        word: Option<String>,
        response_tx: OneshotSender<SessionEvent>,
    },
    EndTurn {
        response_tx: OneshotSender<SessionEvent>,
    },
    AwardSteal {
        team_id: Option<String>,
        response_tx: OneshotSender<SessionEvent>,
    },
    SkipSteal {
        response_tx: OneshotSender<SessionEvent>,
    },
    EndGame {
        response_tx: OneshotSender<SessionEvent>,
    },
    ResetGame {
        response_tx: OneshotSender<SessionEvent>,
    },
    UpdateTeamScore {
        team_id: String,
        new_score: i32,
        response_tx: OneshotSender<SessionEvent>,
    },
}

#[derive(Debug)]
pub(crate) enum SessionEvent {
    Subscribed {
        broadcast_rx: broadcast::Receiver<SessionWideEvent>,
    },
    Snapshot(SessionSnapshot),
    Ok,
    Error {
        error: Error,
    },
}

impl Display for SessionEvent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                SessionEvent::Subscribed { .. } => "SessionEvent::Subscribed".to_string(),
                SessionEvent::Snapshot(_) => "SessionEvent::Snapshot".to_string(),
                SessionEvent::Ok => "SessionEvent::Ok".to_string(),
                SessionEvent::Error { error } => format!("Error '{error}'"),
            }
        )
    }
}

#[derive(Clone, Debug)]
pub enum SessionWideEvent {
    SessionState { snapshot: SessionSnapshot },
}
