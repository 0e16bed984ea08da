use thiserror::Error;

use crate::session::session_fsm::SessionFsmState;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("No room uses this code. RoomCode: '{0}'.")]
    RoomNotFound(String),
    #[error("The session does not exist. SessionId: '{0}'.")]
    SessionDoesNotExist(String),
    #[error("The game is already finished. RoomCode: '{0}'.")]
    GameAlreadyFinished(String),
    #[error("Not enough teams to play. ActualTeams: '{0}', MinimumTeams: '{1}'.")]
    InvalidConfiguration(usize, usize),
    #[error("The operation is not allowed in the current status. Operation: '{0}', CurrentStatus: '{1}'.")]
    InvalidTransition(&'static str, SessionFsmState),
    #[error("The team does not exist. TeamId: '{0}'.")]
    TeamDoesNotExist(String),
}
