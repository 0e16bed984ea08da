pub mod actor;

use std::fmt;

/// Which half of the two-device pair a websocket connection is. The
/// explainer device ("main") creates the room and drives the turns;
/// the timer device joins by room code and mirrors the countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceRole {
    Main,
    Timer,
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceRole::Main => write!(f, "main"),
            DeviceRole::Timer => write!(f, "timer"),
        }
    }
}
