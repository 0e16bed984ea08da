use std::fmt;

use rust_fsm::state_machine;

/*
 * Waiting:    explainer device created the room, timer device not here yet
 * Setup:      timer device joined, teams are being configured
 * Transition: next team is decided, turn not started
 * Playing:    a timed turn is running
 * Stealing:   turn timer expired, other teams may steal the word
 * Finished:   a team reached the target score or the game was ended
 */
state_machine! {
    derive(Debug, Clone, PartialEq)
    pub SessionFsm(Waiting)

    Waiting => {
        TimerDeviceJoined => Setup,
        TeamsConfigured => Transition,
        GameEnded => Finished,
    },
    Setup => {
        TimerDeviceJoined => Setup,
        TeamsConfigured => Transition,
        GameEnded => Finished,
    },
    Transition => {
        TimerDeviceJoined => Transition,
        TurnStarted => Playing,
        GameEnded => Finished,
    },
    Playing => {
        TimerDeviceJoined => Playing,
        TurnEnded => Stealing,
        TargetReached => Finished,
        GameEnded => Finished,
    },
    Stealing => {
        TimerDeviceJoined => Stealing,
        StealResolved => Transition,
        TargetReached => Finished,
        GameEnded => Finished,
    },
    Finished => {
        NewRoundStarted => Transition,
        GameEnded => Finished,
    }
}

impl fmt::Display for SessionFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            SessionFsmState::Waiting => "waiting",
            SessionFsmState::Setup => "setup",
            SessionFsmState::Playing => "playing",
            SessionFsmState::Stealing => "stealing",
            SessionFsmState::Transition => "transition",
            SessionFsmState::Finished => "finished",
        };
        write!(f, "{status}")
    }
}
