pub mod actor;
pub mod actor_client;
pub mod session_fsm;

use rust_fsm::StateMachine;
use serde::{Deserialize, Serialize};

use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::session::session_fsm::{SessionFsm, SessionFsmInput, SessionFsmState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    id: String,
    name: String,
    score: i32,
}

impl Team {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> i32 {
        self.score
    }
}

/// Team identity as submitted by the explainer device during setup.
/// Ids are chosen by the device and stay stable for the whole game.
#[derive(Clone, Debug)]
pub struct TeamConfig {
    pub id: String,
    pub name: String,
}

/// The authoritative record of one game room. Mutated only through the
/// guarded methods below; every method validates the current status
/// against the state machine before touching any field.
pub struct Session {
    id: String,
    room_code: String,
    fsm: StateMachine<SessionFsm>,
    teams: Vec<Team>,
    current_team_index: usize,
    current_word: Option<String>,
    round_duration_seconds: u32,
    difficulty: Difficulty,
    timer_end_time: Option<u64>,
    words_used: Vec<String>,
    target_score: i32,
    timer_device_joined: bool,
}

/// Complete point-in-time copy of a session, broadcast to every
/// connected device after each committed mutation. Devices replace
/// their whole local view with it, no merging.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub id: String,
    pub room_code: String,
    pub status: SessionFsmState,
    pub teams: Vec<Team>,
    pub current_team_index: usize,
    pub current_word: Option<String>,
    pub round_duration_seconds: u32,
    pub difficulty: Difficulty,
    pub timer_end_time: Option<u64>,
    pub words_used: Vec<String>,
    pub target_score: i32,
    pub timer_device_joined: bool,
}

/// Milliseconds left on a running turn. Client countdowns are local
/// views computed from the shared deadline; the authoritative exit
/// from the playing status is still an explicit `end_turn`.
pub fn remaining_millis(now_ms: u64, timer_end_time: u64) -> u64 {
    timer_end_time.saturating_sub(now_ms)
}

impl Session {
    const MINIMUM_TEAMS: usize = 2;
    const DEFAULT_ROUND_DURATION_SECONDS: u32 = 60;
    const DEFAULT_TARGET_SCORE: i32 = 50;

    pub fn new(id: &str, room_code: &str) -> Self {
        Session {
            id: id.to_string(),
            room_code: room_code.to_string(),
            fsm: StateMachine::default(),
            teams: Vec::default(),
            current_team_index: 0,
            current_word: None,
            round_duration_seconds: Session::DEFAULT_ROUND_DURATION_SECONDS,
            difficulty: Difficulty::Medium,
            timer_end_time: None,
            words_used: Vec::default(),
            target_score: Session::DEFAULT_TARGET_SCORE,
            timer_device_joined: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn room_code(&self) -> &str {
        &self.room_code
    }

    pub fn status(&self) -> &SessionFsmState {
        self.fsm.state()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn words_used(&self) -> &[String] {
        &self.words_used
    }

    pub fn timer_device_joined(&self) -> bool {
        self.timer_device_joined
    }

    /// The timer device attaching to the room. Repeated joins are
    /// idempotent; only a finished game rejects them.
    pub fn join_timer_device(&mut self) -> Result<(), Error> {
        if self.fsm.state() == &SessionFsmState::Finished {
            return Err(Error::Domain(DomainError::GameAlreadyFinished(
                self.room_code.clone(),
            )));
        }
        self.consume("join", SessionFsmInput::TimerDeviceJoined)?;
        self.timer_device_joined = true;
        Ok(())
    }

    pub fn setup_teams(
        &mut self,
        teams: Vec<TeamConfig>,
        round_duration_seconds: u32,
        difficulty: Difficulty,
        target_score: i32,
    ) -> Result<(), Error> {
        let teams: Vec<Team> = teams
            .into_iter()
            .map(|team| Team {
                id: team.id,
                name: team.name.trim().to_string(),
                score: 0,
            })
            .filter(|team| !team.name.is_empty())
            .collect();
        if teams.len() < Session::MINIMUM_TEAMS {
            return Err(Error::Domain(DomainError::InvalidConfiguration(
                teams.len(),
                Session::MINIMUM_TEAMS,
            )));
        }

        self.consume("setupTeams", SessionFsmInput::TeamsConfigured)?;
        self.teams = teams;
        self.current_team_index = 0;
        self.round_duration_seconds = round_duration_seconds;
        self.difficulty = difficulty;
        self.target_score = target_score;
        Ok(())
    }

    pub fn start_turn(&mut self, word: &str, now_ms: u64) -> Result<(), Error> {
        self.consume("startTurn", SessionFsmInput::TurnStarted)?;
        self.timer_end_time = Some(now_ms + u64::from(self.round_duration_seconds) * 1000);
        self.current_word = Some(word.to_string());
        self.words_used.push(word.to_string());
        Ok(())
    }

    pub fn mark_correct(&mut self, new_word: &str) -> Result<(), Error> {
        self.require_status("markCorrect", SessionFsmState::Playing)?;
        self.teams[self.current_team_index].score += 1;
        self.current_word = Some(new_word.to_string());
        self.words_used.push(new_word.to_string());

        if self.teams[self.current_team_index].score >= self.target_score {
            self.consume("markCorrect", SessionFsmInput::TargetReached)?;
            self.timer_end_time = None;
        }
        Ok(())
    }

    /// Skipping costs a point and has no floor; a team can go negative.
    pub fn mark_skip(&mut self, new_word: &str) -> Result<(), Error> {
        self.require_status("markSkip", SessionFsmState::Playing)?;
        self.teams[self.current_team_index].score -= 1;
        self.current_word = Some(new_word.to_string());
        self.words_used.push(new_word.to_string());
        Ok(())
    }

    /// Both devices may race to end the turn when their local countdown
    /// hits zero, so outside the playing status this is a no-op.
    pub fn end_turn(&mut self) -> Result<(), Error> {
        if self.fsm.state() != &SessionFsmState::Playing {
            return Ok(());
        }
        self.consume("endTurn", SessionFsmInput::TurnEnded)?;
        self.timer_end_time = None;
        Ok(())
    }

    /// Resolves the steal window. With a team id the named team earns a
    /// point (and may win); without one this is the "nobody stole"
    /// path, identical to `skip_steal`.
    pub fn award_steal(&mut self, team_id: Option<&str>) -> Result<(), Error> {
        self.require_status("awardSteal", SessionFsmState::Stealing)?;

        let mut winner = false;
        if let Some(team_id) = team_id {
            let target_score = self.target_score;
            let team = self.find_team_mut(team_id)?;
            team.score += 1;
            winner = team.score >= target_score;
        }

        self.current_team_index = (self.current_team_index + 1) % self.teams.len();
        self.current_word = None;
        if winner {
            self.consume("awardSteal", SessionFsmInput::TargetReached)?;
        } else {
            self.consume("awardSteal", SessionFsmInput::StealResolved)?;
        }
        Ok(())
    }

    pub fn skip_steal(&mut self) -> Result<(), Error> {
        self.consume("skipSteal", SessionFsmInput::StealResolved)?;
        self.current_team_index = (self.current_team_index + 1) % self.teams.len();
        self.current_word = None;
        Ok(())
    }

    /// Force-finish, legal from any status.
    pub fn end_game(&mut self) -> Result<(), Error> {
        self.consume("endGame", SessionFsmInput::GameEnded)?;
        self.timer_end_time = None;
        Ok(())
    }

    /// New round with the same teams, same room code and same id.
    pub fn reset_game(&mut self) -> Result<(), Error> {
        self.consume("resetGame", SessionFsmInput::NewRoundStarted)?;
        for team in self.teams.iter_mut() {
            team.score = 0;
        }
        self.current_team_index = 0;
        self.current_word = None;
        self.words_used.clear();
        self.timer_end_time = None;
        Ok(())
    }

    /// Manual correction path: overwrites one team's score with
    /// whatever the caller supplies. Never triggers win detection and
    /// never changes the status.
    pub fn update_team_score(&mut self, team_id: &str, new_score: i32) -> Result<(), Error> {
        let team = self.find_team_mut(team_id)?;
        team.score = new_score;
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            room_code: self.room_code.clone(),
            status: self.fsm.state().clone(),
            teams: self.teams.clone(),
            current_team_index: self.current_team_index,
            current_word: self.current_word.clone(),
            round_duration_seconds: self.round_duration_seconds,
            difficulty: self.difficulty,
            timer_end_time: self.timer_end_time,
            words_used: self.words_used.clone(),
            target_score: self.target_score,
            timer_device_joined: self.timer_device_joined,
        }
    }

    fn find_team_mut(&mut self, team_id: &str) -> Result<&mut Team, Error> {
        self.teams
            .iter_mut()
            .find(|team| team.id == team_id)
            .ok_or_else(|| Error::Domain(DomainError::TeamDoesNotExist(team_id.to_string())))
    }

    fn require_status(&self, action: &'static str, expected: SessionFsmState) -> Result<(), Error> {
        if self.fsm.state() == &expected {
            Ok(())
        } else {
            Err(Error::Domain(DomainError::InvalidTransition(
                action,
                self.fsm.state().clone(),
            )))
        }
    }

    fn consume(&mut self, action: &'static str, input: SessionFsmInput) -> Result<(), Error> {
        let status = self.fsm.state().clone();
        self.fsm
            .consume(&input)
            .map(|_| ())
            .map_err(|_| Error::Domain(DomainError::InvalidTransition(action, status)))
    }
}
