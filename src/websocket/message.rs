use serde::{Deserialize, Serialize};

use crate::session::{Difficulty, SessionSnapshot, Team, TeamConfig};

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WsMessageIn {
    SetupTeams {
        teams: Vec<TeamConfigDto>,
        round_duration: u32,
        difficulty: Difficulty,
        target_score: i32,
    },
    StartTurn {
        #[serde(default)]
        word: Option<String>,
    },
    MarkCorrect {
        #[serde(default)]
        word: Option<String>,
    },
    MarkSkip {
        #[serde(default)]
        word: Option<String>,
    },
    EndTurn,
    AwardSteal {
        #[serde(default)]
        team_id: Option<String>,
    },
    SkipSteal,
    EndGame,
    ResetGame,
    UpdateTeamScore { team_id: String, new_score: i32 },
}

#[derive(Serialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WsMessageOut {
    GameState {
        id: String,
        room_code: String,
        state: String,
        teams: Vec<TeamDto>,
        current_team_index: usize,
        current_word: Option<String>,
        round_duration: u32,
        difficulty: Difficulty,
        timer_end_time: Option<u64>,
        words_used: Vec<String>,
        target_score: i32,
        timer_device_joined: bool,
    },
    Error {
        code: String,
        title: String,
        detail: String,
    },
}

impl From<SessionSnapshot> for WsMessageOut {
    fn from(snapshot: SessionSnapshot) -> Self {
        WsMessageOut::GameState {
            id: snapshot.id,
            room_code: snapshot.room_code,
            state: snapshot.status.to_string(),
            teams: snapshot.teams.iter().map(|team| team.into()).collect(),
            current_team_index: snapshot.current_team_index,
            current_word: snapshot.current_word,
            round_duration: snapshot.round_duration_seconds,
            difficulty: snapshot.difficulty,
            timer_end_time: snapshot.timer_end_time,
            words_used: snapshot.words_used,
            target_score: snapshot.target_score,
            timer_device_joined: snapshot.timer_device_joined,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfigDto {
    pub id: String,
    pub name: String,
}

impl From<TeamConfigDto> for TeamConfig {
    fn from(dto: TeamConfigDto) -> Self {
        TeamConfig {
            id: dto.id,
            name: dto.name,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: String,
    pub name: String,
    pub score: i32,
}

impl From<&Team> for TeamDto {
    fn from(team: &Team) -> Self {
        TeamDto {
            id: team.id().to_string(),
            name: team.name().to_string(),
            score: team.score(),
        }
    }
}
