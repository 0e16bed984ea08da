pub mod actor;
pub mod actor_client;

use rand::distributions::{Alphanumeric, DistString};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::GameSettings;
use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::session::actor::SessionActor;
use crate::session::actor_client::SessionClient;
use crate::session_factory::actor_client::SessionFactoryClient;
use crate::words::WordBank;

struct SessionEntry {
    client: SessionClient,
    room_code: String,
}

/// Registry of live sessions: id -> actor handle, plus the room-code
/// index the timer device joins through.
pub struct SessionFactory {
    sessions: HashMap<String, SessionEntry>,
    room_codes: HashMap<String, String>,
    game_settings: GameSettings,
    words: Arc<WordBank>,
}

impl SessionFactory {
    pub fn new(game_settings: GameSettings, words: Arc<WordBank>) -> Self {
        SessionFactory {
            sessions: HashMap::default(),
            room_codes: HashMap::default(),
            game_settings,
            words,
        }
    }

    pub fn create_new_session(&mut self, session_factory: SessionFactoryClient) -> (String, String) {
        let id = self.create_unique_session_id();
        let room_code = self.create_unique_room_code();
        let client = SessionActor::spawn(
            &id,
            &room_code,
            self.game_settings.clone(),
            self.words.clone(),
            session_factory,
        );
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                client,
                room_code: room_code.clone(),
            },
        );
        self.room_codes.insert(room_code.clone(), id.clone());

        (id, room_code)
    }

    pub fn remove_session(&mut self, session_id: &str) -> Option<SessionClient> {
        let entry = self.sessions.remove(session_id)?;
        self.room_codes.remove(&entry.room_code);
        Some(entry.client)
    }

    pub fn get_session(&self, session_id: &str) -> Result<&SessionClient, Error> {
        match self.sessions.get(session_id) {
            Some(entry) => Ok(&entry.client),
            None => Err(Error::Domain(DomainError::SessionDoesNotExist(
                session_id.to_string(),
            ))),
        }
    }

    pub fn get_session_by_code(&self, room_code: &str) -> Result<&SessionClient, Error> {
        self.room_codes
            .get(room_code)
            .and_then(|session_id| self.sessions.get(session_id))
            .map(|entry| &entry.client)
            .ok_or_else(|| Error::Domain(DomainError::RoomNotFound(room_code.to_string())))
    }

    fn create_unique_session_id(&self) -> String {
        loop {
            let id = Alphanumeric
                .sample_string(&mut rand::thread_rng(), 5)
                .replace('O', "P")
                .replace('0', "1")
                .replace('I', "J")
                .replace('l', "m");
            if !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }

    /// 4-digit code the timer device types in. Drawn until it collides
    /// with no live session; collisions are rare with few active rooms.
    fn create_unique_room_code(&self) -> String {
        loop {
            let room_code = rand::thread_rng().gen_range(1000..=9999).to_string();
            if !self.room_codes.contains_key(&room_code) {
                return room_code;
            }
        }
    }
}
