use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use crate::helpers::test_app::HTTP_CLIENT;
use crate::helpers::test_device::TestDevice;
use crate::helpers::test_session::TestSession;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

#[tokio::test]
async fn create_game_returns_a_four_digit_room_code() {
    let session = TestSession::create().await;

    assert_eq!(session.room_code.len(), 4);
    let code: u32 = session.room_code.parse().unwrap();
    assert!((1000..=9999).contains(&code));
}

#[tokio::test]
async fn room_code_lookup_round_trips_the_session() {
    let session = TestSession::create().await;

    let response = HTTP_CLIENT
        .get(format!(
            "http://{}/game/code/{}",
            session.app.base_address, session.room_code
        ))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let state: serde_json::Value = response.json().await.unwrap();
    assert_eq!(state["id"], session.id.as_str());
    assert_eq!(state["state"], "waiting");
}

#[tokio::test]
async fn lookup_with_an_unknown_room_code_fails() {
    let session = TestSession::create().await;

    let unknown_code = if session.room_code == "1000" { "1001" } else { "1000" };
    let response = HTTP_CLIENT
        .get(format!(
            "http://{}/game/code/{unknown_code}",
            session.app.base_address
        ))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn timer_join_moves_the_game_to_setup_on_both_devices() {
    let mut session = TestSession::create().await;

    let timer_state = session.join_timer().await;

    assert_eq!(timer_state.state, "setup");
    assert!(timer_state.timer_device_joined);
    assert_eq!(timer_state.room_code, session.room_code);
    assert_eq!(timer_state.id, session.id);
}

#[tokio::test]
async fn timer_join_is_idempotent() {
    let mut session = TestSession::create().await;
    session.join_timer().await;

    // A second device joining with the same code must not disturb the game.
    let websocket = session
        .app
        .open_timer_websocket(&session.room_code)
        .await
        .expect("Failed to open a second timer websocket.");
    let mut second_timer = TestDevice::new(websocket);
    let state = second_timer.receive_game_state().await.unwrap();

    assert_eq!(state.state, "setup");
    assert!(state.timer_device_joined);
    assert!(state.teams.is_empty());

    // Drain the copies broadcast to the already-connected devices.
    let _ = session.main.receive_game_state().await.unwrap();
    let _ = session.timer.as_mut().unwrap().receive_game_state().await.unwrap();
}

#[tokio::test]
async fn joining_a_finished_game_fails() {
    let mut session = TestSession::create().await;
    let state = session.send_and_sync(json!({ "type": "endGame" })).await;
    assert_eq!(state.state, "finished");

    let websocket = session
        .app
        .open_timer_websocket(&session.room_code)
        .await
        .expect("Failed to open the timer websocket.");
    let mut timer = TestDevice::new(websocket);

    assert_eq!(
        timer.receive_error().await.unwrap(),
        "GAME_ALREADY_FINISHED"
    );
}

#[tokio::test]
async fn joining_an_unknown_room_fails() {
    let session = TestSession::create().await;

    let unknown_code = if session.room_code == "1000" { "1001" } else { "1000" };
    let websocket = session
        .app
        .open_timer_websocket(unknown_code)
        .await
        .expect("Failed to open the timer websocket.");
    let mut timer = TestDevice::new(websocket);

    assert_eq!(timer.receive_error().await.unwrap(), "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn teams_can_be_configured() {
    let mut session = TestSession::create().await;
    session.join_timer().await;

    let state = session.setup_default_teams(5).await;

    assert_eq!(state.state, "transition");
    assert_eq!(state.teams.len(), 2);
    assert_eq!(state.team("1").name, "Red");
    assert_eq!(state.team("2").name, "Blue");
    assert!(state.teams.iter().all(|team| team.score == 0));
    assert_eq!(state.target_score, 5);
}

#[tokio::test]
async fn setup_with_a_single_team_fails() {
    let mut session = TestSession::create().await;
    session.join_timer().await;

    session
        .main
        .send_command(json!({
            "type": "setupTeams",
            "teams": [{ "id": "1", "name": "Red" }],
            "roundDuration": 60,
            "difficulty": "easy",
            "targetScore": 5,
        }))
        .await;

    assert_eq!(
        session.main.receive_error().await.unwrap(),
        "INVALID_CONFIGURATION"
    );
    // The rejected command still triggers a (unchanged) snapshot.
    let state = session.main.receive_game_state().await.unwrap();
    assert_eq!(state.state, "setup");
    let _ = session.timer.as_mut().unwrap().receive_game_state().await.unwrap();
}

#[tokio::test]
async fn a_full_turn_cycle_works() {
    let mut session = TestSession::create().await;
    session.join_timer().await;
    session.setup_default_teams(5).await;

    let before = now_ms();
    let state = session
        .send_and_sync(json!({ "type": "startTurn", "word": "שמש" }))
        .await;
    assert_eq!(state.state, "playing");
    assert_eq!(state.current_word.as_deref(), Some("שמש"));
    let deadline = state.timer_end_time.unwrap();
    assert!(deadline >= before + 60_000);
    assert!(deadline <= now_ms() + 60_000);
    assert_eq!(state.words_used, vec!["שמש"]);

    let state = session
        .send_and_sync(json!({ "type": "markCorrect", "word": "moon" }))
        .await;
    assert_eq!(state.team("1").score, 1);
    assert_eq!(state.current_word.as_deref(), Some("moon"));

    let state = session
        .send_and_sync(json!({ "type": "markSkip", "word": "fog" }))
        .await;
    assert_eq!(state.team("1").score, 0);
    assert_eq!(state.words_used.len(), 3);

    let state = session.send_and_sync(json!({ "type": "endTurn" })).await;
    assert_eq!(state.state, "stealing");
    assert!(state.timer_end_time.is_none());

    let state = session
        .send_and_sync(json!({ "type": "awardSteal", "teamId": "2" }))
        .await;
    assert_eq!(state.state, "transition");
    assert_eq!(state.team("2").score, 1);
    assert_eq!(state.current_team_index, 1);
    assert!(state.current_word.is_none());
}

#[tokio::test]
async fn reaching_the_target_score_finishes_the_game() {
    let mut session = TestSession::create().await;
    session.join_timer().await;
    session.setup_default_teams(1).await;
    session
        .send_and_sync(json!({ "type": "startTurn", "word": "sun" }))
        .await;

    let state = session
        .send_and_sync(json!({ "type": "markCorrect", "word": "moon" }))
        .await;

    assert_eq!(state.state, "finished");
    assert_eq!(state.team("1").score, 1);
    assert!(state.timer_end_time.is_none());
}

#[tokio::test]
async fn a_steal_can_win_the_game() {
    let mut session = TestSession::create().await;
    session.join_timer().await;
    session.setup_default_teams(1).await;
    session
        .send_and_sync(json!({ "type": "startTurn", "word": "sun" }))
        .await;
    session.send_and_sync(json!({ "type": "endTurn" })).await;

    let state = session
        .send_and_sync(json!({ "type": "awardSteal", "teamId": "2" }))
        .await;

    assert_eq!(state.state, "finished");
    assert_eq!(state.team("2").score, 1);
}

#[tokio::test]
async fn skip_steal_rotates_the_turn_without_scoring() {
    let mut session = TestSession::create().await;
    session.join_timer().await;
    session.setup_default_teams(5).await;
    session
        .send_and_sync(json!({ "type": "startTurn", "word": "sun" }))
        .await;
    session.send_and_sync(json!({ "type": "endTurn" })).await;

    let state = session.send_and_sync(json!({ "type": "skipSteal" })).await;

    assert_eq!(state.state, "transition");
    assert_eq!(state.current_team_index, 1);
    assert!(state.teams.iter().all(|team| team.score == 0));
}

#[tokio::test]
async fn awarding_a_steal_to_an_unknown_team_fails() {
    let mut session = TestSession::create().await;
    session.join_timer().await;
    session.setup_default_teams(5).await;
    session
        .send_and_sync(json!({ "type": "startTurn", "word": "sun" }))
        .await;
    session.send_and_sync(json!({ "type": "endTurn" })).await;

    session
        .main
        .send_command(json!({ "type": "awardSteal", "teamId": "99" }))
        .await;

    assert_eq!(
        session.main.receive_error().await.unwrap(),
        "TEAM_DOES_NOT_EXIST"
    );
    let state = session.main.receive_game_state().await.unwrap();
    assert_eq!(state.state, "stealing");
    let _ = session.timer.as_mut().unwrap().receive_game_state().await.unwrap();
}

#[tokio::test]
async fn the_server_picks_a_word_when_the_device_sends_none() {
    let mut session = TestSession::create().await;
    session.join_timer().await;
    session.setup_default_teams(5).await;

    let state = session.send_and_sync(json!({ "type": "startTurn" })).await;
    let first_word = state.current_word.clone().unwrap();
    assert!(!first_word.is_empty());
    assert_eq!(state.words_used, vec![first_word.clone()]);

    let state = session
        .send_and_sync(json!({ "type": "markCorrect" }))
        .await;
    let second_word = state.current_word.clone().unwrap();
    assert_ne!(second_word, first_word);
    assert_eq!(state.words_used.len(), 2);
}

#[tokio::test]
async fn a_finished_game_can_be_reset_for_a_new_round() {
    let mut session = TestSession::create().await;
    session.join_timer().await;
    session.setup_default_teams(1).await;
    session
        .send_and_sync(json!({ "type": "startTurn", "word": "sun" }))
        .await;
    let state = session
        .send_and_sync(json!({ "type": "markCorrect", "word": "moon" }))
        .await;
    assert_eq!(state.state, "finished");

    let state = session.send_and_sync(json!({ "type": "resetGame" })).await;

    assert_eq!(state.state, "transition");
    assert_eq!(state.room_code, session.room_code);
    assert_eq!(state.team("1").name, "Red");
    assert!(state.teams.iter().all(|team| team.score == 0));
    assert_eq!(state.current_team_index, 0);
    assert!(state.current_word.is_none());
    assert!(state.words_used.is_empty());
    assert!(state.timer_end_time.is_none());
}

#[tokio::test]
async fn manual_score_edits_do_not_finish_the_game() {
    let mut session = TestSession::create().await;
    session.join_timer().await;
    session.setup_default_teams(5).await;

    let state = session
        .send_and_sync(json!({ "type": "updateTeamScore", "teamId": "1", "newScore": 7 }))
        .await;

    assert_eq!(state.team("1").score, 7);
    assert_eq!(state.state, "transition");
}

#[tokio::test]
async fn operations_out_of_order_are_rejected() {
    let mut session = TestSession::create().await;

    session
        .main
        .send_command(json!({ "type": "startTurn", "word": "sun" }))
        .await;

    assert_eq!(
        session.main.receive_error().await.unwrap(),
        "INVALID_TRANSITION"
    );
    let state = session.main.receive_game_state().await.unwrap();
    assert_eq!(state.state, "waiting");
}

#[tokio::test]
async fn both_devices_observe_updates_in_the_same_order() {
    let mut session = TestSession::create().await;
    session.join_timer().await;

    let commands = vec![
        json!({
            "type": "setupTeams",
            "teams": [
                { "id": "1", "name": "Red" },
                { "id": "2", "name": "Blue" },
            ],
            "roundDuration": 60,
            "difficulty": "medium",
            "targetScore": 5,
        }),
        json!({ "type": "startTurn", "word": "sun" }),
        json!({ "type": "markCorrect", "word": "moon" }),
        json!({ "type": "endTurn" }),
        json!({ "type": "skipSteal" }),
    ];

    let mut main_states = Vec::new();
    let mut timer_states = Vec::new();
    for command in commands {
        session.main.send_command(command).await;
        main_states.push(session.main.receive_game_state().await.unwrap());
        timer_states.push(
            session
                .timer
                .as_mut()
                .unwrap()
                .receive_game_state()
                .await
                .unwrap(),
        );
    }

    assert_eq!(main_states, timer_states);
    let observed: Vec<&str> = main_states.iter().map(|state| state.state.as_str()).collect();
    assert_eq!(
        observed,
        vec!["transition", "playing", "playing", "stealing", "transition"]
    );
}

#[tokio::test]
async fn idle_sessions_are_cleaned_up() {
    let app = crate::helpers::test_app::TestApp::spawn_app().await;

    let response = HTTP_CLIENT
        .post(format!("http://{}/game", app.base_address))
        .send()
        .await
        .expect("Failed to execute CreateGame request.");
    let created: serde_json::Value = response.json().await.unwrap();
    let room_code = created["roomCode"].as_str().unwrap().to_string();

    // No device ever connects, so the actor shuts itself down.
    tokio::time::sleep(app.inactivity_timeout + std::time::Duration::from_millis(500)).await;

    let response = HTTP_CLIENT
        .get(format!(
            "http://{}/game/code/{room_code}",
            app.base_address
        ))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn ping_keeps_the_connection_alive() {
    let mut session = TestSession::create().await;

    session.main.send_text("ping").await;

    assert_eq!(session.main.receive_text().await.unwrap(), "pong");
}

#[tokio::test]
async fn malformed_frames_are_rejected_without_closing_the_connection() {
    let mut session = TestSession::create().await;

    session.main.send_text("{\"not\": \"a command\"}").await;
    assert_eq!(
        session.main.receive_error().await.unwrap(),
        "UNPROCESSABLE_MESSAGE"
    );

    // The websocket stays usable afterwards.
    session.main.send_text("ping").await;
    assert_eq!(session.main.receive_text().await.unwrap(), "pong");
}
