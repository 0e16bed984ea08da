use std::{net::SocketAddr, time::Duration};

use once_cell::sync::Lazy;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use wordsteal::config::Config;

// One client for the whole test binary, connections get reused.
pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub struct TestApp {
    pub base_address: String,
    pub inactivity_timeout: Duration,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        // Binding to port 0 triggers an OS scan for an available port, this way we can run tests in parallel where each runs its own application
        let random_port_address = SocketAddr::from(([0, 0, 0, 0], 0));
        let listener = TcpListener::bind(random_port_address)
            .await
            .expect("Failed to bind to random port.");
        let address = listener.local_addr().unwrap();
        std::env::set_var("ENVIRONMENT", "dev");
        let config = {
            let mut config = Config::get().expect("Failed to read configuration.");
            config.game.inactivity_timeout_seconds = 1;
            config
        };

        let server = wordsteal::startup::create_web_server(config.clone(), listener);
        let _ = tokio::spawn(server);

        TestApp {
            base_address: format!("localhost:{}", address.port()),
            inactivity_timeout: config.game.inactivity_timeout(),
        }
    }

    pub async fn open_main_websocket(
        &self,
        game_id: &str,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, String> {
        tokio_tungstenite::connect_async(format!(
            "ws://{}/game/{game_id}/ws",
            self.base_address
        ))
        .await
        .map(|websocket_stream| websocket_stream.0)
        .map_err(|error| format!("WebSocket could not be created. Error: '{error}'."))
    }

    pub async fn open_timer_websocket(
        &self,
        room_code: &str,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, String> {
        tokio_tungstenite::connect_async(format!(
            "ws://{}/game/code/{room_code}/ws",
            self.base_address
        ))
        .await
        .map(|websocket_stream| websocket_stream.0)
        .map_err(|error| format!("WebSocket could not be created. Error: '{error}'."))
    }
}
