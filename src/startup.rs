use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::routes;
use crate::session_factory::actor::SessionFactoryActor;
use crate::words::WordBank;

pub async fn create_web_server(config: Config, listener: TcpListener) -> std::io::Result<()> {
    let words = Arc::new(WordBank::load());
    let session_factory_client = Arc::new(SessionFactoryActor::spawn(config.game.clone(), words));

    let router = routes::create_router(&config).with_state(session_factory_client);

    log::info!(
        "Listening on {}",
        listener.local_addr().expect("Failed to read the local address.")
    );
    axum::serve(listener, router).await
}
