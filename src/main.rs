use tokio::net::TcpListener;

use wordsteal::config::Config;
use wordsteal::metrics::register_metrics;
use wordsteal::startup::create_web_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    std_logger::Config::logfmt().init();
    register_metrics();

    let config = Config::get().expect("ERROR: Unable to get the Config.");
    let address = format!(
        "{}:{}",
        config.application.host, config.application.port
    );
    let listener = TcpListener::bind(&address).await?;

    create_web_server(config, listener).await
}
