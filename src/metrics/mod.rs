use lazy_static::lazy_static;
use prometheus::{IntGauge, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_SESSIONS: IntGauge =
        IntGauge::new("wordsteal_active_sessions", "Active ongoing game sessions")
            .expect("metric cannot be created");
    pub static ref CONNECTED_DEVICES: IntGauge =
        IntGauge::new("wordsteal_connected_devices", "Amount of devices connected")
            .expect("metric cannot be created");
}

pub fn register_metrics() {
    REGISTRY
        .register(Box::new(ACTIVE_SESSIONS.clone()))
        .expect("collector cannot be registered");

    REGISTRY
        .register(Box::new(CONNECTED_DEVICES.clone()))
        .expect("collector cannot be registered");
}
