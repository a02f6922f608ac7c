use das_util_lib::{DasClient, DasConfig};
use wiremock::MockServer;

pub fn client_for(server: &MockServer) -> DasClient {
    client_at(&server.uri())
}

pub fn client_at(base: &str) -> DasClient {
    let mut config = DasConfig::local(base).unwrap();
    config.timeout_secs = Some(5);
    DasClient::new(config).unwrap()
}

/// Endereço sem ninguém escutando.
pub const SEM_SERVIDOR: &str = "http://127.0.0.1:9";
