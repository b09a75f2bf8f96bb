#![allow(dead_code)]

use secrecy::Secret;
use std::time::Duration;
use topup_service::config::{Config, GatewayConfig, PollingConfig, QrStyleConfig, ServerConfig};
use topup_service::Application;
use wiremock::MockServer;

pub const TEST_MERCHANT_ID: &str = "TESTMID0001";
pub const QR_PATH: &str = "/qr";
pub const STATUS_PATH: &str = "/status";

/// Gateway configuration pointing both endpoints at `server`.
pub fn gateway_config(server: &MockServer) -> GatewayConfig {
    GatewayConfig {
        qr_api_base: format!("{}{}", server.uri(), QR_PATH),
        status_api_base: format!("{}{}", server.uri(), STATUS_PATH),
        merchant_id: Secret::new(TEST_MERCHANT_ID.to_string()),
        http_timeout_secs: 2,
        ..GatewayConfig::default()
    }
}

pub fn test_config(server: &MockServer) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        gateway: gateway_config(server),
        qr_style: QrStyleConfig::default(),
        polling: PollingConfig::default(),
        service_name: "topup-service-test".to_string(),
    }
}

/// Fast cadence for end-to-end dialog runs against a real HTTP gateway.
pub fn fast_polling() -> PollingConfig {
    PollingConfig {
        interval: Duration::from_millis(50),
        max_attempts: 20,
        countdown_secs: 1,
        success_close_delay: Duration::from_millis(100),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub gateway: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let gateway = MockServer::start().await;

        let app = Application::build(test_config(&gateway))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            gateway,
        }
    }
}
