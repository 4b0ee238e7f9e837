//! Mock Telegram API server for testing
//!
//! Wiremock-backed stand-in for the Bot API. Every endpoint the bot touches
//! is mounted with a success response, and the recorded requests are exposed
//! for assertions on what was actually sent where.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Start the server with success mocks for every used endpoint
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        for endpoint in ["sendMessage", "sendPhoto", "sendDocument", "editMessageCaption"] {
            Mock::given(method("POST"))
                .and(path_regex(format!("(?i)/{}$", endpoint)))
                .respond_with(ResponseTemplate::new(200).set_body_json(message_response()))
                .mount(&server)
                .await;
        }

        for endpoint in ["answerCallbackQuery", "deleteMessage"] {
            Mock::given(method("POST"))
                .and(path_regex(format!("(?i)/{}$", endpoint)))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})),
                )
                .mount(&server)
                .await;
        }

        Self { server }
    }

    /// Base URL for pointing a Bot at this server
    pub fn api_url(&self) -> url::Url {
        url::Url::parse(&self.server.uri()).unwrap()
    }

    /// Raw bodies of every request to one endpoint, in arrival order
    ///
    /// Media sends go out as multipart, so bodies are matched as lossy
    /// strings rather than parsed JSON.
    pub async fn bodies_to(&self, endpoint: &str) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| {
                req.url
                    .path()
                    .to_ascii_lowercase()
                    .ends_with(&endpoint.to_ascii_lowercase())
            })
            .map(|req| String::from_utf8_lossy(&req.body).into_owned())
            .collect()
    }

    /// Number of requests made to one endpoint
    pub async fn calls_to(&self, endpoint: &str) -> usize {
        self.bodies_to(endpoint).await.len()
    }
}

/// Generic successful Message response accepted by every send/edit endpoint
fn message_response() -> Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 123,
            "from": {
                "id": 12345,
                "is_bot": true,
                "first_name": "TestBot",
                "username": "test_bot"
            },
            "chat": {
                "id": 100,
                "type": "private",
                "first_name": "Test"
            },
            "date": 1640995200,
            "text": "ok"
        }
    })
}
