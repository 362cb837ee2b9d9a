use copen_qa::{
    config::{AppConfig, LogsConfig},
    gateway::QaGatewayClient,
    secrets::StaticToken,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";
pub const INVOCATIONS_PATH: &str = "/serving-endpoints/copen/invocations";

/// Gateway pointed at the mock server's invocations path with a short timeout
pub fn create_test_gateway(server: &MockServer) -> QaGatewayClient {
    QaGatewayClient::new(
        &format!("{}{}", server.uri(), INVOCATIONS_PATH),
        Arc::new(StaticToken::new(TEST_TOKEN)),
    )
    .unwrap()
    .with_timeout(Duration::from_secs(5))
}

pub fn create_test_app_config() -> AppConfig {
    AppConfig {
        title: "Copen Q&A bot".to_string(),
        prompt: "What do you want to know about Copen?".to_string(),
        logs: LogsConfig {
            level: "debug".to_string(),
        },
    }
}

/// Serving response with the citation in the second source document
pub fn cited_response(answer: &str, url: &str) -> Value {
    json!({
        "predictions": [{
            "result": answer,
            "source_documents": [
                {"page_content": "unrelated", "metadata": {}},
                {"page_content": "relevant", "metadata": {"url": url}}
            ]
        }]
    })
}

pub fn uncited_response(answer: &str) -> Value {
    json!({
        "predictions": [{
            "result": answer,
            "source_documents": []
        }]
    })
}

pub fn split_body(question: &str) -> Value {
    json!({
        "dataframe_split": {
            "columns": ["query"],
            "index": [0],
            "data": [[question]]
        }
    })
}
