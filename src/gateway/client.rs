use super::types::*;
use crate::{GatewayError, config::GatewayConfig, secrets::TokenProvider};
use async_trait::async_trait;
use reqwest::{
    Url,
    header::{HeaderName, HeaderValue},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Anything that can turn a question into an [`Answer`]. The chat loop
/// depends on this rather than on the HTTP client directly.
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    async fn ask(&self, question: &str) -> Result<Answer, GatewayError>;
}

/// Sends questions to a model serving endpoint and normalizes the answers.
///
/// Holds no mutable state; share it behind an `Arc` to ask concurrently.
#[derive(Clone)]
pub struct QaGatewayClient {
    http: reqwest::Client,
    endpoint_url: Url,
    auth_header: HeaderName,
    timeout: Duration,
    citation: CitationPolicy,
    token_provider: Arc<dyn TokenProvider>,
}

impl QaGatewayClient {
    pub fn new(
        endpoint_url: &str,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(endpoint_url.trim()).map_err(|e| GatewayError::InvalidEndpoint {
            url: endpoint_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint_url: endpoint,
            auth_header: reqwest::header::AUTHORIZATION,
            timeout: Duration::from_secs(30),
            citation: CitationPolicy::default(),
            token_provider,
        })
    }

    pub fn from_config(
        config: &GatewayConfig,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, GatewayError> {
        let client = Self::new(&config.endpoint_url, token_provider)?
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_citation_policy(CitationPolicy::from(&config.citation));
        client.with_auth_header(&config.auth_header)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_citation_policy(mut self, citation: CitationPolicy) -> Self {
        self.citation = citation;
        self
    }

    /// Carries `Bearer <token>` under `name` instead of `Authorization`.
    pub fn with_auth_header(mut self, name: &str) -> Result<Self, GatewayError> {
        self.auth_header = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| {
            GatewayError::InvalidEndpoint {
                url: self.endpoint_url.to_string(),
                reason: format!("invalid auth header name '{name}': {e}"),
            }
        })?;
        Ok(self)
    }

    pub fn endpoint_url(&self) -> &Url {
        &self.endpoint_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn citation_policy(&self) -> CitationPolicy {
        self.citation
    }

    pub async fn ask(&self, question: &str) -> Result<Answer, GatewayError> {
        if question.trim().is_empty() {
            return Err(GatewayError::EmptyQuestion);
        }

        let token = self
            .token_provider
            .token()
            .await
            .map_err(|e| GatewayError::AuthFailure(e.to_string()))?;

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            GatewayError::AuthFailure("token is not a valid header value".to_string())
        })?;
        auth_value.set_sensitive(true);

        let request = InferenceRequest::new(question);

        debug!(
            "Sending question ({} chars) to {}",
            question.len(),
            self.endpoint_url
        );

        // `json` also sets `Content-Type: application/json`.
        let response = self
            .http
            .post(self.endpoint_url.clone())
            .timeout(self.timeout)
            .header(self.auth_header.clone(), auth_value)
            .json(&request)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(GatewayError::from_transport)?;

        if !status.is_success() {
            warn!("Serving endpoint returned status {}", status.as_u16());
            return Err(GatewayError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| GatewayError::malformed(format!("response is not valid JSON: {e}")))?;

        let answer = Answer::from_response(&value, self.citation)?;

        debug!(
            "Received answer ({} chars), citation present: {}",
            answer.text.len(),
            answer.source_url.is_some()
        );

        Ok(answer)
    }
}

#[async_trait]
impl QuestionAnswerer for QaGatewayClient {
    async fn ask(&self, question: &str) -> Result<Answer, GatewayError> {
        QaGatewayClient::ask(self, question).await
    }
}

impl std::fmt::Debug for QaGatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaGatewayClient")
            .field("endpoint_url", &self.endpoint_url.as_str())
            .field("auth_header", &self.auth_header)
            .field("timeout", &self.timeout)
            .field("citation", &self.citation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        config::{CitationConfig, CitationStrategy},
        secrets::{MockTokenProvider, StaticToken},
    };
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn static_token() -> Arc<dyn TokenProvider> {
        Arc::new(StaticToken::new("test-token"))
    }

    #[test]
    fn test_client_creation_defaults() {
        let client =
            QaGatewayClient::new("https://serving.example.com/invocations", static_token())
                .unwrap();

        assert_eq!(
            client.endpoint_url().as_str(),
            "https://serving.example.com/invocations"
        );
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert_eq!(client.citation_policy(), CitationPolicy::Index(1));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let result = QaGatewayClient::new("not a url", static_token());
        assert!(matches!(
            result,
            Err(GatewayError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_invalid_auth_header_is_rejected() {
        let client = QaGatewayClient::new("http://localhost:1/", static_token()).unwrap();
        let result = client.with_auth_header("bad header");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_config() {
        let config = GatewayConfig {
            endpoint_url: "http://localhost:8080/invocations".to_string(),
            timeout_secs: 7,
            auth_header: "Authentication".to_string(),
            citation: CitationConfig {
                strategy: CitationStrategy::FirstAvailable,
                index: 1,
            },
        };

        let client = QaGatewayClient::from_config(&config, static_token()).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(7));
        assert_eq!(client.citation_policy(), CitationPolicy::FirstAvailable);
        assert_eq!(client.auth_header.as_str(), "authentication");
    }

    #[tokio::test]
    async fn test_empty_question_skips_token_and_network() {
        let mut provider = MockTokenProvider::new();
        provider.expect_token().times(0);

        let client = QaGatewayClient::new("http://127.0.0.1:1/", Arc::new(provider)).unwrap();

        for question in ["", "   ", "\n\t"] {
            assert_eq!(
                client.ask(question).await.unwrap_err(),
                GatewayError::EmptyQuestion
            );
        }
    }

    #[tokio::test]
    async fn test_token_failure_is_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut provider = MockTokenProvider::new();
        provider
            .expect_token()
            .times(1)
            .returning(|| Err(Error::secret("vault unavailable")));

        let client = QaGatewayClient::new(&server.uri(), Arc::new(provider)).unwrap();
        let err = client.ask("What is Copen?").await.unwrap_err();

        match err {
            GatewayError::AuthFailure(msg) => assert!(msg.contains("vault unavailable")),
            other => panic!("expected AuthFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_token_with_control_characters_is_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = || -> crate::Result<String> { Ok("abc\ndef".to_string()) };
        let client = QaGatewayClient::new(&server.uri(), Arc::new(provider)).unwrap();
        let err = client.ask("What is Copen?").await.unwrap_err();

        match err {
            GatewayError::AuthFailure(msg) => {
                assert!(msg.contains("not a valid header value"));
                assert!(!msg.contains("abc"));
            }
            other => panic!("expected AuthFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_token_is_fetched_per_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invocations"))
            .and(header("authorization", "Bearer rotating"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"predictions":[{"result":"ok"}]}"#),
            )
            .expect(2)
            .mount(&server)
            .await;

        let mut provider = MockTokenProvider::new();
        provider
            .expect_token()
            .times(2)
            .returning(|| Ok("rotating".to_string()));

        let client = QaGatewayClient::new(
            &format!("{}/invocations", server.uri()),
            Arc::new(provider),
        )
        .unwrap();

        client.ask("first").await.unwrap();
        client.ask("second").await.unwrap();
    }
}
