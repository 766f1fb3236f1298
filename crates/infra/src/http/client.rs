use std::time::{Duration, Instant};

use fmbridge_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use fmbridge_domain::{DataApiConfig, DriverError, DriverResult};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::transport_error;

const DEFAULT_USER_AGENT: &str = concat!("fmbridge/", env!("CARGO_PKG_VERSION"));

/// reqwest client shared by every Data API request.
///
/// Each request is sent once. A FileMaker token rejection is retried by
/// the Data API client, never here.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn new() -> DriverResult<Self> {
        HttpClientBuilder::default().build()
    }

    /// Client for the `data_api` settings section.
    pub fn from_config(config: &DataApiConfig) -> DriverResult<Self> {
        let builder = HttpClientBuilder {
            timeout: Duration::from_secs(config.timeout_secs),
            accept_invalid_certs: config.accept_invalid_certs,
            ..HttpClientBuilder::default()
        };
        match &config.user_agent {
            Some(agent) => builder.user_agent(agent.clone()).build(),
            None => builder.build(),
        }
    }

    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Send a request and hand back the response whatever its status.
    ///
    /// Only failures to get a response at all are errors.
    pub async fn send(&self, builder: RequestBuilder) -> DriverResult<Response> {
        let request = builder.build().map_err(|err| transport_error(&err))?;
        let (method, url) = (request.method().clone(), request.url().clone());
        let started = Instant::now();

        let outcome = self.inner.execute(request).await;
        let elapsed_ms = started.elapsed().as_millis();
        match outcome {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), elapsed_ms, "Data API HTTP");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, elapsed_ms, error = %err, "Data API HTTP failed");
                Err(transport_error(&err))
            }
        }
    }
}

/// Settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    pub timeout: Duration,
    pub user_agent: String,
    /// FileMaker Server installs often run on self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        Self { user_agent: user_agent.into(), ..self }
    }

    pub fn build(self) -> DriverResult<HttpClient> {
        let inner = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .no_proxy()
            .build()
            .map_err(|err| {
                DriverError::configuration(format!("Could not build HTTP client: {err}"))
            })?;

        Ok(HttpClient { inner })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn error_statuses_are_responses_and_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fmi/data/vLatest/databases/Contacts/layouts"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = format!("{}/fmi/data/vLatest/databases/Contacts/layouts", server.uri());
        let response = client.send(client.request(Method::GET, url)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn user_agent_defaults_to_crate_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();

        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn configured_user_agent_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "acme-forms/2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = DataApiConfig {
            timeout_secs: 5,
            accept_invalid_certs: true,
            user_agent: Some("acme-forms/2".into()),
            ..DataApiConfig::default()
        };
        let client = HttpClient::from_config(&config).unwrap();

        client.send(client.request(Method::GET, server.uri())).await.unwrap();
    }

    #[tokio::test]
    async fn slow_server_times_out_after_one_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let client = HttpClient::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let err = client.send(client.request(Method::GET, server.uri())).await.unwrap_err();

        assert!(matches!(err, DriverError::Transport(_)));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}
