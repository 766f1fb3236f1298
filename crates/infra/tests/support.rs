//! Shared helpers for `fmbridge-infra` integration tests.
//!
//! Wraps a wiremock server that plays the FileMaker Data API.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fmbridge_domain::{DataApiConfig, DatasourceConfig};
use fmbridge_infra::{FmDataApiGatewayFactory, InMemorySessionTokenCache};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const DATABASE: &str = "Contacts";
pub const BASE_PATH: &str = "/fmi/data/vLatest/databases/Contacts";
pub const BASIC_AUTH: &str = "Basic d2ViOnNlY3JldA==";

/// Mock Data API server with helpers for the common endpoints.
pub struct DataApiServer {
    pub server: MockServer,
}

impl DataApiServer {
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    /// `host:port` of the mock server, as stored in a datasource.
    pub fn host(&self) -> String {
        self.server.uri().trim_start_matches("http://").to_string()
    }

    pub fn datasource(&self) -> DatasourceConfig {
        DatasourceConfig::new(self.host(), DATABASE, "web", "secret")
    }

    pub fn sessions(&self) -> Arc<InMemorySessionTokenCache> {
        Arc::new(InMemorySessionTokenCache::new())
    }

    pub fn factory(&self, sessions: Arc<InMemorySessionTokenCache>) -> FmDataApiGatewayFactory {
        FmDataApiGatewayFactory::new(settings(), sessions).expect("factory should build")
    }

    /// Sessions endpoint handing out `tokens` in order, repeating the last.
    pub async fn mount_sessions(&self, tokens: &[&str], expected_calls: u64) {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        let calls = AtomicUsize::new(0);

        Mock::given(method("POST"))
            .and(path(format!("{BASE_PATH}/sessions")))
            .and(header("authorization", BASIC_AUTH))
            .and(header("content-type", "application/json"))
            .respond_with(move |_: &Request| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                let token = tokens.get(n).or_else(|| tokens.last()).cloned().unwrap_or_default();
                ResponseTemplate::new(200).set_body_json(ok_envelope(json!({"token": token})))
            })
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, suffix: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().ends_with(suffix))
            .collect()
    }
}

/// Plain-HTTP settings so the client can reach the mock server.
pub fn settings() -> DataApiConfig {
    DataApiConfig { protocol: "http".into(), timeout_secs: 5, ..DataApiConfig::default() }
}

pub fn ok_envelope(response: Value) -> Value {
    json!({"response": response, "messages": [{"code": "0", "message": "OK"}]})
}

pub fn error_envelope(code: &str, message: &str) -> Value {
    json!({"response": {}, "messages": [{"code": code, "message": message}]})
}

pub fn invalid_token() -> ResponseTemplate {
    ResponseTemplate::new(401)
        .set_body_json(error_envelope("952", "Invalid FileMaker Data API token (*)"))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
