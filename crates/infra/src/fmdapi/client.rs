//! FileMaker Data API client
//!
//! One client is bound to one datasource and layout. Session tokens are kept
//! in a shared [`SessionTokenCache`] so every client talking to the same
//! database reuses them.

use std::sync::Arc;

use async_trait::async_trait;
use fmbridge_core::{CloudTokenProvider, FileMakerGateway, SessionTokenCache};
use fmbridge_domain::{
    ContainerUpload, DataApiConfig, DatasourceConfig, Driver, DriverError, DriverResult,
    FieldData, OperationResult, ScriptParams, SecretString, Session,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use super::auth::{bearer, header_value, session_authorization};
use super::multipart::UploadBody;
use super::response::read_response;
use super::uri::Endpoints;
use crate::http::HttpClient;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Datasource and layout resolved by [`FmDataApiClient::configure`].
#[derive(Debug, Clone)]
struct Target {
    datasource: DatasourceConfig,
    layout: String,
    driver: Driver,
    endpoints: Endpoints,
}

impl Target {
    fn layout(&self) -> DriverResult<&str> {
        if self.layout.trim().is_empty() {
            return Err(DriverError::configuration("Layout is not configured."));
        }
        Ok(&self.layout)
    }
}

/// Body of a single Data API request, kept so the request can be rebuilt.
enum RequestBody {
    Empty,
    Json(Value),
    Upload(UploadBody),
}

/// Data API client for one datasource
pub struct FmDataApiClient {
    http: HttpClient,
    settings: DataApiConfig,
    sessions: Arc<dyn SessionTokenCache>,
    cloud_tokens: Option<Arc<dyn CloudTokenProvider>>,
    target: Option<Target>,
}

impl FmDataApiClient {
    /// Unconfigured client; call `configure` before any request.
    pub fn new(
        http: HttpClient,
        settings: DataApiConfig,
        sessions: Arc<dyn SessionTokenCache>,
    ) -> Self {
        Self { http, settings, sessions, cloud_tokens: None, target: None }
    }

    /// Provider used for FileMaker Cloud datasources.
    pub fn with_cloud_tokens(mut self, provider: Arc<dyn CloudTokenProvider>) -> Self {
        self.cloud_tokens = Some(provider);
        self
    }

    /// Bind the client to `datasource` and `layout`.
    ///
    /// Fails without network access when the server or database is empty.
    /// The driver is resolved here, once.
    pub fn configure(
        &mut self,
        datasource: DatasourceConfig,
        layout: impl Into<String>,
    ) -> DriverResult<()> {
        let endpoints = Endpoints::new(&datasource, &self.settings)?;
        let driver = datasource.resolved_driver();
        let layout = layout.into();

        debug!(
            server = %datasource.server,
            database = %datasource.database,
            %layout,
            driver = driver.label(),
            "Configured Data API client"
        );

        self.target = Some(Target { datasource, layout, driver, endpoints });
        Ok(())
    }

    /// Driver resolved at configure time.
    pub fn driver(&self) -> Option<Driver> {
        self.target.as_ref().map(|target| target.driver)
    }

    fn target(&self) -> DriverResult<&Target> {
        self.target
            .as_ref()
            .ok_or_else(|| DriverError::configuration("Datasource is not configured."))
    }

    /// Session token for the target database, opening a session when none is
    /// cached or `force` is set. Nothing is cached on failure.
    #[instrument(skip_all, fields(database = %target.datasource.database, force = force))]
    async fn authenticate(&self, target: &Target, force: bool) -> DriverResult<SecretString> {
        let key = target.datasource.session_key();
        if !force {
            if let Some(session) = self.sessions.get(&key).filter(|s| !s.token.is_empty()) {
                return Ok(session.token);
            }
        }

        let credentials = session_authorization(
            &target.datasource,
            target.driver,
            self.cloud_tokens.as_deref(),
        )
        .await?;

        let request = self
            .http
            .request(Method::POST, target.endpoints.sessions())
            .header(AUTHORIZATION, header_value(&credentials)?)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        let response = self.http.send(request).await?;
        let result = read_response(response).await.inspect_err(|err| {
            warn!(error = %err, "Could not open Data API session");
        })?;

        let token = result
            .response
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                DriverError::Authentication("FileMaker Server returned no session token.".into())
            })?;

        self.sessions.set(Session::new(key, token.clone()));
        info!(driver = target.driver.label(), "Opened Data API session");
        Ok(token)
    }

    /// Authenticate, sign and send one request.
    ///
    /// A FileMaker 952 (invalid token) answer drops the cached token and the
    /// request is sent once more with a fresh session.
    #[instrument(skip_all, fields(%method, %uri))]
    async fn dispatch(
        &self,
        target: &Target,
        method: Method,
        uri: String,
        body: RequestBody,
    ) -> DriverResult<OperationResult> {
        let token = self.authenticate(target, false).await?;
        let result = match self.send_signed(method.clone(), &uri, &token, &body).await {
            Err(err) if err.is_session_timeout() => {
                warn!(%uri, "Data API token rejected, opening a new session");
                self.sessions.invalidate(&target.datasource.session_key());
                let token = self.authenticate(target, true).await?;
                self.send_signed(method, &uri, &token, &body).await
            }
            other => other,
        };

        result.inspect_err(|err| {
            warn!(
                %uri,
                http_status = ?err.http_status(),
                fms_code = ?err.server_code(),
                error = %err,
                "Data API request failed"
            );
        })
    }

    async fn send_signed(
        &self,
        method: Method,
        uri: &str,
        token: &SecretString,
        body: &RequestBody,
    ) -> DriverResult<OperationResult> {
        let request = self.build_request(method, uri, token, body)?;
        let response = self.http.send(request).await?;
        read_response(response).await
    }

    fn build_request(
        &self,
        method: Method,
        uri: &str,
        token: &SecretString,
        body: &RequestBody,
    ) -> DriverResult<RequestBuilder> {
        let builder = self.http.request(method, uri).header(AUTHORIZATION, bearer(token)?);

        Ok(match body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Upload(upload) => builder.multipart(upload.form()),
        })
    }
}

/// `{"fieldData": ..., "script": ...}` with empty script values left out.
fn record_body(field_data: &FieldData, script: Option<&ScriptParams>) -> Value {
    let mut body = Map::new();
    body.insert(
        "fieldData".into(),
        Value::Object(
            field_data.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect(),
        ),
    );
    for (key, value) in script.map(ScriptParams::to_params).unwrap_or_default() {
        body.insert(key.into(), Value::String(value));
    }
    Value::Object(body)
}

#[async_trait]
impl FileMakerGateway for FmDataApiClient {
    fn layout(&self) -> &str {
        self.target.as_ref().map_or("", |target| target.layout.as_str())
    }

    async fn list_layouts(&self) -> DriverResult<OperationResult> {
        let target = self.target()?;
        self.dispatch(target, Method::GET, target.endpoints.layouts(), RequestBody::Empty).await
    }

    async fn layout_metadata(&self) -> DriverResult<OperationResult> {
        let target = self.target()?;
        let uri = target.endpoints.layout(target.layout()?);
        self.dispatch(target, Method::GET, uri, RequestBody::Empty).await
    }

    async fn create_record(
        &self,
        field_data: &FieldData,
        script: Option<&ScriptParams>,
    ) -> DriverResult<OperationResult> {
        let target = self.target()?;
        let uri = target.endpoints.records(target.layout()?);
        let body = RequestBody::Json(record_body(field_data, script));

        let result = self.dispatch(target, Method::POST, uri, body).await?;
        info!(record_id = ?result.record_id, layout = %target.layout, "Created record");
        Ok(result)
    }

    async fn upload_container(
        &self,
        layout: &str,
        upload: &ContainerUpload,
    ) -> DriverResult<OperationResult> {
        let target = self.target()?;
        if layout.trim().is_empty() {
            return Err(DriverError::configuration("Layout is not configured."));
        }
        let body = UploadBody::read(upload).await?;
        let uri = target.endpoints.container(
            layout,
            &upload.record_id,
            &upload.field_name,
            upload.repetition,
        );

        debug!(
            field = %upload.field_name,
            repetition = upload.repetition,
            bytes = body.bytes.len(),
            "Uploading container data"
        );
        self.dispatch(target, Method::POST, uri, RequestBody::Upload(body)).await
    }
}
