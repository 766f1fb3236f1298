//! Shared test helpers for `fmbridge-core` integration tests.
//!
//! In-memory mocks for every core port so bridge and layout tests can focus
//! on behaviour instead of boilerplate.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use fmbridge_core::{CredentialStore, FileMakerGateway, GatewayFactory, SessionTokenCache};
use fmbridge_domain::{
    ContainerUpload, DatasourceConfig, DatasourceId, DriverError, DriverResult, FieldData,
    FmBridgeError, OperationResult, Result as DomainResult, ScriptParams, Session,
};
use parking_lot::Mutex;
use serde_json::json;

/// Credential store seeded with fixed datasources.
#[derive(Default)]
pub struct MockCredentialStore {
    datasources: Mutex<HashMap<DatasourceId, DatasourceConfig>>,
}

impl MockCredentialStore {
    pub fn with(id: &str, datasource: DatasourceConfig) -> Self {
        let store = Self::default();
        store.datasources.lock().insert(DatasourceId::new(id), datasource);
        store
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn get_datasource(&self, id: &DatasourceId) -> DomainResult<DatasourceConfig> {
        self.datasources
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| FmBridgeError::NotFound(format!("datasource {id}")))
    }

    async fn save_datasource(
        &self,
        id: &DatasourceId,
        datasource: &DatasourceConfig,
    ) -> DomainResult<()> {
        self.datasources.lock().insert(id.clone(), datasource.clone());
        Ok(())
    }
}

/// Calls recorded by [`MockGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    ListLayouts,
    LayoutMetadata,
    Create { field_data: FieldData, script: Option<ScriptParams> },
    Upload { layout: String, upload: ContainerUpload },
}

/// Gateway returning scripted results in call order.
pub struct MockGateway {
    layout: String,
    calls: Mutex<Vec<GatewayCall>>,
    responses: Mutex<VecDeque<DriverResult<OperationResult>>>,
}

impl MockGateway {
    pub fn new(layout: &str) -> Self {
        Self {
            layout: layout.to_string(),
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        }
    }

    pub fn respond(&self, response: DriverResult<OperationResult>) {
        self.responses.lock().push_back(response);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    fn next(&self, call: GatewayCall) -> DriverResult<OperationResult> {
        self.calls.lock().push(call);
        self.responses.lock().pop_front().unwrap_or_else(|| Ok(ok_result(None)))
    }
}

#[async_trait]
impl FileMakerGateway for MockGateway {
    fn layout(&self) -> &str {
        &self.layout
    }

    async fn list_layouts(&self) -> DriverResult<OperationResult> {
        self.next(GatewayCall::ListLayouts)
    }

    async fn layout_metadata(&self) -> DriverResult<OperationResult> {
        self.next(GatewayCall::LayoutMetadata)
    }

    async fn create_record(
        &self,
        field_data: &FieldData,
        script: Option<&ScriptParams>,
    ) -> DriverResult<OperationResult> {
        self.next(GatewayCall::Create { field_data: field_data.clone(), script: script.cloned() })
    }

    async fn upload_container(
        &self,
        layout: &str,
        upload: &ContainerUpload,
    ) -> DriverResult<OperationResult> {
        self.next(GatewayCall::Upload { layout: layout.to_string(), upload: upload.clone() })
    }
}

/// Factory handing out one shared [`MockGateway`].
pub struct MockGatewayFactory {
    pub gateway: Arc<MockGateway>,
    opened: Mutex<Vec<(DatasourceConfig, String)>>,
}

impl MockGatewayFactory {
    pub fn new(gateway: Arc<MockGateway>) -> Self {
        Self { gateway, opened: Mutex::new(Vec::new()) }
    }

    pub fn opened(&self) -> Vec<(DatasourceConfig, String)> {
        self.opened.lock().clone()
    }
}

impl GatewayFactory for MockGatewayFactory {
    fn open(
        &self,
        datasource: DatasourceConfig,
        layout: &str,
    ) -> DriverResult<Arc<dyn FileMakerGateway>> {
        datasource.validate()?;
        self.opened.lock().push((datasource, layout.to_string()));
        Ok(self.gateway.clone())
    }
}

/// Session cache counting `clear` calls.
#[derive(Default)]
pub struct MockSessionCache {
    sessions: Mutex<HashMap<String, Session>>,
    pub clears: Mutex<usize>,
}

impl SessionTokenCache for MockSessionCache {
    fn get(&self, datasource_key: &str) -> Option<Session> {
        self.sessions.lock().get(datasource_key).cloned()
    }

    fn set(&self, session: Session) {
        self.sessions.lock().insert(session.datasource_key.clone(), session);
    }

    fn invalidate(&self, datasource_key: &str) {
        self.sessions.lock().remove(datasource_key);
    }

    fn clear(&self) {
        self.sessions.lock().clear();
        *self.clears.lock() += 1;
    }
}

pub fn datasource() -> DatasourceConfig {
    DatasourceConfig::new("fms.example.com", "Contacts", "web", "secret")
}

pub fn ok_result(record_id: Option<&str>) -> OperationResult {
    let envelope = match record_id {
        Some(id) => json!({
            "response": {"recordId": id, "modId": "0"},
            "messages": [{"code": "0", "message": "OK"}]
        }),
        None => json!({"response": {}, "messages": [{"code": "0", "message": "OK"}]}),
    };
    OperationResult::from_envelope(200, &envelope)
}

pub fn file_read_error() -> DriverError {
    DriverError::FileRead {
        path: "/tmp/missing.png".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    }
}
