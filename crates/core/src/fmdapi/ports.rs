//! Port interfaces for the FileMaker Data API
//!
//! The bridge and layout services talk to FileMaker only through these
//! traits. The reqwest-backed client in `fmbridge-infra` implements them.

use std::sync::Arc;

use async_trait::async_trait;
use fmbridge_domain::{
    ContainerUpload, DatasourceConfig, DriverResult, FieldData, OperationResult, ScriptParams,
    SecretString,
};

/// A Data API client bound to one datasource and layout
#[async_trait]
pub trait FileMakerGateway: Send + Sync {
    /// Layout used by record requests.
    fn layout(&self) -> &str;

    /// `GET layouts`
    async fn list_layouts(&self) -> DriverResult<OperationResult>;

    /// `GET layouts/{layout}`
    async fn layout_metadata(&self) -> DriverResult<OperationResult>;

    /// `POST layouts/{layout}/records`
    async fn create_record(
        &self,
        field_data: &FieldData,
        script: Option<&ScriptParams>,
    ) -> DriverResult<OperationResult>;

    /// `POST layouts/{layout}/records/{id}/containers/{field}/{repetition}/`
    async fn upload_container(
        &self,
        layout: &str,
        upload: &ContainerUpload,
    ) -> DriverResult<OperationResult>;
}

/// Opens gateways for stored datasources
pub trait GatewayFactory: Send + Sync {
    /// Validate `datasource` and bind a gateway to `layout`.
    ///
    /// Fails with a configuration error, without network access, when the
    /// server or database is empty.
    fn open(
        &self,
        datasource: DatasourceConfig,
        layout: &str,
    ) -> DriverResult<Arc<dyn FileMakerGateway>>;
}

/// Exchanges a FileMaker Cloud refresh token for an FMID token
#[async_trait]
pub trait CloudTokenProvider: Send + Sync {
    async fn fmid_token(&self, refresh_token: &SecretString) -> DriverResult<SecretString>;
}
