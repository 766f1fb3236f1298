//! Layout metadata and FileMaker value lists for form editing

use std::sync::Arc;

use fmbridge_domain::constants::FM_VALUE_LIST_PREFIX;
use fmbridge_domain::{flatten_layout_names, DatasourceId, LayoutMetadata, Result, ValueList};
use serde::Serialize;
use tracing::{debug, warn};

use crate::datasource::ports::CredentialStore;
use crate::fmdapi::ports::GatewayFactory;

pub const VALUE_LIST_ERROR: &str = "Value list retrieval error";

/// Values and labels for a choice tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValueListOptions {
    pub values: Vec<String>,
    pub labels: Vec<String>,
}

impl ValueListOptions {
    pub fn from_list(list: &ValueList) -> Self {
        let (values, labels) = list
            .values
            .iter()
            .map(|item| (item.value.clone(), item.label().to_string()))
            .unzip();
        Self { values, labels }
    }

    /// Single placeholder shown when the list cannot be loaded.
    pub fn retrieval_error() -> Self {
        Self {
            values: vec![VALUE_LIST_ERROR.to_string()],
            labels: vec![VALUE_LIST_ERROR.to_string()],
        }
    }
}

/// Read-only FileMaker lookups used while editing a form
pub struct LayoutService {
    credentials: Arc<dyn CredentialStore>,
    gateways: Arc<dyn GatewayFactory>,
}

impl LayoutService {
    pub fn new(credentials: Arc<dyn CredentialStore>, gateways: Arc<dyn GatewayFactory>) -> Self {
        Self { credentials, gateways }
    }

    /// Metadata of `layout`, or `None` when the datasource has no server or
    /// database yet. Nothing is sent to FileMaker in that case.
    pub async fn layout_metadata(
        &self,
        datasource_id: &DatasourceId,
        layout: &str,
    ) -> Result<Option<LayoutMetadata>> {
        let datasource = self.credentials.get_datasource(datasource_id).await?;
        if !datasource.is_complete() {
            debug!(datasource = %datasource_id, "Datasource incomplete, skipping layout metadata");
            return Ok(None);
        }

        let gateway = self.gateways.open(datasource, layout)?;
        let result = gateway.layout_metadata().await?;
        Ok(Some(result.layout_metadata()?))
    }

    /// Names of all layouts in the datasource, folders flattened.
    pub async fn layout_names(&self, datasource_id: &DatasourceId) -> Result<Vec<String>> {
        let datasource = self.credentials.get_datasource(datasource_id).await?;
        let gateway = self.gateways.open(datasource, "")?;
        let result = gateway.list_layouts().await?;
        Ok(flatten_layout_names(&result.layouts()?))
    }

    /// Options for `name`, resolved against already loaded metadata.
    pub fn value_list_options(metadata: &LayoutMetadata, name: &str) -> ValueListOptions {
        match metadata.value_list(name) {
            Some(list) => ValueListOptions::from_list(list),
            None => {
                warn!(value_list = name, "Value list not found on layout");
                ValueListOptions::retrieval_error()
            }
        }
    }

    /// Options for a choice tag carrying a `data:fm_value_list-NAME` option.
    ///
    /// Returns `None` when no option references a value list. A failed
    /// metadata request yields the placeholder entry.
    pub async fn options_for_tag(
        &self,
        datasource_id: &DatasourceId,
        layout: &str,
        tag_options: &[String],
    ) -> Option<ValueListOptions> {
        let name = tag_options.iter().find_map(|option| value_list_name(option))?;

        let options = match self.layout_metadata(datasource_id, layout).await {
            Ok(Some(metadata)) => Self::value_list_options(&metadata, name),
            Ok(None) => ValueListOptions::retrieval_error(),
            Err(err) => {
                warn!(value_list = name, error = %err, "Could not load layout metadata");
                ValueListOptions::retrieval_error()
            }
        };
        Some(options)
    }
}

/// Value list named by a tag option like `data:fm_value_list-Colors`.
pub fn value_list_name(option: &str) -> Option<&str> {
    option
        .strip_prefix("data:")
        .and_then(|rest| rest.strip_prefix(FM_VALUE_LIST_PREFIX))
        .filter(|name| !name.is_empty())
}
