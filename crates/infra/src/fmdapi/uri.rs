//! Data API endpoint construction

use fmbridge_domain::constants::{LOCAL_DEV_HOST, LOCAL_DEV_PORT};
use fmbridge_domain::{DataApiConfig, DatasourceConfig, DriverError, DriverResult};
use url::Url;

/// Endpoints of one database, all relative to
/// `{protocol}://{server}/fmi/data/{version}/databases/{database}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Base URI for `datasource`, rejecting an empty server or database.
    pub fn new(datasource: &DatasourceConfig, settings: &DataApiConfig) -> DriverResult<Self> {
        datasource.validate()?;

        let server = datasource.server.trim().trim_end_matches('/');
        let origin = if server == LOCAL_DEV_HOST {
            format!("http://{LOCAL_DEV_HOST}:{LOCAL_DEV_PORT}")
        } else {
            format!("{}://{}", settings.protocol, server)
        };

        let base = format!(
            "{origin}/fmi/data/{}/databases/{}/",
            settings.api_version,
            encode(datasource.database.trim())
        );

        Url::parse(&base).map_err(|err| {
            DriverError::configuration(format!("Invalid server address '{server}': {err}"))
        })?;

        Ok(Self { base })
    }

    /// Base URI, ending in `/`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `sessions`, for opening a session.
    pub fn sessions(&self) -> String {
        format!("{}sessions", self.base)
    }

    /// `layouts`, the layout list.
    pub fn layouts(&self) -> String {
        format!("{}layouts", self.base)
    }

    /// `layouts/{layout}`, layout metadata.
    pub fn layout(&self, layout: &str) -> String {
        format!("{}layouts/{}", self.base, encode(layout))
    }

    /// `layouts/{layout}/records`, record creation.
    pub fn records(&self, layout: &str) -> String {
        format!("{}/records", self.layout(layout))
    }

    /// Upload target of one container field repetition.
    pub fn container(
        &self,
        layout: &str,
        record_id: &str,
        field_name: &str,
        repetition: u32,
    ) -> String {
        format!(
            "{}/{}/containers/{}/{}/",
            self.records(layout),
            encode(record_id),
            encode(field_name),
            repetition
        )
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
