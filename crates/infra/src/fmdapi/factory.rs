//! Gateway factory backed by [`FmDataApiClient`]

use std::sync::Arc;

use fmbridge_core::{CloudTokenProvider, FileMakerGateway, GatewayFactory, SessionTokenCache};
use fmbridge_domain::{DataApiConfig, DatasourceConfig, DriverResult};

use super::client::FmDataApiClient;
use crate::http::HttpClient;

/// Opens Data API clients that share one HTTP client and session cache.
#[derive(Clone)]
pub struct FmDataApiGatewayFactory {
    http: HttpClient,
    settings: DataApiConfig,
    sessions: Arc<dyn SessionTokenCache>,
    cloud_tokens: Option<Arc<dyn CloudTokenProvider>>,
}

impl FmDataApiGatewayFactory {
    /// Factory whose clients share one HTTP client and `sessions`.
    pub fn new(
        settings: DataApiConfig,
        sessions: Arc<dyn SessionTokenCache>,
    ) -> DriverResult<Self> {
        let http = HttpClient::from_config(&settings)?;
        Ok(Self { http, settings, sessions, cloud_tokens: None })
    }

    /// Provider handed to every client for FileMaker Cloud datasources.
    pub fn with_cloud_tokens(mut self, provider: Arc<dyn CloudTokenProvider>) -> Self {
        self.cloud_tokens = Some(provider);
        self
    }

    /// Configured client, for callers that need the concrete type.
    pub fn client(
        &self,
        datasource: DatasourceConfig,
        layout: &str,
    ) -> DriverResult<FmDataApiClient> {
        let mut client =
            FmDataApiClient::new(self.http.clone(), self.settings.clone(), self.sessions.clone());
        if let Some(provider) = &self.cloud_tokens {
            client = client.with_cloud_tokens(provider.clone());
        }
        client.configure(datasource, layout)?;
        Ok(client)
    }
}

impl GatewayFactory for FmDataApiGatewayFactory {
    fn open(
        &self,
        datasource: DatasourceConfig,
        layout: &str,
    ) -> DriverResult<Arc<dyn FileMakerGateway>> {
        Ok(Arc::new(self.client(datasource, layout)?))
    }
}
