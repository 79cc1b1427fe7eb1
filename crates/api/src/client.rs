//! Main client for the HAP open API.

use crate::config::ApiConfig;
use crate::endpoints::*;
use crate::error::HapResult;
use crate::transport::HttpTransport;
use std::sync::Arc;

/// Client for one HAP application, grouping the open-API endpoint families.
#[derive(Clone)]
pub struct HapClient {
    pub(crate) http: HttpTransport,
}

impl HapClient {
    /// Create a client from configuration.
    pub fn new(config: ApiConfig) -> HapResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config)?;
        Ok(Self { http })
    }

    /// Application-level endpoints (app structure, roles' app, area data).
    pub fn app(&self) -> AppApi<'_> {
        AppApi::new(self)
    }

    /// Worksheet structure endpoints.
    pub fn worksheets(&self) -> WorksheetsApi<'_> {
        WorksheetsApi::new(self)
    }

    /// Row record endpoints.
    pub fn records(&self) -> RecordsApi<'_> {
        RecordsApi::new(self)
    }

    /// Role management endpoints.
    pub fn roles(&self) -> RolesApi<'_> {
        RolesApi::new(self)
    }

    /// Option set endpoints.
    pub fn option_sets(&self) -> OptionSetsApi<'_> {
        OptionSetsApi::new(self)
    }

    /// Report endpoints (pivot data).
    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }
}
