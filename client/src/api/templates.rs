//! `/templates/*` endpoints. Public: no session required.

use std::sync::Arc;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{ListParams, Page, Template};

#[derive(Clone, Debug)]
pub struct TemplateApi {
    transport: Arc<Transport>,
}

impl TemplateApi {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// `GET /templates`, optionally filtered by `params.category`.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn list(&self, params: &ListParams) -> Result<Page<Template>, ApiError> {
        self.transport.get_json("/templates", params).await
    }

    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn get(&self, id: &str) -> Result<Template, ApiError> {
        self.transport.get(&format!("/templates/{id}")).await
    }
}
