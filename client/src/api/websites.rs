//! `/websites/*` and `/generate/website` endpoints.

#[cfg(test)]
#[path = "websites_test.rs"]
mod websites_test;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::CONTENT_DISPOSITION;
use serde::Serialize;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{ExportArchive, GenerateRequest, ListParams, MessageResponse, Page, Website, WebsiteDraft};

#[derive(Clone, Debug)]
pub struct WebsiteApi {
    transport: Arc<Transport>,
}

#[derive(Serialize)]
struct DeployQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_subdomain: Option<&'a str>,
}

fn website_path(id: &str) -> String {
    format!("/websites/{id}")
}

fn website_action_path(id: &str, action: &str) -> String {
    format!("/websites/{id}/{action}")
}

impl WebsiteApi {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// `GET /websites` for the signed-in owner.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn list(&self, params: &ListParams) -> Result<Page<Website>, ApiError> {
        self.transport.get_json("/websites", params).await
    }

    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn get(&self, id: &str) -> Result<Website, ApiError> {
        self.transport.get(&website_path(id)).await
    }

    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn create(&self, draft: &WebsiteDraft) -> Result<Website, ApiError> {
        self.transport.send_json(Method::POST, "/websites", Some(draft)).await
    }

    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn update(&self, id: &str, draft: &WebsiteDraft) -> Result<Website, ApiError> {
        self.transport.send_json(Method::PUT, &website_path(id), Some(draft)).await
    }

    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn delete(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.transport.send_json::<_, ()>(Method::DELETE, &website_path(id), None).await
    }

    /// Quick generation from a template; the server fills in content.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Website, ApiError> {
        self.transport.send_query(Method::POST, "/generate/website", request).await
    }

    /// Download the site as a zip archive, using the export timeout.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn export(&self, id: &str) -> Result<ExportArchive, ApiError> {
        let timeout = self.transport.timeouts().export();
        let body = self.transport.get_bytes(&website_action_path(id, "export"), timeout).await?;
        let filename = body
            .headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);
        tracing::info!(website_id = id, bytes = body.bytes.len(), "website exported");
        Ok(ExportArchive { bytes: body.bytes, filename })
    }

    /// Publish on the integrated hosting, optionally on a chosen subdomain.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn deploy(&self, id: &str, custom_subdomain: Option<&str>) -> Result<MessageResponse, ApiError> {
        let query = DeployQuery { custom_subdomain: custom_subdomain.filter(|s| !s.trim().is_empty()) };
        self.transport
            .send_query(Method::POST, &website_action_path(id, "deploy"), &query)
            .await
    }

    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn undeploy(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.transport
            .send_json::<_, ()>(Method::DELETE, &website_action_path(id, "undeploy"), None)
            .await
    }

    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn redeploy(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.transport
            .send_json::<_, ()>(Method::PUT, &website_action_path(id, "redeploy"), None)
            .await
    }

    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn configure_ssl(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.transport
            .send_json::<_, ()>(Method::POST, &website_action_path(id, "ssl"), None)
            .await
    }
}

/// `attachment; filename="site-export.zip"` → `site-export.zip`.
fn disposition_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').trim())
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
        .map(ToOwned::to_owned)
}
