//! Resource clients: stateless, typed wrappers over [`Transport`].
//!
//! SYSTEM CONTEXT
//! ==============
//! Each client maps logical operations onto one verb/path pair and returns
//! the transport's [`ApiError`](crate::ApiError) unchanged. None of them
//! retry; read retries live in [`crate::query`].

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

pub mod auth;
pub mod hosting;
pub mod templates;
pub mod websites;

use std::sync::Arc;

pub use auth::AuthApi;
pub use hosting::HostingApi;
pub use templates::TemplateApi;
pub use websites::WebsiteApi;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::MessageResponse;

/// `GET /health`.
///
/// # Errors
///
/// Returns the transport error if the API is unreachable or unhealthy.
pub async fn health_check(transport: &Transport) -> Result<MessageResponse, ApiError> {
    transport.get("/health").await
}

/// All resource clients sharing one transport.
#[derive(Clone, Debug)]
pub struct Api {
    pub auth: AuthApi,
    pub websites: WebsiteApi,
    pub templates: TemplateApi,
    pub hosting: HostingApi,
    transport: Arc<Transport>,
}

impl Api {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            auth: AuthApi::new(transport.clone()),
            websites: WebsiteApi::new(transport.clone()),
            templates: TemplateApi::new(transport.clone()),
            hosting: HostingApi::new(transport.clone()),
            transport,
        }
    }

    /// See [`health_check`].
    ///
    /// # Errors
    ///
    /// Returns the transport error if the API is unreachable or unhealthy.
    pub async fn health(&self) -> Result<MessageResponse, ApiError> {
        health_check(&self.transport).await
    }
}
