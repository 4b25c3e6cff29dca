//! `/hosting/*` endpoints.

use std::sync::Arc;

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::HostedSite;

#[derive(Clone, Debug)]
pub struct HostingApi {
    transport: Arc<Transport>,
}

impl HostingApi {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Every deployment owned by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn sites(&self) -> Result<Vec<HostedSite>, ApiError> {
        self.transport.get("/hosting/sites").await
    }
}
