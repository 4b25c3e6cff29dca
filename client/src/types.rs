//! Wire DTOs for the website builder API.
//!
//! DESIGN
//! ======
//! Only fields the client displays are typed; everything else is carried in a
//! flattened `extra` map so values round-trip through the session file and
//! profile overlays without loss. Identifiers arrive as strings from the
//! production API and as numbers from older deployments, so both decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// USERS
// =============================================================================

/// The signed-in user as returned by `GET /auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Remaining profile fields (`bio`, `avatar_url`, `subscription_plan`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Name shown in the navbar: full name when set, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Shallow overlay: every top-level key in `patch` replaces the same key
    /// here; keys absent from `patch` are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged object no longer decodes as a profile
    /// (for example `patch` sets `username` to `null`).
    pub fn overlay(&self, patch: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut merged = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(merged))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub password: String,
}

/// Partial profile update for `PUT /auth/me`; unset fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// =============================================================================
// WEBSITES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Website {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    /// `draft`, `published` or `archived`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub is_hosted: bool,
    #[serde(default)]
    pub hosting_subdomain: Option<String>,
    #[serde(default)]
    pub hosting_url: Option<String>,
    #[serde(default)]
    pub ssl_enabled: bool,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Website {
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match self.status.as_deref() {
            Some("published") => "Published",
            Some("draft") => "Draft",
            Some("archived") => "Archived",
            _ => "Unknown",
        }
    }
}

/// Body for `POST /websites` and `PUT /websites/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct WebsiteDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

/// Query for `POST /generate/website`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub template_id: String,
    pub website_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_description: Option<String>,
}

/// Zip archive produced by `GET /websites/{id}/export`.
#[derive(Clone, Debug)]
pub struct ExportArchive {
    pub bytes: bytes::Bytes,
    /// Filename from `Content-Disposition`, when the server sent one.
    pub filename: Option<String>,
}

// =============================================================================
// TEMPLATES + HOSTING
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `portfolio`, `business`, `blog`, `ecommerce` or `landing`.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    /// Price in cents.
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deployment record from `GET /hosting/sites`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostedSite {
    #[serde(default)]
    pub website_id: Option<String>,
    #[serde(default)]
    pub website_name: Option<String>,
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub hosting_url: Option<String>,
    #[serde(default)]
    pub ssl_enabled: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Paginated list envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub pages: u64,
}

/// Query parameters shared by list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

// =============================================================================
// HELPERS
// =============================================================================

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}
