//! The single HTTP client every resource client goes through.
//!
//! ARCHITECTURE
//! ============
//! Outbound, each request picks up the bearer token from the
//! [`SessionStore`] at send time, so a login or logout is visible to the very
//! next request. Inbound, every non-success response is classified into an
//! [`ApiError`]; a 401 additionally erases the stored credential and fans out
//! to the registered [`SessionInvalidation`] listeners before the error is
//! returned.
//!
//! TRADE-OFFS
//! ==========
//! A 401 on a request that carried the stored token is treated as "session
//! invalid". There is no refresh and no retry: the user signs in again.
//! Requests sent with an explicit token or none at all (login, register,
//! the profile fetch right after login) say nothing about the stored
//! session, so their 401s are returned without touching it.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, Timeouts};
use crate::error::ApiError;
use crate::session::SessionStore;

/// Details of the request whose 401 invalidated the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invalidation {
    pub method: Method,
    pub path: String,
    pub message: Option<String>,
}

/// Receives "the session is no longer valid" signals from the transport.
///
/// Registered once at construction time by whoever owns the session; the
/// transport never learns the listener's concrete type.
pub trait SessionInvalidation: Send + Sync {
    fn session_invalidated(&self, cause: &Invalidation);
}

/// Raw body plus headers of a successful binary response.
#[derive(Debug)]
pub struct BinaryBody {
    pub headers: HeaderMap,
    pub bytes: Bytes,
}

pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    timeouts: Timeouts,
    store: Arc<dyn SessionStore>,
    listeners: RwLock<Vec<Arc<dyn SessionInvalidation>>>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Build the client from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not `http(s)://` or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let base_url = crate::config::normalize_base_url(&config.api_url);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(config.api_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeouts.request())
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, base_url, timeouts: config.timeouts, store, listeners: RwLock::new(Vec::new()) })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Register a listener for 401-driven invalidation.
    pub fn add_invalidation_listener(&self, listener: Arc<dyn SessionInvalidation>) {
        match self.listeners.write() {
            Ok(mut guard) => guard.push(listener),
            Err(poisoned) => poisoned.into_inner().push(listener),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // =========================================================================
    // JSON HELPERS
    // =========================================================================

    /// `GET path`, decoding a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or decode failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.dispatch(Method::GET, path, |req| req).await?;
        decode_json(response).await
    }

    /// `GET path` authenticated with `token` instead of the stored one.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or decode failure.
    pub async fn get_with_token<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, Bearer::Explicit(token), |req| req).await?;
        decode_json(response).await
    }

    /// `GET path?query`, decoding a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or decode failure.
    pub async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.dispatch(Method::GET, path, |req| req.query(query)).await?;
        decode_json(response).await
    }

    /// Send an optional JSON body and decode a JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or decode failure.
    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .dispatch(method, path, |req| match body {
                Some(body) => req.json(body),
                None => req,
            })
            .await?;
        decode_json(response).await
    }

    /// Send a JSON body without any bearer token and decode a JSON response.
    /// A 401 here leaves the stored session alone.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or decode failure.
    pub async fn send_anonymous_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, Bearer::Anonymous, |req| req.json(body)).await?;
        decode_json(response).await
    }

    /// Like [`Self::send_anonymous_json`], ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn send_anonymous_discard<B>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, Bearer::Anonymous, |req| req.json(body)).await?;
        Ok(())
    }

    /// Send query parameters with an empty body and decode a JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or decode failure.
    pub async fn send_query<T, Q>(&self, method: Method, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.dispatch(method, path, |req| req.query(query)).await?;
        decode_json(response).await
    }

    /// `GET path` for a binary payload, with its own timeout.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn get_bytes(&self, path: &str, timeout: Duration) -> Result<BinaryBody, ApiError> {
        let response = self.dispatch(Method::GET, path, |req| req.timeout(timeout)).await?;
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(|e| ApiError::from_reqwest(&e))?;
        Ok(BinaryBody { headers, bytes })
    }

    // =========================================================================
    // INTERCEPTORS
    // =========================================================================

    async fn dispatch<F>(&self, method: Method, path: &str, build: F) -> Result<Response, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        self.send(method, path, Bearer::Stored, build).await
    }

    async fn send<F>(&self, method: Method, path: &str, bearer: Bearer<'_>, build: F) -> Result<Response, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request = self.authorize(self.http.request(method.clone(), self.url(path)), bearer);
        let started = Instant::now();
        let response = build(request).send().await.map_err(|e| {
            let error = ApiError::from_reqwest(&e);
            tracing::warn!(%method, path, %error, "request failed");
            error
        })?;

        let status = response.status();
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(%method, path, status = status.as_u16(), elapsed_ms, "response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let error = ApiError::from_status(status.as_u16(), &body);
        if let (ApiError::Unauthorized { message }, Bearer::Stored) = (&error, bearer) {
            self.invalidate(&Invalidation { method, path: path.to_owned(), message: message.clone() });
        }
        Err(error)
    }

    /// Outbound: attach the bearer token, if any.
    fn authorize(&self, request: RequestBuilder, bearer: Bearer<'_>) -> RequestBuilder {
        match bearer {
            Bearer::Explicit(token) => request.bearer_auth(token),
            Bearer::Anonymous => request,
            Bearer::Stored => match self.store.token() {
                Some(token) => request.bearer_auth(token),
                None => request,
            },
        }
    }

    /// Inbound 401: erase the credential, then tell every listener.
    fn invalidate(&self, cause: &Invalidation) {
        tracing::warn!(method = %cause.method, path = %cause.path, "401 received; clearing session");
        if let Err(error) = self.store.clear() {
            tracing::error!(%error, "failed to clear session store");
        }
        let listeners = match self.listeners.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        for listener in listeners {
            listener.session_invalidated(cause);
        }
    }
}

#[derive(Clone, Copy)]
enum Bearer<'a> {
    Stored,
    Explicit(&'a str),
    Anonymous,
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(|e| ApiError::from_reqwest(&e))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
