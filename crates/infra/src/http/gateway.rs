//! HTTP gateway implementing the core [`Gateway`] port
//!
//! Every request flows through one pipeline: the auth header is attached,
//! multipart requests lose any explicit `Content-Type`, GETs may be served
//! from the response cache, the transport runs with the descriptor's own
//! timeout, mutating requests invalidate related cache keys whether they
//! succeeded or not, and non-success statuses are classified into the domain
//! error taxonomy. A 401 tears the session down before the error is
//! returned.
//!
//! There are no retries: a failed request surfaces immediately and the
//! caller decides what to do with it.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use pavilion_common::session::SessionManager;
use pavilion_common::time::{Clock, SystemClock};
use pavilion_core::Gateway;
use pavilion_domain::{
    ApiConfig, ApiError, ApiResponse, HttpMethod, MultipartField, MultipartPart, RequestBody,
    RequestDescriptor, ResponseSnapshot, Result,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, Method};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::cache::ResponseCache;
use crate::errors::InfraError;

/// Gateway backed by reqwest and the TTL response cache
pub struct HttpGateway<C: Clock = SystemClock> {
    client: ReqwestClient,
    base_url: String,
    session: Arc<SessionManager>,
    cache: ResponseCache<C>,
}

impl<C: Clock> std::fmt::Debug for HttpGateway<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpGateway<SystemClock> {
    /// Create a gateway from configuration using the system clock.
    ///
    /// # Errors
    /// Returns `ApiError::Unknown` if the base URL does not parse or the
    /// underlying client cannot be constructed.
    pub fn new(config: &ApiConfig, session: Arc<SessionManager>) -> Result<Self> {
        Self::with_clock(config, session, SystemClock)
    }
}

impl<C: Clock> HttpGateway<C> {
    /// Create a gateway with a custom clock (useful for testing TTL expiry).
    ///
    /// # Errors
    /// Returns `ApiError::Unknown` if the base URL does not parse or the
    /// underlying client cannot be constructed.
    pub fn with_clock(config: &ApiConfig, session: Arc<SessionManager>, clock: C) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|err| ApiError::Unknown {
            status: None,
            message: format!("invalid base url {:?}: {err}", config.base_url),
        })?;

        let client = ReqwestClient::builder()
            .timeout(config.timeout())
            .no_proxy()
            .build()
            .map_err(|err| ApiError::from(InfraError::from(err)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            cache: ResponseCache::with_clock(config.cache_ttl(), clock),
        })
    }

    fn attach_auth_header(&self, descriptor: RequestDescriptor) -> RequestDescriptor {
        match self.session.bearer_header_value() {
            Some(value) => descriptor.header("Authorization", value),
            None => descriptor,
        }
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    async fn transport(&self, descriptor: &RequestDescriptor) -> Result<ResponseSnapshot> {
        let url = self.resolve(&descriptor.url);
        let method = into_reqwest_method(descriptor.method);
        debug!(method = %descriptor.method, %url, "sending request");

        let mut builder = self.client.request(method, url).timeout(descriptor.timeout);
        for (name, value) in &descriptor.headers {
            builder = builder.header(name, value);
        }
        builder = match &descriptor.body {
            Some(RequestBody::Json(payload)) => builder.json(payload),
            Some(RequestBody::Multipart(fields)) => builder.multipart(build_form(fields)?),
            None => builder,
        };

        let response =
            builder.send().await.map_err(|err| ApiError::from(InfraError::from(err)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect::<BTreeMap<_, _>>();

        let text =
            response.text().await.map_err(|err| ApiError::from(InfraError::from(err)))?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ResponseSnapshot { status, headers, body })
    }

    async fn dispatch(&self, descriptor: RequestDescriptor) -> Result<ApiResponse> {
        let descriptor = self.attach_auth_header(descriptor);
        // The transport generates the multipart boundary itself; an explicit
        // Content-Type would clobber it.
        let descriptor = if descriptor.is_multipart() {
            descriptor.without_header("Content-Type")
        } else {
            descriptor
        };

        if descriptor.method == HttpMethod::Get {
            if let Some(snapshot) = self.cache.lookup(&descriptor.url) {
                debug!(url = %descriptor.url, "serving cached response");
                return Ok(ApiResponse::from_cache(snapshot));
            }
        }

        let outcome = self.transport(&descriptor).await;

        // Writes invalidate on failure too: the backend may have applied
        // the mutation before the response was lost.
        if descriptor.method.is_mutating() {
            let removed = self.cache.invalidate_related(&descriptor.url);
            if removed > 0 {
                debug!(url = %descriptor.url, removed, "invalidated cached responses");
            }
        }

        let snapshot = outcome?;

        if !snapshot.is_success() {
            let err = ApiError::from_response(snapshot.status, &snapshot.body);
            if err.is_unauthorized() {
                warn!(url = %descriptor.url, "session rejected; clearing token and cache");
                self.session.on_unauthorized().await;
                self.cache.clear();
            }
            return Err(err);
        }

        if descriptor.method == HttpMethod::Get {
            self.cache.store(&descriptor.url, snapshot.clone());
        }

        Ok(ApiResponse::from_network(snapshot))
    }
}

#[async_trait]
impl<C: Clock> Gateway for HttpGateway<C> {
    async fn send(&self, descriptor: RequestDescriptor) -> Result<ApiResponse> {
        self.dispatch(descriptor).await
    }

    fn clear_cached_responses(&self) {
        self.cache.clear();
    }
}

fn into_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn build_form(fields: &[MultipartField]) -> Result<Form> {
    let mut form = Form::new();
    for field in fields {
        match &field.part {
            MultipartPart::Text(value) => {
                form = form.text(field.name.clone(), value.clone());
            }
            MultipartPart::File { filename, content_type, data } => {
                let part = Part::bytes(data.clone())
                    .file_name(filename.clone())
                    .mime_str(content_type)
                    .map_err(|err| ApiError::Unknown {
                        status: None,
                        message: format!("invalid multipart content type {content_type:?}: {err}"),
                    })?;
                form = form.part(field.name.clone(), part);
            }
        }
    }
    Ok(form)
}
