//! Control plane client
//!
//! [`ArrayClient`] is the authenticated page fetcher for one endpoint. Each
//! operation is a `POST {endpoint}/{operation}` whose JSON body carries the
//! call arguments; listings are merged through
//! [`IterMerger`](crate::pagination::IterMerger).

use crate::config::ClientConfig;
use crate::decode::{JsonPageDecoder, PageDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{
    page_arguments, IterMerger, ListOptions, ListRequest, ListResult, Page, PageFetcher,
};
use crate::types::{Arguments, JsonValue};
use async_trait::async_trait;
use tracing::debug;

/// Header scoping a call to a storage virtual machine
pub const VSERVER_HEADER: &str = "X-Vserver";

/// Client for one control plane endpoint
#[derive(Debug, Clone)]
pub struct ArrayClient {
    http: HttpClient,
    decoder: JsonPageDecoder,
    vserver: Option<String>,
    options: ListOptions,
}

impl ArrayClient {
    /// Build a client from a validated config
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_auth(config.http_client_config(), config.auth.clone())?;

        Ok(Self {
            http,
            decoder: JsonPageDecoder::with_layout(config.layout.clone()),
            vserver: config.vserver.clone(),
            options: config.list_options(),
        })
    }

    /// Build a client from already constructed parts
    pub fn from_parts(http: HttpClient, decoder: JsonPageDecoder, options: ListOptions) -> Self {
        Self {
            http,
            decoder,
            vserver: None,
            options,
        }
    }

    /// A copy of this client scoped to another vserver; `self` is unchanged
    #[must_use]
    pub fn for_vserver(&self, vserver: impl Into<String>) -> Self {
        Self {
            vserver: Some(vserver.into()),
            ..self.clone()
        }
    }

    /// Vserver calls are scoped to, if any
    pub fn vserver(&self) -> Option<&str> {
        self.vserver.as_deref()
    }

    /// Default listing options
    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// List every record of an iterator operation
    pub async fn list(
        &self,
        operation: &str,
        arguments: &Arguments,
    ) -> Result<ListResult<JsonValue>> {
        self.list_with(operation, arguments, self.options).await
    }

    /// List every record of an iterator operation with explicit options
    pub async fn list_with(
        &self,
        operation: &str,
        arguments: &Arguments,
        options: ListOptions,
    ) -> Result<ListResult<JsonValue>> {
        IterMerger::new(self)
            .with_options(options)
            .fetch_all(operation, arguments)
            .await
    }

    /// Check whether an iterator operation matches any record, using a
    /// single one-record round-trip.
    ///
    /// A reply without a record count has no records; a count that is
    /// present but not a number is a malformed page.
    pub async fn has_records(&self, operation: &str, arguments: &Arguments) -> Result<bool> {
        let request = ListRequest::new(operation, arguments, 1)?;
        let page = self
            .fetch_page(request.operation(), request.arguments(), None)
            .await?;
        if page.num_records.as_deref().map_or(true, |raw| raw.trim().is_empty()) {
            return Ok(false);
        }
        let count = page
            .record_count()
            .map_err(|message| Error::malformed_page(operation, 1, message))?;
        Ok(count > 0)
    }

    /// Total declared record count of an iterator operation
    pub async fn record_count(&self, operation: &str, arguments: &Arguments) -> Result<u64> {
        Ok(self.list(operation, arguments).await?.num_records)
    }
}

#[async_trait]
impl PageFetcher for ArrayClient {
    type Record = JsonValue;

    async fn fetch_page(
        &self,
        operation: &str,
        arguments: &Arguments,
        continuation: Option<&str>,
    ) -> Result<Page<JsonValue>> {
        let body = JsonValue::Object(page_arguments(arguments, continuation));
        let mut request = RequestConfig::new().json(body);
        if let Some(vserver) = &self.vserver {
            request = request.header(VSERVER_HEADER, vserver);
        }

        debug!(operation, vserver = self.vserver.as_deref(), "Sending request");
        let text = self.http.post_text(operation, request).await?;
        self.decoder.decode(&text)
    }
}
