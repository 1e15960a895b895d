//! Outbound fetch dispatcher.
//!
//! Issues a single GET to the origin with the forwarded header set and
//! surfaces the final response (redirects are followed transparently by
//! the client) for the router to classify. Fetches are deliberately
//! single-attempt: manifest requests are latency-sensitive and live
//! players run their own retry loops.

use crate::error::{ProxyError, Result};
use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use futures_util::Stream;
use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Outbound header fallbacks applied when neither the query string nor
/// the inbound client request supplies a value.
#[derive(Debug, Clone, Default)]
pub struct HeaderDefaults {
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

/// Build the header set forwarded to the origin.
///
/// Only Referer and User-Agent are forwarded, plus a constant
/// `accept: */*`. Precedence per header: query override (`referer` /
/// `userAgent`) > inbound client header > configured default.
pub fn build_forward_headers(
    params: &HashMap<String, String>,
    inbound: &HeaderMap,
    defaults: &HeaderDefaults,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

    let referer = params
        .get("referer")
        .cloned()
        .or_else(|| header_str(inbound, &header::REFERER))
        .or_else(|| defaults.referer.clone());
    if let Some(referer) = referer {
        if let Ok(value) = HeaderValue::from_str(&referer) {
            headers.insert(header::REFERER, value);
        }
    }

    let user_agent = params
        .get("userAgent")
        .cloned()
        .or_else(|| header_str(inbound, &header::USER_AGENT))
        .or_else(|| defaults.user_agent.clone());
    if let Some(user_agent) = user_agent {
        if let Ok(value) = HeaderValue::from_str(&user_agent) {
            headers.insert(header::USER_AGENT, value);
        }
    }

    headers
}

fn header_str(headers: &HeaderMap, name: &header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Final response observed from the origin, created once per outbound
/// fetch and consumed exactly once — either fully buffered via
/// [`OriginResponse::bytes`] or streamed via [`OriginResponse::into_stream`].
#[derive(Debug)]
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Lowercased `content-type`, empty when the origin omitted it.
    pub content_type: String,
    /// Lowercased `content-encoding`, when declared.
    pub content_encoding: Option<String>,
    response: reqwest::Response,
}

impl OriginResponse {
    /// Buffer the full body in memory. Only used for textual manifests,
    /// which are small by nature.
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.response.bytes().await?)
    }

    /// Hand the body over as a byte stream for binary passthrough.
    /// Dropping the stream aborts the upstream transfer.
    pub fn into_stream(self) -> impl Stream<Item = reqwest::Result<Bytes>> {
        self.response.bytes_stream()
    }
}

/// Fetch `target` from the origin with the given forwarded headers.
///
/// # Errors
///
/// [`ProxyError::OriginStatus`] when the origin answers with a non-2xx
/// status, [`ProxyError::OriginFetchError`] on transport failure or
/// timeout.
pub async fn fetch(
    client: &Client,
    target: &Url,
    forward_headers: HeaderMap,
) -> Result<OriginResponse> {
    debug!("Fetching origin resource: {}", target);

    let response = client
        .get(target.clone())
        .headers(forward_headers)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProxyError::OriginStatus(status));
    }

    let headers = response.headers().clone();

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let content_encoding = headers
        .get(header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase);

    Ok(OriginResponse {
        status,
        headers,
        content_type,
        content_encoding,
        response,
    })
}
