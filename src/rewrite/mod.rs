//! Manifest rewrite engine.
//!
//! Two format-specific rewriters (line-oriented HLS, tag-oriented DASH)
//! share one URL resolution/encoding primitive. Both are pure functions
//! of (text, context) — no I/O — so they are unit-testable in isolation.

pub mod dash;
pub mod hls;

use url::Url;

/// Everything a format rewriter needs to turn a manifest reference into
/// a proxied URL. Immutable, built once per request.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// Absolute URL the manifest was fetched from; relative references
    /// resolve against it.
    pub base_url: Url,
    /// Absolute URL of the proxy's own rewrite route.
    pub proxy_endpoint: Url,
}

impl RewriteContext {
    pub fn new(base_url: Url, proxy_endpoint: Url) -> Self {
        Self {
            base_url,
            proxy_endpoint,
        }
    }

    /// Resolve `reference` against the manifest base (RFC 3986 §5 via
    /// [`Url::join`]) and wrap the absolute result in a proxy URL
    /// carrying it as a form-encoded `url` query value.
    ///
    /// A reference that fails to resolve is reported as an error so the
    /// caller can leave it untouched — a single bad reference must never
    /// fail the whole manifest.
    pub fn proxied_reference(&self, reference: &str) -> Result<String, url::ParseError> {
        let absolute = self.base_url.join(reference)?;

        let mut proxied = self.proxy_endpoint.clone();
        proxied
            .query_pairs_mut()
            .append_pair("url", absolute.as_str());

        Ok(proxied.into())
    }
}
