//! Response routing: classify the origin response and decide between
//! buffered text rewriting and binary passthrough streaming.

use crate::error::{ProxyError, Result};
use crate::fetch::OriginResponse;
use crate::rewrite::{RewriteContext, dash, hls};
use axum::{
    body::Body,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use flate2::read::{GzDecoder, ZlibDecoder};
use std::io::Read;
use tracing::debug;
use url::Url;

/// Manifest format detected for an origin response. Recomputed per
/// response — origins are inconsistent about declaring format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Hls,
    Dash,
    /// Textual but not a manifest we rewrite; buffered and passed through.
    PlainText,
    /// Everything else, streamed through untouched.
    Binary,
}

/// Headers meaningful only for a single transport connection; an
/// intermediary must never forward them.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Classify an origin response, content-type rules first (ordered, first
/// match wins), then a filename-suffix fallback for origins that omit or
/// mislabel manifest content-types.
pub fn classify(content_type: &str, target: &Url) -> ManifestFormat {
    let ct = content_type.to_ascii_lowercase();

    if ct.contains("application/vnd.apple.mpegurl") || ct.contains("application/x-mpegurl") {
        return ManifestFormat::Hls;
    }
    if ct.contains("application/dash+xml") || ct.contains("mpd+xml") {
        return ManifestFormat::Dash;
    }
    if ct.starts_with("text/") {
        return ManifestFormat::PlainText;
    }

    let path = target.path().to_ascii_lowercase();
    if path.ends_with(".m3u8") {
        ManifestFormat::Hls
    } else if path.ends_with(".mpd") {
        ManifestFormat::Dash
    } else {
        ManifestFormat::Binary
    }
}

/// Decompress (when the origin declared gzip/deflate) and decode a
/// buffered body as UTF-8 text.
pub fn decode_text(bytes: &[u8], content_encoding: Option<&str>) -> Result<String> {
    let raw = match content_encoding {
        Some("gzip") => {
            let mut buf = Vec::new();
            GzDecoder::new(bytes)
                .read_to_end(&mut buf)
                .map_err(|e| ProxyError::DecodeError(format!("gzip: {e}")))?;
            buf
        }
        Some("deflate") => {
            let mut buf = Vec::new();
            ZlibDecoder::new(bytes)
                .read_to_end(&mut buf)
                .map_err(|e| ProxyError::DecodeError(format!("deflate: {e}")))?;
            buf
        }
        _ => bytes.to_vec(),
    };

    String::from_utf8(raw).map_err(|e| ProxyError::DecodeError(format!("utf-8: {e}")))
}

/// Copy origin response headers, dropping the hop-by-hop set and the
/// origin's own `access-control-*` headers (the CORS layer stamps the
/// wildcard allow header on every response).
///
/// For buffered text responses `content-length` and `content-encoding`
/// are also dropped: the body has been decoded and rewritten, so both
/// would be stale.
pub fn filter_headers(origin: &HeaderMap, buffered: bool) -> HeaderMap {
    let mut out = HeaderMap::new();

    for (name, value) in origin {
        let n = name.as_str();
        if HOP_BY_HOP.contains(&n) || n.starts_with("access-control-") {
            continue;
        }
        if buffered && (n == "content-length" || n == "content-encoding") {
            continue;
        }
        out.append(name.clone(), value.clone());
    }

    out
}

/// Emit the final client response for a classified origin response:
/// buffer-decode-rewrite for textual manifests, chunked passthrough for
/// binary media. Dropping the response (client disconnect) drops the
/// upstream stream and aborts the transfer.
pub async fn respond(origin: OriginResponse, target: &Url, ctx: &RewriteContext) -> Result<Response> {
    let format = classify(&origin.content_type, target);
    debug!("Routing {} as {:?}", target, format);

    let status = origin.status;

    match format {
        ManifestFormat::Hls | ManifestFormat::Dash | ManifestFormat::PlainText => {
            let headers = filter_headers(&origin.headers, true);
            let content_encoding = origin.content_encoding.clone();

            let bytes = origin.bytes().await?;
            let text = decode_text(&bytes, content_encoding.as_deref())?;

            let body = match format {
                ManifestFormat::Hls => hls::rewrite(&text, ctx),
                ManifestFormat::Dash => dash::rewrite(&text, ctx),
                _ => text,
            };

            Ok(assemble(status, headers, Body::from(body)))
        }
        ManifestFormat::Binary => {
            let headers = filter_headers(&origin.headers, false);
            let body = Body::from_stream(origin.into_stream());
            Ok(assemble(status, headers, body))
        }
    }
}

fn assemble(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
