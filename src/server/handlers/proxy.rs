use crate::{
    error::{ProxyError, Result},
    fetch,
    rewrite::RewriteContext,
    route,
    server::{state::AppState, url_validation::validate_target_url},
};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use std::collections::HashMap;
use tracing::info;
use url::Url;

/// Primary proxy entry point.
///
/// Fetches the target resource, then either rewrites it (textual
/// manifests) or streams it through byte-for-byte (media segments).
/// Optional `referer` / `userAgent` query parameters override the
/// headers forwarded to the origin.
pub async fn serve_proxy(
    Query(params): Query<HashMap<String, String>>,
    inbound_headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Response> {
    let raw_url = params.get("url").ok_or(ProxyError::MissingParameter)?;
    let target = Url::parse(raw_url).map_err(|_| ProxyError::InvalidTargetUrl)?;
    validate_target_url(&target, state.config.is_dev)?;

    info!("Proxying: {}", target);

    let forward =
        fetch::build_forward_headers(&params, &inbound_headers, &state.header_defaults);
    let origin = fetch::fetch(&state.http_client, &target, forward).await?;

    let ctx = RewriteContext::new(target.clone(), state.proxy_endpoint.clone());
    route::respond(origin, &target, &ctx).await
}
