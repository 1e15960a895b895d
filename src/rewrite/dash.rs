//! Tag-oriented DASH manifest rewriter.

use super::RewriteContext;
use tracing::debug;

const OPEN_TAG: &str = "<BaseURL>";
const CLOSE_TAG: &str = "</BaseURL>";

/// Rewrite every `<BaseURL>` element in a DASH MPD so it routes back
/// through the proxy.
///
/// Elements are located by textual pattern match rather than a full XML
/// parse — MPDs are well-formed enough for the substring-tag approach,
/// and it guarantees every byte outside the rewritten inner text is
/// preserved exactly. Inner text that fails to resolve as a URL
/// reference is left unchanged.
pub fn rewrite(body: &str, ctx: &RewriteContext) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(open) = rest.find(OPEN_TAG) {
        let inner_start = open + OPEN_TAG.len();
        let Some(inner_len) = rest[inner_start..].find(CLOSE_TAG) else {
            // Unterminated element, stop rewriting and keep the tail verbatim
            break;
        };

        let inner = &rest[inner_start..inner_start + inner_len];
        out.push_str(&rest[..inner_start]);

        match ctx.proxied_reference(inner.trim()) {
            Ok(proxied) => out.push_str(&proxied),
            Err(e) => {
                debug!("Leaving unresolvable BaseURL as-is: {}", e);
                out.push_str(inner);
            }
        }

        out.push_str(CLOSE_TAG);
        rest = &rest[inner_start + inner_len + CLOSE_TAG.len()..];
    }

    out.push_str(rest);
    out
}
