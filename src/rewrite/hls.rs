//! Line-oriented HLS playlist rewriter.

use super::RewriteContext;
use tracing::debug;

/// Rewrite every whole-line URI reference in an HLS playlist so it
/// routes back through the proxy.
///
/// Lines are split and re-joined on `\n`, so line count is always
/// preserved. Blank lines and `#`-prefixed directives/comments pass
/// through unchanged; any other line is treated as a URI reference
/// (absolute or relative), resolved against the manifest base and
/// replaced by the proxied URL. A reference that fails to resolve is
/// left exactly as it was — rewriting never loses content.
///
/// Tags that embed a URI as an attribute (`#EXT-X-KEY`, `#EXT-X-MAP`,
/// `#EXT-X-MEDIA`, …) are intentionally not rewritten; only whole-line
/// references are in scope.
pub fn rewrite(body: &str, ctx: &RewriteContext) -> String {
    body.split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return line.to_string();
            }

            match ctx.proxied_reference(trimmed) {
                Ok(proxied) => proxied,
                Err(e) => {
                    debug!("Leaving unresolvable playlist reference as-is: {}", e);
                    line.to_string()
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn ctx() -> RewriteContext {
        RewriteContext::new(
            Url::parse("https://origin.test/live.m3u8").unwrap(),
            Url::parse("https://proxy.test/proxy").unwrap(),
        )
    }

    #[test]
    fn rewrites_relative_and_absolute_segment_lines() {
        let body = "#EXTM3U\n#EXT-X-VERSION:3\nseg1.ts\nhttps://cdn.test/seg2.ts";
        let out = rewrite(body, &ctx());
        assert_eq!(
            out,
            "#EXTM3U\n\
             #EXT-X-VERSION:3\n\
             https://proxy.test/proxy?url=https%3A%2F%2Forigin.test%2Fseg1.ts\n\
             https://proxy.test/proxy?url=https%3A%2F%2Fcdn.test%2Fseg2.ts"
        );
    }

    #[test]
    fn comments_and_blank_lines_pass_through_unchanged() {
        let body = "#EXTM3U\n\n#EXT-X-TARGETDURATION:6\n";
        assert_eq!(rewrite(body, &ctx()), body);
    }

    #[test]
    fn line_count_is_preserved() {
        let body = "#EXTM3U\nseg1.ts\n\nseg2.ts\n#EXT-X-ENDLIST\n";
        let out = rewrite(body, &ctx());
        assert_eq!(
            out.split('\n').count(),
            body.split('\n').count(),
            "rewrite must never add or drop lines"
        );
    }

    #[test]
    fn malformed_reference_left_unmodified_others_still_rewritten() {
        let body = "#EXTM3U\nhttp://\nseg1.ts";
        let out = rewrite(body, &ctx());
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[1], "http://");
        assert_eq!(
            lines[2],
            "https://proxy.test/proxy?url=https%3A%2F%2Forigin.test%2Fseg1.ts"
        );
    }

    #[test]
    fn in_tag_attribute_uris_are_not_rewritten() {
        let body = "#EXT-X-KEY:METHOD=AES-128,URI=\"key.bin\"\nseg1.ts";
        let out = rewrite(body, &ctx());
        assert!(out.starts_with("#EXT-X-KEY:METHOD=AES-128,URI=\"key.bin\""));
    }

    #[test]
    fn sub_playlist_references_in_master_are_rewritten() {
        let body = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=800000\nlow/index.m3u8";
        let out = rewrite(body, &ctx());
        assert!(out.ends_with(
            "https://proxy.test/proxy?url=https%3A%2F%2Forigin.test%2Flow%2Findex.m3u8"
        ));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_before_resolution() {
        let body = "  seg1.ts  ";
        let out = rewrite(body, &ctx());
        assert_eq!(
            out,
            "https://proxy.test/proxy?url=https%3A%2F%2Forigin.test%2Fseg1.ts"
        );
    }
}
