use crate::error::ProxyError;
use url::{Host, Url};

/// Validate that a proxy target is safe to fetch (SSRF protection).
///
/// Accepts only `http://` and `https://` URLs with a host. IP literals
/// are checked against private/reserved ranges; in dev mode the range
/// check is skipped so local test origins (loopback wiremock servers)
/// can be targeted. Hostnames are accepted without DNS resolution —
/// DNS rebinding is a known limitation accepted here.
///
/// This is self-protection, not a trust policy: any public origin is
/// allowed.
///
/// # Errors
/// Returns [`ProxyError::ForbiddenTarget`] for non-HTTP(S) schemes and
/// private/reserved addresses, [`ProxyError::InvalidTargetUrl`] for a
/// URL without a host.
pub fn validate_target_url(target: &Url, allow_private: bool) -> Result<(), ProxyError> {
    match target.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ProxyError::ForbiddenTarget(format!(
                "scheme '{scheme}' not allowed, only http/https permitted"
            )));
        }
    }

    let host = target.host().ok_or(ProxyError::InvalidTargetUrl)?;

    if allow_private {
        return Ok(());
    }

    match host {
        Host::Ipv4(ip) => {
            // 0.0.0.0/8, RFC 1918, loopback, link-local (incl. cloud metadata)
            if ip.is_unspecified()
                || ip.is_private()
                || ip.is_loopback()
                || ip.is_link_local()
                || ip.octets()[0] == 0
            {
                return Err(ProxyError::ForbiddenTarget(format!(
                    "private or reserved IPv4 address: {ip}"
                )));
            }
        }
        Host::Ipv6(ip) => {
            // ::1, fe80::/10, fc00::/7
            if ip.is_loopback() || ip.is_unicast_link_local() || ip.is_unique_local() {
                return Err(ProxyError::ForbiddenTarget(format!(
                    "private or reserved IPv6 address: {ip}"
                )));
            }
        }
        // Hostnames are allowed — we cannot resolve them without async DNS
        Host::Domain(_) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(url: &str) -> Result<(), ProxyError> {
        validate_target_url(&Url::parse(url).unwrap(), false)
    }

    // --- IPv4 private ranges ---

    #[test]
    fn rejects_loopback_127() {
        assert!(check("http://127.0.0.1/live.m3u8").is_err());
        assert!(check("http://127.255.255.255/live.m3u8").is_err());
    }

    #[test]
    fn rejects_rfc1918_ranges() {
        assert!(check("http://10.0.0.1/live.m3u8").is_err());
        assert!(check("http://172.16.0.1/live.m3u8").is_err());
        assert!(check("http://172.31.255.255/live.m3u8").is_err());
        assert!(check("http://192.168.1.1/live.m3u8").is_err());
    }

    #[test]
    fn rejects_link_local_metadata() {
        // AWS/GCP/Azure cloud-metadata endpoint
        assert!(check("http://169.254.169.254/latest/meta-data/").is_err());
    }

    #[test]
    fn rejects_zero_network() {
        assert!(check("http://0.0.0.0/x").is_err());
        assert!(check("http://0.1.2.3/x").is_err());
    }

    // --- IPv6 private ranges ---

    #[test]
    fn rejects_ipv6_loopback_and_local() {
        assert!(check("http://[::1]/live.m3u8").is_err());
        assert!(check("http://[fe80::1]/live.m3u8").is_err());
        assert!(check("http://[fd00::1]/live.m3u8").is_err());
    }

    // --- Public addresses allowed ---

    #[test]
    fn allows_public_addresses_and_hostnames() {
        assert!(check("http://203.0.113.1/live.m3u8").is_ok());
        assert!(check("https://cdn.example.com/live.m3u8").is_ok());
        assert!(check("https://cdn.example.com/live.m3u8?token=abc").is_ok());
    }

    #[test]
    fn boundary_addresses_outside_172_16_slash_12_allowed() {
        assert!(check("http://172.15.255.255/x").is_ok());
        assert!(check("http://172.32.0.0/x").is_ok());
    }

    // --- Schemes ---

    #[test]
    fn rejects_non_http_schemes() {
        assert!(check("ftp://cdn.example.com/file.ts").is_err());
        assert!(check("file:///etc/passwd").is_err());
        assert!(check("gopher://cdn.example.com/x").is_err());
    }

    // --- Dev mode ---

    #[test]
    fn dev_mode_allows_private_targets() {
        let url = Url::parse("http://127.0.0.1:9999/live.m3u8").unwrap();
        assert!(validate_target_url(&url, true).is_ok());
    }

    #[test]
    fn dev_mode_still_rejects_bad_schemes() {
        let url = Url::parse("file:///etc/passwd").unwrap();
        assert!(validate_target_url(&url, true).is_err());
    }
}
