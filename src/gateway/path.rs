//! Inbound path rewriting for downstream forwarding

/// Rewrites an inbound path into the path the downstream service expects.
///
/// The gateway is mounted under varying base paths, so the routing prefix is
/// recovered by trying, in priority order, `proxy/{service}`, `auth`, and
/// `api/{service}` against the inbound path (a single leading `/` is
/// tolerated). The first prefix that ends on a segment boundary is stripped;
/// an empty remainder becomes `/`. Paths that match no prefix are forwarded
/// unchanged. Query strings ride along with the remainder.
pub fn resolve_path(inbound: &str, service: &str) -> String {
    let trimmed = inbound.strip_prefix('/').unwrap_or(inbound);

    let prefixes = [
        format!("proxy/{service}"),
        "auth".to_string(),
        format!("api/{service}"),
    ];

    for prefix in &prefixes {
        if let Some(remainder) = trimmed.strip_prefix(prefix.as_str()) {
            if remainder.is_empty() {
                return "/".to_string();
            }
            if remainder.starts_with('/') {
                return remainder.to_string();
            }
            if remainder.starts_with('?') {
                return format!("/{remainder}");
            }
            // Mid-segment match ("authority" vs "auth"); keep trying.
        }
    }

    inbound.to_string()
}
