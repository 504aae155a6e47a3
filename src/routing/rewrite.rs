//! Mount-prefix path rewriting.
//!
//! # Responsibilities
//! - Strip the matched mount prefix from the request path
//! - Substitute `/` when nothing remains
//!
//! # Design Decisions
//! - Total function: every input produces a valid path
//! - Literal (non-wildcard) patterns never reach the rewriter; the mount
//!   table substitutes their configured upstream path instead

/// Compute the upstream-relative path for a wildcard mount.
///
/// The pattern's `/*` suffix is stripped to obtain the literal prefix, which
/// is then removed as a leading anchor from the request path. An empty
/// remainder becomes `/`.
pub fn rewrite_path(pattern: &str, path: &str) -> String {
    let prefix = pattern.strip_suffix("/*").unwrap_or(pattern);
    let rest = path.strip_prefix(prefix).unwrap_or(path);
    if rest.is_empty() {
        "/".to_string()
    } else {
        rest.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_mount_prefix() {
        assert_eq!(rewrite_path("/lifi/*", "/lifi/v1/quote"), "/v1/quote");
        assert_eq!(rewrite_path("/simplehash/v0/*", "/simplehash/v0/nfts/owners"), "/nfts/owners");
    }

    #[test]
    fn bare_prefix_becomes_root() {
        assert_eq!(rewrite_path("/lifi/*", "/lifi"), "/");
    }

    #[test]
    fn trailing_slash_is_preserved() {
        assert_eq!(rewrite_path("/lifi/*", "/lifi/"), "/");
    }

    #[test]
    fn root_wildcard_passes_the_path_through() {
        assert_eq!(rewrite_path("/*", "/anything/goes"), "/anything/goes");
    }
}
