//! Mount table: compiled route bindings.
//!
//! # Responsibilities
//! - Compile configured mounts into prefix matchers
//! - Look up the mount for a request path
//! - Produce the upstream-relative path for a match
//!
//! # Design Decisions
//! - Wildcard patterns match the bare prefix and anything below it, never
//!   sibling paths that merely share characters (`/lifi/*` ≠ `/lifination`)
//! - Literal patterns match exactly and forward to a configured upstream path
//! - First match wins on a table ordered longest-prefix-first

use std::collections::HashMap;

use crate::config::schema::MountConfig;
use crate::routing::rewrite::rewrite_path;

/// A compiled mount binding a path prefix to an upstream.
#[derive(Debug, Clone)]
pub struct Mount {
    /// Mount identifier for logging/metrics.
    pub name: String,

    /// The configured pattern, as written.
    pub pattern: String,

    /// Upstream base URL; empty means "forward the original URL".
    pub upstream_base: String,

    /// Header overrides applied after credential injection.
    pub header_overrides: HashMap<String, String>,

    prefix: String,
    wildcard: bool,
    literal_path: Option<String>,
}

impl Mount {
    fn compile(config: MountConfig) -> Self {
        let wildcard = config.pattern.ends_with("/*");
        let prefix = if wildcard {
            config.pattern[..config.pattern.len() - 2].to_string()
        } else {
            config.pattern.clone()
        };

        Self {
            name: config.name,
            pattern: config.pattern,
            upstream_base: config.upstream_base,
            header_overrides: config.headers,
            prefix,
            wildcard,
            literal_path: config.upstream_path,
        }
    }

    /// Whether this mount matches the request path.
    pub fn matches(&self, path: &str) -> bool {
        if self.wildcard {
            path.strip_prefix(self.prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        } else {
            path == self.pattern
        }
    }

    /// The upstream-relative path for a request path matched by this mount.
    ///
    /// Literal mounts ignore the request path and use their configured
    /// upstream path; wildcard mounts go through the rewriter.
    pub fn upstream_path(&self, path: &str) -> String {
        if let (false, Some(literal)) = (self.wildcard, &self.literal_path) {
            return literal.clone();
        }
        rewrite_path(&self.pattern, path)
    }
}

/// Immutable, longest-prefix-first mount table.
#[derive(Debug, Default)]
pub struct MountTable {
    mounts: Vec<Mount>,
}

impl MountTable {
    /// Compile the configured mounts into a lookup table.
    pub fn from_config(configs: Vec<MountConfig>) -> Self {
        let mut mounts: Vec<Mount> = configs.into_iter().map(Mount::compile).collect();
        // Stable sort keeps config order among equal-length prefixes.
        mounts.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { mounts }
    }

    /// Find the mount for a request path.
    pub fn match_path(&self, path: &str) -> Option<&Mount> {
        self.mounts.iter().find(|mount| mount.matches(path))
    }

    /// Number of compiled mounts.
    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    /// Whether the table has no mounts at all.
    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}
