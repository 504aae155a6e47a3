//! Upstream credential injection rules.
//!
//! # Responsibilities
//! - Map an upstream base URL (exact match) to its injection rule
//! - Resolve the secret value from the environment at request time
//! - Fall through silently when no rule or no secret exists
//!
//! # Design Decisions
//! - Exact string match, never a prefix: one upstream's secret cannot leak
//!   to another
//! - Unknown upstreams proceed without a credential; the upstream's own
//!   401/403 surfaces to the caller verbatim
//! - A missing secret env var is logged and skipped, not a request failure

use std::collections::HashMap;

use crate::config::schema::{CredentialConfig, InjectionStyle};

/// A resolved credential ready to attach to an outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Attach as a request header.
    Header { name: String, value: String },
    /// Append as a query parameter.
    Query { name: String, value: String },
}

/// Read-only table of per-upstream injection rules.
#[derive(Debug, Default)]
pub struct CredentialStore {
    rules: HashMap<String, CredentialConfig>,
}

impl CredentialStore {
    /// Index the configured rules by their upstream base URL.
    pub fn from_config(configs: Vec<CredentialConfig>) -> Self {
        let rules = configs.into_iter().map(|rule| (rule.upstream_base.clone(), rule)).collect();
        Self { rules }
    }

    /// Resolve the credential for an upstream base URL.
    ///
    /// The secret is read from the environment on every call so rotated
    /// secrets take effect without a restart.
    pub fn resolve(&self, upstream_base: &str) -> Option<Credential> {
        let rule = match self.rules.get(upstream_base) {
            Some(rule) => rule,
            None => {
                tracing::debug!(upstream = %upstream_base, "No credential rule for upstream");
                return None;
            }
        };

        let value = match std::env::var(&rule.secret_env) {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    upstream = %upstream_base,
                    secret_env = %rule.secret_env,
                    "Credential secret not set; forwarding without it"
                );
                return None;
            }
        };

        Some(match rule.injection {
            InjectionStyle::Header => Credential::Header { name: rule.name.clone(), value },
            InjectionStyle::Query => Credential::Query { name: rule.name.clone(), value },
        })
    }
}
