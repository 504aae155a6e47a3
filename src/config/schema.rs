//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the edge router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Mount definitions binding path prefixes to upstreams.
    pub mounts: Vec<MountConfig>,

    /// Per-upstream credential injection rules.
    pub credentials: Vec<CredentialConfig>,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            mounts: default_mounts(),
            credentials: default_credentials(),
            rate_limit: RateLimitConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8787").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:8787".to_string() }
    }
}

/// A mount binding a path pattern to an upstream base URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MountConfig {
    /// Mount identifier for logging/metrics.
    pub name: String,

    /// Path pattern, wildcard-capable (e.g. "/lifi/*").
    pub pattern: String,

    /// Upstream base URL. An empty string forwards the original request URL
    /// unmodified.
    #[serde(default)]
    pub upstream_base: String,

    /// Literal upstream path for patterns without a wildcard, where the path
    /// is synthesized rather than copied from the request.
    #[serde(default)]
    pub upstream_path: Option<String>,

    /// Header overrides applied after credential injection; on a name
    /// collision the override wins.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Credential injection rule for one upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialConfig {
    /// Upstream base URL this rule applies to (exact match, not a prefix).
    pub upstream_base: String,

    /// Header name (or query parameter name) carrying the secret.
    pub name: String,

    /// Environment variable holding the secret value.
    pub secret_env: String,

    /// How the secret is attached to the outbound request.
    #[serde(default)]
    pub injection: InjectionStyle,
}

/// Secret injection style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InjectionStyle {
    /// Attach as a request header.
    #[default]
    Header,
    /// Append as a query parameter.
    Query,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limit evaluation.
    pub enabled: bool,

    /// Fixed window length in seconds.
    pub window_secs: u64,

    /// Maximum requests per key per window.
    pub max_requests: u64,

    /// Trusted header carrying the client IP. Requests without it share one
    /// anonymous bucket.
    pub ip_header: String,

    /// Enforce 429 on proxied mounts. The status route only ever reports the
    /// decision, regardless of this flag.
    pub enforce_proxy_routes: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: 60,
            max_requests: 100,
            ip_header: "cf-connecting-ip".to_string(),
            enforce_proxy_routes: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

fn default_mounts() -> Vec<MountConfig> {
    vec![
        MountConfig {
            name: "lifi".to_string(),
            pattern: "/lifi/*".to_string(),
            upstream_base: "https://li.quest".to_string(),
            upstream_path: None,
            headers: HashMap::new(),
        },
        MountConfig {
            name: "simplehash".to_string(),
            pattern: "/simplehash/v0/*".to_string(),
            upstream_base: "https://api.simplehash.com/api/v0".to_string(),
            upstream_path: None,
            headers: HashMap::new(),
        },
        MountConfig {
            name: "socket".to_string(),
            pattern: "/socket/*".to_string(),
            upstream_base: "https://api.socket.tech/v2".to_string(),
            upstream_path: None,
            headers: HashMap::new(),
        },
    ]
}

fn default_credentials() -> Vec<CredentialConfig> {
    vec![
        CredentialConfig {
            upstream_base: "https://li.quest".to_string(),
            name: "x-lifi-api-key".to_string(),
            secret_env: "LIFI_API_KEY".to_string(),
            injection: InjectionStyle::Header,
        },
        CredentialConfig {
            upstream_base: "https://api.simplehash.com/api/v0".to_string(),
            name: "X-API-KEY".to_string(),
            secret_env: "SIMPLEHASH_API_KEY".to_string(),
            injection: InjectionStyle::Header,
        },
        CredentialConfig {
            upstream_base: "https://api.socket.tech/v2".to_string(),
            name: "API-KEY".to_string(),
            secret_env: "SOCKET_API_KEY".to_string(),
            injection: InjectionStyle::Header,
        },
    ]
}
