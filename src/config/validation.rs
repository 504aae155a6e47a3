//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check mount patterns and their relationship to upstream paths
//! - Validate value ranges (window > 0, limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::RouterConfig;

/// A single semantic configuration problem.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("mount `{0}` has an empty pattern")]
    EmptyPattern(String),

    #[error("mount `{0}` pattern must start with `/`")]
    PatternNotRooted(String),

    #[error("mount `{0}` may only use `*` as a `/*` suffix")]
    InvalidWildcard(String),

    #[error("mount `{0}` has no wildcard and no upstream_path")]
    MissingUpstreamPath(String),

    #[error("mount `{0}` is wildcard but sets upstream_path")]
    UpstreamPathOnWildcard(String),

    #[error("duplicate mount pattern `{0}`")]
    DuplicatePattern(String),

    #[error("credential for `{0}` names an empty secret env var")]
    EmptySecretEnv(String),

    #[error("rate limit window_secs must be greater than zero")]
    ZeroWindow,

    #[error("rate limit max_requests must be greater than zero")]
    ZeroLimit,
}

/// Validate semantic constraints on a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_patterns = Vec::new();
    for mount in &config.mounts {
        if mount.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern(mount.name.clone()));
            continue;
        }
        if !mount.pattern.starts_with('/') {
            errors.push(ValidationError::PatternNotRooted(mount.name.clone()));
        }

        let wildcard = mount.pattern.ends_with("/*");
        let literal = if wildcard {
            &mount.pattern[..mount.pattern.len() - 2]
        } else {
            mount.pattern.as_str()
        };
        if literal.contains('*') {
            errors.push(ValidationError::InvalidWildcard(mount.name.clone()));
        }

        if wildcard {
            if mount.upstream_path.is_some() {
                errors.push(ValidationError::UpstreamPathOnWildcard(mount.name.clone()));
            }
        } else if mount.upstream_path.is_none() {
            errors.push(ValidationError::MissingUpstreamPath(mount.name.clone()));
        }

        if seen_patterns.contains(&mount.pattern) {
            errors.push(ValidationError::DuplicatePattern(mount.pattern.clone()));
        } else {
            seen_patterns.push(mount.pattern.clone());
        }
    }

    for credential in &config.credentials {
        if credential.secret_env.is_empty() {
            errors.push(ValidationError::EmptySecretEnv(credential.upstream_base.clone()));
        }
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::ZeroWindow);
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
