//! Rate limit policy resolution
//!
//! Reads the policy from process configuration. Invalid or missing values
//! fall back to the defaults instead of failing startup.

use crate::rate_limit::RateLimitPolicy;

pub const MAX_REQUESTS_VAR: &str = "RATE_LIMIT_MAX_REQUESTS";
pub const WINDOW_SECONDS_VAR: &str = "RATE_LIMIT_WINDOW_SECONDS";

/// Resolve the policy from the process environment
pub fn resolve_policy() -> RateLimitPolicy {
    resolve_policy_with(|key| std::env::var(key).ok())
}

/// Resolve the policy through an arbitrary key lookup
///
/// ## Arguments
/// * `lookup` - returns the raw value for a configuration key, if set
///
/// ## Returns
/// A policy whose fields are always positive.
pub fn resolve_policy_with<F>(lookup: F) -> RateLimitPolicy
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = RateLimitPolicy::default();
    let default_window = u32::try_from(defaults.window_secs()).unwrap_or(u32::MAX);

    let max_requests = positive_or_default(&lookup, MAX_REQUESTS_VAR, defaults.max_requests);
    let window_secs = positive_or_default(&lookup, WINDOW_SECONDS_VAR, default_window);

    RateLimitPolicy::new(max_requests, window_secs)
}

fn positive_or_default<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!(
                key = key,
                value = %raw,
                default = default,
                "Invalid rate limit setting, using default"
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let policy = resolve_policy_with(lookup_from(&[]));
        assert_eq!(policy, RateLimitPolicy::default());
    }

    #[test]
    fn test_reads_valid_values() {
        let policy = resolve_policy_with(lookup_from(&[
            (MAX_REQUESTS_VAR, "25"),
            (WINDOW_SECONDS_VAR, " 120 "),
        ]));
        assert_eq!(policy.max_requests, 25);
        assert_eq!(policy.window_secs(), 120);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        for bad in ["0", "-5", "abc", "", "1.5", "99999999999"] {
            let policy = resolve_policy_with(lookup_from(&[
                (MAX_REQUESTS_VAR, bad),
                (WINDOW_SECONDS_VAR, bad),
            ]));
            assert_eq!(policy, RateLimitPolicy::default(), "input {bad:?}");
        }
    }

    #[test]
    fn test_fields_resolve_independently() {
        let policy = resolve_policy_with(lookup_from(&[
            (MAX_REQUESTS_VAR, "nope"),
            (WINDOW_SECONDS_VAR, "30"),
        ]));
        assert_eq!(policy.max_requests, 10);
        assert_eq!(policy.window_secs(), 30);
    }
}
