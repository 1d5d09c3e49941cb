//! Child environment assembly.

use std::collections::BTreeMap;

/// Environment overrides from a caller; `None` values are dropped.
pub type EnvOverrides = BTreeMap<String, Option<String>>;

/// Drop overrides without a value.
pub fn sanitize_env(overrides: &EnvOverrides) -> BTreeMap<String, String> {
    overrides
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.clone(), v.clone())))
        .collect()
}

/// Variables to set on the child, on top of the inherited environment.
///
/// Blocked variables are applied first and caller overrides last, so a caller
/// can still opt back in to a sanitizer option explicitly.
pub fn child_env(
    blocked: &BTreeMap<String, String>,
    sanitized: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut env = blocked.clone();
    env.extend(sanitized.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
}

/// Render overrides as a `KEY="VALUE"` prefix for the command log line.
pub fn env_prefix(sanitized: &BTreeMap<String, String>) -> String {
    sanitized
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, Option<&str>)]) -> EnvOverrides {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn sanitize_drops_missing_values() {
        let env = sanitize_env(&overrides(&[("A", Some("1")), ("B", None), ("C", Some(""))]));
        assert_eq!(env.len(), 2);
        assert_eq!(env["A"], "1");
        assert_eq!(env["C"], "");
    }

    #[test]
    fn caller_overrides_win_over_blocked() {
        let blocked = crate::config::default_blocked_env();
        let sanitized = sanitize_env(&overrides(&[("ASAN_OPTIONS", Some("symbolize=1"))]));

        let env = child_env(&blocked, &sanitized);
        assert_eq!(env["ASAN_OPTIONS"], "symbolize=1");
        assert_eq!(env["MSAN_OPTIONS"], "");
    }

    #[test]
    fn env_prefix_quotes_values() {
        let sanitized = sanitize_env(&overrides(&[("B", Some("two words")), ("A", Some("1"))]));
        assert_eq!(env_prefix(&sanitized), "A=\"1\" B=\"two words\"");
    }

    #[test]
    fn env_prefix_empty_without_overrides() {
        assert_eq!(env_prefix(&BTreeMap::new()), "");
    }
}
