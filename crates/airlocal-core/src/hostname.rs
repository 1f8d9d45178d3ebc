//! Hostname parsing, proxy URL normalization and slug derivation

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid scheme regex"));

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Message shown when a required answer is blank
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Reject blank input
pub fn validate_not_empty(value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err(REQUIRED_MESSAGE.to_string())
    } else {
        Ok(())
    }
}

/// Strip leading and trailing slashes
pub fn remove_end_slashes(value: &str) -> &str {
    value.trim_start_matches('/').trim_end_matches('/')
}

/// Reduce user input to a bare hostname
///
/// Drops an `http(s)://` prefix, any whitespace and everything after the
/// first `/`.
pub fn parse_hostname(value: &str) -> String {
    let without_scheme = SCHEME.replace(value, "");
    let compact: String = without_scheme
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    compact.split('/').next().unwrap_or_default().to_string()
}

/// Split a whitespace separated list of hostnames, filtering each one
pub fn split_hosts(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .map(parse_hostname)
        .filter(|host| !host.is_empty())
        .collect()
}

/// Make sure a proxy URL carries a scheme and has no surrounding slashes
pub fn parse_proxy_url(value: &str) -> String {
    let value = value.trim();
    let with_scheme = if value.len() > 3 && !SCHEME.is_match(value) {
        format!("http://{}", value)
    } else {
        value.to_string()
    };

    remove_end_slashes(&with_scheme).to_string()
}

/// Default media proxy origin for a hostname: its TLD swapped for `.com`
pub fn default_proxy(hostname: &str) -> String {
    let proxy = format!("http://{}", remove_end_slashes(hostname));
    let scheme_len = "http://".len();

    match proxy[scheme_len..].rfind('.') {
        Some(idx) => format!("{}com", &proxy[..scheme_len + idx + 1]),
        None => format!("{}.com", proxy),
    }
}

/// Derive the environment slug from a hostname
///
/// Transliterates to ASCII, lower-cases, and collapses every run of
/// characters outside `[a-z0-9]` into a single `-`, trimming separators at
/// both ends.
pub fn slugify(hostname: &str) -> String {
    let lower = deunicode(hostname).to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// True for a non-empty string that [`slugify`] leaves unchanged
pub fn is_slug(value: &str) -> bool {
    !value.is_empty() && slugify(value) == value
}

/// Slug for a hostname, rejecting input that normalizes to nothing
pub fn env_slug(hostname: &str) -> Result<String> {
    let slug = slugify(hostname);
    if slug.is_empty() {
        return Err(Error::invalid_hostname(hostname));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_symbols() {
        assert_eq!(slugify("docker.test"), "docker-test");
        assert_eq!(slugify("my--site...local"), "my-site-local");
        assert_eq!(slugify(".leading.and.trailing."), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_is_case_insensitive() {
        assert_eq!(slugify("Docker.Test"), slugify("docker.test"));
        assert_eq!(slugify("DOCKER_TEST"), slugify("docker-test"));
        assert_eq!(slugify("docker test"), slugify("docker.test"));
    }

    #[test]
    fn test_slugify_is_deterministic() {
        for host in ["a.test", "Sub.Domain.Example.COM", "x__y", "ünïcode.test"] {
            assert_eq!(slugify(host), slugify(host));
        }
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("ünïcode.test"), "unicode-test");
        assert_eq!(slugify("Straße.test"), "strasse-test");
        assert_eq!(slugify("café.local"), "cafe-local");
    }

    #[test]
    fn test_slug_is_only_ascii_alnum_and_dashes() {
        for host in ["ünïcode.test", "日本.test", "a b/c..d", "---"] {
            let slug = slugify(host);
            assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        }
    }

    #[test]
    fn test_env_slug_rejects_symbol_only_hosts() {
        assert!(matches!(env_slug("..."), Err(Error::InvalidHostname { .. })));
        assert!(matches!(env_slug(""), Err(Error::InvalidHostname { .. })));
        assert!(matches!(env_slug("."), Err(Error::InvalidHostname { .. })));
        assert_eq!(env_slug("docker.test").unwrap(), "docker-test");
    }

    #[test]
    fn test_is_slug() {
        assert!(is_slug("docker-test"));
        assert!(!is_slug(""));
        assert!(!is_slug("."));
        assert!(!is_slug(".."));
        assert!(!is_slug("Docker-test"));
        assert!(!is_slug("a/b"));
    }

    #[test]
    fn test_parse_hostname() {
        assert_eq!(parse_hostname("https://docker.test/wp-admin"), "docker.test");
        assert_eq!(parse_hostname("HTTP://docker.test"), "docker.test");
        assert_eq!(parse_hostname(" docker .test "), "docker.test");
        assert_eq!(parse_hostname("docker.test"), "docker.test");
    }

    #[test]
    fn test_split_hosts() {
        assert_eq!(
            split_hosts("  a.test   http://b.test/path  "),
            vec!["a.test".to_string(), "b.test".to_string()]
        );
        assert!(split_hosts("   ").is_empty());
    }

    #[test]
    fn test_parse_proxy_url() {
        assert_eq!(parse_proxy_url("example.com/"), "http://example.com");
        assert_eq!(parse_proxy_url("https://example.com/"), "https://example.com");
        assert_eq!(parse_proxy_url("a.b"), "a.b");
    }

    #[test]
    fn test_default_proxy() {
        assert_eq!(default_proxy("docker.test"), "http://docker.com");
        assert_eq!(default_proxy("www.client.local/"), "http://www.client.com");
        assert_eq!(default_proxy("localhost"), "http://localhost.com");
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("x").is_ok());
        assert_eq!(validate_not_empty("  ").unwrap_err(), REQUIRED_MESSAGE);
    }
}
