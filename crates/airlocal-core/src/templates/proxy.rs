//! Media proxy patching of an environment's nginx config

use tera::{Context, Tera};

use crate::error::{Error, Result};

/// Placeholder replaced by the `try_files` fallback
pub const TRY_PROXY_MARKER: &str = "#{TRY_PROXY}";

/// Placeholder replaced by the proxy location block
pub const PROXY_URL_MARKER: &str = "#{PROXY_URL}";

/// Characters that would end or break the `proxy_pass` directive
const FORBIDDEN: &[char] = &[';', '{', '}', '"', '\'', '#'];

const TRY_PROXY: &str = "try_files $uri @production;";

const PROXY_LOCATION: &str = r#"location @production {
        resolver 8.8.8.8;
        proxy_pass {{ proxy }}/$uri;
    }"#;

/// Insert the uploads proxy directives into an nginx config
///
/// Fails if the config carries neither placeholder, or if the proxy URL holds
/// whitespace or nginx syntax characters, so the caller can report that the
/// proxy was not set.
pub fn apply_media_proxy(config: &str, proxy: &str) -> Result<String> {
    if proxy.chars().any(|c| c.is_whitespace() || FORBIDDEN.contains(&c)) {
        return Err(Error::invalid_config(format!(
            "media proxy URL '{}' cannot be used in an nginx configuration",
            proxy
        )));
    }
    if !config.contains(TRY_PROXY_MARKER) && !config.contains(PROXY_URL_MARKER) {
        return Err(Error::invalid_config(
            "nginx configuration has no media proxy placeholders",
        ));
    }

    let mut context = Context::new();
    context.insert("proxy", proxy.trim_end_matches('/'));
    let location = Tera::one_off(PROXY_LOCATION, &context, false)?;

    Ok(config
        .replace(TRY_PROXY_MARKER, TRY_PROXY)
        .replace(PROXY_URL_MARKER, &location))
}
