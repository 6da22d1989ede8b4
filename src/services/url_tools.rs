//! URL helpers for bookmark entry: scheme completion, duplicate-detection
//! normalization, and short-name suggestion.

use url::Url;

/// Scheme added to user input that carries none.
pub const DEFAULT_SCHEME: &str = "https://";

/// Schemes written without `//` that are still complete URLs.
const OPAQUE_SCHEMES: [&str; 3] = ["about", "data", "mailto"];

/// Length of the leading scheme prefix of `input` (`scheme://`, or `scheme:`
/// for an opaque scheme), or `None` when the input does not start with one.
/// A `://` later in the string, e.g. inside a query, does not count.
fn scheme_prefix_len(input: &str) -> Option<usize> {
    let colon = input.find(':')?;
    let scheme = &input[..colon];
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'));
    if !valid {
        return None;
    }
    let rest = &input[colon + 1..];
    if rest.starts_with("//") {
        Some(colon + 3)
    } else if OPAQUE_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
        Some(colon + 1)
    } else {
        None
    }
}

/// True when `input` starts with a URL scheme.
pub fn has_scheme(input: &str) -> bool {
    scheme_prefix_len(input.trim()).is_some()
}

/// Trims `input` and prepends `https://` when it does not start with a scheme.
pub fn ensure_scheme(input: &str) -> String {
    let trimmed = input.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, trimmed)
    }
}

/// Comparison form of a URL: lowercased, leading scheme, leading `www.` and
/// one trailing slash removed. Only used to detect duplicates.
pub fn normalize_url(url: &str) -> String {
    let lower = url.trim().to_lowercase();
    let without_scheme = match scheme_prefix_len(&lower) {
        Some(len) => &lower[len..],
        None => lower.as_str(),
    };
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www
        .strip_suffix('/')
        .unwrap_or(without_www)
        .to_string()
}

/// Host name of `input` without a leading `www.`, or an empty string when the
/// input does not parse as a URL.
pub fn suggest_short_name(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    match Url::parse(&ensure_scheme(input)) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}
