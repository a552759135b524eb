//! Base URL handling for the analysis service.

/// Strip trailing slashes so endpoints can be appended without producing `//`.
///
/// ```
/// use heidi_guide::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8004/"), "http://localhost:8004");
/// assert_eq!(normalize_base_url("http://localhost:8004"), "http://localhost:8004");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use heidi_guide::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8004/", "/ask-heidi"),
///     "http://localhost:8004/ask-heidi"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// Returns true when the value looks like an absolute http(s) origin.
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.trim_matches('/').is_empty())
}
