//! Base-URL + path + query-string assembly.

/// Join a base URL and an application path with exactly one separator and
/// append percent-encoded query parameters.
pub fn build_url(base_url: &str, path: &str, query: &[(&str, &str)]) -> String {
    let mut url = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if !query.is_empty() {
        let params: Vec<String> = query
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect();
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}
