use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into the key used by the crawler's visited set
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP(S), then unify the scheme to HTTPS
/// 3. Lowercase the host and drop a leading `www.`
/// 4. Collapse empty path segments, dropping the trailing slash
/// 5. Remove the fragment and an empty query
///
/// Dot segments are already resolved by the parser. Two links that reach the
/// same page through `http`/`https`, with or without `www`, or with a trailing
/// slash normalize to the same key.
///
/// # Examples
///
/// ```
/// use ui_faculty_finder::url::normalize_url;
///
/// let url = normalize_url("http://WWW.UI.AC.ID/akademik/fakultas/").unwrap();
/// assert_eq!(url.as_str(), "https://ui.ac.id/akademik/fakultas");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" => url
            .set_scheme("https")
            .map_err(|_| UrlError::Malformed(format!("Cannot upgrade scheme of {}", url_str)))?,
        other => {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                other
            )))
        }
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    let path = collapse_segments(url.path());
    url.set_path(&path);

    url.set_fragment(None);
    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Joins the non-empty segments of a path, `/` for the site root
fn collapse_segments(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}
