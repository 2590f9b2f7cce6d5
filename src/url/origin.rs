use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the origin (`scheme://host[:port]`) of a page URL
///
/// The origin is what root-relative links (`/contact`) are joined onto.
/// Only HTTP and HTTPS URLs have an origin here; anything else is rejected,
/// which is how a malformed seed URL is detected before any fetch happens.
///
/// The URL is parsed only to validate it. The origin itself is cut from the
/// raw string, so host case, userinfo and explicit default ports survive and
/// match what [`page_path`] returns for the same page.
///
/// # Examples
///
/// ```
/// use contact_ripple::url::base_origin;
///
/// assert_eq!(base_origin("https://a.com/x/y.html").unwrap(), "https://a.com");
/// assert_eq!(base_origin("http://a.com:8080/").unwrap(), "http://a.com:8080");
/// assert_eq!(base_origin("https://A.com/").unwrap(), "https://A.com");
/// assert!(base_origin("ftp://a.com/").is_err());
/// ```
pub fn base_origin(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url[..authority_end(url)].to_string())
}

/// Returns the "directory" of a page URL: the raw URL cut after the last
/// `/` of its path
///
/// Relative links (`page.html`) are appended to this. The URL string is
/// not re-serialized, so whatever spelling the page was reached under is
/// kept. A URL with no path at all (`https://a.com`) gets a trailing `/`.
///
/// # Examples
///
/// ```
/// use contact_ripple::url::page_path;
///
/// assert_eq!(page_path("https://a.com/x/page.html"), "https://a.com/x/");
/// assert_eq!(page_path("https://a.com/x/"), "https://a.com/x/");
/// assert_eq!(page_path("https://a.com"), "https://a.com/");
/// ```
pub fn page_path(url: &str) -> String {
    let path_start = authority_end(url);

    let path_end = url[path_start..]
        .find(['?', '#'])
        .map(|i| path_start + i)
        .unwrap_or(url.len());

    match url[path_start..path_end].rfind('/') {
        Some(i) => url[..path_start + i + 1].to_string(),
        None => format!("{}/", &url[..path_start]),
    }
}

/// Byte offset where the authority ends and the path, query or fragment
/// begins
fn authority_end(url: &str) -> usize {
    let authority_start = url.find("://").map(|i| i + 3).unwrap_or(0);

    url[authority_start..]
        .find(['/', '?', '#'])
        .map(|i| authority_start + i)
        .unwrap_or(url.len())
}
