/// Turns a link found on a page into an absolute URL
///
/// # Rules
///
/// 1. `/path` is joined onto the page origin
/// 2. anything without an `http://` or `https://` prefix is appended to
///    the page directory
/// 3. absolute links pass through untouched
///
/// There is deliberately no canonicalization: queries, fragments and
/// trailing slashes are kept, so two spellings of one resource are two
/// frontier entries.
///
/// # Arguments
///
/// * `link` - The raw `href` value
/// * `base_origin` - Origin of the page the link was found on (see [`base_origin`](super::base_origin))
/// * `page_path` - Directory of that page (see [`page_path`](super::page_path))
///
/// # Examples
///
/// ```
/// use contact_ripple::url::normalize_link;
///
/// let origin = "https://a.com";
/// let dir = "https://a.com/x/";
/// assert_eq!(normalize_link("/contact", origin, dir), "https://a.com/contact");
/// assert_eq!(normalize_link("page.html", origin, dir), "https://a.com/x/page.html");
/// assert_eq!(normalize_link("https://b.com/z", origin, dir), "https://b.com/z");
/// ```
pub fn normalize_link(link: &str, base_origin: &str, page_path: &str) -> String {
    if link.starts_with('/') {
        format!("{}{}", base_origin, link)
    } else if !has_http_scheme(link) {
        format!("{}{}", page_path, link)
    } else {
        link.to_string()
    }
}

fn has_http_scheme(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}
