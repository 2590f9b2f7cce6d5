//! Email address extraction from raw page text
//!
//! Works on the unparsed body so addresses are found even when the HTML is
//! too broken to yield any links.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Local part, `@`, domain, `.`, letters. Syntactic only, not RFC 5322.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9.\-+]+@[a-z0-9.\-+]+\.[a-z]+").expect("email pattern compiles")
});

/// Extracts every email-shaped substring from a page body
///
/// Matches are returned verbatim (case preserved) and deduplicated. The set
/// is ordered, so the first element is the lexicographically smallest match;
/// callers reporting a single address take that one.
///
/// # Example
///
/// ```
/// use contact_ripple::crawler::extract_emails;
///
/// let emails = extract_emails("Write to info@example.com or sales@example.com");
/// assert_eq!(emails.len(), 2);
/// assert_eq!(emails.iter().next().unwrap(), "info@example.com");
/// ```
pub fn extract_emails(text: &str) -> BTreeSet<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
