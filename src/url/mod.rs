//! URL handling module for Contact-Ripple
//!
//! This module derives the origin and directory of a page URL and turns
//! the links found on that page into absolute URLs.

mod normalize;
mod origin;

// Re-export main functions
pub use normalize::normalize_link;
pub use origin::{base_origin, page_path};
