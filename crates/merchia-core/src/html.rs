//! Lightweight HTML cleanup for product text fields.
//!
//! Storefronts deliver product names and descriptions with embedded markup.
//! Comparing or displaying those fields needs the tags and common entities
//! removed without pulling in a full HTML parser.

use regex::Regex;
use std::sync::OnceLock;

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new("<[^>]*>").expect("tag pattern is valid"))
}

/// Strips HTML tags, decodes common entities, and trims surrounding whitespace.
pub fn strip_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let stripped = tag_pattern().replace_all(text, "");
    unescape_entities(&stripped).trim().to_string()
}

/// Decodes the entities that show up in storefront product text. `&amp;` is
/// decoded last so entity names escaped through it are not double-decoded.
fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
