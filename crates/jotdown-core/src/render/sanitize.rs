//! Allow-list HTML sanitization backed by ammonia.

use std::collections::{HashMap, HashSet};

use super::Sanitizer;

/// Tags allowed in rendered notes.
pub const ALLOWED_TAGS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
    "br",
    "strong",
    "em",
    "u",
    "s",
    "del",
    "a",
    "img",
    "code",
    "pre",
    "ul",
    "ol",
    "li",
    "table",
    "thead",
    "tbody",
    "tr",
    "th",
    "td",
    "blockquote",
    "hr",
    "div",
    "span",
    "input",
];

/// Attributes allowed on any allowed tag.
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "href", "title", "target", "rel", "src", "alt", "width", "height", "class", "id", "align",
    "type", "checked", "disabled",
];

/// Tags removed together with everything inside them.
pub const STRIPPED_CONTENT_TAGS: &[&str] = &[
    "script", "style", "iframe", "noscript", "object", "template", "textarea",
];

/// URL schemes kept in `href` and `src`.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// The tag and attribute lists a sanitizer enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowList {
    pub tags: &'static [&'static str],
    pub attributes: &'static [&'static str],
    pub stripped_content_tags: &'static [&'static str],
    pub url_schemes: &'static [&'static str],
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            tags: ALLOWED_TAGS,
            attributes: ALLOWED_ATTRIBUTES,
            stripped_content_tags: STRIPPED_CONTENT_TAGS,
            url_schemes: ALLOWED_URL_SCHEMES,
        }
    }
}

/// Sanitizer that drops every tag and attribute outside an [`AllowList`].
pub struct AllowListSanitizer {
    cleaner: ammonia::Builder<'static>,
}

impl AllowListSanitizer {
    #[must_use]
    pub fn new(allow_list: &AllowList) -> Self {
        let mut cleaner = ammonia::Builder::default();
        cleaner
            .tags(allow_list.tags.iter().copied().collect::<HashSet<_>>())
            .clean_content_tags(
                allow_list
                    .stripped_content_tags
                    .iter()
                    .copied()
                    .collect::<HashSet<_>>(),
            )
            .tag_attributes(HashMap::new())
            .generic_attributes(allow_list.attributes.iter().copied().collect::<HashSet<_>>())
            .url_schemes(allow_list.url_schemes.iter().copied().collect::<HashSet<_>>())
            // `rel` is user-controlled through the allow-list.
            .link_rel(None)
            .strip_comments(true);
        Self { cleaner }
    }
}

impl Default for AllowListSanitizer {
    fn default() -> Self {
        Self::new(&AllowList::default())
    }
}

impl Sanitizer for AllowListSanitizer {
    fn sanitize(&self, html: &str) -> String {
        self.cleaner.clean(html).to_string()
    }
}
