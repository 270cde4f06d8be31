//! Shared types used across the pipeline.
//!
//! A run moves data strictly forward: the decoded manuscript is parsed into
//! [`PageRecord`]s, navigation turns the full record list into one
//! [`PageNav`] per record, and the templater consumes both.

/// One page's worth of parsed manuscript content.
///
/// Header fields appear in any order and any subset; absent ones stay empty
/// (or `None` for the optional ones). Records are never mutated after the
/// parse pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    /// Output-relative path (e.g. `nivel-1/que-es-bitcoin.html`). Never
    /// empty on a record returned by the parser.
    pub path: String,
    pub title: String,
    pub meta_description: String,
    pub subtitle: String,
    pub publish_date: Option<String>,
    /// Free-form reading length (`"12 min"`, `"1800 palabras"`).
    pub length: Option<String>,
    /// Raw, unrendered body text, trimmed.
    pub body: String,
}

/// A resolved link to a neighbouring page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub title: String,
}

/// Previous/next links of a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageNav {
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}
