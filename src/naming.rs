//! Page path conventions shared by the parser, navigation, and templater.
//!
//! A page is identified by its output-relative path, exactly as declared in
//! the manuscript's leading marker line (`PAGINA: nivel-1/que-es-bitcoin.html`).
//! Everything else about the page's place in the site is derived from it:
//!
//! - **Group**: the top-level directory (`nivel-1`). Root-level pages have
//!   no group and fall into the configured default group.
//! - **Slug**: the file stem (`que-es-bitcoin`), or the directory name for
//!   `index.html` pages (`base/index.html` → `base`).
//! - **Display title**: the slug with dashes converted to spaces and the
//!   first letter capitalized (`que-es-bitcoin` → "Que es bitcoin"). Used only
//!   when no better title exists.
//! - **Depth**: the number of directories above the file, which decides how
//!   many `../` the page needs to reach site-root assets.

/// Result of parsing a page path like `nivel-1/que-es-bitcoin.html`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath {
    /// Normalized path (forward slashes, no leading slash).
    pub path: String,
    /// Top-level directory, `None` for root-level pages.
    pub group: Option<String>,
    /// File stem, or the parent directory for `index.html`.
    pub slug: String,
    /// Number of directory segments above the file.
    pub depth: usize,
    /// Slug-derived fallback title.
    pub display_title: String,
}

/// Normalize a declared path: trim, forward slashes, no leading slash.
///
/// - `" /base/x.html "` → `"base/x.html"`
/// - `"nivel-1\\a.html"` → `"nivel-1/a.html"`
pub fn normalize_path(raw: &str) -> String {
    raw.trim().replace('\\', "/").trim_start_matches('/').to_string()
}

/// Whether a normalized path stays under the output root: no `..`
/// segments and no drive prefix such as `C:`.
pub fn stays_under_root(path: &str) -> bool {
    let drive = path.split('/').next().is_some_and(|first| first.contains(':'));
    !path.is_empty() && !drive && path.split('/').all(|s| s != "..")
}

/// Parse a page path.
///
/// Handles these patterns:
/// - `"nivel-1/que-es-bitcoin.html"` → group=Some("nivel-1"), slug="que-es-bitcoin", depth=1
/// - `"glosario.html"` → group=None, slug="glosario", depth=0
/// - `"base/index.html"` → group=Some("base"), slug="base", depth=1
/// - `"a/b/c.html"` → group=Some("a"), slug="c", depth=2
pub fn parse_page_path(raw: &str) -> ParsedPath {
    let path = normalize_path(raw);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let depth = segments.len().saturating_sub(1);
    let group = if segments.len() > 1 {
        Some(segments[0].to_string())
    } else {
        None
    };

    let file = segments.last().copied().unwrap_or_default();
    let stem = file.strip_suffix(".html").unwrap_or(file);
    let slug = if stem == "index" && segments.len() > 1 {
        segments[segments.len() - 2].to_string()
    } else {
        stem.to_string()
    };

    ParsedPath {
        display_title: display_title(&slug),
        path,
        group,
        slug,
        depth,
    }
}

/// Group key for a page: its top-level directory, or `default_group`.
pub fn group_key(path: &str, default_group: &str) -> String {
    parse_page_path(path)
        .group
        .unwrap_or_else(|| default_group.to_string())
}

/// Site-absolute link to a page (`base/x.html` → `/base/x.html`).
pub fn href(path: &str) -> String {
    format!("/{}", normalize_path(path))
}

/// Public route of a page: a trailing `index.html` is dropped.
///
/// - `"index.html"` → `"/"`
/// - `"base/index.html"` → `"/base/"`
/// - `"base/x.html"` → `"/base/x.html"`
pub fn route(path: &str) -> String {
    let href = href(path);
    match href.strip_suffix("index.html") {
        Some(dir) => dir.to_string(),
        None => href,
    }
}

/// Relative prefix from a page back to the site root (`""`, `"../"`, ...).
pub fn asset_prefix(depth: usize) -> String {
    "../".repeat(depth)
}

/// Slug with dashes converted to spaces and the first letter capitalized.
pub fn display_title(slug: &str) -> String {
    let spaced = slug.replace(['-', '_'], " ");
    let spaced = spaced.trim();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
