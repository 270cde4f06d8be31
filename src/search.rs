//! Client-side search index.
//!
//! Built from the HTML files on disk rather than from parsed records, so the
//! index covers every page of the site. One JSON entry per page:
//!
//! ```json
//! {
//!   "title": "¿Qué es Bitcoin?",
//!   "url": "/nivel-1/que-es-bitcoin.html",
//!   "section": "Nivel 1",
//!   "tags": ["nivel 1", "que", "bitcoin", "wallet", "billetera"],
//!   "keywords": "Una introducción sin tecnicismos. ..."
//! }
//! ```

use crate::config::SiteConfig;
use crate::naming;
use crate::sitemap;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_TAGS: usize = 30;
const MAX_HEADINGS: usize = 12;

static H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid h1 regex"));
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+name=["']description["'][^>]+content=(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid description regex")
});
static HEADINGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h[23][^>]*>(.*?)</h[23]>").expect("valid heading regex"));
static MAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<main[^>]*>(.*)</main>").expect("valid main regex"));
static NON_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script>|<style[^>]*>.*?</style>|<noscript[^>]*>.*?</noscript>|<!--.*?-->")
        .expect("valid non-text regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid tag pattern: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub title: String,
    pub url: String,
    pub section: String,
    pub tags: Vec<String>,
    pub keywords: String,
}

/// Extracts [`SearchEntry`]s from page HTML.
#[derive(Debug)]
pub struct SearchIndexer<'a> {
    config: &'a SiteConfig,
    tag_groups: Vec<(Regex, &'a [String])>,
}

impl<'a> SearchIndexer<'a> {
    pub fn new(config: &'a SiteConfig) -> Result<Self, regex::Error> {
        let tag_groups = config
            .search
            .tags
            .iter()
            .map(|group| Regex::new(&group.pattern).map(|re| (re, group.tags.as_slice())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { config, tag_groups })
    }

    /// Build the entry of the page at output-relative `path`.
    pub fn entry(&self, path: &str, html: &str) -> SearchEntry {
        let search = &self.config.search;
        let route = naming::route(path);
        let section = self.config.section_for(path).label.clone();
        let visible = NON_TEXT.replace_all(html, " ");
        let html: &str = &visible;

        let title = first_text(&H1, html)
            .or_else(|| first_text(&TITLE, html).map(|t| self.clean_title(&t)))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| route.clone());
        let description = DESCRIPTION
            .captures(html)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| collapse(&html_escape::decode_html_entities(m.as_str())))
            .unwrap_or_default();
        let headings: Vec<String> = HEADINGS
            .captures_iter(html)
            .map(|c| strip_tags(&c[1]))
            .filter(|h| !h.is_empty())
            .take(MAX_HEADINGS)
            .collect();
        let body = MAIN
            .captures(html)
            .map(|c| strip_tags(&c[1]))
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| strip_tags(html));
        let body: String = body.chars().take(search.body_limit).collect();

        let mut tags = Vec::new();
        push_unique(&mut tags, section.to_lowercase());
        for word in route_words(&route) {
            push_unique(&mut tags, word);
        }
        let blob = format!("{title} {description} {body}").to_lowercase();
        for (pattern, group) in &self.tag_groups {
            if pattern.is_match(&blob) {
                for tag in group.iter() {
                    push_unique(&mut tags, tag.clone());
                }
            }
        }
        tags.truncate(MAX_TAGS);

        let mut parts = vec![description];
        parts.extend(headings);
        parts.push(body);
        let keywords: String = collapse(&parts.join(" "))
            .chars()
            .take(search.keyword_limit)
            .collect();

        SearchEntry {
            title,
            url: route,
            section,
            tags,
            keywords,
        }
    }

    /// `<title>` text without the ` | site name` suffix.
    fn clean_title(&self, title: &str) -> String {
        let suffix = format!(" | {}", self.config.site.name);
        title.strip_suffix(&suffix).unwrap_or(title).trim().to_string()
    }
}

/// Index every page under `root`, in path order.
pub fn build_index(root: &Path, config: &SiteConfig) -> Result<Vec<SearchEntry>, SearchError> {
    let indexer = SearchIndexer::new(config)?;
    let mut entries = Vec::new();
    for path in sitemap::html_files(root, &config.sitemap.exclude_dirs)? {
        let file_name = path.rsplit('/').next().unwrap_or(&path);
        if config.search.exclude_files.iter().any(|f| f == file_name) {
            continue;
        }
        let html = fs::read_to_string(root.join(&path))?;
        entries.push(indexer.entry(&path, &html));
    }
    Ok(entries)
}

/// Write the index to `root/config.search.output`. Returns the entry count.
pub fn write_search_index(root: &Path, config: &SiteConfig) -> Result<usize, SearchError> {
    let entries = build_index(root, config)?;
    let target = root.join(&config.search.output);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, serde_json::to_string_pretty(&entries)?)?;
    log::info!("Wrote {} with {} entries", target.display(), entries.len());
    Ok(entries.len())
}

fn first_text(re: &Regex, html: &str) -> Option<String> {
    re.captures(html).map(|c| strip_tags(&c[1]))
}

/// Visible text of an HTML fragment, whitespace-collapsed.
pub fn strip_tags(html: &str) -> String {
    let text = NON_TEXT.replace_all(html, " ");
    let text = TAG.replace_all(&text, " ");
    collapse(&html_escape::decode_html_entities(&text))
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased route words longer than two characters.
fn route_words(route: &str) -> Vec<String> {
    let trimmed = route.strip_suffix(".html").unwrap_or(route);
    trimmed
        .split(['/', '-'])
        .filter(|w| w.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

fn push_unique(tags: &mut Vec<String>, tag: String) {
    if !tag.is_empty() && !tags.contains(&tag) {
        tags.push(tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str = r#"<!DOCTYPE html><html><head>
<title>Tu primera wallet | aprendebtc.com</title>
<meta name="description" content="Cómo guardar tu &quot;semilla&quot;">
<script>var x = "<h2>not a heading</h2>";</script>
</head><body>
<div data-include="header"></div>
<main id="main-content"><h1>Tu <em>primera</em> wallet</h1>
<h2>Paso uno</h2><p>Anota las 24 palabras.</p>
<!-- comentario oculto -->
<h3>Paso dos</h3><p>Guárdalas &amp; no las fotografíes.</p></main>
</body></html>"#;

    fn entry(path: &str, html: &str) -> SearchEntry {
        let config = SiteConfig::default();
        SearchIndexer::new(&config).unwrap().entry(path, html)
    }

    #[test]
    fn extracts_fields() {
        let e = entry("nivel-1/primera-wallet.html", PAGE);
        assert_eq!(e.title, "Tu primera wallet");
        assert_eq!(e.url, "/nivel-1/primera-wallet.html");
        assert_eq!(e.section, "Nivel 1");
        assert!(e.keywords.starts_with("Cómo guardar tu \"semilla\" Paso uno Paso dos"));
        assert!(e.keywords.contains("Guárdalas & no las fotografíes."));
        assert!(!e.keywords.contains("comentario"));
        assert!(!e.keywords.contains("not a heading"));
    }

    #[test]
    fn tags_from_section_route_and_groups() {
        let e = entry("nivel-1/primera-wallet.html", PAGE);
        assert_eq!(&e.tags[..4], &["nivel 1", "nivel", "primera", "wallet"]);
        assert!(e.tags.contains(&"billetera".to_string()));
        assert!(e.tags.contains(&"frase semilla".to_string()));
        assert!(!e.tags.contains(&"lightning".to_string()));
    }

    #[test]
    fn title_falls_back_to_title_tag_then_route() {
        let e = entry("glosario.html", "<title>Glosario | aprendebtc.com</title>");
        assert_eq!(e.title, "Glosario");
        let e = entry("base/index.html", "<p>nada</p>");
        assert_eq!(e.title, "/base/");
        assert_eq!(e.url, "/base/");
    }

    #[test]
    fn keyword_and_body_limits() {
        let mut config = SiteConfig::default();
        config.search.keyword_limit = 10;
        let indexer = SearchIndexer::new(&config).unwrap();
        let e = indexer.entry("a.html", "<main>áéíóú áéíóú áéíóú</main>");
        assert_eq!(e.keywords.chars().count(), 10);
    }

    #[test]
    fn build_index_skips_excluded_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("nivel-1")).unwrap();
        fs::write(tmp.path().join("nivel-1/a.html"), PAGE).unwrap();
        fs::write(tmp.path().join("privacidad.html"), "<h1>Privacidad</h1>").unwrap();

        let config = SiteConfig::default();
        let count = write_search_index(tmp.path(), &config).unwrap();
        assert_eq!(count, 1);

        let json = fs::read_to_string(tmp.path().join(&config.search.output)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["url"], "/nivel-1/a.html");
        assert_eq!(value[0]["title"], "Tu primera wallet");
    }
}
