//! HTML page generation and the build pipeline.
//!
//! A build is strictly linear:
//!
//! ```text
//! read manuscript → decode → parse → navigation → render + write each page
//!                                                  → sitemap → search index
//! ```
//!
//! Pages are written one at a time with no rollback: if a write fails, the
//! pages written before it stay on disk.
//!
//! ## Page Shell
//!
//! Every page shares one skeleton: head metadata (description, canonical,
//! Open Graph, Twitter card, JSON-LD `Article`), a client-side header
//! include, a sidebar placeholder, a breadcrumb derived from the page's
//! section, the article itself, prev/next links, a footer include, and the
//! configured scripts. Stylesheet and script paths are relative, prefixed
//! with one `../` per directory level.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Everything interpolated is escaped; only the already rendered article body
//! is inserted verbatim.

use crate::config::{ConfigError, SiteConfig};
use crate::decode;
use crate::inline::{InlineRenderer, LinkRewrites};
use crate::naming::{self, ParsedPath};
use crate::navigation::NavigationResolver;
use crate::parse::BlockParser;
use crate::render::BodyRenderer;
use crate::search::{self, SearchError};
use crate::sitemap::{self, SitemapError};
use crate::types::{NavLink, PageNav, PageRecord};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sitemap(#[from] SitemapError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("No page records found in {0}")]
    NoRecords(PathBuf),
}

/// One page written by [`build`].
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub path: String,
    pub title: String,
    pub nav: PageNav,
}

/// What a [`build`] produced.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub output_dir: PathBuf,
    pub pages: Vec<GeneratedPage>,
    /// URL count of the sitemap, `None` when disabled.
    pub sitemap_urls: Option<usize>,
    /// Entry count of the search index, `None` when disabled.
    pub search_entries: Option<usize>,
}

/// Read, decode, and parse the configured manuscript.
///
/// Zero records is an error: an empty run never produces output.
pub fn read_records(config: &SiteConfig) -> Result<Vec<PageRecord>, GenerateError> {
    let input = config.input_path();
    let bytes = fs::read(&input)?;
    let text = decode::decode(&bytes);
    log::debug!("Decoded {} ({} bytes)", input.display(), bytes.len());

    let records = BlockParser::new(&config.parser)?.parse(&text);
    if records.is_empty() {
        return Err(GenerateError::NoRecords(input));
    }
    log::info!("Parsed {} page records from {}", records.len(), input.display());
    Ok(records)
}

/// Run the whole pipeline and write the site under `config.output_root`.
pub fn build(config: &SiteConfig) -> Result<BuildSummary, GenerateError> {
    let records = read_records(config)?;
    let output_dir = config.output_dir();

    let navigation = NavigationResolver::new(&records, &config.navigation, &output_dir);
    let templater = PageTemplater::new(config)?;

    let mut pages = Vec::with_capacity(records.len());
    for record in &records {
        let nav = navigation.resolve(&record.path);
        let document = templater.render(record, &nav)?;
        let target = write_page(&output_dir, &record.path, &document)?;
        log::debug!("Wrote {}", target.display());
        pages.push(GeneratedPage {
            path: record.path.clone(),
            title: page_title(record),
            nav,
        });
    }

    let sitemap_urls = if config.sitemap.enabled {
        Some(sitemap::write_sitemap(
            &output_dir,
            &config.site,
            &config.sitemap,
        )?)
    } else {
        None
    };
    let search_entries = if config.search.enabled {
        Some(search::write_search_index(&output_dir, config)?)
    } else {
        None
    };

    Ok(BuildSummary {
        output_dir,
        pages,
        sitemap_urls,
        search_entries,
    })
}

/// Write `document` to `root/path`, creating parent directories. The file
/// ends with a single `\n`.
pub fn write_page(root: &Path, path: &str, document: &str) -> std::io::Result<PathBuf> {
    let relative = naming::normalize_path(path);
    if !naming::stays_under_root(&relative) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("page path '{path}' is outside the output root"),
        ));
    }
    let target = root.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut contents = document.trim_end_matches('\n').to_string();
    contents.push('\n');
    fs::write(&target, contents)?;
    Ok(target)
}

/// Page heading: the parsed title, or the slug-derived fallback.
pub fn page_title(record: &PageRecord) -> String {
    let title = record.title.trim();
    if title.is_empty() {
        naming::parse_page_path(&record.path).display_title
    } else {
        title.to_string()
    }
}

/// Wraps rendered bodies in the page shell.
pub struct PageTemplater<'a> {
    config: &'a SiteConfig,
    body: BodyRenderer,
}

impl<'a> PageTemplater<'a> {
    pub fn new(config: &'a SiteConfig) -> Result<Self, GenerateError> {
        let rewrites = LinkRewrites::new(&config.rewrites).map_err(ConfigError::from)?;
        let inline = InlineRenderer::new(rewrites, config.labels.link.clone());
        Ok(Self {
            config,
            body: BodyRenderer::new(inline, config.labels.clone()),
        })
    }

    /// Render one complete page document.
    pub fn render(&self, record: &PageRecord, nav: &PageNav) -> Result<String, GenerateError> {
        let article = self.body.render(&record.body);
        let page = PageContext::new(self.config, record);
        let json_ld = article_json_ld(self.config, record, &page)?;
        Ok(self.document(record, &page, &article, &json_ld, nav).into_string())
    }

    fn document(
        &self,
        record: &PageRecord,
        page: &PageContext,
        article: &str,
        json_ld: &str,
        nav: &PageNav,
    ) -> Markup {
        let site = &self.config.site;
        let full_title = format!("{} | {}", page.title, site.name);
        html! {
            (DOCTYPE)
            html lang=(site.lang) data-base-path=(page.prefix) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="description" content=(page.description);
                    meta property="og:title" content=(full_title);
                    meta property="og:description" content=(page.description);
                    meta property="og:type" content="article";
                    meta property="og:url" content=(page.canonical);
                    @if !site.og_image.is_empty() {
                        meta property="og:image" content=(site.og_image);
                    }
                    @if let Some(date) = &record.publish_date {
                        meta property="article:published_time" content=(date);
                    }
                    meta name="twitter:card" content="summary_large_image";
                    meta name="twitter:title" content=(full_title);
                    meta name="twitter:description" content=(page.description);
                    @if !site.og_image.is_empty() {
                        meta name="twitter:image" content=(site.og_image);
                    }
                    title { (full_title) }
                    link rel="canonical" href=(page.canonical);
                    @for origin in &site.preconnect {
                        @if site.preconnect_crossorigin.contains(origin) {
                            link rel="preconnect" href=(origin) crossorigin;
                        } @else {
                            link rel="preconnect" href=(origin);
                        }
                    }
                    @for sheet in &site.stylesheets {
                        link rel="stylesheet" href={ (page.prefix) (sheet) };
                    }
                    script type="application/ld+json" { (PreEscaped(json_ld)) }
                }
                body {
                    div data-include=(site.header_include) {}
                    div.page-layout {
                        (self.sidebar(page))
                        main.page-layout__content id="main-content" {
                            div.content-inner {
                                (self.breadcrumb(page))
                                (self.article(record, page, article, nav))
                            }
                        }
                    }
                    div data-include=(site.footer_include) {}
                    @for script in &site.scripts {
                        script src={ (page.prefix) (script) } {}
                    }
                }
            }
        }
    }

    fn sidebar(&self, page: &PageContext) -> Markup {
        html! {
            aside.page-layout__sidebar aria-label=(page.section.sidebar_label) {
                nav.sidebar {
                    div.sidebar__ad-wrap {
                        div.ad-slot.ad-sidebar id="ad-sidebar-auto" aria-hidden="true" {}
                    }
                }
            }
        }
    }

    fn breadcrumb(&self, page: &PageContext) -> Markup {
        let labels = &self.config.labels;
        html! {
            nav.breadcrumb aria-label=(labels.breadcrumb_aria) {
                a.breadcrumb__item href="/" { (labels.home) }
                span.breadcrumb__separator aria-hidden="true" { "›" }
                a.breadcrumb__item href=(page.section.href) { (page.section.label) }
                span.breadcrumb__separator aria-hidden="true" { "›" }
                span.breadcrumb__current { (page.title) }
            }
        }
    }

    fn article(&self, record: &PageRecord, page: &PageContext, body: &str, nav: &PageNav) -> Markup {
        let labels = &self.config.labels;
        let length = record.length.as_deref().map(str::trim).filter(|l| !l.is_empty());
        html! {
            article.article {
                div class={ "nivel-badge " (page.section.badge_class) " article__badge" } {
                    (page.section.badge_text)
                }
                h1 { (page.title) }
                @if !record.subtitle.trim().is_empty() {
                    p.article__subtitle { (record.subtitle.trim()) }
                }
                @if record.publish_date.is_some() || length.is_some() {
                    p.article__meta {
                        @if let Some(date) = &record.publish_date {
                            time datetime=(date) { (date) }
                        }
                        @if let Some(length) = length {
                            span.article__length { (labels.length) ": " (length) }
                        }
                    }
                }
                (PreEscaped(body))
                div.ad-slot.ad-content id="ad-content-auto" aria-hidden="true" {}
                nav.page-nav aria-label=(labels.page_nav_aria) {
                    (nav_item(nav.prev.as_ref(), &labels.prev, false))
                    (nav_item(nav.next.as_ref(), &labels.next, true))
                }
            }
        }
    }
}

fn nav_item(link: Option<&NavLink>, label: &str, is_next: bool) -> Markup {
    match link {
        Some(link) => html! {
            a.page-nav__item.page-nav__item--next[is_next] href=(link.href) {
                span.page-nav__label { (label) }
                span.page-nav__title { (link.title) }
            }
        },
        None => html! { div {} },
    }
}

/// Values derived once per page and shared by the head and the body.
struct PageContext<'a> {
    title: String,
    description: String,
    canonical: String,
    prefix: String,
    section: &'a crate::config::SectionConfig,
}

impl<'a> PageContext<'a> {
    fn new(config: &'a SiteConfig, record: &PageRecord) -> Self {
        let parsed: ParsedPath = naming::parse_page_path(&record.path);
        let description = if record.meta_description.trim().is_empty() {
            record.subtitle.trim().to_string()
        } else {
            record.meta_description.trim().to_string()
        };
        Self {
            title: page_title(record),
            description,
            canonical: canonical_url(&config.site.base_url, &record.path),
            prefix: naming::asset_prefix(parsed.depth),
            section: config.section_for(&record.path),
        }
    }
}

/// Absolute URL of a page, with a trailing `index.html` dropped.
pub fn canonical_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), naming::route(path))
}

fn article_json_ld(
    config: &SiteConfig,
    record: &PageRecord,
    page: &PageContext,
) -> Result<String, serde_json::Error> {
    let site = &config.site;
    let mut value = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": page.title,
        "description": page.description,
        "url": page.canonical,
        "mainEntityOfPage": page.canonical,
        "inLanguage": site.lang,
        "publisher": {
            "@type": "Organization",
            "name": site.name,
            "url": site.base_url,
        },
    });
    if let Some(object) = value.as_object_mut() {
        if !site.og_image.is_empty() {
            object.insert("image".into(), site.og_image.clone().into());
        }
        if let Some(date) = &record.publish_date {
            object.insert("datePublished".into(), date.clone().into());
        }
    }
    // Raw `<` inside a script element could close it
    Ok(serde_json::to_string(&value)?.replace('<', "\\u003c"))
}

// ============================================================================
// Tests
// ============================================================================
