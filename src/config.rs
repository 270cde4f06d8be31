//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Every lookup table
//! the pipeline consults lives here rather than in the code: header-field
//! synonyms, body sentinels, link rewrites, section metadata, navigation
//! orderings and fallbacks, UI labels. Tests build a [`SiteConfig`] directly
//! and substitute whichever table they exercise.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown by `manuscript-site gen-config`
//!
//! input = "bloques.txt"          # Manuscript to convert
//! output_root = "site"           # Pages are written under this directory
//!
//! [site]
//! name = "aprendebtc.com"
//! base_url = "https://aprendebtc.com"
//!
//! [parser]
//! block_markers = ["pagina"]
//! stop_patterns = ['(?i)^\s*bloque\s+\d+\s+completado']
//!
//! [[rewrites]]
//! from = "/whitepaper.pdf"
//! to = "/whitepaper-bitcoin-es.pdf"
//!
//! [[navigation.sequences]]
//! pages = ["nivel-1/a.html", "nivel-1/b.html"]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Tables merge key by key over the stock
//! defaults; arrays and scalars replace the default wholesale:
//!
//! ```toml
//! # Only move the output directory
//! output_root = "public"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Manuscript text file to convert.
    pub input: String,
    /// Root directory the pages are written under.
    pub output_root: String,
    /// Site-wide metadata and static asset references.
    pub site: SiteMeta,
    /// Block parser vocabulary.
    pub parser: ParserConfig,
    /// Link-target rewrite table.
    pub rewrites: Vec<RewriteRule>,
    /// Fixed UI strings.
    pub labels: Labels,
    /// Per top-level directory breadcrumb/badge metadata.
    pub sections: Vec<SectionConfig>,
    /// Section used when no entry of `sections` matches.
    pub default_section: SectionConfig,
    /// Previous/next link resolution.
    pub navigation: NavigationConfig,
    pub sitemap: SitemapConfig,
    pub search: SearchConfig,
    pub og_image: OgImageConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            input: "bloques.txt".to_string(),
            output_root: "site".to_string(),
            site: SiteMeta::default(),
            parser: ParserConfig::default(),
            rewrites: default_rewrites(),
            labels: Labels::default(),
            sections: default_sections(),
            default_section: SectionConfig {
                prefix: String::new(),
                label: "Proyecto".to_string(),
                href: "/".to_string(),
                badge_class: "nivel-badge--base".to_string(),
                badge_text: "Proyecto".to_string(),
                sidebar_label: "Navegacion del proyecto".to_string(),
            },
            navigation: NavigationConfig::default(),
            sitemap: SitemapConfig::default(),
            search: SearchConfig::default(),
            og_image: OgImageConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values and compile every pattern once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output_root must not be empty".into(),
            ));
        }
        if self.parser.block_markers.is_empty() {
            return Err(ConfigError::Validation(
                "parser.block_markers must not be empty".into(),
            ));
        }
        for pattern in &self.parser.stop_patterns {
            regex::Regex::new(pattern)?;
        }
        for rule in &self.sitemap.rules {
            regex::Regex::new(&rule.pattern)?;
        }
        for group in &self.search.tags {
            regex::Regex::new(&group.pattern)?;
        }
        for rule in &self.rewrites {
            if rule.from.is_empty() {
                return Err(ConfigError::Validation(
                    "rewrites.from must not be empty".into(),
                ));
            }
            if let Some(other) = self.rewrites.iter().find(|o| rule.to.contains(&o.from)) {
                return Err(ConfigError::Validation(format!(
                    "rewrite target '{}' contains rewrite key '{}'",
                    rule.to, other.from
                )));
            }
        }
        if self.search.keyword_limit == 0 {
            return Err(ConfigError::Validation(
                "search.keyword_limit must be non-zero".into(),
            ));
        }
        if self.og_image.width == 0 || self.og_image.height == 0 {
            return Err(ConfigError::Validation(
                "og_image width and height must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Path of the manuscript.
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(&self.input)
    }

    /// Root directory of the generated site.
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_root)
    }

    /// Section metadata for a page path, matched on its top-level directory.
    pub fn section_for(&self, path: &str) -> &SectionConfig {
        let group = crate::naming::parse_page_path(path).group;
        group
            .and_then(|g| self.sections.iter().find(|s| s.prefix == g))
            .unwrap_or(&self.default_section)
    }
}

/// Site-wide metadata and static asset references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// Site name, appended to every page title (`Title | name`).
    pub name: String,
    /// Absolute base URL without trailing slash.
    pub base_url: String,
    /// Document language (`<html lang>`).
    pub lang: String,
    /// Absolute URL of the social preview image.
    pub og_image: String,
    /// Origins to `preconnect` to.
    pub preconnect: Vec<String>,
    /// Preconnect origins that also get `crossorigin` (font hosts).
    pub preconnect_crossorigin: Vec<String>,
    /// Stylesheets relative to the site root.
    pub stylesheets: Vec<String>,
    /// Scripts relative to the site root, in load order.
    pub scripts: Vec<String>,
    /// Name of the client-side header include.
    pub header_include: String,
    /// Name of the client-side footer include.
    pub footer_include: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            name: "aprendebtc.com".to_string(),
            base_url: "https://aprendebtc.com".to_string(),
            lang: "es".to_string(),
            og_image: "https://aprendebtc.com/assets/og-image.png".to_string(),
            preconnect: vec![
                "https://fonts.googleapis.com".to_string(),
                "https://fonts.gstatic.com".to_string(),
            ],
            preconnect_crossorigin: vec!["https://fonts.gstatic.com".to_string()],
            stylesheets: vec!["css/main.css".to_string(), "css/components.css".to_string()],
            scripts: vec![
                "js/includes.js".to_string(),
                "js/nav.js".to_string(),
                "js/search.js".to_string(),
            ],
            header_include: "header".to_string(),
            footer_include: "footer".to_string(),
        }
    }
}

/// Block parser vocabulary.
///
/// Keys are compared after normalization (diacritics stripped, lowercased,
/// words joined with `-`), so list them in that form: `meta-description`,
/// not `META DESCRIPTION`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Keys of the line that starts a new page record.
    pub block_markers: Vec<String>,
    /// Header-field synonyms.
    pub fields: FieldSynonyms,
    /// Regexes; the first body line matching any of them ends the body.
    pub stop_patterns: Vec<String>,
    /// Literal markers; the body is cut at the first occurrence of any.
    pub truncate_markers: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            block_markers: strings(&["pagina"]),
            fields: FieldSynonyms::default(),
            stop_patterns: strings(&[
                r"(?i)^\s*bloque\s+\d+\s+completado",
                r"(?i)^\s*fin\s+del\s+bloque\b",
                r"(?i)^\s*##\s*la\s+madriguera\b",
            ]),
            truncate_markers: strings(&["<!DOCTYPE html>"]),
        }
    }
}

/// Normalized synonyms for each header field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldSynonyms {
    pub title: Vec<String>,
    pub meta_description: Vec<String>,
    pub subtitle: Vec<String>,
    pub publish_date: Vec<String>,
    pub length: Vec<String>,
}

impl Default for FieldSynonyms {
    fn default() -> Self {
        Self {
            title: strings(&["titulo", "title"]),
            meta_description: strings(&["meta-description", "descripcion-meta"]),
            subtitle: strings(&["subtitulo", "subtitle"]),
            publish_date: strings(&["fecha", "fecha-de-publicacion", "publicado", "date"]),
            length: strings(&["longitud", "extension", "duracion", "length"]),
        }
    }
}

/// How a rewrite rule matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteKind {
    /// Replace every occurrence of `from` anywhere in inline text.
    #[default]
    Substring,
    /// Replace a whole link target that starts with `from`.
    Prefix,
}

/// One entry of the link-target rewrite table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: RewriteKind,
}

fn rewrite(from: &str, to: &str, kind: RewriteKind) -> RewriteRule {
    RewriteRule {
        from: from.to_string(),
        to: to.to_string(),
        kind,
    }
}

fn default_rewrites() -> Vec<RewriteRule> {
    use RewriteKind::{Prefix, Substring};
    vec![
        rewrite("/whitepaper.pdf", "/whitepaper-bitcoin-es.pdf", Substring),
        rewrite("https://bitcoin.org/bitcoin.pdf", "/whitepaper-bitcoin-en.pdf", Substring),
        rewrite("http://bitcoin.org/bitcoin.pdf", "/whitepaper-bitcoin-en.pdf", Substring),
        rewrite("bitcoin.org/bitcoin.pdf", "/whitepaper-bitcoin-en.pdf", Substring),
        rewrite(
            "/nivel-4/privacidad-la-verdad.html",
            "/nivel-3/utxos-y-privacidad.html",
            Substring,
        ),
        rewrite("/nivel-4/payjoin.html", "/nivel-4/coinjoin.html", Substring),
        rewrite("/nivel-5/segwit.html", "/nivel-5/segwit-internals.html", Substring),
        rewrite("bitcoin.org/", "/whitepaper-bitcoin-en.pdf", Prefix),
    ]
}

/// Fixed UI strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub callout_info: String,
    pub callout_warning: String,
    pub callout_danger: String,
    pub callout_success: String,
    /// Title of `[NOTA: ...]` callouts.
    pub note: String,
    /// Visible text of an arrow link whose label is empty.
    pub link: String,
    pub prev: String,
    pub next: String,
    /// First breadcrumb entry, linking to `/`.
    pub home: String,
    pub breadcrumb_aria: String,
    pub page_nav_aria: String,
    /// Prefix of the reading-length note.
    pub length: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            callout_info: "Informacion".to_string(),
            callout_warning: "Atencion".to_string(),
            callout_danger: "Alerta".to_string(),
            callout_success: "Exito".to_string(),
            note: "Nota".to_string(),
            link: "Abrir".to_string(),
            prev: "← Anterior".to_string(),
            next: "Siguiente →".to_string(),
            home: "Inicio".to_string(),
            breadcrumb_aria: "Ruta de navegacion".to_string(),
            page_nav_aria: "Navegacion entre paginas".to_string(),
            length: "Lectura".to_string(),
        }
    }
}

/// Breadcrumb, badge, and sidebar metadata for one top-level directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionConfig {
    /// Top-level directory this section covers (`base`, `nivel-1`).
    pub prefix: String,
    pub label: String,
    pub href: String,
    pub badge_class: String,
    pub badge_text: String,
    pub sidebar_label: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            label: String::new(),
            href: "/".to_string(),
            badge_class: String::new(),
            badge_text: String::new(),
            sidebar_label: String::new(),
        }
    }
}

fn section(prefix: &str, label: &str, badge_class: &str, badge_text: &str) -> SectionConfig {
    SectionConfig {
        prefix: prefix.to_string(),
        label: label.to_string(),
        href: format!("/{prefix}/"),
        badge_class: badge_class.to_string(),
        badge_text: badge_text.to_string(),
        sidebar_label: format!("Navegacion de {}", badge_text.to_lowercase()),
    }
}

fn default_sections() -> Vec<SectionConfig> {
    let mut sections: Vec<SectionConfig> = (1..=6)
        .map(|n| {
            section(
                &format!("nivel-{n}"),
                &format!("Nivel {n}"),
                &format!("nivel-badge--{n}"),
                &format!("Nivel {n}"),
            )
        })
        .collect();
    sections.push(section(
        "la-madriguera",
        "La Madriguera",
        "nivel-badge--4",
        "La madriguera",
    ));
    sections.push(section(
        "base",
        "Base de Conocimiento",
        "nivel-badge--base",
        "Base",
    ));
    sections
}

/// Previous/next link resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Group key of root-level pages.
    pub default_group: String,
    /// Declared orderings. Pages not listed in any are grouped by their
    /// top-level directory in manuscript order.
    pub sequences: Vec<SequenceConfig>,
    /// Previous link given to the first page of a group.
    pub fallbacks: Vec<FallbackLink>,
    /// Link titles for pages that are not part of this run.
    pub titles: BTreeMap<String, String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_group: "root".to_string(),
            sequences: Vec::new(),
            fallbacks: vec![
                FallbackLink {
                    group: "la-madriguera".to_string(),
                    href: "/base/".to_string(),
                    title: "Base de Conocimiento".to_string(),
                },
                FallbackLink {
                    group: "root".to_string(),
                    href: "/".to_string(),
                    title: "Inicio".to_string(),
                },
            ],
            titles: BTreeMap::new(),
        }
    }
}

/// A declared page ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SequenceConfig {
    pub pages: Vec<String>,
}

/// Fixed previous link of a group's first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackLink {
    pub group: String,
    pub href: String,
    pub title: String,
}

/// Sitemap generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Write the sitemap at the end of `build`.
    pub enabled: bool,
    /// Output file, relative to `output_root`.
    pub output: String,
    /// Directory names never descended into.
    pub exclude_dirs: Vec<String>,
    /// First matching rule decides priority and change frequency.
    pub rules: Vec<SitemapRule>,
    pub default_priority: f32,
    pub default_changefreq: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        let rule = |pattern: &str, priority: f32, changefreq: &str| SitemapRule {
            pattern: pattern.to_string(),
            priority,
            changefreq: changefreq.to_string(),
        };
        Self {
            enabled: true,
            output: "sitemap.xml".to_string(),
            exclude_dirs: strings(&[".git", "node_modules", "includes", "assets", "css", "js"]),
            rules: vec![
                rule(r"^/$", 1.0, "weekly"),
                rule(r"^/nivel-[1-6]/$", 0.9, "weekly"),
                rule(r"^/nivel-[1-6]/.+\.html$", 0.8, "monthly"),
                rule(r"^/base/(.+\.html)?$", 0.8, "monthly"),
                rule(r"^/herramientas/(.+\.html)?$", 0.7, "monthly"),
            ],
            default_priority: 0.6,
            default_changefreq: "monthly".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SitemapRule {
    /// Regex matched against the page route (`/base/x.html`).
    pub pattern: String,
    pub priority: f32,
    pub changefreq: String,
}

/// Client-side search index generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Write the index at the end of `build`.
    pub enabled: bool,
    /// Output file, relative to `output_root`.
    pub output: String,
    /// File names left out of the index.
    pub exclude_files: Vec<String>,
    /// Maximum characters of page text scanned per page.
    pub body_limit: usize,
    /// Maximum characters of the `keywords` field.
    pub keyword_limit: usize,
    /// Keyword groups added as tags when their pattern matches.
    pub tags: Vec<TagGroup>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let group = |pattern: &str, tags: &[&str]| TagGroup {
            pattern: pattern.to_string(),
            tags: strings(tags),
        };
        Self {
            enabled: true,
            output: "js/search-index.site.json".to_string(),
            exclude_files: strings(&["privacidad.html"]),
            body_limit: 4500,
            keyword_limit: 1500,
            tags: vec![
                group(
                    "(seed|semilla|mnemonic|mnemoni|bip39)",
                    &["frase semilla", "seed phrase", "mnemonic", "bip39"],
                ),
                group("(wallet|billetera|cartera)", &["wallet", "billetera"]),
                group(
                    "(lightning|bolt11|invoice|factura)",
                    &["lightning", "factura lightning"],
                ),
                group("(utxo|input|output|transacci)", &["utxo", "transacciones"]),
                group(
                    "(xpub|xprv|bip32|derivation path|ruta de derivaci)",
                    &["xpub", "xprv", "bip32"],
                ),
                group(
                    "(bech32|base58|wif|clave privada|clave pública|secp256k1)",
                    &["claves", "direcciones"],
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagGroup {
    /// Regex matched against the lowercased title, description, and text.
    pub pattern: String,
    pub tags: Vec<String>,
}

/// Social preview image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OgImageConfig {
    /// Output file, relative to `output_root`.
    pub output: String,
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub text: [u8; 3],
    pub muted: [u8; 3],
    pub accent: [u8; 3],
    /// Wordmark, first half (text colour).
    pub brand_left: String,
    /// Wordmark, second half (accent colour).
    pub brand_right: String,
    /// Large translucent glyph in the decorative corner.
    pub monogram: String,
    pub tagline: String,
    /// Bold TrueType candidates, tried in order.
    pub bold_fonts: Vec<String>,
    /// Regular TrueType candidates, tried in order.
    pub regular_fonts: Vec<String>,
}

impl Default for OgImageConfig {
    fn default() -> Self {
        Self {
            output: "assets/og-image.png".to_string(),
            width: 1200,
            height: 630,
            background: [13, 17, 23],
            text: [230, 237, 243],
            muted: [139, 148, 158],
            accent: [247, 147, 26],
            brand_left: "aprende".to_string(),
            brand_right: "BTC".to_string(),
            monogram: "B".to_string(),
            tagline: "La guia mas completa de Bitcoin en espanol".to_string(),
            bold_fonts: strings(&[
                "C:/Windows/Fonts/segoeuib.ttf",
                "C:/Windows/Fonts/arialbd.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
                "/Library/Fonts/Arial Bold.ttf",
            ]),
            regular_fonts: strings(&[
                "C:/Windows/Fonts/segoeui.ttf",
                "C:/Windows/Fonts/arial.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/Library/Fonts/Arial.ttf",
            ]),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`.
///
/// A missing file yields the validated stock defaults; a present but
/// invalid file is an error.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No config at {}, using stock defaults", path.display());
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    log::info!("Loaded config from {}", path.display());
    resolve_config(Some(value))
}

/// Returns a commented stock `site.toml` with the most used keys.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Manuscript Site Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Tables merge over the defaults key by
# key; arrays replace the default array entirely.
# Unknown keys will cause an error.

# Manuscript to convert (encoding is detected automatically).
input = "bloques.txt"

# Every page is written to <output_root>/<declared path>.
output_root = "site"

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
name = "aprendebtc.com"
base_url = "https://aprendebtc.com"
lang = "es"
og_image = "https://aprendebtc.com/assets/og-image.png"
preconnect = ["https://fonts.googleapis.com", "https://fonts.gstatic.com"]
preconnect_crossorigin = ["https://fonts.gstatic.com"]
stylesheets = ["css/main.css", "css/components.css"]
scripts = ["js/includes.js", "js/nav.js", "js/search.js"]
header_include = "header"
footer_include = "footer"

# ---------------------------------------------------------------------------
# Parser vocabulary
# ---------------------------------------------------------------------------
# Keys are matched after stripping accents, lowercasing, and joining words
# with "-": "PÁGINA:" matches "pagina", "META DESCRIPTION:" matches
# "meta-description".
[parser]
block_markers = ["pagina"]

# The first body line matching any of these regexes ends the page body.
stop_patterns = [
    '(?i)^\s*bloque\s+\d+\s+completado',
    '(?i)^\s*fin\s+del\s+bloque\b',
    '(?i)^\s*##\s*la\s+madriguera\b',
]

# The body is cut at the first occurrence of any of these strings.
truncate_markers = ["<!DOCTYPE html>"]

[parser.fields]
title = ["titulo", "title"]
meta_description = ["meta-description", "descripcion-meta"]
subtitle = ["subtitulo", "subtitle"]
publish_date = ["fecha", "fecha-de-publicacion", "publicado", "date"]
length = ["longitud", "extension", "duracion", "length"]

# ---------------------------------------------------------------------------
# Link rewrites
# ---------------------------------------------------------------------------
# kind = "substring" (default) replaces every occurrence in inline text.
# kind = "prefix" replaces a whole link target starting with `from`.
# A target may not contain any rule's `from`.
[[rewrites]]
from = "/whitepaper.pdf"
to = "/whitepaper-bitcoin-es.pdf"

[[rewrites]]
from = "https://bitcoin.org/bitcoin.pdf"
to = "/whitepaper-bitcoin-en.pdf"

[[rewrites]]
from = "http://bitcoin.org/bitcoin.pdf"
to = "/whitepaper-bitcoin-en.pdf"

[[rewrites]]
from = "bitcoin.org/bitcoin.pdf"
to = "/whitepaper-bitcoin-en.pdf"

[[rewrites]]
from = "/nivel-4/privacidad-la-verdad.html"
to = "/nivel-3/utxos-y-privacidad.html"

[[rewrites]]
from = "/nivel-4/payjoin.html"
to = "/nivel-4/coinjoin.html"

[[rewrites]]
from = "/nivel-5/segwit.html"
to = "/nivel-5/segwit-internals.html"

[[rewrites]]
from = "bitcoin.org/"
to = "/whitepaper-bitcoin-en.pdf"
kind = "prefix"

# ---------------------------------------------------------------------------
# Navigation
# ---------------------------------------------------------------------------
[navigation]
# Group of pages declared at the root (no directory).
default_group = "root"

# Declared orderings; pages outside every sequence are grouped by their
# top-level directory in manuscript order.
# [[navigation.sequences]]
# pages = ["nivel-1/que-es-bitcoin.html", "nivel-1/comprar.html"]

# Previous link of the first page in a group.
[[navigation.fallbacks]]
group = "la-madriguera"
href = "/base/"
title = "Base de Conocimiento"

[[navigation.fallbacks]]
group = "root"
href = "/"
title = "Inicio"

# Titles of pages that are linked but not part of this manuscript.
# [navigation.titles]
# "nivel-1/index.html" = "Nivel 1"

# ---------------------------------------------------------------------------
# Sitemap and search index (written after the pages)
# ---------------------------------------------------------------------------
[sitemap]
enabled = true
output = "sitemap.xml"
default_priority = 0.6
default_changefreq = "monthly"

[search]
enabled = true
output = "js/search-index.site.json"
exclude_files = ["privacidad.html"]
keyword_limit = 1500

# ---------------------------------------------------------------------------
# Social preview image (`manuscript-site og-image`)
# ---------------------------------------------------------------------------
[og_image]
output = "assets/og-image.png"
width = 1200
height = 630
background = [13, 17, 23]
accent = [247, 147, 26]
brand_left = "aprende"
brand_right = "BTC"
tagline = "La guia mas completa de Bitcoin en espanol"
"##
}
