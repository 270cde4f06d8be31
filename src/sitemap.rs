//! `sitemap.xml` generation for the output tree.
//!
//! Every `.html` file under the output root becomes one URL, so pages that
//! were generated by earlier runs or written by hand are listed too. Routes
//! follow the public URL scheme: `index.html` → `/`, `base/index.html` →
//! `/base/`. The first `[[sitemap.rules]]` pattern matching a route sets its
//! priority and change frequency.

use crate::config::{SiteMeta, SitemapConfig};
use crate::naming;
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid sitemap rule: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub route: String,
    pub priority: f32,
    pub changefreq: String,
}

/// Relative paths (forward slashes) of every `.html` file under `root`,
/// sorted. Directories named in `exclude_dirs` are not descended into.
pub fn html_files(root: &Path, exclude_dirs: &[String]) -> Result<Vec<String>, walkdir::Error> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        e.depth() == 0
            || !e.file_type().is_dir()
            || !exclude_dirs.iter().any(|d| e.file_name() == d.as_str())
    });
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_html = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
        if !is_html {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            files.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    files.sort();
    Ok(files)
}

/// Unique routes for a file list: `/` first, then byte order.
pub fn routes(files: &[String]) -> Vec<String> {
    let mut routes: Vec<String> = files.iter().map(|f| naming::route(f)).collect();
    routes.sort_by(|a, b| (a != "/").cmp(&(b != "/")).then_with(|| a.cmp(b)));
    routes.dedup();
    routes
}

/// Attach priority and change frequency to each route.
pub fn classify(routes: &[String], config: &SitemapConfig) -> Result<Vec<SitemapEntry>, regex::Error> {
    let rules = config
        .rules
        .iter()
        .map(|rule| Regex::new(&rule.pattern).map(|re| (re, rule)))
        .collect::<Result<Vec<_>, regex::Error>>()?;

    Ok(routes
        .iter()
        .map(|route| {
            let (priority, changefreq) = rules
                .iter()
                .find(|(re, _)| re.is_match(route))
                .map(|(_, rule)| (rule.priority, rule.changefreq.clone()))
                .unwrap_or_else(|| (config.default_priority, config.default_changefreq.clone()));
            SitemapEntry {
                route: route.clone(),
                priority,
                changefreq,
            }
        })
        .collect())
}

/// Serialize entries as a sitemaps.org `urlset`.
pub fn render_sitemap(base_url: &str, entries: &[SitemapEntry]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut lines = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#.to_string(),
    ];
    for entry in entries {
        let loc = format!("{base}{}", entry.route);
        lines.push("  <url>".to_string());
        lines.push(format!("    <loc>{}</loc>", html_escape::encode_text(&loc)));
        lines.push(format!(
            "    <changefreq>{}</changefreq>",
            html_escape::encode_text(&entry.changefreq)
        ));
        lines.push(format!("    <priority>{:.1}</priority>", entry.priority));
        lines.push("  </url>".to_string());
    }
    lines.push("</urlset>".to_string());
    lines.join("\n") + "\n"
}

/// Scan `root` and write the sitemap to `root/config.output`. Returns the
/// number of URLs.
pub fn write_sitemap(root: &Path, site: &SiteMeta, config: &SitemapConfig) -> Result<usize, SitemapError> {
    let files = html_files(root, &config.exclude_dirs)?;
    let entries = classify(&routes(&files), config)?;

    let target = root.join(&config.output);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, render_sitemap(&site.base_url, &entries))?;
    log::info!("Wrote {} with {} URLs", target.display(), entries.len());
    Ok(entries.len())
}
