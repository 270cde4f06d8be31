//! Previous/next navigation between pages.
//!
//! Pages are arranged into linear sequences. Declared sequences from
//! `[[navigation.sequences]]` come first; every parsed page not listed in one
//! is placed in a derived sequence for its top-level directory, in
//! manuscript order. Within a sequence each page links to its neighbours.
//! The first page of a sequence may get a configured fallback previous link
//! (keyed by the group of that first page); the last page gets no next link.
//!
//! ## Link titles
//!
//! The label of a link to page `p` is the first non-empty of:
//!
//! 1. the title parsed for `p` in this run,
//! 2. `[navigation.titles]`,
//! 3. the `<h1>` text of the already generated `output_root/p`,
//! 4. the slug-derived display title.

use crate::config::NavigationConfig;
use crate::naming;
use crate::types::{NavLink, PageNav, PageRecord};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid h1 regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Resolved navigation for every page of a run.
#[derive(Debug, Clone, Default)]
pub struct NavigationResolver {
    links: HashMap<String, PageNav>,
}

impl NavigationResolver {
    pub fn new(records: &[PageRecord], config: &NavigationConfig, output_root: &Path) -> Self {
        let parsed_titles: HashMap<&str, &str> = records
            .iter()
            .filter(|r| !r.title.trim().is_empty())
            .map(|r| (r.path.as_str(), r.title.trim()))
            .collect();
        let title_of = |path: &str| -> String {
            if let Some(title) = parsed_titles.get(path) {
                return title.to_string();
            }
            if let Some(title) = config.titles.get(path).filter(|t| !t.trim().is_empty()) {
                return title.trim().to_string();
            }
            if let Some(title) = recover_title(&output_root.join(path)) {
                return title;
            }
            naming::parse_page_path(path).display_title
        };
        let link_to = |path: &str| NavLink {
            href: naming::href(path),
            title: title_of(path),
        };

        let mut links: HashMap<String, PageNav> = HashMap::new();
        for sequence in sequences(records, config) {
            for (i, path) in sequence.iter().enumerate() {
                let prev = match i.checked_sub(1) {
                    Some(p) => Some(link_to(sequence[p].as_str())),
                    None => fallback(path, config),
                };
                let next = sequence.get(i + 1).map(|n| link_to(n.as_str()));
                links.insert(path.clone(), PageNav { prev, next });
            }
        }
        Self { links }
    }

    /// Links for `path`. A page outside every sequence gets no links.
    pub fn resolve(&self, path: &str) -> PageNav {
        self.links
            .get(&naming::normalize_path(path))
            .cloned()
            .unwrap_or_default()
    }
}

/// Declared sequences, then one derived sequence per group, in first-seen
/// order. Each path appears in at most one sequence.
fn sequences(records: &[PageRecord], config: &NavigationConfig) -> Vec<Vec<String>> {
    let mut placed: HashSet<String> = HashSet::new();
    let mut out: Vec<Vec<String>> = Vec::new();

    for declared in &config.sequences {
        let pages: Vec<String> = declared
            .pages
            .iter()
            .map(|p| naming::normalize_path(p))
            .filter(|p| !p.is_empty() && placed.insert(p.clone()))
            .collect();
        if !pages.is_empty() {
            out.push(pages);
        }
    }

    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for record in records {
        if !placed.insert(record.path.clone()) {
            continue;
        }
        let key = naming::group_key(&record.path, &config.default_group);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, pages)) => pages.push(record.path.clone()),
            None => groups.push((key, vec![record.path.clone()])),
        }
    }
    out.extend(groups.into_iter().map(|(_, pages)| pages));
    out
}

fn fallback(first: &str, config: &NavigationConfig) -> Option<NavLink> {
    let group = naming::group_key(first, &config.default_group);
    config
        .fallbacks
        .iter()
        .find(|f| f.group == group)
        .map(|f| NavLink {
            href: f.href.clone(),
            title: f.title.clone(),
        })
}

/// Title recovered from the first `<h1>` of an existing HTML file: nested
/// tags stripped, entities decoded, whitespace collapsed. `None` when the
/// file is missing, unreadable, or has no non-empty heading.
pub fn recover_title(file: &Path) -> Option<String> {
    let html = fs::read_to_string(file).ok()?;
    let inner = H1.captures(&html)?.get(1)?.as_str();
    let text = TAG.replace_all(inner, " ");
    let text = html_escape::decode_html_entities(&text);
    let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        None
    } else {
        log::debug!("Recovered title {:?} from {}", title, file.display());
        Some(title)
    }
}
