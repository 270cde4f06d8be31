//! Inline renderer: one line (or joined paragraph) of manuscript text → HTML.
//!
//! The dialect is deliberately small:
//!
//! | Source | Output |
//! |---|---|
//! | `**texto**` | `<strong>texto</strong>` |
//! | `Leer el whitepaper → /whitepaper.pdf` | `<a href="/whitepaper-bitcoin-es.pdf">Leer el whitepaper</a>` |
//! | anything else | escaped text |
//!
//! The arrow shorthand accepts `→`, its ASCII stand-in `->`, and the
//! mojibake form `â†’` left behind by a bad re-save. It only applies when the
//! target is the last whitespace-free token of the line.
//!
//! Before anything else the [`LinkRewrites`] table runs over the raw text, so
//! stale URLs are fixed in prose and link targets alike. All text is escaped;
//! only the tags produced here are live markup.

use crate::config::{RewriteKind, RewriteRule};
use maud::{Markup, PreEscaped, html};
use regex::Regex;
use std::sync::LazyLock;

static ARROW_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s*(?:→|->|â†’)\s*(\S+)\s*$").expect("valid arrow link regex")
});

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*.*?\*\*").expect("valid bold regex"));

/// Link-target rewrite table.
///
/// Substring rules replace every occurrence of their key in a single
/// leftmost-longest pass. Prefix rules replace a whole link target. Config
/// validation guarantees no target contains a key, so applying the table
/// twice gives the same result as applying it once.
#[derive(Debug, Clone)]
pub struct LinkRewrites {
    pattern: Option<Regex>,
    substrings: Vec<(String, String)>,
    prefixes: Vec<(String, String)>,
}

impl LinkRewrites {
    pub fn new(rules: &[RewriteRule]) -> Result<Self, regex::Error> {
        let mut substrings: Vec<(String, String)> = rules
            .iter()
            .filter(|r| r.kind == RewriteKind::Substring)
            .map(|r| (r.from.clone(), r.to.clone()))
            .collect();
        // Longest key first so alternation prefers `https://x/y` over `x/y`
        substrings.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let pattern = if substrings.is_empty() {
            None
        } else {
            let alternation = substrings
                .iter()
                .map(|(from, _)| regex::escape(from))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation)?)
        };

        let prefixes = rules
            .iter()
            .filter(|r| r.kind == RewriteKind::Prefix)
            .map(|r| (r.from.clone(), r.to.clone()))
            .collect();

        Ok(Self {
            pattern,
            substrings,
            prefixes,
        })
    }

    /// An empty table.
    pub fn none() -> Self {
        Self {
            pattern: None,
            substrings: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    /// Apply the substring rules to arbitrary text.
    pub fn apply(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &regex::Captures| {
                let key = &caps[0];
                self.substrings
                    .iter()
                    .find(|(from, _)| from == key)
                    .map(|(_, to)| to.clone())
                    .unwrap_or_else(|| key.to_string())
            })
            .into_owned()
    }

    /// Normalize a link target: trailing `)` removed, substring rules
    /// applied, then the first matching prefix rule replaces it wholesale.
    pub fn target(&self, raw: &str) -> String {
        let clean = self.apply(raw.trim().trim_end_matches(')'));
        self.prefixes
            .iter()
            .find(|(from, _)| clean.starts_with(from.as_str()))
            .map(|(_, to)| to.clone())
            .unwrap_or(clean)
    }
}

/// Inline rendering context: rewrite table plus the fallback link label.
#[derive(Debug, Clone)]
pub struct InlineRenderer {
    rewrites: LinkRewrites,
    default_label: String,
}

impl InlineRenderer {
    pub fn new(rewrites: LinkRewrites, default_label: impl Into<String>) -> Self {
        Self {
            rewrites,
            default_label: default_label.into(),
        }
    }

    /// Render one line or joined paragraph.
    pub fn render(&self, text: &str) -> Markup {
        let raw = self.rewrites.apply(text.trim());
        if raw.is_empty() {
            return PreEscaped(String::new());
        }

        if let Some(caps) = ARROW_LINK.captures(&raw) {
            let label = caps[1].trim();
            let label = if label.is_empty() {
                self.default_label.as_str()
            } else {
                label
            };
            let href = self.rewrites.target(&caps[2]);
            return html! {
                a href=(href) { (render_bold(label)) }
            };
        }

        render_bold(&raw)
    }
}

/// Escape text, turning `**spans**` into `<strong>` elements.
pub fn render_bold(text: &str) -> Markup {
    let mut spans: Vec<(bool, &str)> = Vec::new();
    let mut last = 0;
    for m in BOLD.find_iter(text) {
        spans.push((false, &text[last..m.start()]));
        spans.push((true, &m.as_str()[2..m.as_str().len() - 2]));
        last = m.end();
    }
    spans.push((false, &text[last..]));

    html! {
        @for (strong, span) in spans {
            @if strong {
                strong { (span) }
            } @else {
                (span)
            }
        }
    }
}
