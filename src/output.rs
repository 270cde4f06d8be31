//! CLI output formatting.
//!
//! Every page is shown by its title first, with its path and other details
//! on indented context lines, so the output reads as a content inventory.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages (bloques.txt)
//! 001 ¿Qué es Bitcoin?
//!     Path: nivel-1/que-es-bitcoin.html
//!     Description: Una introducción sin tecnicismos.
//!     Body: 14 lines
//! 002 (nivel-1/sin-titulo.html)
//!     Path: nivel-1/sin-titulo.html
//!     Body: 3 lines
//!
//! 2 pages
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 ¿Qué es Bitcoin? → nivel-1/que-es-bitcoin.html
//!     Next: /nivel-1/como-funciona.html (Cómo funciona)
//! 002 Cómo funciona → nivel-1/como-funciona.html
//!     Prev: /nivel-1/que-es-bitcoin.html (¿Qué es Bitcoin?)
//!
//! Sitemap: 2 URLs
//! Search index: 2 entries
//! Generated 2 pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::BuildSummary;
use crate::types::{NavLink, PageRecord};
use std::path::Path;

const DESCRIPTION_WIDTH: usize = 60;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Titled pages show their title, untitled ones their path in parens.
fn page_line(index: usize, title: &str, path: &str) -> String {
    if title.trim().is_empty() {
        format!("{} ({})", format_index(index), path)
    } else {
        format!("{} {}", format_index(index), title.trim())
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

fn link_line(label: &str, link: &NavLink) -> String {
    format!("{}{}: {} ({})", indent(1), label, link.href, link.title)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(records: &[PageRecord], input: &Path) -> Vec<String> {
    let mut lines = vec![format!("Pages ({})", input.display())];
    for (i, record) in records.iter().enumerate() {
        lines.push(page_line(i + 1, &record.title, &record.path));
        lines.push(format!("{}Path: {}", indent(1), record.path));
        if !record.meta_description.is_empty() {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(&record.meta_description, DESCRIPTION_WIDTH)
            ));
        }
        if let Some(date) = &record.publish_date {
            lines.push(format!("{}Date: {}", indent(1), date));
        }
        let body_lines = record.body.lines().filter(|l| !l.trim().is_empty()).count();
        lines.push(format!("{}Body: {}", indent(1), plural(body_lines, "line", "lines")));
    }
    lines.push(String::new());
    lines.push(plural(records.len(), "page", "pages"));
    lines
}

pub fn print_check_output(records: &[PageRecord], input: &Path) {
    for line in format_check_output(records, input) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, page) in summary.pages.iter().enumerate() {
        lines.push(format!("{} → {}", page_line(i + 1, &page.title, &page.path), page.path));
        if let Some(prev) = &page.nav.prev {
            lines.push(link_line("Prev", prev));
        }
        if let Some(next) = &page.nav.next {
            lines.push(link_line("Next", next));
        }
    }
    lines.push(String::new());
    if let Some(n) = summary.sitemap_urls {
        lines.push(format!("Sitemap: {}", plural(n, "URL", "URLs")));
    }
    if let Some(n) = summary.search_entries {
        lines.push(format!("Search index: {}", plural(n, "entry", "entries")));
    }
    lines.push(format!("Generated {}", plural(summary.pages.len(), "page", "pages")));
    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}
