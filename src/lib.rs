//! # Manuscript Site
//!
//! Converts one semi-structured plain-text manuscript into the static HTML
//! pages of a site. The manuscript mixes metadata headers, a small
//! markdown-like dialect, and leftover HTML drafts, and may arrive in any
//! Western encoding, often partly mis-decoded by an earlier editor.
//!
//! # Architecture: One Linear Pass
//!
//! ```text
//! bytes ──decode──▶ text ──parse──▶ PageRecords ──navigation──▶ PageNav per page
//!                                        │                          │
//!                                        └──render + template───────┴──▶ output_root/<path>
//! ```
//!
//! Nothing outlives a run. Every stage is a plain function or a small struct
//! built from configuration, so tests substitute any lookup table without
//! touching global state.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`decode`] | Encoding detection and mojibake repair |
//! | [`parse`] | Splits decoded text into [`types::PageRecord`]s |
//! | [`inline`] | Bold spans, `label → /path` links, link-target rewrites |
//! | [`render`] | Headings, paragraphs, lists, tables, callouts, notes |
//! | [`navigation`] | Previous/next links and their titles |
//! | [`generate`] | Page shell (Maud) and the build pipeline |
//! | [`sitemap`] | `sitemap.xml` from the output tree |
//! | [`search`] | Client-side search index from the output tree |
//! | [`og_image`] | Social preview PNG |
//! | [`config`] | `site.toml` loading, merging, and validation |
//! | [`naming`] | Page-path conventions: group, slug, route, asset prefix |
//! | [`types`] | Shared data model |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Tolerant Input, Strict Output
//!
//! Decoding never fails and malformed blocks are dropped, not reported. The
//! only hard failure on the input side is a manuscript with no page records
//! at all. Output, on the other hand, is always escaped: raw `<`, `>`, `&`,
//! and `"` in the manuscript reach the page as text, never as markup.
//!
//! ## Configuration Over Constants
//!
//! Header-field synonyms, body sentinels, link rewrites, section metadata,
//! navigation orderings, and UI labels all live in `site.toml`, with the
//! stock values compiled in. One configurable pipeline covers manuscripts
//! that differ only in vocabulary.

pub mod config;
pub mod decode;
pub mod generate;
pub mod inline;
pub mod naming;
pub mod navigation;
pub mod og_image;
pub mod output;
pub mod parse;
pub mod render;
pub mod search;
pub mod sitemap;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
