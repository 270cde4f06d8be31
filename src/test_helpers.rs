//! Shared test utilities for the manuscript-site test suite.
//!
//! Provides the sample manuscript fixture, a config pointing into a temp
//! directory, and lookup helpers that panic with the list of available
//! entries on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (_tmp, config) = sample_site();
//! let summary = build(&config).unwrap();
//!
//! let page = find_page(&summary, "nivel-1/que-es-bitcoin.html");
//! assert!(page.nav.next.is_some());
//! let html = read_page(&config, "nivel-1/que-es-bitcoin.html");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::{ParserConfig, SiteConfig};
use crate::decode;
use crate::generate::{BuildSummary, GeneratedPage};
use crate::parse::BlockParser;
use crate::types::PageRecord;

/// `fixtures/bloques.txt`: four pages across three groups, plus a block
/// without a path.
pub const SAMPLE_MANUSCRIPT: &str = include_str!("../fixtures/bloques.txt");

// =========================================================================
// Fixture setup
// =========================================================================

/// Config reading `root/bloques.txt` and writing to `root/site`.
pub fn sample_config(root: &Path) -> SiteConfig {
    SiteConfig {
        input: root.join("bloques.txt").to_string_lossy().into_owned(),
        output_root: root.join("site").to_string_lossy().into_owned(),
        ..SiteConfig::default()
    }
}

/// Temp directory holding the sample manuscript, and a config for it.
pub fn sample_site() -> (TempDir, SiteConfig) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bloques.txt"), SAMPLE_MANUSCRIPT).unwrap();
    let config = sample_config(tmp.path());
    (tmp, config)
}

/// Records of the sample manuscript under the stock parser config.
pub fn sample_records() -> Vec<PageRecord> {
    let text = decode::decode(SAMPLE_MANUSCRIPT.as_bytes());
    BlockParser::new(&ParserConfig::default()).unwrap().parse(&text)
}

/// Contents of a generated page.
pub fn read_page(config: &SiteConfig, path: &str) -> String {
    let file = config.output_dir().join(path);
    fs::read_to_string(&file).unwrap_or_else(|e| panic!("cannot read {}: {e}", file.display()))
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a parsed record by path. Panics if not found.
pub fn find_record<'a>(records: &'a [PageRecord], path: &str) -> &'a PageRecord {
    records.iter().find(|r| r.path == path).unwrap_or_else(|| {
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        panic!("record '{path}' not found. Available: {paths:?}")
    })
}

/// Find a generated page by path. Panics if not found.
pub fn find_page<'a>(summary: &'a BuildSummary, path: &str) -> &'a GeneratedPage {
    summary.pages.iter().find(|p| p.path == path).unwrap_or_else(|| {
        let paths: Vec<&str> = summary.pages.iter().map(|p| p.path.as_str()).collect();
        panic!("page '{path}' not found. Available: {paths:?}")
    })
}

/// All record paths in manuscript order.
pub fn record_paths(records: &[PageRecord]) -> Vec<&str> {
    records.iter().map(|r| r.path.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_manuscript_parses_into_four_pages() {
        let records = sample_records();
        assert_eq!(
            record_paths(&records),
            vec![
                "nivel-1/que-es-bitcoin.html",
                "nivel-1/como-funciona.html",
                "la-madriguera/el-conejo.html",
                "glosario.html",
            ]
        );
    }

    #[test]
    fn sample_record_fields() {
        let records = sample_records();
        let first = find_record(&records, "nivel-1/que-es-bitcoin.html");
        assert_eq!(first.title, "¿Qué es Bitcoin?");
        assert_eq!(first.subtitle, "Dinero que nadie controla");
        assert_eq!(first.publish_date.as_deref(), Some("2024-05-01"));
        assert_eq!(first.length.as_deref(), Some("8 min"));
        assert!(first.body.starts_with("# El problema del dinero"));
        assert!(first.body.ends_with("Leer el **whitepaper** → /whitepaper.pdf"));

        let conejo = find_record(&records, "la-madriguera/el-conejo.html");
        assert!(!conejo.body.contains("DOCTYPE"));
        assert!(!conejo.body.contains("borrador"));

        let glosario = find_record(&records, "glosario.html");
        assert!(!glosario.body.contains("MADRIGUERA"));
    }

    #[test]
    #[should_panic(expected = "Available")]
    fn find_record_lists_available_on_miss() {
        find_record(&sample_records(), "nope.html");
    }
}
