//! Block parser: decoded manuscript text → [`PageRecord`]s.
//!
//! A manuscript is a sequence of blocks. Each block starts at a marker line
//! (`PÁGINA: nivel-1/que-es-bitcoin.html`), continues with header lines in
//! any order, and ends with a free-form body:
//!
//! ```text
//! PÁGINA: nivel-1/que-es-bitcoin.html
//! TÍTULO: ¿Qué es Bitcoin?
//! META DESCRIPTION: Una introducción sin tecnicismos.
//! ===========================
//!
//! Bitcoin es dinero digital...
//!
//! Bloque 1 completado
//! ```
//!
//! ## Header mode
//!
//! After the marker, blank lines and separator rows are skipped, and
//! `Key: value` lines whose key is a known field synonym are recorded (a
//! repeated key overwrites the earlier value). The first other line starts
//! the body.
//!
//! ## Body
//!
//! The body runs to the next marker line, but stops early at the first line
//! matching a stop pattern (block-completed and end-of-block sentinels,
//! headings of unrelated sections), and is cut at the first truncate marker
//! (an embedded `<!DOCTYPE html>` draft). Separator rows are dropped wherever
//! they appear.
//!
//! Blocks whose marker carries no path are parsed like any other block and
//! dropped at the end, so they still terminate the previous block.

use crate::config::{ConfigError, ParserConfig};
use crate::naming;
use crate::types::PageRecord;
use regex::Regex;
use std::sync::LazyLock;

/// A row of `=` (optionally with a caption, `=== Bloque 2 ===`) or of `-`.
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:={3,}.*|-{3,}\s*)$").expect("valid separator regex"));

/// Whether a line is a pure separator row.
pub fn is_separator_line(line: &str) -> bool {
    SEPARATOR.is_match(line)
}

/// Normalize a header key: diacritics stripped, lowercased, words joined
/// with `-` (`META DESCRIPTION` → `meta-description`, `PÁGINA` → `pagina`).
pub fn normalize_key(key: &str) -> String {
    slug::slugify(key)
}

/// Split a `Key: value` line.
///
/// The key must be made of letters, spaces, `-`, or `_` only, so URLs and
/// prose like `Paso 1: ...` never read as headers.
pub fn split_header(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.trim().split_once(':')?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '_')) {
        return None;
    }
    Some((normalize_key(key), value.trim()))
}

/// Header field a normalized key maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    MetaDescription,
    Subtitle,
    PublishDate,
    Length,
}

/// Parser compiled from a [`ParserConfig`].
#[derive(Debug, Clone)]
pub struct BlockParser {
    markers: Vec<String>,
    fields: Vec<(String, Field)>,
    stop_patterns: Vec<Regex>,
    truncate_markers: Vec<String>,
}

impl BlockParser {
    pub fn new(config: &ParserConfig) -> Result<Self, ConfigError> {
        let synonyms = [
            (&config.fields.title, Field::Title),
            (&config.fields.meta_description, Field::MetaDescription),
            (&config.fields.subtitle, Field::Subtitle),
            (&config.fields.publish_date, Field::PublishDate),
            (&config.fields.length, Field::Length),
        ];
        let fields = synonyms
            .iter()
            .flat_map(|(keys, field)| keys.iter().map(|k| (normalize_key(k), *field)))
            .collect();
        let stop_patterns = config
            .stop_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            markers: config.block_markers.iter().map(|m| normalize_key(m)).collect(),
            fields,
            stop_patterns,
            truncate_markers: config
                .truncate_markers
                .iter()
                .filter(|m| !m.is_empty())
                .cloned()
                .collect(),
        })
    }

    /// Path value of a marker line, `Some("")` for a marker without a path.
    fn marker_value<'a>(&self, line: &'a str) -> Option<&'a str> {
        split_header(line)
            .filter(|(key, _)| self.markers.contains(key))
            .map(|(_, value)| value)
    }

    fn field_of(&self, key: &str) -> Option<Field> {
        self.fields
            .iter()
            .find(|(synonym, _)| synonym == key)
            .map(|(_, field)| *field)
    }

    /// Parse decoded manuscript text into page records, in manuscript order.
    pub fn parse(&self, text: &str) -> Vec<PageRecord> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim_start_matches('\u{FEFF}'))
            .collect();

        let mut starts: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.marker_value(line).is_some())
            .map(|(i, _)| i)
            .collect();
        starts.push(lines.len());

        let records: Vec<PageRecord> = starts
            .windows(2)
            .map(|w| self.parse_block(&lines[w[0]..w[1]]))
            .collect();

        let total = records.len();
        let kept: Vec<PageRecord> = records.into_iter().filter(|r| !r.path.is_empty()).collect();
        if kept.len() < total {
            log::debug!("Dropped {} block(s) without a path", total - kept.len());
        }
        kept
    }

    fn parse_block(&self, chunk: &[&str]) -> PageRecord {
        let declared = chunk
            .first()
            .and_then(|line| self.marker_value(line))
            .map(naming::normalize_path)
            .unwrap_or_default();
        let path = if declared.is_empty() || naming::stays_under_root(&declared) {
            declared
        } else {
            log::warn!("Ignoring page path outside the output root: {declared}");
            String::new()
        };
        let mut record = PageRecord {
            path,
            ..PageRecord::default()
        };

        let mut body_start = 1;
        for (j, raw) in chunk.iter().enumerate().skip(1) {
            let line = raw.trim();
            if line.is_empty() || is_separator_line(line) {
                continue;
            }
            match split_header(line).and_then(|(key, value)| Some((self.field_of(&key)?, value))) {
                Some((field, value)) => {
                    let value = value.to_string();
                    match field {
                        Field::Title => record.title = value,
                        Field::MetaDescription => record.meta_description = value,
                        Field::Subtitle => record.subtitle = value,
                        Field::PublishDate => record.publish_date = Some(value),
                        Field::Length => record.length = Some(value),
                    }
                    body_start = j + 1;
                }
                None => {
                    body_start = j;
                    break;
                }
            }
        }

        record.body = self.collect_body(chunk.get(body_start..).unwrap_or_default());
        record
    }

    fn collect_body(&self, lines: &[&str]) -> String {
        let mut body: Vec<&str> = Vec::new();
        for raw in lines {
            let line = raw.trim_end();
            if self.stop_patterns.iter().any(|p| p.is_match(line)) {
                break;
            }
            if let Some(cut) = self
                .truncate_markers
                .iter()
                .filter_map(|m| line.find(m.as_str()))
                .min()
            {
                body.push(&line[..cut]);
                break;
            }
            if is_separator_line(line) {
                continue;
            }
            body.push(line);
        }
        body.join("\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> BlockParser {
        BlockParser::new(&ParserConfig::default()).unwrap()
    }

    #[test]
    fn normalize_key_strips_diacritics() {
        assert_eq!(normalize_key("PÁGINA"), "pagina");
        assert_eq!(normalize_key("META DESCRIPTION"), "meta-description");
        assert_eq!(normalize_key("Subtítulo"), "subtitulo");
    }

    #[test]
    fn split_header_rejects_urls_and_numbered_prose() {
        assert!(split_header("https://bitcoin.org/bitcoin.pdf").is_none());
        assert!(split_header("Paso 1: instala la billetera").is_none());
        assert_eq!(
            split_header("TÍTULO: Hola: mundo"),
            Some(("titulo".to_string(), "Hola: mundo"))
        );
    }

    #[test]
    fn separator_lines() {
        assert!(is_separator_line("====="));
        assert!(is_separator_line("=== Bloque 2 ==="));
        assert!(is_separator_line("  ---  "));
        assert!(!is_separator_line("- item"));
        assert!(!is_separator_line("| - | - |"));
    }

    #[test]
    fn parses_end_to_end_scenario() {
        let records = parser().parse("PAGINA: demo/x.html\nTITULO: Hello\n\n- one\n- two\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "demo/x.html");
        assert_eq!(records[0].title, "Hello");
        assert_eq!(records[0].body, "- one\n- two");
    }

    #[test]
    fn parses_all_header_fields_in_any_order() {
        let text = "\
PÁGINA: base/x.html
FECHA: 2024-03-01
SUBTÍTULO: Sub
META DESCRIPTION: Meta
LONGITUD: 8 min
TÍTULO: Title
==========

Body line";
        let r = &parser().parse(text)[0];
        assert_eq!(r.title, "Title");
        assert_eq!(r.meta_description, "Meta");
        assert_eq!(r.subtitle, "Sub");
        assert_eq!(r.publish_date.as_deref(), Some("2024-03-01"));
        assert_eq!(r.length.as_deref(), Some("8 min"));
        assert_eq!(r.body, "Body line");
    }

    #[test]
    fn last_repeated_header_wins() {
        let r = &parser().parse("PAGINA: a.html\nTITULO: first\nTITULO: second\nbody")[0];
        assert_eq!(r.title, "second");
    }

    #[test]
    fn one_record_per_block() {
        let text = "PAGINA: a.html\nTITULO: A\nalpha\nPAGINA: b.html\nTITULO: B\nbeta\n";
        let records = parser().parse(text);
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a.html", "b.html"]);
        assert_eq!(records[0].body, "alpha");
        assert_eq!(records[1].body, "beta");
    }

    #[test]
    fn block_completed_sentinel_ends_body() {
        let text = "PAGINA: a.html\nuno\nBloque 3 completado\ntexto suelto\n";
        assert_eq!(parser().parse(text)[0].body, "uno");
    }

    #[test]
    fn end_of_block_sentinel_ends_body() {
        let text = "PAGINA: a.html\nuno\nFIN DEL BLOQUE\ndos\n";
        assert_eq!(parser().parse(text)[0].body, "uno");
    }

    #[test]
    fn unrelated_section_heading_ends_body() {
        let text = "PAGINA: a.html\nuno\n## LA MADRIGUERA\nmenu\n";
        assert_eq!(parser().parse(text)[0].body, "uno");
    }

    #[test]
    fn embedded_html_document_truncates_body() {
        let text = "PAGINA: a.html\nuno\ndos <!DOCTYPE html><html>\n<body></body>\n";
        assert_eq!(parser().parse(text)[0].body, "uno\ndos");
    }

    #[test]
    fn separator_rows_dropped_from_body() {
        let text = "PAGINA: a.html\nuno\n---\ndos\n=====\ntres";
        assert_eq!(parser().parse(text)[0].body, "uno\ndos\ntres");
    }

    #[test]
    fn block_without_path_is_dropped_but_terminates_previous() {
        let text = "PAGINA: a.html\nuno\nPAGINA:\nhuérfano\nPAGINA: b.html\ndos";
        let records = parser().parse(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body, "uno");
        assert_eq!(records[1].path, "b.html");
    }

    #[test]
    fn text_before_first_marker_is_ignored() {
        let records = parser().parse("Notas sueltas\n\nPAGINA: a.html\nuno");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, "uno");
    }

    #[test]
    fn header_keys_after_body_start_are_body_text() {
        let r = &parser().parse("PAGINA: a.html\nuno\nTITULO: no\n")[0];
        assert_eq!(r.title, "");
        assert_eq!(r.body, "uno\nTITULO: no");
    }

    #[test]
    fn marker_path_normalization() {
        let records = parser().parse("PÁGINA: /base/x.html\nuno\nPagina: nivel-1\\y.html\ndos");
        assert_eq!(records[0].path, "base/x.html");
        assert_eq!(records[1].path, "nivel-1/y.html");
    }

    #[test]
    fn key_value_prose_in_body_does_not_start_a_page() {
        let records = parser().parse(
            "PAGINA: nivel-3/xpub.html\nTITULO: Xpub\nLa cartera usa esta derivacion.\n\
             Ruta: m/84'/0'/0'\nArchivo: cartera.dat\nY luego sigue el texto.\n",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "nivel-3/xpub.html");
        assert_eq!(
            records[0].body,
            "La cartera usa esta derivacion.\nRuta: m/84'/0'/0'\nArchivo: cartera.dat\nY luego sigue el texto."
        );
    }

    #[test]
    fn meta_prefixed_first_line_is_body() {
        let r = &parser().parse("PAGINA: a.html\nMeta: ahorrar en bitcoin\n")[0];
        assert_eq!(r.meta_description, "");
        assert_eq!(r.body, "Meta: ahorrar en bitcoin");
    }

    #[test]
    fn paths_leaving_the_output_root_are_dropped() {
        let records = parser().parse(
            "PAGINA: ../fuera.html\nx\nPAGINA: nivel-1/../../fuera.html\ny\n\
             PAGINA: C:/fuera.html\nz\nPAGINA: ok.html\nw",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "ok.html");
        assert_eq!(records[0].body, "w");
    }

    #[test]
    fn custom_vocabulary() {
        let config = ParserConfig {
            block_markers: vec!["page".to_string()],
            stop_patterns: vec![r"^END$".to_string()],
            ..ParserConfig::default()
        };
        let parser = BlockParser::new(&config).unwrap();
        let records = parser.parse("PAGE: a.html\nTitle: A\nx\nEND\ny\nPAGINA: b.html");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].body, "x");
    }
}
