//! Block renderer: a page body → article HTML.
//!
//! Lines are classified one at a time, first match wins:
//!
//! | Line | Block |
//! |---|---|
//! | blank, `===`, `---` | ends the current paragraph |
//! | `[NOTA: ...]` | note callout |
//! | `# Heading` or `**Heading**` | `<h2>` |
//! | `> ...` (consecutive) | callout; first line may be `**CALLOUT WARNING: Title**: lead` |
//! | `- item` (consecutive) | `<ul>` |
//! | `\| a \| b \|` (consecutive) | table, optional `\|---\|` separator row |
//! | anything else | joined with spaces into the current paragraph |
//!
//! Every piece of text goes through the [`InlineRenderer`], so escaping is
//! handled in one place. Blocks are joined with a blank line.

use crate::config::Labels;
use crate::inline::InlineRenderer;
use crate::parse::is_separator_line;
use maud::{Markup, html};
use regex::Regex;
use std::sync::LazyLock;

static CALLOUT_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\*\*CALLOUT\s+([A-Z]+)(?::\s*([^*]+))?\*\*(?::\s*(.*))?$")
        .expect("valid callout regex")
});

static TABLE_SEPARATOR_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[:\-\s]+$").expect("valid table separator regex"));

/// Visual style of a callout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    Info,
    Warning,
    Danger,
    Success,
}

impl CalloutKind {
    /// Parse a kind name case-insensitively. Unknown names are `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "danger" => Some(Self::Danger),
            "success" => Some(Self::Success),
            _ => None,
        }
    }

    pub fn class_suffix(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Success => "success",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "💡",
            Self::Warning => "⚠️",
            Self::Danger => "🚨",
            Self::Success => "✅",
        }
    }

    fn default_title(self, labels: &Labels) -> &str {
        match self {
            Self::Info => &labels.callout_info,
            Self::Warning => &labels.callout_warning,
            Self::Danger => &labels.callout_danger,
            Self::Success => &labels.callout_success,
        }
    }
}

/// Renders page bodies with a fixed inline renderer and label set.
#[derive(Debug, Clone)]
pub struct BodyRenderer {
    inline: InlineRenderer,
    labels: Labels,
}

impl BodyRenderer {
    pub fn new(inline: InlineRenderer, labels: Labels) -> Self {
        Self { inline, labels }
    }

    /// Render a whole page body.
    pub fn render(&self, body: &str) -> String {
        let lines: Vec<&str> = body.lines().map(str::trim).collect();
        let mut out: Vec<Markup> = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if line.is_empty() || is_separator_line(line) {
                self.flush(&mut paragraph, &mut out);
                i += 1;
                continue;
            }

            if line.starts_with("[NOTA:") && line.ends_with(']') {
                self.flush(&mut paragraph, &mut out);
                out.push(self.note(line));
                i += 1;
                continue;
            }

            if let Some(heading) = line.strip_prefix("# ") {
                self.flush(&mut paragraph, &mut out);
                out.push(html! { h2 { (self.inline.render(heading)) } });
                i += 1;
                continue;
            }

            if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
                self.flush(&mut paragraph, &mut out);
                out.push(html! { h2 { (self.inline.render(&line[2..line.len() - 2])) } });
                i += 1;
                continue;
            }

            if line.starts_with('>') {
                self.flush(&mut paragraph, &mut out);
                let run = take_run(&lines, &mut i, |l| l.starts_with('>'));
                if let Some(callout) = self.callout(&run) {
                    out.push(callout);
                }
                continue;
            }

            if line.starts_with("- ") {
                self.flush(&mut paragraph, &mut out);
                let run = take_run(&lines, &mut i, |l| l.starts_with("- "));
                out.push(html! {
                    ul {
                        @for item in &run {
                            li { (self.inline.render(&item[2..])) }
                        }
                    }
                });
                continue;
            }

            if line.starts_with('|') {
                self.flush(&mut paragraph, &mut out);
                let run = take_run(&lines, &mut i, |l| l.starts_with('|'));
                out.push(self.table(&run));
                continue;
            }

            paragraph.push(line);
            i += 1;
        }
        self.flush(&mut paragraph, &mut out);

        out.into_iter()
            .map(Markup::into_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn flush(&self, paragraph: &mut Vec<&str>, out: &mut Vec<Markup>) {
        if paragraph.is_empty() {
            return;
        }
        let joined = paragraph.join(" ");
        out.push(html! { p { (self.inline.render(&joined)) } });
        paragraph.clear();
    }

    /// `[NOTA: ...]` line → info callout titled with the note label.
    fn note(&self, line: &str) -> Markup {
        let content = &line[1..line.len() - 1];
        callout_markup(
            CalloutKind::Info,
            &self.labels.note,
            &[self.inline.render(content.trim())],
        )
    }

    /// Consecutive `>` lines → callout. `None` when every line is empty.
    fn callout(&self, run: &[&str]) -> Option<Markup> {
        let payload: Vec<&str> = run
            .iter()
            .map(|l| l.trim_start_matches('>').trim())
            .filter(|l| !l.is_empty())
            .collect();
        let first = payload.first()?;

        let mut kind = CalloutKind::Info;
        let mut title: Option<String> = None;
        let mut texts: Vec<&str> = Vec::new();

        match CALLOUT_HEAD.captures(first) {
            Some(caps) => {
                if let Some(k) = caps.get(1).and_then(|m| CalloutKind::from_name(m.as_str())) {
                    kind = k;
                }
                title = caps.get(2).map(|m| m.as_str().trim().to_string());
                if let Some(lead) = caps.get(3) {
                    texts.push(lead.as_str().trim());
                }
                texts.extend(&payload[1..]);
            }
            None => texts.extend(&payload),
        }

        let title = title.unwrap_or_else(|| kind.default_title(&self.labels).to_string());
        let paragraphs: Vec<Markup> = texts
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| self.inline.render(t))
            .collect();
        Some(callout_markup(kind, &title, &paragraphs))
    }

    /// Consecutive `|` lines → table. The second row is dropped when every
    /// cell is made of `:`, `-`, and spaces only.
    fn table(&self, run: &[&str]) -> Markup {
        let rows: Vec<Vec<&str>> = run
            .iter()
            .map(|row| row.trim().trim_matches('|').split('|').map(str::trim).collect())
            .collect();

        let has_separator = rows.len() >= 2
            && rows[1]
                .iter()
                .all(|c| TABLE_SEPARATOR_CELL.is_match(if c.is_empty() { "-" } else { c }));
        let headers = rows.first().cloned().unwrap_or_default();
        let body_rows = rows.get(if has_separator { 2 } else { 1 }..).unwrap_or_default();

        html! {
            div.table-wrap {
                table.article-table {
                    thead {
                        tr {
                            @for cell in &headers {
                                th { (self.inline.render(cell)) }
                            }
                        }
                    }
                    tbody {
                        @for row in body_rows {
                            tr {
                                @for cell in row {
                                    td { (self.inline.render(cell)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Collect the run of consecutive lines matching `pred`, advancing `i`.
fn take_run<'a>(lines: &[&'a str], i: &mut usize, pred: impl Fn(&str) -> bool) -> Vec<&'a str> {
    let mut run = Vec::new();
    while *i < lines.len() && pred(lines[*i]) {
        run.push(lines[*i]);
        *i += 1;
    }
    run
}

fn callout_markup(kind: CalloutKind, title: &str, paragraphs: &[Markup]) -> Markup {
    html! {
        div class={ "callout callout--" (kind.class_suffix()) } {
            span.callout__icon aria-hidden="true" { (kind.icon()) }
            div.callout__content {
                div.callout__title { (title) }
                @for text in paragraphs {
                    p.callout__text { (text) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::inline::LinkRewrites;

    fn renderer() -> BodyRenderer {
        let config = SiteConfig::default();
        let rewrites = LinkRewrites::new(&config.rewrites).unwrap();
        BodyRenderer::new(
            InlineRenderer::new(rewrites, config.labels.link.clone()),
            config.labels,
        )
    }

    fn render(body: &str) -> String {
        renderer().render(body)
    }

    #[test]
    fn list_scenario() {
        assert_eq!(render("- one\n- two"), "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn table_drops_separator_row() {
        assert_eq!(
            render("| A | B |\n| - | - |\n| 1 | 2 |"),
            "<div class=\"table-wrap\"><table class=\"article-table\">\
             <thead><tr><th>A</th><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table></div>"
        );
    }

    #[test]
    fn table_without_separator_keeps_second_row() {
        let html = render("| A | B |\n| 1 | 2 |\n| 3 | 4 |");
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn table_alignment_separator() {
        let html = render("| A | B |\n|:---|---:|\n| 1 | 2 |");
        assert_eq!(html.matches("<td>").count(), 2);
        assert!(!html.contains(":---"));
    }

    #[test]
    fn paragraph_lines_are_joined() {
        assert_eq!(render("uno\ndos\n\ntres"), "<p>uno dos</p>\n\n<p>tres</p>");
    }

    #[test]
    fn headings() {
        assert_eq!(render("# Título"), "<h2>Título</h2>");
        assert_eq!(render("**Negrita sola**"), "<h2>Negrita sola</h2>");
    }

    #[test]
    fn bold_inside_text_is_not_a_heading() {
        assert_eq!(render("texto **a**"), "<p>texto <strong>a</strong></p>");
    }

    #[test]
    fn heading_flushes_paragraph() {
        assert_eq!(render("uno\n# Dos\ntres"), "<p>uno</p>\n\n<h2>Dos</h2>\n\n<p>tres</p>");
    }

    #[test]
    fn note_callout() {
        let html = render("[NOTA: revisa **esto**]");
        assert!(html.starts_with(r#"<div class="callout callout--info">"#));
        assert!(html.contains(r#"<div class="callout__title">Nota</div>"#));
        assert!(html.contains("NOTA: revisa <strong>esto</strong>"));
    }

    #[test]
    fn typed_callout_with_title_and_lead() {
        let html = render("> **CALLOUT WARNING: Cuidado**: no compartas tu semilla\n> segunda línea");
        assert!(html.contains("callout--warning"));
        assert!(html.contains("⚠️"));
        assert!(html.contains(r#"<div class="callout__title">Cuidado</div>"#));
        assert!(html.contains(r#"<p class="callout__text">no compartas tu semilla</p>"#));
        assert!(html.contains(r#"<p class="callout__text">segunda línea</p>"#));
    }

    #[test]
    fn callout_kind_defaults_to_info_title() {
        let html = render("> **CALLOUT SUCCESS**\n> hecho");
        assert!(html.contains("callout--success"));
        assert!(html.contains(r#"<div class="callout__title">Exito</div>"#));

        let html = render("> **CALLOUT PURPLE**: x");
        assert!(html.contains("callout--info"));
        assert!(html.contains("Informacion"));
    }

    #[test]
    fn plain_blockquote_is_info_callout() {
        let html = render("> sólo texto");
        assert!(html.contains("callout--info"));
        assert!(html.contains(r#"<p class="callout__text">sólo texto</p>"#));
    }

    #[test]
    fn empty_blockquote_emits_nothing() {
        assert_eq!(render(">\n>"), "");
    }

    #[test]
    fn separators_flush_and_vanish() {
        assert_eq!(render("uno\n---\ndos"), "<p>uno</p>\n\n<p>dos</p>");
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render("<script>alert(\"x\")</script> & más");
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; más</p>"
        );
    }

    #[test]
    fn headings_escape_markup() {
        assert_eq!(
            render("# A <b> & \"c\""),
            "<h2>A &lt;b&gt; &amp; &quot;c&quot;</h2>"
        );
        assert_eq!(render("**x < y & z**"), "<h2>x &lt; y &amp; z</h2>");
    }

    #[test]
    fn list_items_escape_markup() {
        assert_eq!(
            render("- <i>uno</i> & \"dos\""),
            "<ul><li>&lt;i&gt;uno&lt;/i&gt; &amp; &quot;dos&quot;</li></ul>"
        );
    }

    #[test]
    fn table_cells_escape_markup() {
        let html = render("| <a> | \"b\" |\n| - | - |\n| 1 & 2 | <td> |");
        assert!(html.contains("<th>&lt;a&gt;</th>"));
        assert!(html.contains("<th>&quot;b&quot;</th>"));
        assert!(html.contains("<td>1 &amp; 2</td>"));
        assert!(html.contains("<td>&lt;td&gt;</td>"));
    }

    #[test]
    fn callout_title_and_text_escape_markup() {
        let html = render("> **CALLOUT DANGER: <img src=x>**: a & \"b\"\n> <script>");
        assert!(html.contains(r#"<div class="callout__title">&lt;img src=x&gt;</div>"#));
        assert!(html.contains(r#"<p class="callout__text">a &amp; &quot;b&quot;</p>"#));
        assert!(html.contains(r#"<p class="callout__text">&lt;script&gt;</p>"#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn note_escapes_markup() {
        let html = render("[NOTA: usa <b> & \"c\"]");
        assert!(html.contains("NOTA: usa &lt;b&gt; &amp; &quot;c&quot;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn link_label_and_target_are_escaped() {
        let html = render("Ver <x> → /a?b=\"c\"&d");
        assert_eq!(
            html,
            r#"<p><a href="/a?b=&quot;c&quot;&amp;d">Ver &lt;x&gt;</a></p>"#
        );
    }

    #[test]
    fn list_items_render_links() {
        assert_eq!(
            render("- Empieza aquí → /nivel-1/"),
            r#"<ul><li><a href="/nivel-1/">Empieza aquí</a></li></ul>"#
        );
    }

    #[test]
    fn empty_body() {
        assert_eq!(render(""), "");
    }
}
