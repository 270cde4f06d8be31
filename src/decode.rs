//! Manuscript decoding with encoding detection and mojibake repair.
//!
//! Manuscripts arrive in whatever encoding the last editor saved them in, and
//! often contain text that was already mis-decoded once (`Ã©` for `é`,
//! `â†’` for `→`). Nothing here fails: every candidate decoding is lossy, and
//! the best one is picked by a character heuristic.
//!
//! ## Candidates
//!
//! The raw bytes are decoded as UTF-8, Windows-1252, and Latin-1. Each
//! decoding is also offered in a [`repair`]ed variant. The candidate with the
//! highest [`legibility_score`] wins; ties go to the earlier candidate, so
//! clean UTF-8 input is returned as is.
//!
//! ## Line-level repair
//!
//! Files edited by several tools can mix clean and corrupted lines. After the
//! whole-file pick, every line gets its own [`repair`] pass. A line only
//! changes when its score does not drop, so the file's total score never
//! goes below the chosen candidate's.

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Characters whose presence suggests UTF-8 read as a single-byte code page.
const MOJIBAKE_HINTS: &[char] = &['Ã', 'Â', 'â'];

/// Known corruption markers, each costing [`CORRUPTION_PENALTY`] points.
const CORRUPTION_MARKERS: &[char] = &['Ã', 'Â', 'â', '\u{FFFD}'];

const CORRUPTION_PENALTY: i64 = 4;

/// Accented letters and Spanish punctuation counted as legible.
const LEGIBLE_EXTRA: &str = "áéíóúüñÁÉÍÓÚÜÑ¿¡";

/// Legibility heuristic: legible characters minus penalized corruption
/// markers.
pub fn legibility_score(text: &str) -> i64 {
    let mut good = 0i64;
    let mut bad = 0i64;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || LEGIBLE_EXTRA.contains(c) {
            good += 1;
        } else if CORRUPTION_MARKERS.contains(&c) {
            bad += 1;
        }
    }
    good - bad * CORRUPTION_PENALTY
}

/// Undo one round of UTF-8-read-as-Windows-1252 corruption.
///
/// The text is re-encoded to single bytes (Latin-1 where the character fits
/// in a byte, otherwise its Windows-1252 byte; unmappable characters are
/// dropped) and decoded again as UTF-8. The result is kept only if it scores
/// at least as well as the input.
pub fn repair(text: &str) -> String {
    if !text.contains(MOJIBAKE_HINTS) {
        return text.to_string();
    }

    let mut bytes = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        if (c as u32) <= 0xFF {
            bytes.push(c as u32 as u8);
            continue;
        }
        let (encoded, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if !unmappable && encoded.len() == 1 {
            bytes.push(encoded[0]);
        }
    }

    let (repaired, _) = UTF_8.decode_without_bom_handling(&bytes);
    if !repaired.is_empty() && legibility_score(&repaired) >= legibility_score(text) {
        repaired.into_owned()
    } else {
        text.to_string()
    }
}

/// Decode raw manuscript bytes into normalized text.
///
/// The result uses `\n` line endings and carries no byte-order mark. Returns
/// an empty string only for empty input.
pub fn decode(bytes: &[u8]) -> String {
    let best = best_candidate(bytes);
    let normalized = best.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .split('\n')
        .map(|line| repair(line.trim_start_matches('\u{FEFF}')))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Candidate decodings in preference order: each encoding, then its repair.
pub fn candidates(bytes: &[u8]) -> Vec<String> {
    let decodings = [
        UTF_8.decode_with_bom_removal(bytes).0.into_owned(),
        WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
        encoding_rs::mem::decode_latin1(bytes).into_owned(),
    ];
    let mut out = Vec::with_capacity(decodings.len() * 2);
    for decoded in decodings {
        let repaired = repair(&decoded);
        out.push(decoded);
        out.push(repaired);
    }
    out
}

fn best_candidate(bytes: &[u8]) -> String {
    let mut best: Option<(i64, String)> = None;
    for candidate in candidates(bytes) {
        let score = legibility_score(&candidate);
        match &best {
            Some((top, _)) if *top >= score => {}
            _ => best = Some((score, candidate)),
        }
    }
    best.map(|(_, text)| text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Known corrupted strings and their intended text.
    const CORPUS: &[(&str, &str)] = &[
        ("informaciÃ³n", "información"),
        ("Â¿QuÃ© es Bitcoin?", "¿Qué es Bitcoin?"),
        ("espaÃ±ol", "español"),
        ("Bloque 3 â†’ /nivel-1/a.html", "Bloque 3 → /nivel-1/a.html"),
        ("â€œcitaâ€\u{9d}", "“cita”"),
        ("Ãšltimo", "Último"),
    ];

    #[test]
    fn repair_fixes_corpus() {
        for (corrupted, expected) in CORPUS {
            assert_eq!(&repair(corrupted), expected, "repairing {corrupted:?}");
        }
    }

    #[test]
    fn repair_leaves_clean_text_alone() {
        assert_eq!(repair("información"), "información");
        assert_eq!(repair("plain ascii"), "plain ascii");
    }

    #[test]
    fn repair_keeps_legitimate_circumflex() {
        // "â" alone is a hint but re-decoding it yields U+FFFD, which scores worse
        assert_eq!(repair("pâté"), "pâté");
    }

    #[test]
    fn score_penalizes_markers() {
        assert!(legibility_score("información") > legibility_score("informaciÃ³n"));
        assert_eq!(legibility_score("ab"), 2);
        assert_eq!(legibility_score("Ã"), -4);
    }

    // =========================================================================
    // decode tests
    // =========================================================================

    #[test]
    fn decode_utf8_passthrough() {
        assert_eq!(decode("Título: ¿Qué?".as_bytes()), "Título: ¿Qué?");
    }

    #[test]
    fn decode_windows_1252_bytes() {
        // "Título" in Windows-1252
        let bytes = b"T\xedtulo espa\xf1ol";
        assert_eq!(decode(bytes), "Título español");
    }

    #[test]
    fn decode_double_encoded_utf8() {
        let bytes = "PÃ\u{81}GINA: informaciÃ³n".as_bytes();
        assert_eq!(decode(bytes), "PÁGINA: información");
    }

    #[test]
    fn decode_normalizes_line_endings_and_bom() {
        let bytes = b"\xEF\xBB\xBFuno\r\ndos\rtres\n";
        assert_eq!(decode(bytes), "uno\ndos\ntres\n");
    }

    #[test]
    fn decode_repairs_mixed_lines() {
        let text = "línea buena\nlÃ­nea mala";
        assert_eq!(decode(text.as_bytes()), "línea buena\nlínea mala");
    }

    #[test]
    fn decode_empty_input() {
        assert_eq!(decode(b""), "");
    }

    #[test]
    fn decode_scores_at_least_every_raw_candidate() {
        let inputs: &[&[u8]] = &[
            "¿Qué es?".as_bytes(),
            b"caf\xe9 con leche",
            "informaciÃ³n".as_bytes(),
            b"\xff\xfe\x00garbage",
        ];
        for bytes in inputs {
            let decoded = decode(bytes);
            assert!(!decoded.is_empty());
            let raw = [
                UTF_8.decode_with_bom_removal(bytes).0.into_owned(),
                WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
                encoding_rs::mem::decode_latin1(bytes).into_owned(),
            ];
            for candidate in raw {
                assert!(legibility_score(&decoded) >= legibility_score(&candidate));
            }
        }
    }
}
