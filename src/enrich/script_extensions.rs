//! `ScriptExtensions.txt` enricher
//!
//! ```text
//! 0640          ; Adlm Arab Mand Mani Ougr Phlp Rohg Sogd Syrc # Lm  ARABIC TATWEEL
//! 1CD0..1CD2    ; Beng Deva Gran Knda   # Mn   [3] VEDIC TONE KARSHANA..
//! ```
//!
//! Every codepoint of the (inclusive) range gets all listed scripts appended
//! to `scriptExtensions`. Overlapping lines accumulate; nothing is deduplicated.

use std::io::BufRead;
use std::ops::RangeInclusive;
use crate::codepoint::{append, format_code, parse_code};
use crate::diagnostics::Diagnostics;
use crate::map::CodepointMap;
use crate::Result;
use super::framework::{for_each_line, EnrichStats, Enricher};

#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptExtensionEnricher;

impl ScriptExtensionEnricher {
    pub fn new() -> Self {
        Self
    }
}

/// Parse `0041` or `0041..005A` into an inclusive range
fn parse_range(codes: &str) -> Result<RangeInclusive<u32>> {
    match codes.split_once("..") {
        Some((start, end)) => Ok(parse_code(start)?..=parse_code(end)?),
        None => {
            let cp = parse_code(codes)?;
            Ok(cp..=cp)
        }
    }
}

impl Enricher for ScriptExtensionEnricher {
    fn file_name(&self) -> &str {
        "ScriptExtensions.txt"
    }

    fn enrich(
        &self,
        reader: &mut dyn BufRead,
        map: &mut CodepointMap,
        diag: &dyn Diagnostics,
    ) -> Result<EnrichStats> {
        let mut stats = EnrichStats::default();

        stats.lines = for_each_line(reader, |line_no, line| {
            if line.trim().is_empty() || line.starts_with('#') {
                return;
            }

            let fields: Vec<&str> = line.split(';').collect();
            if fields.len() < 2 {
                diag.warn(&format!("skipping malformed line {}: {}", line_no, line));
                stats.skipped += 1;
                return;
            }

            let codes = fields[0].trim();
            let scripts: Vec<String> = fields[1]
                .split('#')
                .next()
                .unwrap_or_default()
                .split_whitespace()
                .map(str::to_string)
                .collect();

            let range = match parse_range(codes) {
                Ok(range) => range,
                Err(e) => {
                    diag.warn(&format!("skipping malformed line {}: {}", line_no, e));
                    stats.skipped += 1;
                    return;
                }
            };

            diag.debug(&format!(
                "processing codepoints {} ({}-{}) for scripts {}",
                codes,
                range.start(),
                range.end(),
                scripts.join(", ")
            ));

            for cp in range {
                let code = format_code(cp);
                let Some(record) = map.get_mut(&code) else {
                    diag.warn(&format!("codepoint {} from ScriptExtensions.txt not found in map", code));
                    stats.skipped += 1;
                    continue;
                };
                append(&mut record.script_extensions, scripts.iter().cloned());
                stats.applied += 1;
            }
        })?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codepoint::CodepointRecord;
    use crate::diagnostics::{DiagnosticLevel, RecordingDiagnostics};
    use std::io::Cursor;

    fn run(text: &str, map: &mut CodepointMap) -> (EnrichStats, RecordingDiagnostics) {
        let diag = RecordingDiagnostics::new();
        let stats = ScriptExtensionEnricher::new()
            .enrich(&mut Cursor::new(text.as_bytes().to_vec()), map, &diag)
            .unwrap();
        (stats, diag)
    }

    fn sample_map(codes: &[&str]) -> CodepointMap {
        codes
            .iter()
            .map(|c| CodepointRecord::new(*c, format!("CHAR {}", c)))
            .collect()
    }

    fn scripts(map: &CodepointMap, code: &str) -> Vec<String> {
        map.get(code).unwrap().script_extensions.clone().unwrap_or_default()
    }

    #[test]
    fn test_range_expansion() {
        let mut map = sample_map(&["0041", "0042", "0043", "0044"]);
        let (stats, diag) = run("0041..0043 ; Latn Grek # comment\n", &mut map);

        for code in ["0041", "0042", "0043"] {
            assert_eq!(scripts(&map, code), vec!["Latn", "Grek"]);
        }
        assert!(map.get("0044").unwrap().script_extensions.is_none());
        assert_eq!(stats.applied, 3);
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_single_codepoint_and_supplementary_formatting() {
        let mut map = sample_map(&["0640", "10AF2"]);
        run("0640 ; Arab Syrc # Lm ARABIC TATWEEL\n10AF2 ; Arab Mani\n", &mut map);

        assert_eq!(scripts(&map, "0640"), vec!["Arab", "Syrc"]);
        assert_eq!(scripts(&map, "10AF2"), vec!["Arab", "Mani"]);
    }

    #[test]
    fn test_overlapping_lines_accumulate_without_dedup() {
        let mut map = sample_map(&["0951", "0952"]);
        run("0951..0952 ; Beng Deva\n0951 ; Deva Taml\n", &mut map);

        assert_eq!(scripts(&map, "0951"), vec!["Beng", "Deva", "Deva", "Taml"]);
        assert_eq!(scripts(&map, "0952"), vec!["Beng", "Deva"]);
    }

    #[test]
    fn test_missing_codepoints_warn_without_heuristic() {
        let mut map = sample_map(&["0041"]);
        let (stats, diag) = run("0040..0041 ; Latn\n", &mut map);

        assert_eq!(stats.applied, 1);
        assert_eq!(stats.skipped, 1);
        assert!(diag.contains(DiagnosticLevel::Warn, "codepoint 0040 from ScriptExtensions.txt"));
    }

    #[test]
    fn test_comments_and_malformed_lines() {
        let mut map = sample_map(&["0041"]);
        let text = "# ScriptExtensions-15.1.0.txt\n\n0041 Latn\nZZZZ ; Latn\n";
        let (stats, diag) = run(text, &mut map);

        assert_eq!(stats.lines, 4);
        assert_eq!(stats.skipped, 2);
        assert_eq!(diag.warnings().len(), 2);
        assert!(map.get("0041").unwrap().script_extensions.is_none());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0041").unwrap(), 0x41..=0x41);
        assert_eq!(parse_range("1CD0..1CD2").unwrap(), 0x1CD0..=0x1CD2);
        assert!(parse_range("1CD0..").is_err());
    }
}
