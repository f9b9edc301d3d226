//! `NamesList.txt` enricher
//!
//! The names list is a cursor format. A line starting with a code selects the
//! current record; the tab-indented lines after it annotate that record:
//!
//! ```text
//! 0041	LATIN CAPITAL LETTER A
//! 	* first letter of the alphabet
//! 	x (latin small letter a - 0061)
//! ```
//!
//! Blank lines and `;` / `@` lines end the current block.

use std::io::BufRead;
use crate::codepoint::append;
use crate::diagnostics::Diagnostics;
use crate::map::CodepointMap;
use crate::Result;
use super::framework::{for_each_line, EnrichStats, Enricher};

/// Descriptions of code lines that have no record on purpose
const PLACEHOLDERS: [&str; 2] = ["<not a character>", "<reserved>"];

#[derive(Debug, Default, Clone, Copy)]
pub struct NamesListEnricher;

impl NamesListEnricher {
    pub fn new() -> Self {
        Self
    }
}

/// Type character and trimmed content of an indented annotation line
fn split_annotation(line: &str) -> (Option<char>, &str) {
    let kind = line.chars().nth(1);
    let content = line
        .char_indices()
        .nth(3)
        .map(|(idx, _)| line[idx..].trim())
        .unwrap_or("");
    (kind, content)
}

impl Enricher for NamesListEnricher {
    fn file_name(&self) -> &str {
        "NamesList.txt"
    }

    fn enrich(
        &self,
        reader: &mut dyn BufRead,
        map: &mut CodepointMap,
        diag: &dyn Diagnostics,
    ) -> Result<EnrichStats> {
        let mut stats = EnrichStats::default();
        let mut current: Option<String> = None;

        stats.lines = for_each_line(reader, |_, line| {
            if line.trim().is_empty() || line.starts_with(';') || line.starts_with('@') {
                current = None;
                return;
            }

            if !line.starts_with('\t') {
                let mut fields = line.split('\t');
                let code = fields.next().unwrap_or_default();
                let description = fields.next().unwrap_or_default();

                if map.contains(code) {
                    current = Some(code.to_string());
                } else {
                    current = None;
                    stats.skipped += 1;
                    if !PLACEHOLDERS.contains(&description) {
                        diag.warn(&format!(
                            "codepoint {} ({}) from NamesList.txt not found in map",
                            code, description
                        ));
                    }
                }
                return;
            }

            let Some(record) = current.as_deref().and_then(|code| map.get_mut(code)) else {
                return;
            };

            let (kind, content) = split_annotation(line);
            let content = content.to_string();
            let applied = match kind {
                Some('*') => {
                    append(&mut record.comments, [content]);
                    true
                }
                Some('=') => {
                    append(&mut record.comments, [format!("Formal Alias: {}", content)]);
                    true
                }
                Some('x') => {
                    append(&mut record.related, [content]);
                    true
                }
                Some('~') => {
                    append(&mut record.variants, [content]);
                    true
                }
                Some('#') => {
                    append(&mut record.approximations, [content]);
                    true
                }
                // '%' records the corrected name, then continues as a ':' line
                Some(c @ ('%' | ':')) => {
                    if c == '%' {
                        append(&mut record.comments, [format!("Corrected name: {}", content)]);
                    }
                    // TODO: merge ':' decomposition lines into `decomposition`
                    c == '%'
                }
                other => {
                    diag.warn(&format!(
                        "unknown names-list line type '{}' for codepoint {}",
                        other.map(String::from).unwrap_or_default(),
                        record.code
                    ));
                    false
                }
            };
            if applied {
                stats.applied += 1;
            }
        })?;

        Ok(stats)
    }
}
