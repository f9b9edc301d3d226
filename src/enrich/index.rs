//! `Index.txt` enricher
//!
//! Tab-separated lines of `label<TAB>code`; each label is appended to the
//! record's `indexEntries` in file order.

use std::io::BufRead;
use crate::codepoint::append;
use crate::diagnostics::Diagnostics;
use crate::map::CodepointMap;
use crate::Result;
use super::framework::{for_each_line, EnrichStats, Enricher};

/// Codes in the file that are jokes rather than codepoints
const JOKE_CODES: [&str; 3] = ["BOOP", "DOOD", "DEAF"];

#[derive(Debug, Default, Clone, Copy)]
pub struct IndexEnricher;

impl IndexEnricher {
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for IndexEnricher {
    fn file_name(&self) -> &str {
        "Index.txt"
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

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 2 {
                diag.warn(&format!("skipping malformed line {}: {}", line_no, line));
                stats.skipped += 1;
                return;
            }
            let (label, code) = (fields[0], fields[1]);

            if JOKE_CODES.contains(&code) {
                stats.skipped += 1;
                return;
            }

            let Some(record) = map.get_mut(code) else {
                // A trailing 0 usually marks the start of a range left out of the map
                if !code.ends_with('0') {
                    diag.warn(&format!("codepoint {} from Index.txt not found in map", code));
                }
                stats.skipped += 1;
                return;
            };

            append(&mut record.index_entries, [label.to_string()]);
            stats.applied += 1;
        })?;

        Ok(stats)
    }
}
