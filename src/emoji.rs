//! Emoji table - `emoji-test.txt` and `emoji-data.txt` merged into `emoji.json`
//!
//! Keys are lowercase codepoint sequences joined by `_`, with `FE0F`
//! variation selectors dropped, so the fully-qualified and unqualified forms
//! of an emoji share one entry:
//!
//! ```text
//! 263A FE0F ; fully-qualified     # ☺️ E0.6 smiling face      -> "263a"
//! 231A..231B ; Emoji              # E0.6 [2] (⌚..⌛) watch..   -> "231a", "231b"
//! ```
//!
//! `emoji-test.txt` creates the named entries. `emoji-data.txt` then adds a
//! `property` set to every codepoint it lists, creating `component-only`
//! entries for codepoints the test file never named.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use crate::codepoint::parse_code;
use crate::diagnostics::Diagnostics;
use crate::enrich::for_each_line;
use crate::{Error, Result};

pub const EMOJI_TEST_FILE: &str = "emoji-test.txt";
pub const EMOJI_DATA_FILE: &str = "emoji-data.txt";
pub const EMOJI_FILE: &str = "emoji.json";

const VARIATION_SELECTOR: &str = " FE0F";
const COMPONENT_ONLY: &str = "component-only";

/// One emoji, keyed in [`EmojiTable`] by its `_`-joined codepoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EmojiEntry {
    /// Space separated lowercase codepoints, `FE0F` removed
    pub codepoints: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chars: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handles: Vec<String>,
    /// `_`-joined codepoints of the fully-qualified form, `FE0F` included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_qualified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<IndexMap<String, bool>>,
}

/// Entries in first-seen order
pub type EmojiTable = IndexMap<String, EmojiEntry>;

/// Counters for one emoji source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmojiStats {
    pub lines: usize,
    /// Emoji (or codepoints, for ranges) processed
    pub emoji: usize,
    /// Entries created by this file
    pub added: usize,
    /// Data lines that did not match the file format
    pub unmatched: usize,
}

impl std::fmt::Display for EmojiStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lines, {} emoji, {} added, {} unmatched",
            self.lines, self.emoji, self.added, self.unmatched
        )
    }
}

/// Lowercase hex; four digits minimum inside the BMP
fn to_hex(cp: u32) -> String {
    if cp > 0xFFFF {
        format!("{:x}", cp)
    } else {
        format!("{:04x}", cp)
    }
}

fn group<'h>(caps: &Captures<'h>, idx: usize) -> &'h str {
    caps.get(idx).map_or("", |m| m.as_str())
}

/// Line parsers for both emoji files
pub struct EmojiReader {
    test_line: Regex,
    data_line: Regex,
    handle_separator: Regex,
}

impl EmojiReader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            test_line: Regex::new(r"([A-F0-9 ]+);([-a-z ]+)# ([^ ]+) E([^ ]+) (.*)$")?,
            data_line: Regex::new(r"([.A-F0-9 ]+);([-A-Za-z_ ]+)# +([^ ]+) (.*)$")?,
            handle_separator: Regex::new(r"[^a-z]+")?,
        })
    }

    /// `grinning face with big eyes` -> `grinning_face_with_big_eyes`
    pub fn to_handle(&self, name: &str) -> String {
        let lowered = name.trim().to_lowercase();
        self.handle_separator
            .replace_all(&lowered, "_")
            .trim_matches('_')
            .to_string()
    }

    /// Read `emoji-test.txt` lines. The first line for a key names the entry.
    pub fn read_test(
        &self,
        reader: &mut dyn BufRead,
        table: &mut EmojiTable,
        diag: &dyn Diagnostics,
    ) -> Result<EmojiStats> {
        let mut stats = EmojiStats::default();

        stats.lines = for_each_line(reader, |line_no, raw| {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                return;
            }
            stats.emoji += 1;

            let Some(caps) = self.test_line.captures(line) else {
                diag.error(&format!("no match on line {} ('{}')", line_no, line));
                stats.unmatched += 1;
                return;
            };

            let sequence = group(&caps, 1);
            let codepoints = sequence.replace(VARIATION_SELECTOR, "").trim().to_lowercase();
            let key = codepoints.replace(' ', "_");

            if !table.contains_key(&key) {
                let name = group(&caps, 5).to_string();
                table.insert(
                    key.clone(),
                    EmojiEntry {
                        codepoints,
                        version: Some(group(&caps, 4).to_string()),
                        handles: vec![self.to_handle(&name)],
                        names: vec![name],
                        ..EmojiEntry::default()
                    },
                );
                stats.added += 1;
            }

            if sequence.contains(VARIATION_SELECTOR) {
                if let Some(entry) = table.get_mut(&key) {
                    entry.fully_qualified = Some(sequence.trim().to_lowercase().replace(' ', "_"));
                }
            }
        })?;

        Ok(stats)
    }

    /// Read `emoji-data.txt` lines, expanding `..` ranges per codepoint.
    pub fn read_data(
        &self,
        reader: &mut dyn BufRead,
        table: &mut EmojiTable,
        diag: &dyn Diagnostics,
    ) -> Result<EmojiStats> {
        let mut stats = EmojiStats::default();

        stats.lines = for_each_line(reader, |line_no, raw| {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                return;
            }

            let Some(caps) = self.data_line.captures(line) else {
                diag.error(&format!("no match on line {} ('{}')", line_no, line));
                stats.unmatched += 1;
                return;
            };

            // E0.0 marks codepoints that are not emoji yet
            let version = group(&caps, 3);
            if version.starts_with("E0.0") {
                return;
            }
            let version = version.strip_prefix('E').unwrap_or(version).to_string();
            let property = group(&caps, 2).trim().to_string();

            let codes = group(&caps, 1).trim();
            let codepoints = match codes.split_once("..") {
                None => vec![codes.to_lowercase()],
                Some((start, end)) => match (parse_code(start), parse_code(end)) {
                    (Ok(start), Ok(end)) => (start..=end).map(to_hex).collect(),
                    _ => {
                        diag.error(&format!("bad range on line {} ('{}')", line_no, line));
                        stats.unmatched += 1;
                        return;
                    }
                },
            };

            for cp in codepoints {
                stats.emoji += 1;
                if !table.contains_key(&cp) {
                    let chars = u32::from_str_radix(&cp, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .map(String::from);
                    table.insert(
                        cp.clone(),
                        EmojiEntry {
                            codepoints: cp.clone(),
                            chars,
                            status: Some(COMPONENT_ONLY.to_string()),
                            ..EmojiEntry::default()
                        },
                    );
                    stats.added += 1;
                }

                if let Some(entry) = table.get_mut(&cp) {
                    entry
                        .property
                        .get_or_insert_with(IndexMap::new)
                        .insert(property.clone(), true);
                    entry.version = Some(version.clone());
                }
            }
        })?;

        Ok(stats)
    }
}

fn read_file<F>(path: &Path, diag: &dyn Diagnostics, read: F) -> Result<EmojiStats>
where
    F: FnOnce(&mut dyn BufRead) -> Result<EmojiStats>,
{
    if !path.exists() {
        return Err(Error::MissingSource(path.to_path_buf()));
    }

    diag.info(&format!("processing file '{}'", path.display()));
    let mut reader = BufReader::new(File::open(path)?);
    let stats = read(&mut reader)?;
    diag.info(&format!("complete {} ({})", path.display(), stats));
    Ok(stats)
}

/// Build the table from both files in `data_dir`, test file first.
pub fn build_emoji_table(
    data_dir: &Path,
    diag: &dyn Diagnostics,
) -> Result<(EmojiTable, Vec<(String, EmojiStats)>)> {
    let reader = EmojiReader::new()?;
    let mut table = EmojiTable::new();

    let test_stats = read_file(&data_dir.join(EMOJI_TEST_FILE), diag, |r| {
        reader.read_test(r, &mut table, diag)
    })?;
    diag.info(&format!("total emoji: {}", table.len()));

    let data_stats = read_file(&data_dir.join(EMOJI_DATA_FILE), diag, |r| {
        reader.read_data(r, &mut table, diag)
    })?;
    diag.info(&format!("total emoji: {}", table.len()));

    Ok((
        table,
        vec![
            (EMOJI_TEST_FILE.to_string(), test_stats),
            (EMOJI_DATA_FILE.to_string(), data_stats),
        ],
    ))
}

/// Write the table as pretty JSON in first-seen order.
pub fn save_emoji_table(table: &EmojiTable, path: &Path, diag: &dyn Diagnostics) -> Result<()> {
    diag.info(&format!("saving to file '{}'", path.display()));
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, table)?;
    writer.flush()?;

    diag.info(&format!("save complete: {} emoji", table.len()));
    Ok(())
}
