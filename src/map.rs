//! Codepoint Map - In-memory keyed collection of codepoint records
//!
//! The map is built once by the repertoire loader (or loaded from a keyed-map
//! file) and then lent mutably to one enricher at a time.

use std::collections::HashMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use crate::codepoint::{parse_code, CodepointRecord};
use crate::Error;

/// Mapping from hex code string to record.
///
/// Serializes as a JSON object whose keys appear in ascending numeric order,
/// so the keyed-map file is deterministic.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(try_from = "HashMap<String, CodepointRecord>")]
pub struct CodepointMap {
    records: HashMap<String, CodepointRecord>,
}

impl CodepointMap {
    /// Create a new empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its own code, returning any record it replaced
    pub fn insert(&mut self, record: CodepointRecord) -> Option<CodepointRecord> {
        self.records.insert(record.code.clone(), record)
    }

    /// Get a record by code
    pub fn get(&self, code: &str) -> Option<&CodepointRecord> {
        self.records.get(code)
    }

    /// Get a record by code for in-place enrichment
    pub fn get_mut(&mut self, code: &str) -> Option<&mut CodepointRecord> {
        self.records.get_mut(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.records.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in arbitrary order
    pub fn records(&self) -> impl Iterator<Item = &CodepointRecord> {
        self.records.values()
    }

    /// All records, ascending by numeric code
    pub fn sorted_records(&self) -> Vec<&CodepointRecord> {
        let mut sorted: Vec<&CodepointRecord> = self.records.values().collect();
        sorted.sort_by_key(|r| sort_key(r));
        sorted
    }

    /// Consume the map into records ascending by numeric code
    pub fn into_sorted_records(self) -> Vec<CodepointRecord> {
        let mut sorted: Vec<CodepointRecord> = self.records.into_values().collect();
        sorted.sort_by_key(sort_key);
        sorted
    }

    /// Drop empty optional collections from every record
    pub fn prune_empty(&mut self) {
        for record in self.records.values_mut() {
            record.prune_empty();
        }
    }

    /// Get statistics about the map
    pub fn stats(&self) -> MapStats {
        let mut stats = MapStats {
            records: self.records.len(),
            ..MapStats::default()
        };

        let filled = |slot: &Option<Vec<String>>| slot.as_ref().is_some_and(|v| !v.is_empty());

        for record in self.records.values() {
            stats.tags += filled(&record.tags) as usize;
            stats.notes += filled(&record.notes) as usize;
            stats.comments += filled(&record.comments) as usize;
            stats.index_entries += filled(&record.index_entries) as usize;
            stats.related += filled(&record.related) as usize;
            stats.variants += filled(&record.variants) as usize;
            stats.approximations += filled(&record.approximations) as usize;
            stats.decomposition += filled(&record.decomposition) as usize;
            stats.script_extensions += filled(&record.script_extensions) as usize;
            stats.case_variants +=
                record.case_variants.as_ref().is_some_and(|m| !m.is_empty()) as usize;
        }

        stats
    }
}

/// Unparsable codes sort last, ties broken by the code text.
fn sort_key(record: &CodepointRecord) -> (u32, String) {
    (parse_code(&record.code).unwrap_or(u32::MAX), record.code.clone())
}

impl TryFrom<HashMap<String, CodepointRecord>> for CodepointMap {
    type Error = Error;

    fn try_from(records: HashMap<String, CodepointRecord>) -> Result<Self, Self::Error> {
        if let Some((key, record)) = records.iter().find(|(key, record)| **key != record.code) {
            return Err(Error::InvalidRecord(format!(
                "key {} holds record with code {}",
                key, record.code
            )));
        }
        Ok(Self { records })
    }
}

impl FromIterator<CodepointRecord> for CodepointMap {
    fn from_iter<T: IntoIterator<Item = CodepointRecord>>(iter: T) -> Self {
        let mut map = Self::new();
        for record in iter {
            map.insert(record);
        }
        map
    }
}

impl Serialize for CodepointMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sorted = self.sorted_records();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for record in sorted {
            map.serialize_entry(&record.code, record)?;
        }
        map.end()
    }
}

/// Statistics about a codepoint map: total records and how many carry each
/// optional collection with at least one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapStats {
    pub records: usize,
    pub tags: usize,
    pub notes: usize,
    pub comments: usize,
    pub index_entries: usize,
    pub related: usize,
    pub variants: usize,
    pub approximations: usize,
    pub case_variants: usize,
    pub decomposition: usize,
    pub script_extensions: usize,
}

impl MapStats {
    /// Label/value pairs for table rendering
    pub fn rows(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("Records", self.records),
            ("With tags", self.tags),
            ("With notes", self.notes),
            ("With comments", self.comments),
            ("With index entries", self.index_entries),
            ("With related", self.related),
            ("With variants", self.variants),
            ("With approximations", self.approximations),
            ("With case variants", self.case_variants),
            ("With decomposition", self.decomposition),
            ("With script extensions", self.script_extensions),
        ]
    }
}

impl std::fmt::Display for MapStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Codepoint Map Statistics:")?;
        for (label, value) in self.rows() {
            writeln!(f, "  {}: {}", label, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(code: &str) -> CodepointRecord {
        CodepointRecord::new(code, format!("CHAR {}", code))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut map = CodepointMap::new();
        map.insert(sample("0041"));

        assert!(map.contains("0041"));
        assert!(!map.contains("41"));
        assert_eq!(map.get("0041").unwrap().name, "CHAR 0041");

        map.get_mut("0041").unwrap().name = "RENAMED".to_string();
        assert_eq!(map.get("0041").unwrap().name, "RENAMED");
    }

    #[test]
    fn test_sorted_by_numeric_code() {
        let map: CodepointMap = ["1F600", "00E9", "0041", "FFFD", "10000"]
            .into_iter()
            .map(sample)
            .collect();

        let codes: Vec<String> = map.into_sorted_records().into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["0041", "00E9", "FFFD", "10000", "1F600"]);
    }

    #[test]
    fn test_serializes_in_numeric_key_order() {
        let map: CodepointMap = ["10000", "FFFD", "0041"].into_iter().map(sample).collect();
        let json = serde_json::to_string(&map).unwrap();

        let a = json.find("\"0041\"").unwrap();
        let fffd = json.find("\"FFFD\"").unwrap();
        let linear_b = json.find("\"10000\"").unwrap();
        assert!(a < fffd && fffd < linear_b);
    }

    #[test]
    fn test_deserialize_rejects_mismatched_key() {
        let json = r#"{"0042": {"code": "0041", "name": "A", "title": "A", "age": "1.1",
            "bidi": "L", "block": "ASCII", "category": "Lu", "script": "Latn", "combine": "0"}}"#;
        let err = serde_json::from_str::<CodepointMap>(json).unwrap_err();
        assert!(err.to_string().contains("0042"));
    }

    #[test]
    fn test_stats_counts_non_empty_only() {
        let mut a = sample("0041");
        a.tags = Some(vec!["Uppercase".to_string()]);
        a.comments = Some(Vec::new());
        let mut b = sample("0042");
        b.tags = Some(vec!["Uppercase".to_string()]);
        b.script_extensions = Some(vec!["Latn".to_string()]);

        let map: CodepointMap = [a, b].into_iter().collect();
        let stats = map.stats();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.tags, 2);
        assert_eq!(stats.comments, 0);
        assert_eq!(stats.script_extensions, 1);
        assert!(stats.to_string().contains("Records: 2"));
    }
}
