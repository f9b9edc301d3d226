//! Codepoint records - the canonical per-codepoint structure
//!
//! Every record is created once by the repertoire pass (or loaded from a
//! previously written keyed map) and afterwards only grows: enrichers append
//! to its optional collections in place.
//!
//! Codes are uppercase hexadecimal strings without a `U+` prefix, padded to
//! at least four digits: `0041`, `1F600`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Case mapping kinds carried in `caseVariants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    Uppercase,
    Lowercase,
    Titlecase,
}

impl CaseKind {
    /// Get the string representation of the case kind
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseKind::Uppercase => "uppercase",
            CaseKind::Lowercase => "lowercase",
            CaseKind::Titlecase => "titlecase",
        }
    }

    /// Get all case kinds
    pub fn all() -> &'static [CaseKind] {
        &[CaseKind::Uppercase, CaseKind::Lowercase, CaseKind::Titlecase]
    }
}

impl FromStr for CaseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "uppercase" | "upper" | "uc" => Ok(CaseKind::Uppercase),
            "lowercase" | "lower" | "lc" => Ok(CaseKind::Lowercase),
            "titlecase" | "title" | "tc" => Ok(CaseKind::Titlecase),
            _ => Err(Error::InvalidRecord(format!("Unknown case kind: {}", s))),
        }
    }
}

impl std::fmt::Display for CaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format a numeric codepoint as a record key (`0x41` -> `0041`).
pub fn format_code(value: u32) -> String {
    format!("{:04X}", value)
}

/// Parse a hexadecimal code string into its numeric value.
pub fn parse_code(code: &str) -> Result<u32> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidCode(code.to_string()));
    }
    u32::from_str_radix(trimmed, 16).map_err(|_| Error::InvalidCode(code.to_string()))
}

/// Check that a string is a well-formed record key: uppercase hex, 4+ digits.
pub fn is_canonical_code(code: &str) -> bool {
    code.len() >= 4 && code.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
}

/// One entry per Unicode codepoint.
///
/// Optional collections are `None` when the source never populated them and
/// `Some(vec![])` when a stage created them empty. The keyed map keeps the
/// empty ones; [`CodepointRecord::prune_empty`] drops them before the line
/// stream is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodepointRecord {
    /// Hex code, also the record's key in the map
    pub code: String,
    /// Display name, never empty once resolved
    pub name: String,
    /// Display variant, the Unicode 1.0 name when there is one
    pub title: String,
    /// Unicode version that introduced the codepoint
    pub age: String,
    /// Bidirectional category
    pub bidi: String,
    /// Block name
    pub block: String,
    /// General category
    pub category: String,
    /// Primary script
    pub script: String,
    /// Canonical combining class
    pub combine: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_entries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_variants: Option<BTreeMap<CaseKind, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decomposition: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_extensions: Option<Vec<String>>,
}

impl CodepointRecord {
    /// Create a record with only its identity set
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: code.into(),
            title: name.clone(),
            name,
            age: String::new(),
            bidi: String::new(),
            block: String::new(),
            category: String::new(),
            script: String::new(),
            combine: String::new(),
            tags: None,
            notes: None,
            comments: None,
            index_entries: None,
            related: None,
            variants: None,
            approximations: None,
            case_variants: None,
            decomposition: None,
            mirror: None,
            oldname: None,
            script_extensions: None,
        }
    }

    /// Numeric value of the code
    pub fn numeric_code(&self) -> Result<u32> {
        parse_code(&self.code)
    }

    /// Remove optional collections that ended up empty.
    pub fn prune_empty(&mut self) {
        for slot in self.sequences_mut() {
            if slot.as_ref().is_some_and(|v| v.is_empty()) {
                *slot = None;
            }
        }
        if self.case_variants.as_ref().is_some_and(|m| m.is_empty()) {
            self.case_variants = None;
        }
    }

    /// True when some optional collection is present but empty
    pub fn has_empty_collections(&self) -> bool {
        self.sequences().any(|slot| slot.is_some_and(|v| v.is_empty()))
            || self.case_variants.as_ref().is_some_and(|m| m.is_empty())
    }

    fn sequences(&self) -> impl Iterator<Item = Option<&Vec<String>>> {
        [
            &self.tags,
            &self.notes,
            &self.comments,
            &self.index_entries,
            &self.related,
            &self.variants,
            &self.approximations,
            &self.decomposition,
            &self.script_extensions,
        ]
        .into_iter()
        .map(Option::as_ref)
    }

    fn sequences_mut(&mut self) -> [&mut Option<Vec<String>>; 9] {
        [
            &mut self.tags,
            &mut self.notes,
            &mut self.comments,
            &mut self.index_entries,
            &mut self.related,
            &mut self.variants,
            &mut self.approximations,
            &mut self.decomposition,
            &mut self.script_extensions,
        ]
    }
}

/// Append to an optional sequence, creating it on first use.
pub fn append<I>(slot: &mut Option<Vec<String>>, values: I)
where
    I: IntoIterator<Item = String>,
{
    slot.get_or_insert_with(Vec::new).extend(values);
}
