//! Raw repertoire attributes read from the UCD XML export
//!
//! Each `<char>` element becomes a [`RawChar`] with one optional field per
//! attribute the merge engine consumes. Attributes keep their UCD meaning;
//! no interpretation happens here beyond collecting `<name-alias>` children.
//!
//! Both export layouts are accepted: the flat one (`<char>` directly under
//! `<repertoire>`) and the grouped one, where a `<char>` inherits every
//! attribute it does not set from its enclosing `<group>`.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// One `<name-alias>` child of a `<char>` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAlias {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl NameAlias {
    pub fn new(alias: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            kind: Some(kind.into()),
        }
    }
}

/// Typed attributes of one repertoire entry.
///
/// Field names follow the UCD XML attribute codes; serialization restores the
/// UCD attribute spelling so the raw dump reads like the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cp: Option<String>,
    #[serde(rename = "first-cp", skip_serializing_if = "Option::is_none")]
    pub first_cp: Option<String>,
    #[serde(rename = "last-cp", skip_serializing_if = "Option::is_none")]
    pub last_cp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub na: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub na1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccc: Option<String>,
    /// Numeric type: `De`, `Di`, `Nu` or `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nt: Option<String>,

    // Binary properties, `Y` or `N`
    #[serde(rename = "WSpace", skip_serializing_if = "Option::is_none")]
    pub wspace: Option<String>,
    #[serde(rename = "Emoji", skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(rename = "Dep", skip_serializing_if = "Option::is_none")]
    pub dep: Option<String>,
    #[serde(rename = "QMark", skip_serializing_if = "Option::is_none")]
    pub qmark: Option<String>,
    #[serde(rename = "Dash", skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
    #[serde(rename = "Upper", skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
    #[serde(rename = "Lower", skip_serializing_if = "Option::is_none")]
    pub lower: Option<String>,
    #[serde(rename = "OUpper", skip_serializing_if = "Option::is_none")]
    pub oupper: Option<String>,
    #[serde(rename = "OLower", skip_serializing_if = "Option::is_none")]
    pub olower: Option<String>,
    #[serde(rename = "Term", skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(rename = "STerm", skip_serializing_if = "Option::is_none")]
    pub sterm: Option<String>,
    #[serde(rename = "Dia", skip_serializing_if = "Option::is_none")]
    pub dia: Option<String>,
    #[serde(rename = "Ext", skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(rename = "SD", skip_serializing_if = "Option::is_none")]
    pub sd: Option<String>,
    #[serde(rename = "Alpha", skip_serializing_if = "Option::is_none")]
    pub alpha: Option<String>,
    #[serde(rename = "OAlpha", skip_serializing_if = "Option::is_none")]
    pub oalpha: Option<String>,
    #[serde(rename = "Math", skip_serializing_if = "Option::is_none")]
    pub math: Option<String>,
    #[serde(rename = "OMath", skip_serializing_if = "Option::is_none")]
    pub omath: Option<String>,
    #[serde(rename = "Hex", skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(rename = "AHex", skip_serializing_if = "Option::is_none")]
    pub ahex: Option<String>,
    #[serde(rename = "RI", skip_serializing_if = "Option::is_none")]
    pub ri: Option<String>,
    #[serde(rename = "NChar", skip_serializing_if = "Option::is_none")]
    pub nchar: Option<String>,
    #[serde(rename = "VS", skip_serializing_if = "Option::is_none")]
    pub vs: Option<String>,

    /// Jamo short name
    #[serde(rename = "JSN", skip_serializing_if = "Option::is_none")]
    pub jsn: Option<String>,

    // Case mappings: simple (single codepoint) and full (space separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tc: Option<String>,

    /// Decomposition mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dm: Option<String>,
    /// Bidi mirroring glyph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmg: Option<String>,
    /// Bidi paired bracket type: `o`, `c` or `n`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpt: Option<String>,
    /// Bidi paired bracket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpb: Option<String>,

    #[serde(rename = "name-alias", skip_serializing_if = "Vec::is_empty")]
    pub name_aliases: Vec<NameAlias>,
}

impl RawChar {
    /// Build from a `<char>` element, falling back to `group` attributes.
    pub fn from_node(node: roxmltree::Node<'_, '_>, group: Option<roxmltree::Node<'_, '_>>) -> Self {
        let attr = |name: &str| {
            node.attribute(name)
                .or_else(|| group.and_then(|g| g.attribute(name)))
                .map(str::to_string)
        };

        let name_aliases = node
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "name-alias")
            .map(|n| NameAlias {
                alias: n.attribute("alias").map(str::to_string),
                kind: n.attribute("type").map(str::to_string),
            })
            .collect();

        Self {
            // Code attributes never come from a group
            cp: node.attribute("cp").map(str::to_string),
            first_cp: node.attribute("first-cp").map(str::to_string),
            last_cp: node.attribute("last-cp").map(str::to_string),
            na: attr("na"),
            na1: attr("na1"),
            age: attr("age"),
            bc: attr("bc"),
            blk: attr("blk"),
            gc: attr("gc"),
            sc: attr("sc"),
            ccc: attr("ccc"),
            nt: attr("nt"),
            wspace: attr("WSpace"),
            emoji: attr("Emoji"),
            dep: attr("Dep"),
            qmark: attr("QMark"),
            dash: attr("Dash"),
            upper: attr("Upper"),
            lower: attr("Lower"),
            oupper: attr("OUpper"),
            olower: attr("OLower"),
            term: attr("Term"),
            sterm: attr("STerm"),
            dia: attr("Dia"),
            ext: attr("Ext"),
            sd: attr("SD"),
            alpha: attr("Alpha"),
            oalpha: attr("OAlpha"),
            math: attr("Math"),
            omath: attr("OMath"),
            hex: attr("Hex"),
            ahex: attr("AHex"),
            ri: attr("RI"),
            nchar: attr("NChar"),
            vs: attr("VS"),
            jsn: attr("JSN"),
            suc: attr("suc"),
            slc: attr("slc"),
            stc: attr("stc"),
            uc: attr("uc"),
            lc: attr("lc"),
            tc: attr("tc"),
            dm: attr("dm"),
            bmg: attr("bmg"),
            bpt: attr("bpt"),
            bpb: attr("bpb"),
            name_aliases,
        }
    }

    /// The `cp` attribute when present and non-empty
    pub fn code(&self) -> Option<&str> {
        self.cp.as_deref().filter(|cp| !cp.is_empty())
    }
}

/// Parsed repertoire: the export's description plus every `<char>` entry
#[derive(Debug, Clone, Default, Serialize)]
pub struct Repertoire {
    pub description: Option<String>,
    pub chars: Vec<RawChar>,
}

/// Parse UCD XML text into raw entries.
pub fn parse_repertoire(xml: &str) -> Result<Repertoire> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    let description = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "description")
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string());

    let repertoire = root
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "repertoire")
        .ok_or_else(|| Error::Parse("missing ucd repertoire".to_string()))?;

    let mut chars = Vec::new();
    for node in repertoire.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "char" => chars.push(RawChar::from_node(node, None)),
            "group" => {
                for child in node
                    .children()
                    .filter(|n| n.is_element() && n.tag_name().name() == "char")
                {
                    chars.push(RawChar::from_node(child, Some(node)));
                }
            }
            // reserved, noncharacter and surrogate ranges carry no records
            _ => {}
        }
    }

    Ok(Repertoire { description, chars })
}

/// Read and parse a UCD XML file. A missing file is fatal.
pub fn read_repertoire(path: &Path) -> Result<Repertoire> {
    if !path.exists() {
        return Err(Error::MissingSource(path.to_path_buf()));
    }
    let xml = std::fs::read_to_string(path)?;
    parse_repertoire(&xml)
}
