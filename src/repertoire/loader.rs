//! Repertoire loader - raw entries to base codepoint records
//!
//! For each entry with a code this derives:
//! - `tags` from the binary properties and the numeric type
//! - `name`, falling back to the Unicode 1.0 name, then the first alias
//! - notes and extra tags from the typed name aliases
//! - `caseVariants`, `decomposition`, `mirror`, `oldname` and bracket notes

use std::collections::BTreeMap;
use crate::codepoint::{CaseKind, CodepointRecord};
use crate::diagnostics::Diagnostics;
use crate::map::CodepointMap;
use crate::{Error, Result};
use super::raw::{NameAlias, RawChar};

/// Value the UCD uses for "maps to itself" / "no mapping"
const SELF_SENTINEL: &str = "#";

/// Builds the base codepoint map from raw repertoire entries
#[derive(Debug, Default, Clone, Copy)]
pub struct RepertoireLoader;

impl RepertoireLoader {
    pub fn new() -> Self {
        Self
    }

    /// Build one record per entry that carries a code.
    pub fn load(&self, chars: &[RawChar], diag: &dyn Diagnostics) -> CodepointMap {
        diag.info(&format!("generating records for {} repertoire entries", chars.len()));

        let mut map = CodepointMap::new();
        for raw in chars {
            if let Some(record) = self.build_record(raw, diag) {
                if let Some(previous) = map.insert(record) {
                    diag.warn(&format!("duplicate repertoire entry for codepoint {}", previous.code));
                }
            }
        }

        diag.info(&format!("generated map for {} codepoints", map.len()));
        map
    }

    /// Derive a record from one entry, or `None` if the entry is skipped.
    pub fn build_record(&self, raw: &RawChar, diag: &dyn Diagnostics) -> Option<CodepointRecord> {
        let Some(cp) = raw.code() else {
            // Ranges such as CJK ideographs and private use areas are mixed in
            if raw.first_cp.is_none() {
                diag.warn(&format!(
                    "skipping entry with no code point ({})",
                    serde_json::to_string(raw).unwrap_or_default()
                ));
            }
            return None;
        };

        let mut tags = derive_tags(raw);

        let Some(mut name) = resolve_name(raw, cp, diag) else {
            diag.warn(&format!("skipping codepoint {} with no name and no name-alias", cp));
            return None;
        };
        if let Some(stem) = name.strip_suffix('#') {
            name = format!("{}{}", stem, cp);
        }

        let mut notes = Vec::new();
        if let Err(e) = apply_aliases(&raw.name_aliases, &mut name, &mut tags, &mut notes, cp, diag) {
            diag.error(&format!("processing name-alias for codepoint {}: {}", cp, e));
            diag.info(&format!(
                "name-alias data: {}",
                serde_json::to_string(&raw.name_aliases).unwrap_or_default()
            ));
        }

        if let Some(jsn) = non_empty(&raw.jsn) {
            notes.push(format!("Hangul Syllable Type: {}", jsn));
        }

        if let Some(bpt) = non_empty(&raw.bpt).filter(|t| *t != "n") {
            let kind = if bpt == "o" { "Open" } else { "Closed" };
            notes.push(format!("Bidi Paired Bracket Type: {}", kind));
            notes.push(format!("Bidi Paired Bracket: U+{}", raw.bpb.as_deref().unwrap_or_default()));
        }

        let case_variants = derive_case_variants(raw);
        let oldname = non_empty(&raw.na1).map(str::to_string);

        Some(CodepointRecord {
            code: cp.to_string(),
            title: oldname.clone().unwrap_or_else(|| name.clone()),
            name,
            age: raw.age.clone().unwrap_or_default(),
            bidi: raw.bc.clone().unwrap_or_default(),
            block: raw.blk.clone().unwrap_or_default(),
            category: raw.gc.clone().unwrap_or_default(),
            script: raw.sc.clone().unwrap_or_default(),
            combine: raw.ccc.clone().unwrap_or_default(),
            tags: Some(tags),
            notes: Some(notes),
            comments: Some(Vec::new()),
            index_entries: Some(Vec::new()),
            related: Some(Vec::new()),
            variants: Some(Vec::new()),
            approximations: None,
            case_variants: (!case_variants.is_empty()).then_some(case_variants),
            decomposition: mapping(&raw.dm).map(split_codes),
            mirror: non_empty(&raw.bmg).map(str::to_string),
            oldname,
            script_extensions: None,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A mapping attribute that is set and not the self sentinel
fn mapping(value: &Option<String>) -> Option<&str> {
    non_empty(value).filter(|v| *v != SELF_SENTINEL)
}

fn split_codes(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref() == Some("Y")
}

fn push_flags(tags: &mut Vec<String>, flags: &[(&Option<String>, &str)]) {
    for (value, tag) in flags {
        if is_set(value) {
            tags.push(tag.to_string());
        }
    }
}

/// Tag labels in fixed table order.
///
/// `Other_Lowercase` is keyed off `Lower`, not `OLower`; existing output
/// depends on it.
fn derive_tags(raw: &RawChar) -> Vec<String> {
    let mut tags = Vec::new();

    push_flags(
        &mut tags,
        &[
            (&raw.wspace, "Whitespace"),
            (&raw.emoji, "Emoji"),
            (&raw.dep, "Deprecated"),
            (&raw.qmark, "Quote"),
            (&raw.dash, "Dash"),
        ],
    );

    match raw.nt.as_deref() {
        Some("De") => tags.push("Decimal".to_string()),
        Some("Di") => tags.push("Digit".to_string()),
        Some("Nu") => tags.push("Numeric".to_string()),
        _ => {}
    }

    push_flags(
        &mut tags,
        &[
            (&raw.upper, "Uppercase"),
            (&raw.lower, "Lowercase"),
            (&raw.oupper, "Other_Uppercase"),
            (&raw.lower, "Other_Lowercase"),
            (&raw.term, "Terminal_Punctuation"),
            (&raw.sterm, "Sentence_Terminal"),
            (&raw.dia, "Diacritic"),
            (&raw.ext, "Extender"),
            (&raw.sd, "Soft_Dotted"),
            (&raw.alpha, "Alphabetic"),
            (&raw.oalpha, "Other_Alphabetic"),
            (&raw.math, "Math"),
            (&raw.omath, "Other_Math"),
            (&raw.hex, "Hexadecimal"),
            (&raw.ahex, "ASCII_Hexadecimal"),
            (&raw.ri, "Regional_Indicator"),
            (&raw.nchar, "Noncharacter_Code_Point"),
            (&raw.vs, "Variation_Selector"),
        ],
    );

    tags
}

fn resolve_name(raw: &RawChar, cp: &str, diag: &dyn Diagnostics) -> Option<String> {
    if let Some(name) = non_empty(&raw.na).or_else(|| non_empty(&raw.na1)) {
        return Some(name.to_string());
    }

    let alias = raw.name_aliases.first().and_then(|a| non_empty(&a.alias))?;
    diag.warn(&format!("codepoint {} missing name, using name-alias '{}'", cp, alias));
    Some(alias.to_string())
}

/// Apply typed aliases in order. Stops at the first malformed entry, leaving
/// whatever was applied before it in place.
fn apply_aliases(
    aliases: &[NameAlias],
    name: &mut String,
    tags: &mut Vec<String>,
    notes: &mut Vec<String>,
    cp: &str,
    diag: &dyn Diagnostics,
) -> Result<()> {
    for (idx, entry) in aliases.iter().enumerate() {
        let (Some(alias), Some(kind)) = (entry.alias.as_deref(), entry.kind.as_deref()) else {
            return Err(Error::MalformedAlias(format!(
                "entry {} is missing its alias or type",
                idx
            )));
        };

        match kind {
            "correction" => {
                notes.push(format!("Corrected from: {}", alias));
                tags.push("Corrected".to_string());
            }
            "abbreviation" => {
                if !name.contains('(') {
                    *name = format!("{} ({})", name, alias);
                } else if !name.contains(&format!("({})", alias)) {
                    notes.push(format!("Abbreviation: {}", alias));
                }
            }
            "control" => {
                if alias != name.as_str() && !name.contains(&format!("{} (", alias)) {
                    notes.push(format!("Control Name: {}", alias));
                }
            }
            "alternate" => notes.push(format!("Also known as: {}", alias)),
            "figment" => {
                notes.push(format!("Figment Name: {}", alias));
                tags.push("Figment".to_string());
            }
            other => {
                diag.warn(&format!("unknown name-alias type '{}' for codepoint {}", other, cp));
            }
        }
    }
    Ok(())
}

/// Simple mappings first, full mappings override them.
fn derive_case_variants(raw: &RawChar) -> BTreeMap<CaseKind, Vec<String>> {
    let mut variants = BTreeMap::new();

    let simple = [
        (CaseKind::Uppercase, &raw.suc),
        (CaseKind::Lowercase, &raw.slc),
        (CaseKind::Titlecase, &raw.stc),
    ];
    for (kind, value) in simple {
        if let Some(cp) = mapping(value) {
            variants.insert(kind, vec![cp.to_string()]);
        }
    }

    let full = [
        (CaseKind::Uppercase, &raw.uc),
        (CaseKind::Lowercase, &raw.lc),
        (CaseKind::Titlecase, &raw.tc),
    ];
    for (kind, value) in full {
        if let Some(cps) = mapping(value) {
            variants.insert(kind, split_codes(cps));
        }
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticLevel, RecordingDiagnostics};

    fn y() -> Option<String> {
        Some("Y".to_string())
    }

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn latin_a() -> RawChar {
        RawChar {
            cp: s("0041"),
            na: s("LATIN CAPITAL LETTER A"),
            na1: s(""),
            age: s("1.1"),
            bc: s("L"),
            blk: s("ASCII"),
            gc: s("Lu"),
            sc: s("Latn"),
            ccc: s("0"),
            upper: y(),
            alpha: y(),
            hex: y(),
            ahex: y(),
            suc: s("#"),
            slc: s("0061"),
            stc: s("#"),
            uc: s("#"),
            lc: s("0061"),
            tc: s("#"),
            dm: s("#"),
            bmg: s(""),
            bpt: s("n"),
            ..RawChar::default()
        }
    }

    fn build(raw: &RawChar) -> (Option<CodepointRecord>, RecordingDiagnostics) {
        let diag = RecordingDiagnostics::new();
        let record = RepertoireLoader::new().build_record(raw, &diag);
        (record, diag)
    }

    #[test]
    fn test_basic_record() {
        let (record, diag) = build(&latin_a());
        let record = record.unwrap();

        assert_eq!(record.code, "0041");
        assert_eq!(record.name, "LATIN CAPITAL LETTER A");
        assert_eq!(record.title, "LATIN CAPITAL LETTER A");
        assert_eq!(record.category, "Lu");
        assert_eq!(record.combine, "0");
        assert_eq!(
            record.tags.unwrap(),
            vec!["Uppercase", "Alphabetic", "Hexadecimal", "ASCII_Hexadecimal"]
        );
        assert_eq!(record.notes, Some(Vec::new()));
        assert_eq!(record.comments, Some(Vec::new()));
        assert!(record.mirror.is_none());
        assert!(record.oldname.is_none());
        assert!(record.decomposition.is_none());
        assert!(diag.warnings().is_empty());

        let cases = record.case_variants.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[&CaseKind::Lowercase], vec!["0061"]);
    }

    #[test]
    fn test_numeric_type_single_tag() {
        let digit = RawChar { cp: s("0031"), na: s("DIGIT ONE"), nt: s("De"), ..RawChar::default() };
        let tags = build(&digit).0.unwrap().tags.unwrap();
        assert_eq!(tags, vec!["Decimal"]);

        let none = RawChar { nt: s("None"), ..digit.clone() };
        assert!(build(&none).0.unwrap().tags.unwrap().is_empty());

        let superscript = RawChar { nt: s("Di"), ..digit.clone() };
        assert_eq!(build(&superscript).0.unwrap().tags.unwrap(), vec!["Digit"]);

        let fraction = RawChar { nt: s("Nu"), ..digit };
        assert_eq!(build(&fraction).0.unwrap().tags.unwrap(), vec!["Numeric"]);
    }

    #[test]
    fn test_tag_table_order() {
        let everything = RawChar {
            cp: s("E000"),
            na: s("EVERY FLAG"),
            nt: s("Nu"),
            wspace: y(),
            emoji: y(),
            dep: y(),
            qmark: y(),
            dash: y(),
            upper: y(),
            lower: y(),
            oupper: y(),
            olower: y(),
            term: y(),
            sterm: y(),
            dia: y(),
            ext: y(),
            sd: y(),
            alpha: y(),
            oalpha: y(),
            math: y(),
            omath: y(),
            hex: y(),
            ahex: y(),
            ri: y(),
            nchar: y(),
            vs: y(),
            ..RawChar::default()
        };
        let tags = build(&everything).0.unwrap().tags.unwrap();
        assert_eq!(
            tags,
            vec![
                "Whitespace",
                "Emoji",
                "Deprecated",
                "Quote",
                "Dash",
                "Numeric",
                "Uppercase",
                "Lowercase",
                "Other_Uppercase",
                "Other_Lowercase",
                "Terminal_Punctuation",
                "Sentence_Terminal",
                "Diacritic",
                "Extender",
                "Soft_Dotted",
                "Alphabetic",
                "Other_Alphabetic",
                "Math",
                "Other_Math",
                "Hexadecimal",
                "ASCII_Hexadecimal",
                "Regional_Indicator",
                "Noncharacter_Code_Point",
                "Variation_Selector",
            ]
        );
    }

    #[test]
    fn test_other_lowercase_follows_lower() {
        let small = RawChar {
            cp: s("0061"),
            na: s("LATIN SMALL LETTER A"),
            lower: y(),
            olower: s("N"),
            ..RawChar::default()
        };
        let tags = build(&small).0.unwrap().tags.unwrap();
        assert_eq!(tags, vec!["Lowercase", "Other_Lowercase"]);

        let ordinal = RawChar { lower: s("N"), olower: y(), ..small };
        assert!(build(&ordinal).0.unwrap().tags.unwrap().is_empty());
    }

    #[test]
    fn test_range_placeholder_skipped_silently() {
        let range = RawChar {
            first_cp: s("3400"),
            last_cp: s("4DBF"),
            na: s("CJK UNIFIED IDEOGRAPH-#"),
            ..RawChar::default()
        };
        let (record, diag) = build(&range);
        assert!(record.is_none());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_entry_without_code_warns() {
        let orphan = RawChar { cp: s(""), na: s("ORPHAN"), ..RawChar::default() };
        let (record, diag) = build(&orphan);
        assert!(record.is_none());
        assert!(diag.contains(DiagnosticLevel::Warn, "no code point"));
    }

    #[test]
    fn test_name_falls_back_to_unicode1_name() {
        let raw = RawChar {
            cp: s("000A"),
            na: s(""),
            na1: s("LINE FEED (LF)"),
            ..RawChar::default()
        };
        let record = build(&raw).0.unwrap();
        assert_eq!(record.name, "LINE FEED (LF)");
        assert_eq!(record.title, "LINE FEED (LF)");
        assert_eq!(record.oldname.as_deref(), Some("LINE FEED (LF)"));
    }

    #[test]
    fn test_name_falls_back_to_first_alias_with_warning() {
        let raw = RawChar {
            cp: s("0080"),
            na: s(""),
            na1: s(""),
            name_aliases: vec![
                NameAlias::new("PADDING CHARACTER", "figment"),
                NameAlias::new("PAD", "abbreviation"),
            ],
            ..RawChar::default()
        };
        let (record, diag) = build(&raw);
        let record = record.unwrap();

        assert_eq!(record.name, "PADDING CHARACTER (PAD)");
        assert_eq!(record.title, "PADDING CHARACTER (PAD)");
        assert_eq!(record.notes.unwrap(), vec!["Figment Name: PADDING CHARACTER"]);
        assert_eq!(record.tags.unwrap(), vec!["Figment"]);
        assert!(diag.contains(DiagnosticLevel::Warn, "using name-alias 'PADDING CHARACTER'"));
    }

    #[test]
    fn test_nameless_entry_skipped() {
        let raw = RawChar { cp: s("0080"), ..RawChar::default() };
        let (record, diag) = build(&raw);
        assert!(record.is_none());
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn test_placeholder_name_gets_code() {
        let raw = RawChar { cp: s("F900"), na: s("CJK COMPATIBILITY IDEOGRAPH-#"), ..RawChar::default() };
        assert_eq!(build(&raw).0.unwrap().name, "CJK COMPATIBILITY IDEOGRAPH-F900");
    }

    #[test]
    fn test_control_aliases() {
        let bell = RawChar {
            cp: s("0007"),
            na: s(""),
            na1: s("BELL"),
            name_aliases: vec![NameAlias::new("ALERT", "control"), NameAlias::new("BEL", "abbreviation")],
            ..RawChar::default()
        };
        let record = build(&bell).0.unwrap();
        assert_eq!(record.name, "BELL (BEL)");
        assert_eq!(record.title, "BELL");
        assert_eq!(record.notes.unwrap(), vec!["Control Name: ALERT"]);

        // Control alias already part of the name, abbreviation already present
        let lf = RawChar {
            cp: s("000A"),
            na1: s("LINE FEED (LF)"),
            name_aliases: vec![
                NameAlias::new("LINE FEED", "control"),
                NameAlias::new("NEW LINE", "control"),
                NameAlias::new("LF", "abbreviation"),
                NameAlias::new("NL", "abbreviation"),
            ],
            ..RawChar::default()
        };
        let record = build(&lf).0.unwrap();
        assert_eq!(record.name, "LINE FEED (LF)");
        assert_eq!(record.notes.unwrap(), vec!["Control Name: NEW LINE", "Abbreviation: NL"]);
    }

    #[test]
    fn test_correction_and_alternate_aliases() {
        let raw = RawChar {
            cp: s("01A2"),
            na: s("LATIN CAPITAL LETTER OI"),
            name_aliases: vec![
                NameAlias::new("LATIN CAPITAL LETTER GHA", "correction"),
                NameAlias::new("OI", "alternate"),
                NameAlias::new("WHATEVER", "mystery"),
            ],
            ..RawChar::default()
        };
        let (record, diag) = build(&raw);
        let record = record.unwrap();

        assert_eq!(
            record.notes.unwrap(),
            vec!["Corrected from: LATIN CAPITAL LETTER GHA", "Also known as: OI"]
        );
        assert_eq!(record.tags.unwrap(), vec!["Corrected"]);
        assert!(diag.contains(DiagnosticLevel::Warn, "unknown name-alias type 'mystery' for codepoint 01A2"));
    }

    #[test]
    fn test_malformed_alias_keeps_partial_state() {
        let raw = RawChar {
            cp: s("FEFF"),
            na: s("ZERO WIDTH NO-BREAK SPACE"),
            name_aliases: vec![
                NameAlias::new("BYTE ORDER MARK", "alternate"),
                NameAlias { alias: Some("BOM".to_string()), kind: None },
                NameAlias::new("ZWNBSP", "abbreviation"),
            ],
            ..RawChar::default()
        };
        let (record, diag) = build(&raw);
        let record = record.unwrap();

        assert_eq!(record.name, "ZERO WIDTH NO-BREAK SPACE");
        assert_eq!(record.notes.unwrap(), vec!["Also known as: BYTE ORDER MARK"]);
        assert!(diag.contains(DiagnosticLevel::Error, "codepoint FEFF"));
        assert!(diag.contains(DiagnosticLevel::Info, "\"alias\":\"BOM\""));
    }

    #[test]
    fn test_full_case_mapping_overrides_simple() {
        let sharp_s = RawChar {
            cp: s("00DF"),
            na: s("LATIN SMALL LETTER SHARP S"),
            suc: s("#"),
            uc: s("0053 0053"),
            stc: s("#"),
            tc: s("0053 0073"),
            slc: s("#"),
            lc: s("#"),
            ..RawChar::default()
        };
        let cases = build(&sharp_s).0.unwrap().case_variants.unwrap();
        assert_eq!(cases[&CaseKind::Uppercase], vec!["0053", "0053"]);
        assert_eq!(cases[&CaseKind::Titlecase], vec!["0053", "0073"]);
        assert!(!cases.contains_key(&CaseKind::Lowercase));

        let simple_only = RawChar {
            cp: s("01C5"),
            na: s("LATIN CAPITAL LETTER D WITH SMALL LETTER Z WITH CARON"),
            suc: s("01C4"),
            slc: s("01C6"),
            ..RawChar::default()
        };
        let cases = build(&simple_only).0.unwrap().case_variants.unwrap();
        assert_eq!(cases[&CaseKind::Uppercase], vec!["01C4"]);
        assert_eq!(cases[&CaseKind::Lowercase], vec!["01C6"]);
    }

    #[test]
    fn test_decomposition_mirror_and_brackets() {
        let paren = RawChar {
            cp: s("0028"),
            na: s("LEFT PARENTHESIS"),
            na1: s("OPENING PARENTHESIS"),
            bmg: s("0029"),
            bpt: s("o"),
            bpb: s("0029"),
            dm: s("#"),
            ..RawChar::default()
        };
        let record = build(&paren).0.unwrap();
        assert_eq!(record.title, "OPENING PARENTHESIS");
        assert_eq!(record.oldname.as_deref(), Some("OPENING PARENTHESIS"));
        assert_eq!(record.mirror.as_deref(), Some("0029"));
        assert!(record.decomposition.is_none());
        assert_eq!(
            record.notes.unwrap(),
            vec!["Bidi Paired Bracket Type: Open", "Bidi Paired Bracket: U+0029"]
        );

        let closing = RawChar {
            cp: s("0029"),
            na: s("RIGHT PARENTHESIS"),
            bmg: s("0028"),
            bpt: s("c"),
            bpb: s("0028"),
            ..RawChar::default()
        };
        assert_eq!(
            build(&closing).0.unwrap().notes.unwrap(),
            vec!["Bidi Paired Bracket Type: Closed", "Bidi Paired Bracket: U+0028"]
        );

        let e_acute = RawChar { cp: s("00E9"), na: s("LATIN SMALL LETTER E WITH ACUTE"), dm: s("0065 0301"), ..RawChar::default() };
        assert_eq!(build(&e_acute).0.unwrap().decomposition.unwrap(), vec!["0065", "0301"]);
    }

    #[test]
    fn test_hangul_jamo_note() {
        let raw = RawChar { cp: s("1100"), na: s("HANGUL CHOSEONG KIYEOK"), jsn: s("G"), ..RawChar::default() };
        assert_eq!(build(&raw).0.unwrap().notes.unwrap(), vec!["Hangul Syllable Type: G"]);
    }

    #[test]
    fn test_load_builds_map() {
        let diag = RecordingDiagnostics::new();
        let range = RawChar { first_cp: s("3400"), ..RawChar::default() };
        let bell = RawChar { cp: s("0007"), na1: s("BELL"), ..RawChar::default() };
        let map = RepertoireLoader::new().load(&[latin_a(), range, bell], &diag);

        assert_eq!(map.len(), 2);
        assert!(map.contains("0041"));
        assert!(map.contains("0007"));
        assert!(diag.contains(DiagnosticLevel::Info, "generated map for 2 codepoints"));
    }
}
