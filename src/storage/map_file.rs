//! Keyed-map file

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::diagnostics::Diagnostics;
use crate::map::CodepointMap;
use crate::{Error, Result};

/// Write the full map as pretty JSON, empty collections included.
pub fn save_map(map: &CodepointMap, path: &Path, diag: &dyn Diagnostics) -> Result<()> {
    diag.info(&format!("writing JSON data to {}", path.display()));

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, map)?;
    writer.flush()?;

    diag.info(&format!("wrote {} codepoints to {}", map.len(), path.display()));
    Ok(())
}

/// Load a map previously written by [`save_map`].
pub fn load_map(path: &Path) -> Result<CodepointMap> {
    if !path.exists() {
        return Err(Error::MissingSource(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let map: CodepointMap = serde_json::from_str(&contents)?;
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codepoint::CodepointRecord;
    use crate::diagnostics::RecordingDiagnostics;

    #[test]
    fn test_save_then_load_keeps_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ucd-map.json");

        let mut a = CodepointRecord::new("0041", "LATIN CAPITAL LETTER A");
        a.comments = Some(Vec::new());
        a.tags = Some(vec!["Uppercase".to_string()]);
        let map: CodepointMap = [a, CodepointRecord::new("00E9", "E ACUTE")].into_iter().collect();

        save_map(&map, &path, &RecordingDiagnostics::new()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"comments\": []"));
        assert!(text.find("\"0041\"").unwrap() < text.find("\"00E9\"").unwrap());

        let loaded = load_map(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_load_missing_map() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_map(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::MissingSource(_)));
    }

    #[test]
    fn test_load_corrupt_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ucd-map.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_map(&path).unwrap_err(), Error::Json(_)));
    }
}
