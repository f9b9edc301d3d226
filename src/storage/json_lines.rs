//! Newline-delimited JSON output

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::Serialize;
use crate::codepoint::CodepointRecord;
use crate::diagnostics::Diagnostics;
use crate::Result;

/// Writes values as compact JSON, one per line.
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Write a single value as one line
    pub fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn write_all<T: Serialize>(&mut self, values: &[T]) -> Result<()> {
        for value in values {
            self.write(value)?;
        }
        Ok(())
    }

    /// Lines written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write already sorted and pruned records to `path`.
pub fn write_json_lines(path: &Path, records: &[CodepointRecord], diag: &dyn Diagnostics) -> Result<usize> {
    diag.info(&format!("writing JSON Lines data to {}", path.display()));

    let mut writer = JsonLinesWriter::new(BufWriter::new(File::create(path)?));
    writer.write_all(records)?;
    let written = writer.written();
    writer.finish()?;

    diag.info(&format!("wrote JSON Lines data {} to {}", written, path.display()));
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;

    #[test]
    fn test_one_compact_object_per_line() {
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer.write(&CodepointRecord::new("0041", "A")).unwrap();
        writer.write(&CodepointRecord::new("0042", "B")).unwrap();
        assert_eq!(writer.written(), 2);

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(out.ends_with('\n'));
        assert!(lines[0].starts_with("{\"code\":\"0041\""));
        assert!(!lines[0].contains(": "));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ucd-lines.json");
        let records = vec![CodepointRecord::new("0041", "A"), CodepointRecord::new("0042", "B")];

        let written = write_json_lines(&path, &records, &RecordingDiagnostics::new()).unwrap();

        assert_eq!(written, 2);
        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<CodepointRecord> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(parsed, records);
    }
}
