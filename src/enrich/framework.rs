//! Core enricher framework
//!
//! Defines the trait every UCD text-file enricher implements and the
//! pipeline that runs them in a fixed order over one shared map.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use crate::diagnostics::Diagnostics;
use crate::map::CodepointMap;
use crate::{Error, Result};

/// Counters reported by one enricher run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Lines read, including comments and blanks
    pub lines: usize,
    /// Appends made to existing records
    pub applied: usize,
    /// Data lines or codepoints that were skipped
    pub skipped: usize,
}

impl std::fmt::Display for EnrichStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} lines, {} applied, {} skipped", self.lines, self.applied, self.skipped)
    }
}

/// Trait for UCD text-file enrichers
///
/// Each enricher is responsible for:
/// 1. Naming the UCD file it reads
/// 2. Parsing that file's line format
/// 3. Appending to records already in the map, never creating new ones
pub trait Enricher {
    /// File name inside the UCD data directory
    fn file_name(&self) -> &str;

    /// Enrich the map from an already opened reader
    fn enrich(
        &self,
        reader: &mut dyn BufRead,
        map: &mut CodepointMap,
        diag: &dyn Diagnostics,
    ) -> Result<EnrichStats>;

    /// Open `path`, drain it into [`Enricher::enrich`], close it.
    fn enrich_file(
        &self,
        path: &Path,
        map: &mut CodepointMap,
        diag: &dyn Diagnostics,
    ) -> Result<EnrichStats> {
        if !path.exists() {
            return Err(Error::MissingSource(path.to_path_buf()));
        }

        diag.info(&format!("processing {}", path.display()));
        let mut reader = BufReader::new(File::open(path)?);
        let stats = self.enrich(&mut reader, map, diag)?;
        diag.info(&format!("processed {} lines from {}", stats.lines, path.display()));
        Ok(stats)
    }
}

/// Call `f` with each line (1-indexed) without its line terminator.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the file.
pub fn for_each_line<F>(reader: &mut dyn BufRead, mut f: F) -> Result<usize>
where
    F: FnMut(usize, &str),
{
    let mut buf = Vec::new();
    let mut count = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        count += 1;

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        f(count, line);
    }

    Ok(count)
}

/// Ordered list of enrichers sharing one map
#[derive(Default)]
pub struct EnricherPipeline {
    enrichers: Vec<Box<dyn Enricher>>,
}

impl EnricherPipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an enricher; enrichers run in registration order
    pub fn register(&mut self, enricher: impl Enricher + 'static) {
        self.enrichers.push(Box::new(enricher));
    }

    /// Get all registered enrichers
    pub fn enrichers(&self) -> &[Box<dyn Enricher>] {
        &self.enrichers
    }

    /// Run every enricher against its file in `data_dir`.
    ///
    /// Stops at the first failing file; earlier enrichers' appends stay.
    pub fn run(
        &self,
        data_dir: &Path,
        map: &mut CodepointMap,
        diag: &dyn Diagnostics,
    ) -> Result<Vec<(String, EnrichStats)>> {
        let mut results = Vec::with_capacity(self.enrichers.len());
        for enricher in &self.enrichers {
            let path = data_dir.join(enricher.file_name());
            let stats = enricher.enrich_file(&path, map, diag)?;
            results.push((enricher.file_name().to_string(), stats));
        }
        Ok(results)
    }
}

/// Create the standard pipeline: index, names list, script extensions
pub fn default_pipeline() -> EnricherPipeline {
    let mut pipeline = EnricherPipeline::new();
    pipeline.register(super::index::IndexEnricher::new());
    pipeline.register(super::names_list::NamesListEnricher::new());
    pipeline.register(super::script_extensions::ScriptExtensionEnricher::new());
    pipeline
}
