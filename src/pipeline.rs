//! Merge orchestration
//!
//! Obtains the base map (cached keyed map, or repertoire XML), persists it,
//! lends it to each enricher in turn, then writes the pruned line stream.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use crate::diagnostics::Diagnostics;
use crate::emoji::EMOJI_FILE;
use crate::enrich::{default_pipeline, EnrichStats, EnricherPipeline};
use crate::map::CodepointMap;
use crate::repertoire::{read_repertoire, RepertoireLoader};
use crate::storage::{load_map, save_map, write_json_lines};
use crate::{Error, Result};

pub const XML_FILE: &str = "ucd.all.flat.xml";
pub const RAW_DUMP_FILE: &str = "ucd.all.flat.json";
pub const MAP_FILE: &str = "ucd-map.json";
pub const LINES_FILE: &str = "ucd-lines.json";

/// Input and output locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl PipelinePaths {
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn xml(&self) -> PathBuf {
        self.data_dir.join(XML_FILE)
    }

    pub fn raw_dump(&self) -> PathBuf {
        self.data_dir.join(RAW_DUMP_FILE)
    }

    pub fn map_file(&self) -> PathBuf {
        self.output_dir.join(MAP_FILE)
    }

    pub fn lines_file(&self) -> PathBuf {
        self.output_dir.join(LINES_FILE)
    }

    pub fn emoji_file(&self) -> PathBuf {
        self.output_dir.join(EMOJI_FILE)
    }
}

/// Where the base map came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSource {
    Cached,
    Repertoire,
}

impl MapSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapSource::Cached => "cached map",
            MapSource::Repertoire => "repertoire XML",
        }
    }
}

impl std::fmt::Display for MapSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub source: MapSource,
    pub records: usize,
    pub lines_written: usize,
    pub stages: Vec<(String, EnrichStats)>,
    pub map_file: PathBuf,
    pub lines_file: PathBuf,
    pub raw_dump: Option<PathBuf>,
    pub load_time: Duration,
    pub enrich_time: Duration,
    pub total_time: Duration,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Merge Summary:")?;
        writeln!(f, "  Source: {}", self.source)?;
        writeln!(f, "  Records: {}", self.records)?;
        for (file, stats) in &self.stages {
            writeln!(f, "  {}: {}", file, stats)?;
        }
        writeln!(f, "  Map: {}", self.map_file.display())?;
        writeln!(f, "  Lines: {} ({} records)", self.lines_file.display(), self.lines_written)?;
        if let Some(raw) = &self.raw_dump {
            writeln!(f, "  Raw dump: {}", raw.display())?;
        }
        write!(f, "  Time: {:.2?}", self.total_time)
    }
}

/// One merge run over a data directory
pub struct Pipeline {
    paths: PipelinePaths,
    rebuild: bool,
    raw_dump: bool,
    enrichers: EnricherPipeline,
}

impl Pipeline {
    pub fn new(paths: PipelinePaths) -> Self {
        Self {
            paths,
            rebuild: false,
            raw_dump: false,
            enrichers: default_pipeline(),
        }
    }

    /// Ignore an existing keyed map and parse the XML
    pub fn with_rebuild(mut self, rebuild: bool) -> Self {
        self.rebuild = rebuild;
        self
    }

    /// Also dump the parsed repertoire as JSON next to the XML
    pub fn with_raw_dump(mut self, raw_dump: bool) -> Self {
        self.raw_dump = raw_dump;
        self
    }

    pub fn with_enrichers(mut self, enrichers: EnricherPipeline) -> Self {
        self.enrichers = enrichers;
        self
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    /// Run every stage. Earlier outputs stay on disk if a later stage fails.
    pub fn run(&self, diag: &dyn Diagnostics) -> Result<RunSummary> {
        let started = Instant::now();
        std::fs::create_dir_all(&self.paths.output_dir)?;

        let (mut map, source, raw_dump) = self.base_map(diag)?;
        let load_time = started.elapsed();

        let map_file = self.paths.map_file();
        save_map(&map, &map_file, diag)?;

        let enrich_started = Instant::now();
        let stages = self.enrichers.run(&self.paths.data_dir, &mut map, diag)?;
        let enrich_time = enrich_started.elapsed();

        let records = map.len();
        map.prune_empty();
        let sorted = map.into_sorted_records();

        let lines_file = self.paths.lines_file();
        let lines_written = write_json_lines(&lines_file, &sorted, diag)?;

        let total_time = started.elapsed();
        diag.info(&format!("complete in {:.2?}", total_time));

        Ok(RunSummary {
            source,
            records,
            lines_written,
            stages,
            map_file,
            lines_file,
            raw_dump,
            load_time,
            enrich_time,
            total_time,
        })
    }

    fn base_map(&self, diag: &dyn Diagnostics) -> Result<(CodepointMap, MapSource, Option<PathBuf>)> {
        let map_file = self.paths.map_file();

        if !self.rebuild && map_file.exists() {
            diag.info(&format!("map file exists in {}, loading existing map", map_file.display()));
            match load_map(&map_file) {
                Ok(map) => {
                    diag.info(&format!(
                        "loaded existing map from {} with {} codepoints",
                        map_file.display(),
                        map.len()
                    ));
                    return Ok((map, MapSource::Cached, None));
                }
                Err(e) => diag.warn(&format!(
                    "unable to load {} ({}), regenerating from XML",
                    map_file.display(),
                    e
                )),
            }
        } else if !self.rebuild {
            diag.info(&format!(
                "map file does not exist in {}, regenerating from XML",
                map_file.display()
            ));
        }

        let (map, raw_dump) = self.map_from_repertoire(diag)?;
        Ok((map, MapSource::Repertoire, raw_dump))
    }

    fn map_from_repertoire(&self, diag: &dyn Diagnostics) -> Result<(CodepointMap, Option<PathBuf>)> {
        let xml = self.paths.xml();
        if !xml.exists() {
            diag.error(&format!("XML file does not exist: {}", xml.display()));
            return Err(Error::MissingSource(xml));
        }

        diag.info(&format!("reading XML file from {}", xml.display()));
        let repertoire = read_repertoire(&xml)?;
        diag.info(&format!("parsed {} characters", repertoire.chars.len()));

        let raw_dump = if self.raw_dump {
            let path = self.paths.raw_dump();
            write_raw_dump(&repertoire, &path, diag)?;
            Some(path)
        } else {
            None
        };

        diag.info("generating JSON data");
        let map = RepertoireLoader::new().load(&repertoire.chars, diag);
        Ok((map, raw_dump))
    }
}

fn write_raw_dump(repertoire: &crate::repertoire::Repertoire, path: &Path, diag: &dyn Diagnostics) -> Result<()> {
    diag.info(&format!("writing full JSON data to {}", path.display()));
    let contents = serde_json::to_string_pretty(repertoire)?;
    std::fs::write(path, contents)?;
    Ok(())
}
