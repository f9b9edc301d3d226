use std::path::{Path, PathBuf};
use ucdmerge::codepoint::{format_code, parse_code};
use ucdmerge::emoji::{build_emoji_table, save_emoji_table};
use ucdmerge::config::{write_config, UcdMergeConfig};
use ucdmerge::pipeline::MAP_FILE;
use ucdmerge::storage::load_map;
use ucdmerge::ui::{self, stats_table, Icons, Spinner, SpinnerDiagnostics};
use ucdmerge::{Pipeline, PipelinePaths, TracingDiagnostics};

pub fn run_merge(
    config: &UcdMergeConfig,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    rebuild: bool,
    raw_dump: bool,
) -> anyhow::Result<()> {
    let paths = PipelinePaths::new(
        data_dir.unwrap_or_else(|| config.data_dir()),
        output_dir.unwrap_or_else(|| config.output_dir()),
    );

    ui::header("Merging Unicode Character Database");
    ui::status(Icons::PACKAGE, "Data", &paths.data_dir.display().to_string());
    ui::status(Icons::FILE, "Output", &paths.output_dir.display().to_string());

    let pipeline = Pipeline::new(paths)
        .with_rebuild(rebuild)
        .with_raw_dump(raw_dump || config.raw_dump());

    let spinner = Spinner::new("Merging sources...");
    let result = pipeline.run(&SpinnerDiagnostics::new(&spinner, &TracingDiagnostics));
    spinner.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            ui::error(&format!("Merge failed: {}", e));
            return Err(e.into());
        }
    };

    ui::section("Summary");
    ui::summary_row("Source:", summary.source.as_str());
    ui::summary_row("Records:", &summary.records.to_string());
    for (file, stats) in &summary.stages {
        ui::summary_row(&format!("{}:", file), &stats.to_string());
    }
    ui::summary_row("Map:", &summary.map_file.display().to_string());
    ui::summary_row("Lines:", &summary.lines_file.display().to_string());
    if let Some(raw) = &summary.raw_dump {
        ui::summary_row("Raw dump:", &raw.display().to_string());
    }
    ui::timing(&format!(
        "load {:.2?}, enrich {:.2?}, total {:.2?}",
        summary.load_time, summary.enrich_time, summary.total_time
    ));
    if summary.lines_written == 0 {
        ui::warn("No records written; check the repertoire XML");
    } else {
        ui::success(&format!("Wrote {} records", summary.lines_written));
    }
    Ok(())
}

pub fn run_emoji(
    config: &UcdMergeConfig,
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let paths = PipelinePaths::new(
        data_dir.unwrap_or_else(|| config.data_dir()),
        output_dir.unwrap_or_else(|| config.output_dir()),
    );

    ui::header("Building emoji table");
    ui::status(Icons::PACKAGE, "Data", &paths.data_dir.display().to_string());

    let spinner = Spinner::new("Reading emoji files...");
    let diag = SpinnerDiagnostics::new(&spinner, &TracingDiagnostics);
    let result = build_emoji_table(&paths.data_dir, &diag)
        .and_then(|(table, stages)| save_emoji_table(&table, &paths.emoji_file(), &diag).map(|_| (table, stages)));
    spinner.finish_and_clear();

    let (table, stages) = match result {
        Ok(built) => built,
        Err(e) => {
            ui::error(&format!("Emoji build failed: {}", e));
            return Err(e.into());
        }
    };

    ui::section("Summary");
    for (file, stats) in &stages {
        ui::summary_row(&format!("{}:", file), &stats.to_string());
    }
    ui::summary_row("Output:", &paths.emoji_file().display().to_string());
    if stages.iter().any(|(_, stats)| stats.unmatched > 0) {
        ui::warn("Some lines did not match the emoji file format");
    }
    ui::success(&format!("Wrote {} emoji", table.len()));
    Ok(())
}

pub fn run_stats(config: &UcdMergeConfig, output_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let map_path = output_dir.unwrap_or_else(|| config.output_dir()).join(MAP_FILE);
    let map = load_map(&map_path)?;

    ui::header(&format!("Codepoint map ({})", map_path.display()));
    println!("{}", stats_table(&map.stats().rows()));
    Ok(())
}

/// Normalize `U+00e9`, `e9` or `00E9` to a record key
fn normalize_code(code: &str) -> anyhow::Result<String> {
    let trimmed = code.trim();
    let hex = trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("u+"))
        .unwrap_or(trimmed);
    Ok(format_code(parse_code(hex)?))
}

pub fn run_lookup(config: &UcdMergeConfig, code: &str, output_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let map_path = output_dir.unwrap_or_else(|| config.output_dir()).join(MAP_FILE);
    let key = normalize_code(code)?;
    let map = load_map(&map_path)?;

    let Some(record) = map.get(&key) else {
        anyhow::bail!("codepoint {} not found in {}", key, map_path.display());
    };
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

pub fn run_init(path: &Path, force: bool) -> anyhow::Result<()> {
    let config = UcdMergeConfig {
        data_dir: Some(ucdmerge::config::default_data_dir().display().to_string()),
        output_dir: Some(ucdmerge::config::default_output_dir().display().to_string()),
        raw_dump: Some(false),
    };
    write_config(path, &config, force)?;
    ui::success(&format!("Wrote config to {}", path.display()));
    Ok(())
}
