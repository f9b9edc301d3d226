//! ucdmerge CLI - Merge Unicode Character Database files into per-codepoint JSON

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ucdmerge")]
#[command(version)]
#[command(about = "Unicode Character Database merge engine - one JSON record per codepoint")]
#[command(long_about = r#"
ucdmerge merges the flattened UCD XML with Index.txt, NamesList.txt and
ScriptExtensions.txt into:
  • ucd-map.json    keyed map, reusable in place of the XML
  • ucd-lines.json  one record per line, sorted by codepoint

The emoji command builds emoji.json from emoji-test.txt and emoji-data.txt.

Example usage:
  ucdmerge run --data-dir ./tmp --output-dir ./output
  ucdmerge stats
  ucdmerge lookup 00E9
  ucdmerge emoji
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the UCD sources and write both outputs
    Run {
        /// Directory holding ucd.all.flat.xml and the UCD text files
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Directory receiving ucd-map.json and ucd-lines.json
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Parse the XML even if ucd-map.json exists
        #[arg(long)]
        rebuild: bool,

        /// Also write the parsed repertoire to ucd.all.flat.json
        #[arg(long)]
        raw_dump: bool,
    },

    /// Build emoji.json from emoji-test.txt and emoji-data.txt
    Emoji {
        /// Directory holding the emoji text files
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Directory receiving emoji.json
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Show statistics about an existing keyed map
    Stats {
        /// Directory holding ucd-map.json
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print one record from the keyed map
    Lookup {
        /// Codepoint in hex, with or without a U+ prefix
        code: String,

        /// Directory holding ucd-map.json
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = ucdmerge::config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Run {
            data_dir,
            output_dir,
            rebuild,
            raw_dump,
        } => commands::run_merge(&config, data_dir, output_dir, rebuild, raw_dump),

        Commands::Emoji { data_dir, output_dir } => commands::run_emoji(&config, data_dir, output_dir),

        Commands::Stats { output_dir } => commands::run_stats(&config, output_dir),

        Commands::Lookup { code, output_dir } => commands::run_lookup(&config, &code, output_dir),

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(ucdmerge::config::default_config_path);
            commands::run_init(&path, force)
        }
    }
}
