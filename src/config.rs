use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UcdMergeConfig {
    /// Directory holding the UCD XML and text files
    pub data_dir: Option<String>,
    /// Directory receiving `ucd-map.json` and `ucd-lines.json`
    pub output_dir: Option<String>,
    /// Dump the parsed repertoire as JSON next to the XML
    pub raw_dump: Option<bool>,
}

impl UcdMergeConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.as_deref().map(PathBuf::from).unwrap_or_else(default_data_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.as_deref().map(PathBuf::from).unwrap_or_else(default_output_dir)
    }

    pub fn raw_dump(&self) -> bool {
        self.raw_dump.unwrap_or(false)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("ucdmerge.toml")
}

pub fn default_data_dir() -> PathBuf {
    PathBuf::from("tmp")
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<UcdMergeConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: UcdMergeConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &UcdMergeConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
