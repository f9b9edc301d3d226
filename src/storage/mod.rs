//! Storage Layer - JSON persistence
//!
//! Two artifacts:
//! - keyed map (`ucd-map.json`): one pretty-printed object keyed by code,
//!   reloadable in place of the XML
//! - line stream (`ucd-lines.json`): one compact record per line, sorted and
//!   pruned

pub mod map_file;
pub mod json_lines;

pub use map_file::{load_map, save_map};
pub use json_lines::{write_json_lines, JsonLinesWriter};
