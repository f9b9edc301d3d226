//! Enricher Framework
//!
//! Each UCD text file gets one enricher that appends to records the
//! repertoire pass already created. Enrichers never add or remove records.

pub mod framework;
pub mod index;
pub mod names_list;
pub mod script_extensions;

pub use framework::{default_pipeline, for_each_line, EnrichStats, Enricher, EnricherPipeline};
pub use index::IndexEnricher;
pub use names_list::NamesListEnricher;
pub use script_extensions::ScriptExtensionEnricher;
