//! Repertoire - the UCD XML export turned into base codepoint records
//!
//! Two steps, kept apart so the record logic never sees XML:
//! - [`raw`] reads the XML into typed [`RawChar`] attribute structs
//! - [`loader`] derives one [`CodepointRecord`](crate::CodepointRecord) per entry

pub mod raw;
pub mod loader;

pub use raw::{read_repertoire, parse_repertoire, NameAlias, RawChar, Repertoire};
pub use loader::RepertoireLoader;
