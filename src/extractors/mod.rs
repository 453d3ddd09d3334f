// src/extractors/mod.rs
pub mod document;
pub mod grid;
pub mod header;
pub mod matching;
pub mod records;
pub mod resolve;
pub mod section;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use document::{process_document, DocumentRecords};
#[allow(unused_imports)]
pub use grid::{Grid, Row};
#[allow(unused_imports)]
pub use records::Record;
