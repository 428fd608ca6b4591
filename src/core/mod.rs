// logtools - core/mod.rs
//
// Core logic layer: format registry, literal values, line codec, dataset.
// Dependencies: util layer and pure data crates (serde, chrono, csv).
// Must NOT depend on: platform, app, or perform file I/O itself.

pub mod caller;
pub mod codec;
pub mod export;
pub mod format;
pub mod literal;
pub mod model;
pub mod table;
