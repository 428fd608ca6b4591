// logtools - app/mod.rs
//
// Application layer: record production, log-file ingestion, renaming.
// Dependencies: core, platform, util layers.

pub mod ingest;
pub mod line_layer;
pub mod logger;
pub mod rename;
