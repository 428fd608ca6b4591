// logtools - platform/mod.rs
//
// Platform abstraction layer: config file location and filesystem access.
// Dependencies: util layer, directories, walkdir, toml.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
