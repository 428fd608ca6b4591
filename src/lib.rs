// logtools - lib.rs
//
// Library entry point: line format registry, line codec, record producer,
// and log-file analysis. The `logtools` binary in `main.rs` is a thin CLI
// over these modules.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
