//! Manifest configuration: TOML recipes declaring one or more jobs.

mod manifest;

pub use manifest::{JobEntry, Manifest, build_job, configure, load_manifest, parse_manifest};
