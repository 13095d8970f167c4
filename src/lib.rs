//! Process plumbing shared by the `files-server` and `files-jobs` binaries.

pub mod cli;
pub mod shutdown;
pub mod telemetry;
