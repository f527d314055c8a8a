//! FFmpeg/ffprobe subprocess layer.
//!
//! All media work is delegated to external tools through the
//! [`runner::CommandExecutor`] seam so stages stay testable without
//! FFmpeg installed.

pub mod extract;
pub mod merge;
pub mod mix;
pub mod probe;
pub mod runner;
