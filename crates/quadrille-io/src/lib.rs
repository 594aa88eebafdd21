//! # Quadrille I/O
//!
//! The explicit render configuration (JSON on disk, full defaults in code)
//! and the frame writer that persists a composed frame under the configured
//! media directory.

pub mod config;
pub mod output;

pub use config::{RenderConfig, ConfigError};
pub use output::{FrameWriter, OutputError, WrittenFrame};
