//! Reproducible, seeded draws of pattern dances per competition category.
//!
//! Layers, innermost first:
//! - [`domain`]: category trees, seed resolution, sampling (no I/O)
//! - [`application`]: the draw pipeline, report and record rendering
//! - [`infrastructure`]: filesystem and clock boundaries, service wiring
//! - [`cli`]: argument parsing, command dispatch, terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
