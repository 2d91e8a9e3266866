//! Command implementations for the solscribe CLI
//!
//! There is a single workflow: `summarize` loads the configuration, wires the
//! production clients and runs one contract through the summarizer.

pub mod summarize;
