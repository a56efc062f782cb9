//! File output layer for the forum fixture generator: segment writers,
//! progress reporting, YAML configuration and import scripts.

pub mod config;
pub mod progress;
pub mod script;
pub mod writer;
