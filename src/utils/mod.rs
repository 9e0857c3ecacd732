//! Configuration for the grid renderer

pub mod config;

pub use config::{ConfigError, ConfigResult, ConfigurationManager, GridConfig};
