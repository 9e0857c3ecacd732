//! Core value types and constants for the ground grid renderer

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
