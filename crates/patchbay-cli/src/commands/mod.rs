//! CLI command implementations.

pub mod demo;
pub mod describe;
pub mod modules;
