//! CLI command implementations.

pub mod apply;
pub mod common;
pub mod gates;
pub mod generate;
pub mod show;
pub mod version;
