//! Core types, errors and configuration shared by the tinker crates.

pub mod bytecode;
pub mod config;
pub mod error;
pub mod types;
