#![forbid(unsafe_code)]

//! Core domain model and checking logic for the medcheck system.
//!
//! This crate provides:
//! - Domain types (drugs, components, formulary tables, reports)
//! - The built-in formulary and TOML formulary loading
//! - The drug checking engine (dose totals, overdoses, interactions,
//!   side effects)
//! - Configuration

pub mod types;
pub mod error;
pub mod formulary;
pub mod config;
pub mod logging;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use formulary::{build_default_formulary, default_formulary};
pub use config::Config;
pub use engine::{check_drugs, NO_SIDE_EFFECT_DATA};
