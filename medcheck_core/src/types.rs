//! Core domain types for the medcheck system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Drugs and their compositions
//! - The formulary reference tables (side effects, interactions, safe limits)
//! - The report produced by a check

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Formulary Types
// ============================================================================

/// One active component of a drug and its per-dose amount in milligrams
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentDose {
    pub component: String,
    pub mg: u32,
}

/// A marketed drug product with a fixed composition
///
/// Composition order is preserved as listed in the formulary so report
/// output is reproducible across runs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Drug {
    pub name: String,
    pub composition: Vec<ComponentDose>,
}

/// A documented effect of combining two components
///
/// The pair is unordered: lookups match either orientation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interaction {
    pub between: [String; 2],
    pub effect: String,
}

/// The complete set of reference tables a check runs against
///
/// All four tables are read-only for the lifetime of a check. The default
/// tables are compiled in (see the `formulary` module), but a `Formulary`
/// can equally be deserialized from a TOML file to supply alternate data.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Formulary {
    #[serde(default)]
    pub drugs: HashMap<String, Drug>,

    #[serde(default)]
    pub side_effects: HashMap<String, Vec<String>>,

    #[serde(default)]
    pub interactions: Vec<Interaction>,

    #[serde(default)]
    pub safe_limits: HashMap<String, u32>,
}

// ============================================================================
// Report Types
// ============================================================================

/// Composition snapshot for one requested drug
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrugComposition {
    pub drug: String,
    pub composition: Vec<ComponentDose>,
}

/// Cumulative dose of one component across the whole request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentTotal {
    pub component: String,
    pub total_mg: u32,
}

/// A component whose cumulative dose exceeds its configured safe limit
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverdoseWarning {
    pub component: String,
    pub total_mg: u32,
    pub limit_mg: u32,
    pub message: String,
}

/// An interaction detected between two components in the request
///
/// `between` carries the orientation stored in the formulary table, i.e.
/// the orientation that matched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionWarning {
    pub between: [String; 2],
    pub effect: String,
}

/// Known side effects for one component in the request
///
/// `effects` is never empty: components missing from the side-effect table
/// get a single placeholder entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentSideEffects {
    pub component: String,
    pub effects: Vec<String>,
}

/// The full result of checking one request
///
/// - `compositions` is in request order, de-duplicated by drug name
///   (first occurrence wins).
/// - `totals` and `side_effects` are in order of first appearance of each
///   component across the valid request sequence.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrugReport {
    pub compositions: Vec<DrugComposition>,
    pub totals: Vec<ComponentTotal>,
    pub warnings: Vec<OverdoseWarning>,
    pub interactions: Vec<InteractionWarning>,
    pub side_effects: Vec<ComponentSideEffects>,
}
