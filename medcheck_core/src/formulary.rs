//! Default formulary of drugs, side effects, interactions, and safe limits.
//!
//! This module provides the built-in reference tables for the system and
//! the TOML loader used to inject alternate tables.

use crate::types::*;
use crate::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Cached default formulary - built once and reused across all operations
static DEFAULT_FORMULARY: Lazy<Formulary> = Lazy::new(build_default_formulary_internal);

/// Get a reference to the cached default formulary
///
/// This function returns a reference to the pre-built tables, avoiding
/// the overhead of rebuilding them on every check.
pub fn default_formulary() -> &'static Formulary {
    &DEFAULT_FORMULARY
}

/// Builds the default formulary with built-in reference tables
///
/// **Note**: For production use, prefer `default_formulary()` which returns
/// a cached reference. This function is retained for testing and custom
/// formulary creation.
pub fn build_default_formulary() -> Formulary {
    build_default_formulary_internal()
}

/// Internal function that actually builds the formulary
fn build_default_formulary_internal() -> Formulary {
    let mut drugs = HashMap::new();
    let mut side_effects = HashMap::new();
    let mut safe_limits = HashMap::new();

    // ========================================================================
    // Drugs
    // ========================================================================

    drugs.insert(
        "Combiflam".into(),
        Drug {
            name: "Combiflam".into(),
            composition: vec![
                ComponentDose {
                    component: "Paracetamol".into(),
                    mg: 500,
                },
                ComponentDose {
                    component: "Ibuprofen".into(),
                    mg: 400,
                },
            ],
        },
    );

    drugs.insert(
        "Crocin".into(),
        Drug {
            name: "Crocin".into(),
            composition: vec![ComponentDose {
                component: "Paracetamol".into(),
                mg: 500,
            }],
        },
    );

    drugs.insert(
        "Advil".into(),
        Drug {
            name: "Advil".into(),
            composition: vec![ComponentDose {
                component: "Ibuprofen".into(),
                mg: 200,
            }],
        },
    );

    drugs.insert(
        "Disprin".into(),
        Drug {
            name: "Disprin".into(),
            composition: vec![ComponentDose {
                component: "Aspirin".into(),
                mg: 325,
            }],
        },
    );

    // ========================================================================
    // Side Effects
    // ========================================================================

    side_effects.insert(
        "Paracetamol".into(),
        vec!["Liver damage in high doses".into()],
    );
    side_effects.insert(
        "Ibuprofen".into(),
        vec![
            "Stomach pain".into(),
            "Nausea".into(),
            "Bleeding risk".into(),
        ],
    );
    side_effects.insert(
        "Aspirin".into(),
        vec!["Gastric irritation".into(), "Bleeding".into()],
    );

    // ========================================================================
    // Interactions
    // ========================================================================

    let interactions = vec![
        Interaction {
            between: ["Paracetamol".into(), "Ibuprofen".into()],
            effect: "Generally safe but monitor for gastrointestinal issues".into(),
        },
        Interaction {
            between: ["Ibuprofen".into(), "Aspirin".into()],
            effect: "Increased risk of bleeding".into(),
        },
    ];

    // ========================================================================
    // Safe Limits (cumulative mg per day)
    // ========================================================================

    safe_limits.insert("Paracetamol".into(), 4000);
    safe_limits.insert("Ibuprofen".into(), 1200);
    safe_limits.insert("Aspirin".into(), 4000);

    Formulary {
        drugs,
        side_effects,
        interactions,
        safe_limits,
    }
}

impl Formulary {
    /// Load a formulary from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let formulary: Formulary = toml::from_str(&contents)?;
        tracing::info!(
            "Loaded formulary with {} drugs from {:?}",
            formulary.drugs.len(),
            path
        );
        Ok(formulary)
    }

    /// Look up a drug by its exact, case-sensitive name
    pub fn drug(&self, name: &str) -> Option<&Drug> {
        self.drugs.get(name)
    }

    /// Look up the interaction between two components, in either orientation
    ///
    /// Returns the pair as stored in the table (the orientation that
    /// matched) together with the interaction text.
    pub fn interaction_between(&self, a: &str, b: &str) -> Option<(&[String; 2], &str)> {
        self.interactions.iter().find_map(|entry| {
            let [first, second] = &entry.between;
            if (first == a && second == b) || (first == b && second == a) {
                Some((&entry.between, entry.effect.as_str()))
            } else {
                None
            }
        })
    }

    /// Validate the formulary for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, drug) in &self.drugs {
            if name.is_empty() || drug.name.is_empty() {
                errors.push("Drug has empty name".to_string());
            }
            if name != &drug.name {
                errors.push(format!(
                    "Drug key '{}' doesn't match drug.name '{}'",
                    name, drug.name
                ));
            }
            if drug.composition.is_empty() {
                errors.push(format!("Drug '{}' has no composition", name));
            }
            for dose in &drug.composition {
                if dose.component.is_empty() {
                    errors.push(format!("Drug '{}' has a component with empty name", name));
                }
                if dose.mg == 0 {
                    errors.push(format!(
                        "Drug '{}' lists component '{}' at 0mg",
                        name, dose.component
                    ));
                }
            }
        }

        let mut seen_pairs: Vec<[&str; 2]> = Vec::new();
        for entry in &self.interactions {
            let [a, b] = &entry.between;
            if a.is_empty() || b.is_empty() {
                errors.push("Interaction has an empty component name".to_string());
            }
            if a == b {
                errors.push(format!("Interaction pairs component '{}' with itself", a));
            }
            if entry.effect.is_empty() {
                errors.push(format!("Interaction ({}, {}) has empty effect text", a, b));
            }
            let seen = seen_pairs
                .iter()
                .any(|[x, y]| (x == a && y == b) || (x == b && y == a));
            if seen {
                errors.push(format!("Duplicate interaction pair ({}, {})", a, b));
            } else {
                seen_pairs.push([a.as_str(), b.as_str()]);
            }
        }

        for (component, effects) in &self.side_effects {
            if component.is_empty() {
                errors.push("Side-effect table has an empty component name".to_string());
            }
            if effects.is_empty() {
                errors.push(format!(
                    "Component '{}' has an empty side-effect list",
                    component
                ));
            }
        }

        for (component, limit) in &self.safe_limits {
            if component.is_empty() {
                errors.push("Safe-limit table has an empty component name".to_string());
            }
            if *limit == 0 {
                errors.push(format!("Component '{}' has a safe limit of 0mg", component));
            }
        }

        errors
    }
}
