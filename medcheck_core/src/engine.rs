//! Drug checking engine.
//!
//! This module implements the checking pipeline:
//! - Resolve requested drug names against the formulary
//! - Accumulate per-component dose totals
//! - Detect overdoses, pairwise interactions, and known side effects

use crate::{
    ComponentSideEffects, ComponentTotal, DrugComposition, DrugReport, Error, Formulary,
    InteractionWarning, OverdoseWarning, Result,
};

/// Placeholder entry for components missing from the side-effect table
pub const NO_SIDE_EFFECT_DATA: &str = "No data available";

/// Check a sequence of drug names against the formulary
///
/// ## Checking pipeline
///
/// 1. **Resolution**: every name must match a formulary drug exactly
///    (case-sensitive). The first miss aborts the whole check with
///    `Error::UnknownDrug`; no partial report is produced.
///
/// 2. **Accumulation**: component totals sum doses across all requested
///    drugs. Duplicate request entries each contribute their full dose,
///    but the composition listing keeps only the first occurrence of a
///    drug name.
///
/// 3. **Detection passes**: overdose warnings for components whose total
///    strictly exceeds a configured safe limit, one interaction entry per
///    unordered component pair found in the table, and a side-effect list
///    for every component in the totals.
///
/// The report is a pure function of the formulary and the request: the
/// same inputs always produce a field-for-field identical report.
pub fn check_drugs(formulary: &Formulary, names: &[String]) -> Result<DrugReport> {
    let mut compositions: Vec<DrugComposition> = Vec::new();
    let mut totals: Vec<ComponentTotal> = Vec::new();

    for name in names {
        let drug = formulary
            .drug(name)
            .ok_or_else(|| Error::UnknownDrug(name.clone()))?;

        // First occurrence wins; later duplicates still contribute doses
        if !compositions.iter().any(|c| c.drug == drug.name) {
            compositions.push(DrugComposition {
                drug: drug.name.clone(),
                composition: drug.composition.clone(),
            });
        }

        for dose in &drug.composition {
            match totals.iter().position(|t| t.component == dose.component) {
                Some(idx) => totals[idx].total_mg += dose.mg,
                None => totals.push(ComponentTotal {
                    component: dose.component.clone(),
                    total_mg: dose.mg,
                }),
            }
        }
    }

    let warnings = detect_overdoses(formulary, &totals);
    let interactions = detect_interactions(formulary, &totals);
    let side_effects = collect_side_effects(formulary, &totals);

    tracing::info!(
        "Checked {} drugs: {} components, {} overdose warnings, {} interactions",
        names.len(),
        totals.len(),
        warnings.len(),
        interactions.len()
    );

    Ok(DrugReport {
        compositions,
        totals,
        warnings,
        interactions,
        side_effects,
    })
}

/// Flag components whose cumulative dose strictly exceeds their safe limit
///
/// Components without a configured limit are exempt. A total exactly at
/// the limit does not warn.
fn detect_overdoses(formulary: &Formulary, totals: &[ComponentTotal]) -> Vec<OverdoseWarning> {
    let mut warnings = Vec::new();

    for total in totals {
        if let Some(&limit_mg) = formulary.safe_limits.get(&total.component) {
            if total.total_mg > limit_mg {
                tracing::debug!(
                    "{}: {}mg exceeds limit of {}mg",
                    total.component,
                    total.total_mg,
                    limit_mg
                );
                warnings.push(OverdoseWarning {
                    component: total.component.clone(),
                    total_mg: total.total_mg,
                    limit_mg,
                    message: format!("Exceeds safe limit of {}mg", limit_mg),
                });
            }
        }
    }

    warnings
}

/// Look up every unordered pair of accumulated components in the
/// interaction table
///
/// Pairs are visited once each (i < j over first-appearance order), so a
/// pair can contribute at most one entry regardless of how many drugs
/// supplied either component.
fn detect_interactions(
    formulary: &Formulary,
    totals: &[ComponentTotal],
) -> Vec<InteractionWarning> {
    let mut found = Vec::new();

    for i in 0..totals.len() {
        for j in (i + 1)..totals.len() {
            if let Some((between, effect)) =
                formulary.interaction_between(&totals[i].component, &totals[j].component)
            {
                found.push(InteractionWarning {
                    between: between.clone(),
                    effect: effect.to_string(),
                });
            }
        }
    }

    found
}

/// Attach the known side-effect list to every accumulated component
///
/// Components missing from the table get a single placeholder entry, so
/// every component in the totals has a non-empty list.
fn collect_side_effects(
    formulary: &Formulary,
    totals: &[ComponentTotal],
) -> Vec<ComponentSideEffects> {
    totals
        .iter()
        .map(|total| ComponentSideEffects {
            component: total.component.clone(),
            effects: formulary
                .side_effects
                .get(&total.component)
                .cloned()
                .unwrap_or_else(|| vec![NO_SIDE_EFFECT_DATA.to_string()]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_formulary;
    use crate::types::{ComponentDose, Drug};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn total_for<'a>(report: &'a DrugReport, component: &str) -> &'a ComponentTotal {
        report
            .totals
            .iter()
            .find(|t| t.component == component)
            .unwrap_or_else(|| panic!("No total for {}", component))
    }

    #[test]
    fn test_totals_sum_across_drugs() {
        let formulary = build_default_formulary();

        let report = check_drugs(&formulary, &names(&["Combiflam", "Crocin"])).unwrap();

        assert_eq!(total_for(&report, "Paracetamol").total_mg, 1000);
        assert_eq!(total_for(&report, "Ibuprofen").total_mg, 400);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_interaction_detected_between_components() {
        let formulary = build_default_formulary();

        let report = check_drugs(&formulary, &names(&["Combiflam", "Crocin"])).unwrap();

        assert_eq!(report.interactions.len(), 1);
        let interaction = &report.interactions[0];
        assert_eq!(interaction.between[0], "Paracetamol");
        assert_eq!(interaction.between[1], "Ibuprofen");
        assert!(interaction.effect.contains("gastrointestinal"));
    }

    #[test]
    fn test_unknown_drug_aborts_whole_check() {
        let formulary = build_default_formulary();

        let result = check_drugs(&formulary, &names(&["Combiflam", "Unknown", "Crocin"]));

        match result {
            Err(Error::UnknownDrug(name)) => assert_eq!(name, "Unknown"),
            other => panic!("Expected UnknownDrug, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicates_accumulate_but_list_once() {
        let formulary = build_default_formulary();

        let report = check_drugs(
            &formulary,
            &names(&["Combiflam", "Combiflam", "Combiflam"]),
        )
        .unwrap();

        // Doses accumulate per occurrence
        assert_eq!(total_for(&report, "Paracetamol").total_mg, 1500);
        assert_eq!(total_for(&report, "Ibuprofen").total_mg, 1200);

        // The composition listing keeps a single entry
        assert_eq!(report.compositions.len(), 1);
        assert_eq!(report.compositions[0].drug, "Combiflam");
    }

    #[test]
    fn test_total_at_limit_does_not_warn() {
        let formulary = build_default_formulary();

        // 3 x Combiflam puts Ibuprofen exactly at its 1200mg limit
        let report = check_drugs(
            &formulary,
            &names(&["Combiflam", "Combiflam", "Combiflam"]),
        )
        .unwrap();

        assert_eq!(total_for(&report, "Ibuprofen").total_mg, 1200);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_six_advil_also_sits_at_limit() {
        let formulary = build_default_formulary();

        let report = check_drugs(
            &formulary,
            &names(&["Advil", "Advil", "Advil", "Advil", "Advil", "Advil"]),
        )
        .unwrap();

        assert_eq!(total_for(&report, "Ibuprofen").total_mg, 1200);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_total_above_limit_warns() {
        let formulary = build_default_formulary();

        // 4 x Combiflam: Ibuprofen 1600mg > 1200mg limit
        let report = check_drugs(
            &formulary,
            &names(&["Combiflam", "Combiflam", "Combiflam", "Combiflam"]),
        )
        .unwrap();

        assert_eq!(report.warnings.len(), 1);
        let warning = &report.warnings[0];
        assert_eq!(warning.component, "Ibuprofen");
        assert_eq!(warning.total_mg, 1600);
        assert_eq!(warning.limit_mg, 1200);
        assert_eq!(warning.message, "Exceeds safe limit of 1200mg");
    }

    #[test]
    fn test_component_without_limit_is_exempt() {
        let mut formulary = build_default_formulary();
        formulary.drugs.insert(
            "Caffedrine".into(),
            Drug {
                name: "Caffedrine".into(),
                composition: vec![ComponentDose {
                    component: "Caffeine".into(),
                    mg: 200,
                }],
            },
        );

        // 50 doses of an unlimited component: no warning, not an error
        let request = vec!["Caffedrine".to_string(); 50];
        let report = check_drugs(&formulary, &request).unwrap();

        assert_eq!(total_for(&report, "Caffeine").total_mg, 10_000);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unlisted_pair_yields_no_interaction() {
        let formulary = build_default_formulary();

        // Aspirin and Paracetamol have no interaction entry
        let report = check_drugs(&formulary, &names(&["Disprin", "Crocin"])).unwrap();

        assert!(report.interactions.is_empty());
    }

    #[test]
    fn test_interaction_matches_reverse_orientation() {
        let formulary = build_default_formulary();

        // Advil first means the pair is visited as (Ibuprofen, Aspirin),
        // Disprin first as (Aspirin, Ibuprofen); both must match the same
        // table entry and report the stored orientation.
        let forward = check_drugs(&formulary, &names(&["Advil", "Disprin"])).unwrap();
        let reverse = check_drugs(&formulary, &names(&["Disprin", "Advil"])).unwrap();

        assert_eq!(forward.interactions.len(), 1);
        assert_eq!(forward.interactions, reverse.interactions);
        assert_eq!(forward.interactions[0].between[0], "Ibuprofen");
        assert_eq!(forward.interactions[0].between[1], "Aspirin");
        assert_eq!(
            forward.interactions[0].effect,
            "Increased risk of bleeding"
        );
    }

    #[test]
    fn test_pair_reported_at_most_once() {
        let formulary = build_default_formulary();

        // Paracetamol and Ibuprofen each arrive via several drugs; the
        // pair must still appear exactly once.
        let report = check_drugs(
            &formulary,
            &names(&["Combiflam", "Crocin", "Advil", "Combiflam"]),
        )
        .unwrap();

        assert_eq!(report.interactions.len(), 1);
    }

    #[test]
    fn test_side_effects_cover_every_component() {
        let formulary = build_default_formulary();

        let report = check_drugs(&formulary, &names(&["Combiflam", "Disprin"])).unwrap();

        assert_eq!(report.side_effects.len(), report.totals.len());
        for (entry, total) in report.side_effects.iter().zip(&report.totals) {
            assert_eq!(entry.component, total.component);
            assert!(!entry.effects.is_empty());
        }
    }

    #[test]
    fn test_unknown_component_gets_placeholder_side_effects() {
        let mut formulary = build_default_formulary();
        formulary.drugs.insert(
            "Caffedrine".into(),
            Drug {
                name: "Caffedrine".into(),
                composition: vec![ComponentDose {
                    component: "Caffeine".into(),
                    mg: 200,
                }],
            },
        );

        let report = check_drugs(&formulary, &names(&["Caffedrine"])).unwrap();

        assert_eq!(
            report.side_effects[0].effects,
            vec![NO_SIDE_EFFECT_DATA.to_string()]
        );
    }

    #[test]
    fn test_empty_request_yields_empty_report() {
        let formulary = build_default_formulary();

        let report = check_drugs(&formulary, &[]).unwrap();

        assert!(report.compositions.is_empty());
        assert!(report.totals.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.interactions.is_empty());
        assert!(report.side_effects.is_empty());
    }

    #[test]
    fn test_totals_keep_first_appearance_order() {
        let formulary = build_default_formulary();

        let report = check_drugs(&formulary, &names(&["Disprin", "Combiflam"])).unwrap();

        let order: Vec<&str> = report
            .totals
            .iter()
            .map(|t| t.component.as_str())
            .collect();
        assert_eq!(order, vec!["Aspirin", "Paracetamol", "Ibuprofen"]);
    }

    #[test]
    fn test_check_is_idempotent() {
        let formulary = build_default_formulary();
        let request = names(&["Combiflam", "Crocin", "Advil", "Disprin"]);

        let first = check_drugs(&formulary, &request).unwrap();
        let second = check_drugs(&formulary, &request).unwrap();

        assert_eq!(first, second);
    }
}
