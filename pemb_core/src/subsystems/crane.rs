//! Overhead crane system calculator.
//!
//! Capacity picks the runway beam and rail sections; duty class picks the
//! bracket. Rail runs arrive as their own dimension list (one group per
//! runway, e.g. "2@30" for two 30 m runways).

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, CostCategory};
use crate::dimlist::DimensionList;
use crate::engine::emit;
use crate::errors::{EstimateError, EstimateResult};
use crate::refdata::ReferenceStore;

use super::{SubsystemCalculator, SubsystemKind};

/// Bracket spacing along a runway (m)
const BRACKET_SPACING_M: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CraneInput {
    pub label: String,
    /// Safe working load in metric tons
    pub capacity_mt: f64,
    /// Duty class: "LIGHT", "MEDIUM" or "HEAVY" (unknown reads as heavy)
    pub duty: String,
    /// Runway lengths in compact notation, one group per runway
    pub rail_runs: String,
    pub hook_height_m: f64,
}

impl CraneInput {
    /// Runway beam section by capacity band
    fn beam_code(&self) -> &'static str {
        if self.capacity_mt <= 5.0 {
            "CB-W300"
        } else if self.capacity_mt <= 10.0 {
            "CB-W400"
        } else if self.capacity_mt <= 20.0 {
            "CB-W500"
        } else {
            "CB-BU"
        }
    }

    /// Rail section by capacity band
    fn rail_code(&self) -> &'static str {
        if self.capacity_mt <= 10.0 {
            "RAIL-A55"
        } else {
            "RAIL-A75"
        }
    }

    /// Bracket by duty class
    fn bracket_code(&self) -> &'static str {
        match self.duty.trim().to_uppercase().as_str() {
            "LIGHT" => "CRN-BKT-L",
            "MEDIUM" => "CRN-BKT-M",
            _ => "CRN-BKT-H",
        }
    }
}

impl SubsystemCalculator for CraneInput {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Crane
    }

    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials> {
        let runs = DimensionList::parse_named("crane.rail_runs", &self.rail_runs)?;
        if runs.is_empty() || runs.total_span() <= 0.0 {
            return Err(EstimateError::invalid_input(
                "crane.rail_runs",
                self.rail_runs.clone(),
                "Crane needs at least one rail run with positive length",
            ));
        }
        if self.capacity_mt <= 0.0 {
            return Err(EstimateError::invalid_input(
                "crane.capacity_mt",
                self.capacity_mt.to_string(),
                "Crane capacity must be positive",
            ));
        }

        let rail_m = runs.total_span();
        // One bracket per spacing interval plus the ends, per runway
        let brackets: f64 = runs
            .expand()
            .into_iter()
            .map(|run| (run / BRACKET_SPACING_M).ceil() + 1.0)
            .sum();
        let stops = 2.0 * runs.total_count() as f64;

        let mut bom = BillOfMaterials::new();
        bom.push_header(format!("CRANE SYSTEM - {}", self.label));
        emit(&mut bom, store, self.beam_code(), rail_m, CostCategory::Ssl, "crane runway beam")?;
        emit(&mut bom, store, self.rail_code(), rail_m, CostCategory::Ssl, "crane rail")?;
        emit(&mut bom, store, self.bracket_code(), brackets, CostCategory::Ssl, "crane bracket")?;
        emit(&mut bom, store, "CRN-STOP", stops, CostCategory::Ssl, "crane end stop")?;

        Ok(bom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata::builtin_store;

    fn sample() -> CraneInput {
        CraneInput {
            label: "CR-1".to_string(),
            capacity_mt: 10.0,
            duty: "MEDIUM".to_string(),
            rail_runs: "2@30".to_string(),
            hook_height_m: 6.0,
        }
    }

    #[test]
    fn test_crane_bom() {
        let store = builtin_store();
        let bom = sample().calculate(&store).unwrap();

        let beam = bom.items().find(|i| i.db_code == "CB-W400").unwrap();
        assert!((beam.quantity - 60.0).abs() < 1e-9);
        let rail = bom.items().find(|i| i.db_code == "RAIL-A55").unwrap();
        assert!((rail.quantity - 60.0).abs() < 1e-9);
        // 30/6 + 1 = 6 brackets per runway
        let brackets = bom.items().find(|i| i.db_code == "CRN-BKT-M").unwrap();
        assert!((brackets.quantity - 12.0).abs() < 1e-9);
        let stops = bom.items().find(|i| i.db_code == "CRN-STOP").unwrap();
        assert!((stops.quantity - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_bands() {
        assert_eq!(CraneInput { capacity_mt: 3.0, ..sample() }.beam_code(), "CB-W300");
        assert_eq!(CraneInput { capacity_mt: 10.0, ..sample() }.beam_code(), "CB-W400");
        assert_eq!(CraneInput { capacity_mt: 15.0, ..sample() }.beam_code(), "CB-W500");
        assert_eq!(CraneInput { capacity_mt: 40.0, ..sample() }.beam_code(), "CB-BU");
        assert_eq!(CraneInput { capacity_mt: 15.0, ..sample() }.rail_code(), "RAIL-A75");
    }

    #[test]
    fn test_duty_selects_bracket() {
        assert_eq!(CraneInput { duty: "light".to_string(), ..sample() }.bracket_code(), "CRN-BKT-L");
        assert_eq!(CraneInput { duty: "HEAVY".to_string(), ..sample() }.bracket_code(), "CRN-BKT-H");
        // Unknown duty reads as heavy
        assert_eq!(CraneInput { duty: "severe".to_string(), ..sample() }.bracket_code(), "CRN-BKT-H");
    }

    #[test]
    fn test_missing_runs_rejected() {
        let store = builtin_store();
        let err = CraneInput { rail_runs: String::new(), ..sample() }
            .calculate(&store)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let store = builtin_store();
        let err = CraneInput { capacity_mt: 0.0, ..sample() }
            .calculate(&store)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        // A store with bands but no crane sections
        let mut store = builtin_store();
        store.set_records(crate::refdata::Catalog::Ssdb, vec![]);
        let err = sample().calculate(&store).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_REFERENCE");
    }
}
