//! Wall canopy calculator.
//!
//! Canopies project off a wall: tapered rafters at the frame spacing,
//! purlins selected through the purlin band, sheeting over the projected
//! area and an eave trim along the edge.

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, CostCategory};
use crate::dimlist::DimensionList;
use crate::engine::emit;
use crate::errors::{EstimateError, EstimateResult};
use crate::refdata::bands::BandKind;
use crate::refdata::ReferenceStore;

use super::{SubsystemCalculator, SubsystemKind};

/// Canopy rafter spacing along the wall (m)
const RAFTER_SPACING_M: f64 = 6.0;

/// Purlin spacing across the projection (m)
const PURLIN_SPACING_M: f64 = 1.5;

/// Canopy roof design load for purlin selection (kN/m2)
const CANOPY_LOAD_KNM2: f64 = 0.57;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyInput {
    pub label: String,
    /// Canopy lengths along the wall, compact notation
    pub runs: String,
    /// Projection off the wall face (m)
    pub projection_m: f64,
}

impl SubsystemCalculator for CanopyInput {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Canopy
    }

    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials> {
        let runs = DimensionList::parse_named("canopy.runs", &self.runs)?;
        if runs.is_empty() || runs.total_span() <= 0.0 {
            return Err(EstimateError::invalid_input(
                "canopy.runs",
                self.runs.clone(),
                "Canopy needs at least one run with positive length",
            ));
        }
        if self.projection_m <= 0.0 {
            return Err(EstimateError::invalid_input(
                "canopy.projection_m",
                self.projection_m.to_string(),
                "Canopy projection must be positive",
            ));
        }

        let total_run = runs.total_span();
        let purlin_index =
            CANOPY_LOAD_KNM2 * PURLIN_SPACING_M * RAFTER_SPACING_M.powi(2) / 8.0;
        let purlin_code = store.select_by_index(BandKind::Purlin, purlin_index)?;

        let rafters: f64 = runs
            .expand()
            .into_iter()
            .map(|run| (run / RAFTER_SPACING_M).ceil() + 1.0)
            .sum();
        let purlin_lines = (self.projection_m / PURLIN_SPACING_M).ceil() + 1.0;
        let roof_area = total_run * self.projection_m;

        let mut bom = BillOfMaterials::new();
        bom.push_header(format!("CANOPY - {}", self.label));
        emit(
            &mut bom,
            store,
            "CAN-RAF",
            rafters * self.projection_m,
            CostCategory::Steel,
            "canopy rafter",
        )?;
        emit(
            &mut bom,
            store,
            purlin_code,
            purlin_lines * total_run,
            CostCategory::Steel,
            "canopy purlin selection",
        )?;
        emit(&mut bom, store, "PAN-R-045", roof_area, CostCategory::Panels, "canopy sheeting")?;
        emit(&mut bom, store, "TRIM-EAVE", total_run, CostCategory::Trims, "canopy edge trim")?;

        Ok(bom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata::builtin_store;

    fn sample() -> CanopyInput {
        CanopyInput {
            label: "CAN-1".to_string(),
            runs: "1@36".to_string(),
            projection_m: 3.0,
        }
    }

    #[test]
    fn test_canopy_bom() {
        let store = builtin_store();
        let bom = sample().calculate(&store).unwrap();

        // 36/6 + 1 = 7 rafters at 3 m projection
        let rafters = bom.items().find(|i| i.db_code == "CAN-RAF").unwrap();
        assert!((rafters.quantity - 21.0).abs() < 1e-9);
        // 3/1.5 + 1 = 3 purlin lines over 36 m
        let purlins = bom.items().find(|i| i.db_code == "Z150-15").unwrap();
        assert!((purlins.quantity - 108.0).abs() < 1e-9);
        let sheet = bom.items().find(|i| i.db_code == "PAN-R-045").unwrap();
        assert!((sheet.quantity - 108.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_projection_rejected() {
        let store = builtin_store();
        let err = CanopyInput { projection_m: 0.0, ..sample() }
            .calculate(&store)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_multiple_runs_sum() {
        let store = builtin_store();
        let bom = CanopyInput {
            runs: "2@18".to_string(),
            ..sample()
        }
        .calculate(&store)
        .unwrap();
        // (18/6 + 1) * 2 = 8 rafters
        let rafters = bom.items().find(|i| i.db_code == "CAN-RAF").unwrap();
        assert!((rafters.quantity - 24.0).abs() < 1e-9);
    }
}
