//! Interior partition calculator.
//!
//! Partitions run between posts at a fixed spacing; girts are selected
//! through the girt band from a nominal interior pressure, and panels
//! cover one or both faces.

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, CostCategory};
use crate::dimlist::DimensionList;
use crate::engine::emit;
use crate::errors::{EstimateError, EstimateResult};
use crate::refdata::bands::BandKind;
use crate::refdata::ReferenceStore;

use super::{SubsystemCalculator, SubsystemKind};

/// Post spacing along a partition run (m)
const POST_SPACING_M: f64 = 6.0;

/// Girt spacing up a partition (m)
const GIRT_SPACING_M: f64 = 1.5;

/// Nominal interior pressure for girt selection (kN/m2)
const INTERIOR_PRESSURE_KNM2: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionInput {
    pub label: String,
    /// Partition run lengths in compact notation (e.g. "1@30,1@12")
    pub runs: String,
    pub height_m: f64,
    /// Sheet both faces
    pub double_skin: bool,
}

impl SubsystemCalculator for PartitionInput {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Partition
    }

    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials> {
        let runs = DimensionList::parse_named("partition.runs", &self.runs)?;
        if runs.is_empty() || runs.total_span() <= 0.0 {
            return Err(EstimateError::invalid_input(
                "partition.runs",
                self.runs.clone(),
                "Partition needs at least one run with positive length",
            ));
        }
        if self.height_m <= 0.0 {
            return Err(EstimateError::invalid_input(
                "partition.height_m",
                self.height_m.to_string(),
                "Partition height must be positive",
            ));
        }

        let total_run = runs.total_span();

        // Girts span post to post
        let girt_index =
            INTERIOR_PRESSURE_KNM2 * GIRT_SPACING_M * POST_SPACING_M.powi(2) / 8.0;
        let girt_code = store.select_by_index(BandKind::Girt, girt_index)?;

        let posts: f64 = runs
            .expand()
            .into_iter()
            .map(|run| (run / POST_SPACING_M).ceil() + 1.0)
            .sum();
        let girt_lines = (self.height_m / GIRT_SPACING_M).ceil();
        let faces = if self.double_skin { 2.0 } else { 1.0 };
        let panel_area = total_run * self.height_m * faces;

        let mut bom = BillOfMaterials::new();
        bom.push_header(format!("PARTITION - {}", self.label));
        emit(
            &mut bom,
            store,
            "C200-20",
            posts * self.height_m,
            CostCategory::Steel,
            "partition post",
        )?;
        emit(
            &mut bom,
            store,
            girt_code,
            girt_lines * total_run,
            CostCategory::Steel,
            "partition girt selection",
        )?;
        emit(
            &mut bom,
            store,
            "PAN-P-035",
            panel_area,
            CostCategory::Panels,
            "partition sheeting",
        )?;
        emit(
            &mut bom,
            store,
            "FAST-SDS",
            (panel_area * 6.0).ceil(),
            CostCategory::Fasteners,
            "partition fasteners",
        )?;

        Ok(bom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata::builtin_store;

    fn sample() -> PartitionInput {
        PartitionInput {
            label: "P-1".to_string(),
            runs: "1@30".to_string(),
            height_m: 6.0,
            double_skin: false,
        }
    }

    #[test]
    fn test_partition_bom() {
        let store = builtin_store();
        let bom = sample().calculate(&store).unwrap();

        // 30/6 + 1 = 6 posts at 6 m
        let posts = bom.items().find(|i| i.db_code == "C200-20").unwrap();
        assert!((posts.quantity - 36.0).abs() < 1e-9);
        // 6/1.5 = 4 girt lines over 30 m
        let girts = bom.items().find(|i| i.db_code == "Z150-15").unwrap();
        assert!((girts.quantity - 120.0).abs() < 1e-9);
        let panels = bom.items().find(|i| i.db_code == "PAN-P-035").unwrap();
        assert!((panels.quantity - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_skin_doubles_panels() {
        let store = builtin_store();
        let single = sample().calculate(&store).unwrap();
        let double = PartitionInput { double_skin: true, ..sample() }
            .calculate(&store)
            .unwrap();

        let panel_qty = |bom: &BillOfMaterials| {
            bom.items()
                .find(|i| i.db_code == "PAN-P-035")
                .map(|i| i.quantity)
                .unwrap()
        };
        assert!((panel_qty(&double) - 2.0 * panel_qty(&single)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_runs_rejected() {
        let store = builtin_store();
        let err = PartitionInput { runs: String::new(), ..sample() }
            .calculate(&store)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_unparseable_runs_surface_format_error() {
        let store = builtin_store();
        let err = PartitionInput { runs: "bad@run".to_string(), ..sample() }
            .calculate(&store)
            .unwrap_err();
        assert_eq!(err.error_code(), "FORMAT_ERROR");
        assert!(
            matches!(err, EstimateError::FormatError { ref field, .. } if field == "partition.runs")
        );
    }
}
