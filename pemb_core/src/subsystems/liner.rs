//! Liner panel calculator.
//!
//! Interior liner sheeting up the walls and optionally under the roof,
//! with trim angles along the wall runs and fasteners per covered area.

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, CostCategory};
use crate::dimlist::DimensionList;
use crate::engine::emit;
use crate::errors::{EstimateError, EstimateResult};
use crate::refdata::ReferenceStore;

use super::{SubsystemCalculator, SubsystemKind};

/// Fasteners per square meter of liner
const FASTENERS_PER_SQM: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinerInput {
    /// Lined wall lengths in compact notation (e.g. "2@36,2@24")
    pub wall_runs: String,
    /// Liner height up the walls (m)
    pub height_m: f64,
    /// Roof liner area, 0 when the roof is not lined (sqm)
    pub roof_area_sqm: f64,
}

impl SubsystemCalculator for LinerInput {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Liner
    }

    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials> {
        let runs = DimensionList::parse_named("liner.wall_runs", &self.wall_runs)?;
        let wall_area = runs.total_span() * self.height_m;
        let total_area = wall_area + self.roof_area_sqm;

        if total_area <= 0.0 {
            return Err(EstimateError::invalid_input(
                "liner",
                format!("walls '{}' x {} m, roof {} sqm", self.wall_runs, self.height_m, self.roof_area_sqm),
                "Liner needs a positive wall or roof area",
            ));
        }

        let mut bom = BillOfMaterials::new();
        bom.push_header("LINER PANELS");
        emit(&mut bom, store, "PAN-L-035", total_area, CostCategory::Panels, "liner panel")?;
        if runs.total_span() > 0.0 {
            emit(
                &mut bom,
                store,
                "TRIM-LINER",
                runs.total_span(),
                CostCategory::Trims,
                "liner trim angle",
            )?;
        }
        emit(
            &mut bom,
            store,
            "FAST-SDS",
            (total_area * FASTENERS_PER_SQM).ceil(),
            CostCategory::Fasteners,
            "liner fasteners",
        )?;

        Ok(bom)
    }
}
