//! Ridge monitor calculator.
//!
//! A monitor is a raised ventilation structure along the ridge: framed
//! hoops at a fixed spacing, side and top sheeting, and optional
//! ventilators.

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, CostCategory};
use crate::engine::emit;
use crate::errors::{EstimateError, EstimateResult};
use crate::refdata::ReferenceStore;

use super::{SubsystemCalculator, SubsystemKind};

/// Monitor frame spacing along the ridge (m)
const FRAME_SPACING_M: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorInput {
    pub label: String,
    /// Length along the ridge (m)
    pub length_m: f64,
    /// Throat width (m)
    pub width_m: f64,
    /// Side height (m)
    pub height_m: f64,
    /// Fit ridge ventilators along the monitor
    pub with_vents: bool,
}

impl SubsystemCalculator for MonitorInput {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Monitor
    }

    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials> {
        if self.length_m <= 0.0 || self.width_m <= 0.0 || self.height_m <= 0.0 {
            return Err(EstimateError::invalid_input(
                "monitor",
                format!("{}x{}x{}", self.length_m, self.width_m, self.height_m),
                "Monitor length, width and height must all be positive",
            ));
        }

        let frames = (self.length_m / FRAME_SPACING_M).ceil() + 1.0;
        let hoop_length = self.width_m + 2.0 * self.height_m;

        let mut bom = BillOfMaterials::new();
        bom.push_header(format!("ROOF MONITOR - {}", self.label));
        emit(
            &mut bom,
            store,
            "MON-FRM",
            frames * hoop_length,
            CostCategory::Steel,
            "monitor frame",
        )?;
        emit(
            &mut bom,
            store,
            "PAN-W-045",
            2.0 * self.length_m * self.height_m,
            CostCategory::Panels,
            "monitor side sheeting",
        )?;
        emit(
            &mut bom,
            store,
            "PAN-R-045",
            self.length_m * self.width_m,
            CostCategory::Panels,
            "monitor top sheeting",
        )?;
        if self.with_vents {
            emit(
                &mut bom,
                store,
                "VENT-300",
                (self.length_m / FRAME_SPACING_M).floor(),
                CostCategory::BuyOut,
                "monitor ventilator",
            )?;
        }

        Ok(bom)
    }
}
