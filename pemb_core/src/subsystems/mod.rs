//! # Sub-System Calculators
//!
//! Seven optional building sub-systems, each with its own input block and
//! independent dimension lists, each producing its own bill of materials
//! through the same reference store and selection conventions as the
//! primary engine.
//!
//! All seven share one contract, [`SubsystemCalculator`], and one
//! orchestration shape (parse inputs, select components, build BOM); only
//! the selection/load rules differ per kind. Each calculator is
//! independently invocable - useful for what-if sizing of a single
//! sub-system - and independently fails on missing references. Absent or
//! empty input blocks contribute no BOM and no error.
//!
//! ## Example
//!
//! ```rust
//! use pemb_core::refdata::builtin_store;
//! use pemb_core::subsystems::{CraneInput, SubsystemCalculator};
//!
//! let store = builtin_store();
//! let crane = CraneInput {
//!     label: "CR-1".to_string(),
//!     capacity_mt: 10.0,
//!     duty: "MEDIUM".to_string(),
//!     rail_runs: "2@30".to_string(),
//!     hook_height_m: 6.0,
//! };
//! let bom = crane.calculate(&store).unwrap();
//! assert!(bom.total_weight_kg() > 0.0);
//! ```

pub mod accessory;
pub mod canopy;
pub mod crane;
pub mod liner;
pub mod mezzanine;
pub mod monitor;
pub mod partition;

use serde::{Deserialize, Serialize};

use crate::bom::BillOfMaterials;
use crate::building::BuildingInput;
use crate::errors::EstimateResult;
use crate::refdata::ReferenceStore;

pub use accessory::{AccessoriesInput, AccessoryItem, OpeningInput};
pub use canopy::CanopyInput;
pub use crane::CraneInput;
pub use liner::LinerInput;
pub use mezzanine::MezzanineInput;
pub use monitor::MonitorInput;
pub use partition::PartitionInput;

/// The seven sub-system kinds, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubsystemKind {
    Mezzanine,
    Crane,
    Accessory,
    Partition,
    Canopy,
    Monitor,
    Liner,
}

impl SubsystemKind {
    pub const ALL: [SubsystemKind; 7] = [
        SubsystemKind::Mezzanine,
        SubsystemKind::Crane,
        SubsystemKind::Accessory,
        SubsystemKind::Partition,
        SubsystemKind::Canopy,
        SubsystemKind::Monitor,
        SubsystemKind::Liner,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SubsystemKind::Mezzanine => "Mezzanine",
            SubsystemKind::Crane => "Crane",
            SubsystemKind::Accessory => "Accessory",
            SubsystemKind::Partition => "Partition",
            SubsystemKind::Canopy => "Canopy",
            SubsystemKind::Monitor => "Monitor",
            SubsystemKind::Liner => "Liner",
        }
    }
}

impl std::fmt::Display for SubsystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The common calculator contract: one sub-system input in, one BOM out.
pub trait SubsystemCalculator {
    fn kind(&self) -> SubsystemKind;

    /// Produce this sub-system's bill of materials.
    ///
    /// Fails on invalid input or on a missing reference record, mirroring
    /// the primary engine's failure mode: no partial BOM.
    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials>;
}

/// Heterogeneous wrapper over the per-kind inputs, for storing mixed
/// sub-system lists and for dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SubsystemInput {
    Mezzanine(MezzanineInput),
    Crane(CraneInput),
    Accessories(AccessoriesInput),
    Partition(PartitionInput),
    Canopy(CanopyInput),
    Monitor(MonitorInput),
    Liner(LinerInput),
}

impl SubsystemCalculator for SubsystemInput {
    fn kind(&self) -> SubsystemKind {
        match self {
            SubsystemInput::Mezzanine(i) => i.kind(),
            SubsystemInput::Crane(i) => i.kind(),
            SubsystemInput::Accessories(i) => i.kind(),
            SubsystemInput::Partition(i) => i.kind(),
            SubsystemInput::Canopy(i) => i.kind(),
            SubsystemInput::Monitor(i) => i.kind(),
            SubsystemInput::Liner(i) => i.kind(),
        }
    }

    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials> {
        match self {
            SubsystemInput::Mezzanine(i) => i.calculate(store),
            SubsystemInput::Crane(i) => i.calculate(store),
            SubsystemInput::Accessories(i) => i.calculate(store),
            SubsystemInput::Partition(i) => i.calculate(store),
            SubsystemInput::Canopy(i) => i.calculate(store),
            SubsystemInput::Monitor(i) => i.calculate(store),
            SubsystemInput::Liner(i) => i.calculate(store),
        }
    }
}

/// Collect the sub-system calculators a building activates: one entry per
/// non-empty optional block, in report order. Absent blocks contribute
/// nothing.
pub fn active_subsystems(input: &BuildingInput) -> Vec<SubsystemInput> {
    let mut active = Vec::new();

    for mezz in &input.mezzanines {
        active.push(SubsystemInput::Mezzanine(mezz.clone()));
    }
    for crane in &input.cranes {
        active.push(SubsystemInput::Crane(crane.clone()));
    }
    if !input.accessories.is_empty() || !input.openings.is_empty() {
        active.push(SubsystemInput::Accessories(AccessoriesInput {
            items: input.accessories.clone(),
            openings: input.openings.clone(),
        }));
    }
    for partition in &input.partitions {
        active.push(SubsystemInput::Partition(partition.clone()));
    }
    for canopy in &input.canopies {
        active.push(SubsystemInput::Canopy(canopy.clone()));
    }
    for monitor in &input.monitors {
        active.push(SubsystemInput::Monitor(monitor.clone()));
    }
    if let Some(liner) = &input.liner {
        active.push(SubsystemInput::Liner(liner.clone()));
    }

    active
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_building_activates_nothing() {
        let input = BuildingInput::default();
        assert!(active_subsystems(&input).is_empty());
    }

    #[test]
    fn test_active_subsystems_in_report_order() {
        let input = BuildingInput {
            cranes: vec![CraneInput::default()],
            mezzanines: vec![MezzanineInput::default()],
            liner: Some(LinerInput::default()),
            ..Default::default()
        };
        let kinds: Vec<SubsystemKind> =
            active_subsystems(&input).iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![SubsystemKind::Mezzanine, SubsystemKind::Crane, SubsystemKind::Liner]
        );
    }

    #[test]
    fn test_openings_alone_activate_accessory_calculator() {
        let input = BuildingInput {
            openings: vec![OpeningInput {
                label: "O-1".to_string(),
                width_m: 3.0,
                height_m: 3.0,
                count: 1,
            }],
            ..Default::default()
        };
        let active = active_subsystems(&input);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind(), SubsystemKind::Accessory);
    }

    #[test]
    fn test_subsystem_input_serialization() {
        let input = SubsystemInput::Crane(CraneInput {
            label: "CR-1".to_string(),
            capacity_mt: 10.0,
            duty: "MEDIUM".to_string(),
            rail_runs: "2@30".to_string(),
            hook_height_m: 6.0,
        });
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"kind\":\"Crane\""));
        let back: SubsystemInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }
}
