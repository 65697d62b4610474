//! # pemb_core - Pre-Engineered Metal Building Estimation Engine
//!
//! `pemb_core` turns a compact building description into a priced bill of
//! materials: frames, secondary members, sheeting, trims and fasteners,
//! plus optional sub-systems (mezzanines, cranes, accessories, partitions,
//! canopies, roof monitors, liner panels). All inputs and outputs are
//! JSON-serializable so estimates can be stored, diffed and transmitted
//! as plain files.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure calculators that take input and return results
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Total-Safe Lookups**: reference projections never panic; missing
//!   codes surface as structured errors only where they must stop a run
//!
//! ## Quick Start
//!
//! ```rust
//! use pemb_core::estimate::Estimation;
//! use pemb_core::refdata::builtin_store;
//!
//! let mut est = Estimation::new("John Engineer", "26-001", "Acme Steel");
//! est.building.spans = "1@24".to_string();
//! est.building.bays = "6@6".to_string();
//! est.building.back_eave_height_m = 8.0;
//! est.building.wind_speed_kmh = 130.0;
//! est.building.frame_type = "CLEAR_SPAN".to_string();
//! est.building.base_type = "PINNED".to_string();
//!
//! let store = builtin_store();
//! let result = est.recalculate(&store).unwrap();
//! assert!(result.summary.total_weight_kg > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`dimlist`] - Compact dimension list notation ("2@24,1@18")
//! - [`refdata`] - Reference catalogs, selection bands and lookups
//! - [`building`] - Building draft, derived geometry and loads
//! - [`bom`] - Bill-of-materials rows, categories and totals
//! - [`engine`] - The primary building calculator
//! - [`subsystems`] - The seven optional sub-system calculators
//! - [`aggregate`] - Markups, summary figures and report sheets
//! - [`estimate`] - The estimation record container
//! - [`errors`] - Structured error types

pub mod aggregate;
pub mod bom;
pub mod building;
pub mod dimlist;
pub mod engine;
pub mod errors;
pub mod estimate;
pub mod refdata;
pub mod subsystems;

// Re-export commonly used types at crate root for convenience
pub use aggregate::{aggregate, EstimationResult, Markups, SheetKind, Summary};
pub use bom::{BillOfMaterials, BomItem, BomRow, CostCategory};
pub use building::{BuildingInput, BuildingModel, Dimensions, Loads};
pub use dimlist::DimensionList;
pub use engine::Estimator;
pub use errors::{EstimateError, EstimateResult, ValidationIssue};
pub use estimate::{Estimation, EstimationMetadata};
pub use refdata::{builtin_store, Catalog, CodeMatch, ReferenceStore};
