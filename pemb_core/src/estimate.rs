//! # Estimation Records
//!
//! The `Estimation` struct is the root container for one priced building:
//! metadata, the user-entered building draft, the markup plan, and the
//! latest calculation snapshot. Records serialize as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Estimation
//! ├── id: Uuid
//! ├── meta: EstimationMetadata (version, engineer, job info, timestamps)
//! ├── building: BuildingInput (the editable draft)
//! ├── markups: Markups (price multipliers)
//! └── result: Option<EstimationResult> (latest snapshot, replaced wholesale)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pemb_core::estimate::Estimation;
//! use pemb_core::refdata::builtin_store;
//!
//! let mut est = Estimation::new("Jane Engineer", "26-042", "ACME Steel");
//! est.building.spans = "1@24".to_string();
//! est.building.bays = "6@6".to_string();
//! est.building.back_eave_height_m = 8.0;
//! est.building.wind_speed_kmh = 130.0;
//! est.building.frame_type = "CLEAR_SPAN".to_string();
//! est.building.base_type = "PINNED".to_string();
//!
//! let store = builtin_store();
//! est.recalculate(&store).unwrap();
//! assert!(est.result.is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{aggregate, EstimationResult, Markups};
use crate::building::{BuildingInput, BuildingModel};
use crate::engine::Estimator;
use crate::errors::EstimateResult;
use crate::refdata::ReferenceStore;
use crate::subsystems::{active_subsystems, SubsystemCalculator};

/// Current schema version for estimation files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root estimation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimation {
    pub id: Uuid,

    /// Record metadata (version, engineer, job info)
    pub meta: EstimationMetadata,

    /// The editable building draft; intentionally permissive so a
    /// half-entered building survives a save/load cycle
    pub building: BuildingInput,

    /// Price markup plan applied during aggregation
    pub markups: Markups,

    /// Latest calculation snapshot, or `None` if never calculated.
    /// Replaced wholesale on every recalculation, never patched.
    pub result: Option<EstimationResult>,
}

impl Estimation {
    /// Create a new empty estimation record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pemb_core::estimate::Estimation;
    ///
    /// let est = Estimation::new("John Doe", "26-001", "Client Corp");
    /// assert_eq!(est.meta.engineer, "John Doe");
    /// assert!(est.result.is_none());
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Estimation {
            id: Uuid::new_v4(),
            meta: EstimationMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            building: BuildingInput::default(),
            markups: Markups::default(),
            result: None,
        }
    }

    /// Run the full calculation pipeline against the current draft and
    /// replace the stored snapshot.
    ///
    /// Validation failures and missing reference codes leave the previous
    /// snapshot untouched.
    pub fn recalculate(&mut self, store: &ReferenceStore) -> EstimateResult<&EstimationResult> {
        let model = BuildingModel::from_input(self.building.clone());

        let mut estimator = Estimator::new(store);
        let primary = estimator.calculate(&model)?;
        // calculate() succeeded, so both snapshots exist
        let dimensions = *estimator
            .dimensions()
            .ok_or_else(|| crate::errors::EstimateError::internal("dimensions missing after calculation"))?;
        let loads = *estimator
            .loads()
            .ok_or_else(|| crate::errors::EstimateError::internal("loads missing after calculation"))?;

        let mut subsystem_boms = Vec::new();
        for subsystem in active_subsystems(&self.building) {
            let bom = subsystem.calculate(store)?;
            subsystem_boms.push((subsystem.kind(), bom));
        }

        let snapshot = aggregate(dimensions, loads, primary, subsystem_boms, self.markups);
        self.touch();
        Ok(self.result.insert(snapshot))
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Estimation {
    fn default() -> Self {
        Estimation::new("", "", "")
    }
}

/// Record metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible estimator
    pub engineer: String,

    /// Job/enquiry number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the record was created
    pub created: DateTime<Utc>,

    /// When the record was last modified
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata::builtin_store;
    use crate::subsystems::crane::CraneInput;
    use crate::subsystems::SubsystemKind;

    fn draft() -> BuildingInput {
        BuildingInput {
            spans: "1@24".to_string(),
            bays: "6@6".to_string(),
            back_eave_height_m: 8.0,
            roof_slope: 1.0,
            wind_speed_kmh: 130.0,
            live_load_knm2: 0.57,
            frame_type: "CLEAR_SPAN".to_string(),
            base_type: "PINNED".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_estimation_creation() {
        let est = Estimation::new("John Doe", "26-001", "Acme Steel");
        assert_eq!(est.meta.engineer, "John Doe");
        assert_eq!(est.meta.job_id, "26-001");
        assert_eq!(est.meta.client, "Acme Steel");
        assert_eq!(est.meta.version, SCHEMA_VERSION);
        assert!(est.result.is_none());
    }

    #[test]
    fn test_recalculate_builds_snapshot() {
        let store = builtin_store();
        let mut est = Estimation::new("Engineer", "26-001", "Client");
        est.building = draft();

        let result = est.recalculate(&store).unwrap();
        assert!(result.primary.item_count() > 0);
        assert!(result.summary.total_weight_kg > 0.0);
        assert!(est.result.is_some());
    }

    #[test]
    fn test_recalculate_replaces_snapshot_wholesale() {
        let store = builtin_store();
        let mut est = Estimation::new("Engineer", "26-001", "Client");
        est.building = draft();
        est.recalculate(&store).unwrap();
        let first_weight = est.result.as_ref().unwrap().summary.total_weight_kg;

        est.building.cranes.push(CraneInput {
            label: "CR-1".to_string(),
            capacity_mt: 10.0,
            duty: "MEDIUM".to_string(),
            rail_runs: "2@36".to_string(),
            hook_height_m: 6.0,
        });
        est.recalculate(&store).unwrap();

        let result = est.result.as_ref().unwrap();
        assert!(result.subsystems.contains_key(&SubsystemKind::Crane));
        assert!(result.summary.total_weight_kg > first_weight);
    }

    #[test]
    fn test_recalculate_invalid_draft_keeps_previous_snapshot() {
        let store = builtin_store();
        let mut est = Estimation::new("Engineer", "26-001", "Client");
        est.building = draft();
        est.recalculate(&store).unwrap();

        est.building.spans = String::new();
        let err = est.recalculate(&store).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        // Previous snapshot survives a failed recalculation
        assert!(est.result.is_some());
    }

    #[test]
    fn test_estimation_serialization_roundtrip() {
        let store = builtin_store();
        let mut est = Estimation::new("Jane Engineer", "26-042", "Test Client");
        est.building = draft();
        est.markups.steel = 0.12;
        est.recalculate(&store).unwrap();

        let json = serde_json::to_string_pretty(&est).unwrap();
        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("26-042"));

        let roundtrip: Estimation = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "Jane Engineer");
        assert_eq!(roundtrip.id, est.id);
        assert_eq!(roundtrip.result, est.result);
    }
}
