//! # Building Model
//!
//! The validated, normalized representation of one building's design
//! inputs, and the pure derivations the engine consumes: geometry
//! ([`Dimensions`]) and structural loads ([`Loads`]).
//!
//! Construction never fails - unknown or missing payload fields default to
//! zero/empty so partially-filled drafts can round-trip - and all problems
//! are reported by [`BuildingModel::validate`] as a field-keyed list before
//! any calculation runs.
//!
//! ## Example
//!
//! ```rust
//! use pemb_core::building::{BuildingInput, BuildingModel};
//!
//! let input = BuildingInput {
//!     spans: "1@24".to_string(),
//!     bays: "6@6".to_string(),
//!     back_eave_height_m: 8.0,
//!     wind_speed_kmh: 130.0,
//!     frame_type: "CLEAR_SPAN".to_string(),
//!     base_type: "PINNED".to_string(),
//!     ..Default::default()
//! };
//!
//! let model = BuildingModel::from_input(input);
//! assert!(model.validate().is_empty());
//!
//! let dims = model.dimensions();
//! assert_eq!(dims.width_m, 24.0);
//! assert_eq!(dims.length_m, 36.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::dimlist::DimensionList;
use crate::errors::ValidationIssue;
use crate::subsystems::{
    AccessoryItem, CanopyInput, CraneInput, LinerInput, MezzanineInput, MonitorInput,
    OpeningInput, PartitionInput,
};

/// Default purlin/girt spacing (m) when the input leaves it unset
const DEFAULT_MEMBER_SPACING_M: f64 = 1.5;

/// Default endwall column spacing (m) when the input leaves it unset
const DEFAULT_ENDWALL_SPACING_M: f64 = 6.0;

/// Velocity-to-pressure conversion: q (kN/m2) = K * V^2 with V in km/h
const WIND_PRESSURE_K: f64 = 0.0000473;

/// Raw building-design payload.
///
/// Every field is `#[serde(default)]` so partially-filled drafts
/// deserialize; validation happens on the model, not here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingInput {
    /// User label (e.g. "Warehouse A")
    pub label: String,

    /// Span list in compact notation, e.g. "1@24" or "2@24,1@18".
    /// Supports per-span slope overrides ("1@24@1.5").
    pub spans: String,
    /// Bay list in compact notation, e.g. "6@6"
    pub bays: String,

    pub back_eave_height_m: f64,
    /// 0 means same as back eave
    pub front_eave_height_m: f64,
    /// Roof slope as rise per 10 horizontal (e.g. 1.0 = 1:10)
    pub roof_slope: f64,

    /// Frame system (e.g. "CLEAR_SPAN", "MULTI_SPAN") - required categorical
    pub frame_type: String,
    /// Column base fixity (e.g. "PINNED", "FIXED") - required categorical
    pub base_type: String,
    /// Paint/finish system selection
    pub finish: String,
    /// Wall bracing system (e.g. "ROD", "PORTAL")
    pub bracing_type: String,

    /// 0 means the standard spacing (1.5 m)
    pub purlin_spacing_m: f64,
    /// 0 means the standard spacing (1.5 m)
    pub girt_spacing_m: f64,
    /// 0 means the standard spacing (6.0 m)
    pub endwall_column_spacing_m: f64,

    pub dead_load_knm2: f64,
    pub live_load_knm2: f64,
    pub collateral_load_knm2: f64,
    pub wind_speed_kmh: f64,

    /// Roof panel code, empty means the standard 0.45 aluzinc panel
    pub roof_panel: String,
    /// Wall panel code, empty means the standard 0.45 aluzinc panel
    pub wall_panel: String,

    // Optional sub-system blocks; absent/empty blocks contribute nothing
    pub mezzanines: Vec<MezzanineInput>,
    pub cranes: Vec<CraneInput>,
    pub accessories: Vec<AccessoryItem>,
    pub openings: Vec<OpeningInput>,
    pub partitions: Vec<PartitionInput>,
    pub canopies: Vec<CanopyInput>,
    pub monitors: Vec<MonitorInput>,
    pub liner: Option<LinerInput>,
}

/// Derived geometry: pure functions of the model, recomputed per
/// calculation and never cached across edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width_m: f64,
    pub length_m: f64,
    pub back_eave_height_m: f64,
    pub front_eave_height_m: f64,
    pub peak_height_m: f64,
    /// Total rafter length along both slopes of one frame
    pub rafter_length_m: f64,
    pub n_frames: u32,
    pub n_spans: u32,
    pub n_bays: u32,
    pub max_span_m: f64,
    pub max_bay_m: f64,
}

/// Derived structural loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loads {
    pub dead_knm2: f64,
    pub live_knm2: f64,
    pub collateral_knm2: f64,
    pub wind_speed_kmh: f64,
    /// Velocity pressure q before the slope coefficient
    pub wind_velocity_pressure_knm2: f64,
    /// Pressure coefficient keyed by roof slope band
    pub pressure_coefficient: f64,
}

impl Loads {
    /// Design wind pressure: q scaled by the slope coefficient
    pub fn wind_load_knm2(&self) -> f64 {
        self.wind_velocity_pressure_knm2 * self.pressure_coefficient
    }

    /// Gravity load carried by roof purlins
    pub fn total_purlin_load_knm2(&self) -> f64 {
        self.dead_knm2 + self.live_knm2 + self.collateral_knm2
    }

    /// Lateral load carried by wall girts
    pub fn total_girt_load_knm2(&self) -> f64 {
        self.wind_load_knm2()
    }
}

/// A building's design inputs with parsed dimension lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingModel {
    input: BuildingInput,
    spans: DimensionList,
    bays: DimensionList,
    /// Dimension-list parse failures, held until `validate()` reports them
    parse_issues: Vec<ValidationIssue>,
}

impl BuildingModel {
    /// Build a model from a raw payload. Never fails: parse problems are
    /// recorded and surface through `validate()`.
    pub fn from_input(input: BuildingInput) -> Self {
        let mut parse_issues = Vec::new();

        let spans = match DimensionList::parse_sloped_named("spans", &input.spans) {
            Ok(list) => list,
            Err(e) => {
                parse_issues.push(ValidationIssue::new("spans", e.to_string()));
                DimensionList::default()
            }
        };
        let bays = match DimensionList::parse_named("bays", &input.bays) {
            Ok(list) => list,
            Err(e) => {
                parse_issues.push(ValidationIssue::new("bays", e.to_string()));
                DimensionList::default()
            }
        };

        BuildingModel {
            input,
            spans,
            bays,
            parse_issues,
        }
    }

    pub fn input(&self) -> &BuildingInput {
        &self.input
    }

    pub fn spans(&self) -> &DimensionList {
        &self.spans
    }

    pub fn bays(&self) -> &DimensionList {
        &self.bays
    }

    /// Field-level validation. Empty list means the model is safe to
    /// calculate against; the engine never runs on an unvalidated model.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = self.parse_issues.clone();

        if self.spans.is_empty() || self.spans.total_span() <= 0.0 {
            issues.push(ValidationIssue::new(
                "spans",
                "Spans must parse to a non-empty list with positive total width",
            ));
        }
        if self.bays.is_empty() || self.bays.total_span() <= 0.0 {
            issues.push(ValidationIssue::new(
                "bays",
                "Bays must parse to a non-empty list with positive total length",
            ));
        }
        if self.input.back_eave_height_m <= 0.0 {
            issues.push(ValidationIssue::new(
                "back_eave_height_m",
                "Eave height must be positive",
            ));
        }
        if self.input.front_eave_height_m < 0.0 {
            issues.push(ValidationIssue::new(
                "front_eave_height_m",
                "Front eave height cannot be negative",
            ));
        }
        if self.input.wind_speed_kmh < 0.0 {
            issues.push(ValidationIssue::new(
                "wind_speed_kmh",
                "Wind speed cannot be negative",
            ));
        }
        if self.input.frame_type.trim().is_empty() {
            issues.push(ValidationIssue::new("frame_type", "Frame type is required"));
        }
        if self.input.base_type.trim().is_empty() {
            issues.push(ValidationIssue::new("base_type", "Base type is required"));
        }

        issues
    }

    /// Effective purlin spacing (standard spacing when unset)
    pub fn purlin_spacing_m(&self) -> f64 {
        if self.input.purlin_spacing_m > 0.0 {
            self.input.purlin_spacing_m
        } else {
            DEFAULT_MEMBER_SPACING_M
        }
    }

    /// Effective girt spacing (standard spacing when unset)
    pub fn girt_spacing_m(&self) -> f64 {
        if self.input.girt_spacing_m > 0.0 {
            self.input.girt_spacing_m
        } else {
            DEFAULT_MEMBER_SPACING_M
        }
    }

    /// Effective endwall column spacing (standard spacing when unset)
    pub fn endwall_column_spacing_m(&self) -> f64 {
        if self.input.endwall_column_spacing_m > 0.0 {
            self.input.endwall_column_spacing_m
        } else {
            DEFAULT_ENDWALL_SPACING_M
        }
    }

    /// Effective roof panel code
    pub fn roof_panel_code(&self) -> &str {
        if self.input.roof_panel.trim().is_empty() {
            "PAN-R-045"
        } else {
            self.input.roof_panel.trim()
        }
    }

    /// Effective wall panel code
    pub fn wall_panel_code(&self) -> &str {
        if self.input.wall_panel.trim().is_empty() {
            "PAN-W-045"
        } else {
            self.input.wall_panel.trim()
        }
    }

    /// Derive geometry. Pure; recomputed on every call.
    pub fn dimensions(&self) -> Dimensions {
        let width = self.spans.total_span();
        let length = self.bays.total_span();
        let back_eave = self.input.back_eave_height_m;
        let front_eave = if self.input.front_eave_height_m > 0.0 {
            self.input.front_eave_height_m
        } else {
            back_eave
        };

        let half_width = width / 2.0;
        let rise = half_width * self.input.roof_slope / 10.0;
        let peak = back_eave + rise;
        // Symmetric gable: two slope lengths per frame
        let rafter = 2.0 * (half_width.powi(2) + rise.powi(2)).sqrt();

        let n_bays = self.bays.total_count();
        let max_span = self
            .spans
            .expand()
            .into_iter()
            .fold(0.0f64, f64::max);
        let max_bay = self.bays.expand().into_iter().fold(0.0f64, f64::max);

        Dimensions {
            width_m: width,
            length_m: length,
            back_eave_height_m: back_eave,
            front_eave_height_m: front_eave,
            peak_height_m: peak,
            rafter_length_m: rafter,
            n_frames: n_bays + 1,
            n_spans: self.spans.total_count(),
            n_bays,
            max_span_m: max_span,
            max_bay_m: max_bay,
        }
    }

    /// Derive structural loads. Pure; recomputed on every call.
    pub fn loads(&self) -> Loads {
        let v = self.input.wind_speed_kmh;
        Loads {
            dead_knm2: self.input.dead_load_knm2,
            live_knm2: self.input.live_load_knm2,
            collateral_knm2: self.input.collateral_load_knm2,
            wind_speed_kmh: v,
            wind_velocity_pressure_knm2: WIND_PRESSURE_K * v * v,
            pressure_coefficient: pressure_coefficient(self.input.roof_slope),
        }
    }

    /// Design wind pressure (convenience over `loads()`)
    pub fn wind_load_knm2(&self) -> f64 {
        self.loads().wind_load_knm2()
    }

    /// Total gravity load on roof purlins (convenience over `loads()`)
    pub fn total_purlin_load_knm2(&self) -> f64 {
        self.loads().total_purlin_load_knm2()
    }
}

/// Pressure coefficient keyed by roof slope band.
///
/// Flat roofs shed wind; steeper slopes catch more of it.
fn pressure_coefficient(roof_slope: f64) -> f64 {
    if roof_slope <= 0.5 {
        0.7
    } else if roof_slope <= 1.5 {
        0.8
    } else {
        0.9
    }
}
