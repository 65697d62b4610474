//! # Primary Calculation Engine
//!
//! Turns a validated [`BuildingModel`] into the primary-frame bill of
//! materials: derives geometry and loads, computes a design index per
//! structural role, resolves member codes through the reference store's
//! selection bands, and emits priced BOM rows grouped under category
//! headers (frames, secondary members, sheeting, trims, fasteners).
//!
//! ## Example
//!
//! ```rust
//! use pemb_core::building::{BuildingInput, BuildingModel};
//! use pemb_core::engine::Estimator;
//! use pemb_core::refdata::builtin_store;
//!
//! let store = builtin_store();
//! let model = BuildingModel::from_input(BuildingInput {
//!     spans: "1@24".to_string(),
//!     bays: "6@6".to_string(),
//!     back_eave_height_m: 8.0,
//!     wind_speed_kmh: 130.0,
//!     live_load_knm2: 0.57,
//!     frame_type: "CLEAR_SPAN".to_string(),
//!     base_type: "PINNED".to_string(),
//!     ..Default::default()
//! });
//!
//! let mut estimator = Estimator::new(&store);
//! let bom = estimator.calculate(&model).unwrap();
//! assert!(bom.item_count() > 0);
//! assert!(bom.total_weight_kg() > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, CostCategory};
use crate::building::{BuildingModel, Dimensions, Loads};
use crate::errors::{EstimateError, EstimateResult};
use crate::refdata::bands::BandKind;
use crate::refdata::ReferenceStore;

/// Design index per structural role: load x span geometry, in kN-m.
///
/// Simple-span design moment `w * s * L^2 / 8` with `w` the area load,
/// `s` the tributary spacing and `L` the member span. Joists use the
/// continuous-span denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignIndices {
    pub purlin: f64,
    pub girt: f64,
    pub endwall_column: f64,
    pub joist: f64,
}

pub(crate) fn design_indices(model: &BuildingModel, dims: &Dimensions, loads: &Loads) -> DesignIndices {
    let purlin_load = loads.total_purlin_load_knm2();
    let girt_load = loads.total_girt_load_knm2();
    let wind = loads.wind_load_knm2();

    DesignIndices {
        purlin: purlin_load * model.purlin_spacing_m() * dims.max_bay_m.powi(2) / 8.0,
        girt: girt_load * model.girt_spacing_m() * dims.max_bay_m.powi(2) / 8.0,
        endwall_column: wind
            * model.endwall_column_spacing_m()
            * dims.back_eave_height_m.powi(2)
            / 8.0,
        joist: purlin_load * model.purlin_spacing_m() * dims.max_bay_m.powi(2) / 10.0,
    }
}

/// Emit one priced row for a structurally required code.
///
/// An absent code is fatal here: no partial BOM is ever returned.
pub(crate) fn emit(
    bom: &mut BillOfMaterials,
    store: &ReferenceStore,
    code: &str,
    quantity: f64,
    category: CostCategory,
    context: &str,
) -> EstimateResult<()> {
    let record = store.require(code, context)?;
    bom.add_item(
        &record.code,
        &record.description,
        round2(quantity),
        &record.unit,
        record.weight_per_unit,
        record.price,
        category,
    );
    Ok(())
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// The primary frame estimator.
///
/// Borrows the read-only reference store; holds the intermediate state of
/// the last `calculate()` so reports can read dimensions and loads without
/// re-deriving them.
#[derive(Debug)]
pub struct Estimator<'a> {
    store: &'a ReferenceStore,
    dimensions: Option<Dimensions>,
    loads: Option<Loads>,
    indices: Option<DesignIndices>,
}

impl<'a> Estimator<'a> {
    pub fn new(store: &'a ReferenceStore) -> Self {
        Estimator {
            store,
            dimensions: None,
            loads: None,
            indices: None,
        }
    }

    /// Geometry derived by the last successful `calculate()`
    pub fn dimensions(&self) -> Option<&Dimensions> {
        self.dimensions.as_ref()
    }

    /// Loads derived by the last successful `calculate()`
    pub fn loads(&self) -> Option<&Loads> {
        self.loads.as_ref()
    }

    /// Design indices computed by the last successful `calculate()`
    pub fn design_indices(&self) -> Option<&DesignIndices> {
        self.indices.as_ref()
    }

    /// Run the primary-frame calculation.
    ///
    /// Precondition: `model.validate()` is empty; a non-empty issue list is
    /// returned as `ValidationFailed` without touching the store.
    pub fn calculate(&mut self, model: &BuildingModel) -> EstimateResult<BillOfMaterials> {
        // (1) never execute against an unvalidated model
        let issues = model.validate();
        if !issues.is_empty() {
            return Err(EstimateError::validation_failed(issues));
        }

        // (2) geometry and loads
        let dims = model.dimensions();
        let loads = model.loads();

        // (3) design index per structural role
        let indices = design_indices(model, &dims, &loads);

        // (4) resolve member codes through the selection bands
        let purlin_code = self.store.select_by_index(BandKind::Purlin, indices.purlin)?;
        let girt_code = self.store.select_by_index(BandKind::Girt, indices.girt)?;
        let ewc_code = self
            .store
            .select_by_index(BandKind::EndwallColumn, indices.endwall_column)?;

        // (5) emit priced rows, grouped under category headers
        let mut bom = BillOfMaterials::new();
        let store = self.store;

        bom.push_header("MAIN FRAMES");
        emit(
            &mut bom,
            store,
            "RFC-BU",
            dims.n_frames as f64 * 2.0 * dims.back_eave_height_m,
            CostCategory::Steel,
            "rigid frame column",
        )?;
        if dims.n_spans > 1 {
            emit(
                &mut bom,
                store,
                "IC-HSS200",
                dims.n_frames as f64 * (dims.n_spans - 1) as f64 * dims.back_eave_height_m,
                CostCategory::Steel,
                "interior column",
            )?;
        }
        emit(
            &mut bom,
            store,
            "RFR-BU",
            dims.n_frames as f64 * dims.rafter_length_m,
            CostCategory::Steel,
            "rigid frame rafter",
        )?;
        bom.push_separator();

        bom.push_header("SECONDARY MEMBERS");
        let purlin_lines = (dims.rafter_length_m / model.purlin_spacing_m()).ceil() + 1.0;
        emit(
            &mut bom,
            store,
            purlin_code,
            purlin_lines * dims.length_m,
            CostCategory::Steel,
            "purlin selection",
        )?;

        let girt_lines = (dims.back_eave_height_m / model.girt_spacing_m()).ceil();
        emit(
            &mut bom,
            store,
            girt_code,
            girt_lines * 2.0 * (dims.length_m + dims.width_m),
            CostCategory::Steel,
            "girt selection",
        )?;

        emit(
            &mut bom,
            store,
            "ES200",
            2.0 * dims.length_m,
            CostCategory::Steel,
            "eave strut",
        )?;

        let ewc_per_end = (dims.width_m / model.endwall_column_spacing_m()).ceil() - 1.0;
        let ewc_count = ewc_per_end.max(0.0) * 2.0;
        if ewc_count > 0.0 {
            let avg_height = (dims.back_eave_height_m + dims.peak_height_m) / 2.0;
            emit(
                &mut bom,
                store,
                ewc_code,
                ewc_count * avg_height,
                CostCategory::Steel,
                "endwall column selection",
            )?;
        }

        if !model.input().bracing_type.trim().eq_ignore_ascii_case("NONE") {
            let braced_bays = ((dims.n_bays / 3).max(1)) as f64;
            let rod_per_bay =
                2.0 * (dims.max_bay_m.powi(2) + dims.back_eave_height_m.powi(2)).sqrt();
            emit(
                &mut bom,
                store,
                "BR-ROD-16",
                braced_bays * 2.0 * rod_per_bay,
                CostCategory::Steel,
                "wall bracing",
            )?;
        }
        bom.push_separator();

        bom.push_header("SHEETING");
        let roof_area = dims.rafter_length_m * dims.length_m;
        emit(
            &mut bom,
            store,
            model.roof_panel_code(),
            roof_area,
            CostCategory::Panels,
            "roof sheeting",
        )?;
        let wall_area = dims.length_m * (dims.back_eave_height_m + dims.front_eave_height_m)
            + dims.width_m * (dims.back_eave_height_m + dims.peak_height_m);
        emit(
            &mut bom,
            store,
            model.wall_panel_code(),
            wall_area,
            CostCategory::Panels,
            "wall sheeting",
        )?;
        bom.push_separator();

        bom.push_header("TRIMS & FLASHINGS");
        emit(&mut bom, store, "TRIM-RIDGE", dims.length_m, CostCategory::Trims, "ridge trim")?;
        emit(&mut bom, store, "TRIM-EAVE", 2.0 * dims.length_m, CostCategory::Trims, "eave trim")?;
        emit(
            &mut bom,
            store,
            "TRIM-GABLE",
            2.0 * dims.rafter_length_m,
            CostCategory::Trims,
            "gable trim",
        )?;
        emit(
            &mut bom,
            store,
            "TRIM-CORNER",
            4.0 * dims.back_eave_height_m,
            CostCategory::Trims,
            "corner trim",
        )?;
        bom.push_separator();

        bom.push_header("FASTENERS & BOLTS");
        emit(
            &mut bom,
            store,
            "FAST-SDS",
            ((roof_area + wall_area) * 6.0).ceil(),
            CostCategory::Fasteners,
            "sheeting fasteners",
        )?;
        emit(
            &mut bom,
            store,
            "AB-M24",
            (dims.n_frames as f64 * 2.0 + ewc_count) * 4.0,
            CostCategory::Fasteners,
            "anchor bolts",
        )?;

        // (6) totals are derived properties of the finished BOM; expose the
        // intermediate state for reporting
        self.dimensions = Some(dims);
        self.loads = Some(loads);
        self.indices = Some(indices);
        Ok(bom)
    }
}
