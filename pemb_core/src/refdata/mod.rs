//! # Reference Data Store
//!
//! Read-only, code-indexed catalogs of everything the calculators price:
//! manufactured products (MBSDB), structural steel sections (SSDB) and raw
//! materials. The store is an explicit owned object passed by reference into
//! calculators, never a hidden module-level singleton, so tests can inject
//! isolated fixtures and invalidation is an explicit call.
//!
//! Each catalog builds its in-memory index lazily on first lookup; the
//! build is guarded by a `OnceCell` so concurrent first accesses cannot race
//! to construct duplicate indexes. The store does not poll for catalog
//! changes - whoever mutates the underlying catalog calls
//! [`ReferenceStore::invalidate`].
//!
//! ## Example
//!
//! ```rust
//! use pemb_core::refdata::builtin_store;
//!
//! let store = builtin_store();
//! let purlin = store.find("z200-15").unwrap(); // case-insensitive
//! assert_eq!(purlin.unit, "m");
//! assert!(store.weight("NO-SUCH-CODE") == 0.0); // total-safe projection
//! ```

pub mod bands;

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use bands::{BandKind, BandSet};

pub use bands::builtin_bands;

/// One catalog entry: a product, section or raw material.
///
/// Weights are kg per unit, costs and price are AED per unit; `unit` is the
/// sales unit ("m", "sqm", "pcs", "kg").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Case-insensitive unique key within its catalog
    pub code: String,
    pub description: String,
    pub unit: String,
    pub weight_per_unit: f64,
    pub material_cost: f64,
    pub manufacturing_cost: f64,
    pub overhead_cost: f64,
    pub price: f64,
    /// Catalog classification (e.g. "Primary", "Secondary", "Panel")
    pub category: String,
    /// Steel grade where applicable (e.g. "S355")
    pub grade: Option<String>,
}

/// The three catalogs, searched in this order by cross-catalog lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Catalog {
    /// Manufactured building products (panels, cold-formed, trims, accessories)
    Mbsdb,
    /// Structural steel sections (hot-rolled, built-up)
    Ssdb,
    /// Raw materials (plate, rod, angle)
    RawMaterials,
}

impl Catalog {
    pub const ALL: [Catalog; 3] = [Catalog::Mbsdb, Catalog::Ssdb, Catalog::RawMaterials];

    pub fn display_name(&self) -> &'static str {
        match self {
            Catalog::Mbsdb => "MBSDB",
            Catalog::Ssdb => "SSDB",
            Catalog::RawMaterials => "RawMaterials",
        }
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Result of the permissive description-to-code resolution.
///
/// Matching order is exact, then substring, then the "None" special case,
/// then the raw input as a silent fallback. The fallback is kept for
/// compatibility with existing data sheets (free-text codes), but it is made
/// observable here as a distinct variant instead of an indistinguishable
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "match")]
pub enum CodeMatch {
    /// Description matched a record exactly (case-insensitive)
    Exact { code: String },
    /// Description was contained in exactly one record's description
    Substring { code: String },
    /// Input was the literal "None" selection
    NoSelection,
    /// No match; carries the raw input unchanged (legacy passthrough)
    Unmatched { input: String },
}

impl CodeMatch {
    /// The code a legacy caller would have received as a plain string
    pub fn code(&self) -> &str {
        match self {
            CodeMatch::Exact { code } | CodeMatch::Substring { code } => code,
            CodeMatch::NoSelection => "",
            CodeMatch::Unmatched { input } => input,
        }
    }

    /// True when the description resolved to a real catalog code
    pub fn is_resolved(&self) -> bool {
        matches!(self, CodeMatch::Exact { .. } | CodeMatch::Substring { .. })
    }
}

/// One catalog's records plus its lazily built code index.
#[derive(Debug, Default)]
struct CatalogData {
    records: Vec<ReferenceRecord>,
    /// code (uppercased, trimmed) -> position in `records`
    index: OnceCell<HashMap<String, usize>>,
}

impl CatalogData {
    fn new(records: Vec<ReferenceRecord>) -> Self {
        CatalogData {
            records,
            index: OnceCell::new(),
        }
    }

    fn index(&self) -> &HashMap<String, usize> {
        self.index.get_or_init(|| {
            self.records
                .iter()
                .enumerate()
                .map(|(i, r)| (normalize_code(&r.code), i))
                .collect()
        })
    }

    fn find(&self, key: &str) -> Option<&ReferenceRecord> {
        self.index().get(key).map(|&i| &self.records[i])
    }

    fn reset_index(&mut self) {
        self.index = OnceCell::new();
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// The reference data store: three catalogs plus the selection band tables.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    mbsdb: CatalogData,
    ssdb: CatalogData,
    raw_materials: CatalogData,
    bands: Option<BandSet>,
}

impl ReferenceStore {
    /// Create an empty store (no catalogs, no bands)
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a catalog's records wholesale. Drops the old index.
    pub fn set_records(&mut self, catalog: Catalog, records: Vec<ReferenceRecord>) {
        *self.catalog_mut(catalog) = CatalogData::new(records);
    }

    /// Install the selection band tables
    pub fn set_bands(&mut self, bands: BandSet) {
        self.bands = Some(bands);
    }

    /// Drop a catalog's index so the next lookup rebuilds it.
    ///
    /// Callers signal this after mutating the underlying catalog source;
    /// the store never polls for changes.
    pub fn invalidate(&mut self, catalog: Catalog) {
        self.catalog_mut(catalog).reset_index();
    }

    /// Drop every catalog index
    pub fn invalidate_all(&mut self) {
        for catalog in Catalog::ALL {
            self.invalidate(catalog);
        }
    }

    fn catalog(&self, catalog: Catalog) -> &CatalogData {
        match catalog {
            Catalog::Mbsdb => &self.mbsdb,
            Catalog::Ssdb => &self.ssdb,
            Catalog::RawMaterials => &self.raw_materials,
        }
    }

    fn catalog_mut(&mut self, catalog: Catalog) -> &mut CatalogData {
        match catalog {
            Catalog::Mbsdb => &mut self.mbsdb,
            Catalog::Ssdb => &mut self.ssdb,
            Catalog::RawMaterials => &mut self.raw_materials,
        }
    }

    /// Number of records across all catalogs
    pub fn len(&self) -> usize {
        Catalog::ALL
            .iter()
            .map(|&c| self.catalog(c).records.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a record by code across all catalogs (MBSDB, then SSDB,
    /// then raw materials). Case-insensitive and trimmed.
    pub fn find(&self, code: &str) -> Option<&ReferenceRecord> {
        let key = normalize_code(code);
        if key.is_empty() {
            return None;
        }
        Catalog::ALL
            .iter()
            .find_map(|&c| self.catalog(c).find(&key))
    }

    /// Look up a record by code in one specific catalog
    pub fn find_in(&self, catalog: Catalog, code: &str) -> Option<&ReferenceRecord> {
        self.catalog(catalog).find(&normalize_code(code))
    }

    /// Look up a structurally required code.
    ///
    /// Missing codes are fatal for the calculation that needed them:
    /// a partial BOM with silently wrong totals is never returned.
    pub fn require(&self, code: &str, context: &str) -> EstimateResult<&ReferenceRecord> {
        self.find(code)
            .ok_or_else(|| EstimateError::missing_reference(code, context))
    }

    // --- Total-safe projections -------------------------------------------
    // These return zero-values for absent codes so downstream arithmetic
    // over optional fields stays total.

    /// Weight per unit (kg), 0 when the code is absent
    pub fn weight(&self, code: &str) -> f64 {
        self.find(code).map(|r| r.weight_per_unit).unwrap_or(0.0)
    }

    /// Selling price per unit (AED), 0 when the code is absent
    pub fn price(&self, code: &str) -> f64 {
        self.find(code).map(|r| r.price).unwrap_or(0.0)
    }

    /// Material cost per unit (AED), 0 when the code is absent
    pub fn material_cost(&self, code: &str) -> f64 {
        self.find(code).map(|r| r.material_cost).unwrap_or(0.0)
    }

    /// Description, empty string when the code is absent
    pub fn description(&self, code: &str) -> String {
        self.find(code).map(|r| r.description.clone()).unwrap_or_default()
    }

    /// Sales unit, empty string when the code is absent
    pub fn unit(&self, code: &str) -> String {
        self.find(code).map(|r| r.unit.clone()).unwrap_or_default()
    }

    /// Case-insensitive substring search over codes and descriptions,
    /// across all catalogs, in catalog order.
    pub fn search(&self, pattern: &str) -> Vec<&ReferenceRecord> {
        let needle = pattern.trim().to_uppercase();
        if needle.is_empty() {
            return Vec::new();
        }
        Catalog::ALL
            .iter()
            .flat_map(|&c| self.catalog(c).records.iter())
            .filter(|r| {
                r.code.to_uppercase().contains(&needle)
                    || r.description.to_uppercase().contains(&needle)
            })
            .collect()
    }

    /// Resolve a free-text description to a code.
    ///
    /// Matching order (kept for data-sheet compatibility): exact description
    /// match, then substring match, then the literal "None" selection, then
    /// the raw input passed through unchanged - but tagged as
    /// [`CodeMatch::Unmatched`] so callers can see it did not resolve.
    pub fn code_of(&self, description: &str) -> CodeMatch {
        let needle = description.trim();
        let needle_upper = needle.to_uppercase();

        let all = || {
            Catalog::ALL
                .iter()
                .flat_map(|&c| self.catalog(c).records.iter())
        };

        if let Some(record) = all().find(|r| r.description.to_uppercase() == needle_upper) {
            return CodeMatch::Exact {
                code: record.code.clone(),
            };
        }
        if !needle_upper.is_empty() {
            if let Some(record) = all().find(|r| r.description.to_uppercase().contains(&needle_upper))
            {
                return CodeMatch::Substring {
                    code: record.code.clone(),
                };
            }
        }
        if needle_upper == "NONE" {
            return CodeMatch::NoSelection;
        }
        CodeMatch::Unmatched {
            input: needle.to_string(),
        }
    }

    // --- Selection bands --------------------------------------------------

    /// The installed band tables, if any
    pub fn bands(&self) -> Option<&BandSet> {
        self.bands.as_ref()
    }

    /// Resolve a design index to a component code for a structural role.
    ///
    /// Fails with `StoreUnavailable` when no band tables are installed.
    pub fn select_by_index(&self, kind: BandKind, index: f64) -> EstimateResult<&str> {
        self.bands
            .as_ref()
            .map(|b| b.select(kind, index))
            .ok_or_else(|| {
                EstimateError::store_unavailable("bands", "no selection band tables installed")
            })
    }

    // --- Loading ----------------------------------------------------------

    /// Load a catalog from CSV, replacing its current records.
    ///
    /// Expected header columns: Code, Description, Unit, Weight,
    /// MaterialCost, ManufacturingCost, OverheadCost, Price, Category,
    /// Grade. Column order is free; matching is case-insensitive.
    pub fn load_catalog_csv(&mut self, catalog: Catalog, path: &str) -> EstimateResult<usize> {
        use std::fs::File;
        use std::io::{BufRead, BufReader};

        let name = catalog.display_name();
        let file = File::open(path).map_err(|e| {
            EstimateError::store_unavailable(name, format!("cannot open '{}': {}", path, e))
        })?;

        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| EstimateError::store_unavailable(name, "CSV file is empty"))?
            .map_err(|e| EstimateError::store_unavailable(name, format!("read header: {}", e)))?;

        let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
        let col_index = |col: &str| -> Option<usize> {
            headers.iter().position(|h| h.eq_ignore_ascii_case(col))
        };

        let code_idx = col_index("Code")
            .ok_or_else(|| EstimateError::store_unavailable(name, "missing 'Code' column"))?;
        let desc_idx = col_index("Description")
            .ok_or_else(|| EstimateError::store_unavailable(name, "missing 'Description' column"))?;
        let unit_idx = col_index("Unit");
        let weight_idx = col_index("Weight");
        let mat_idx = col_index("MaterialCost");
        let mfg_idx = col_index("ManufacturingCost");
        let oh_idx = col_index("OverheadCost");
        let price_idx = col_index("Price");
        let cat_idx = col_index("Category");
        let grade_idx = col_index("Grade");

        let mut records = Vec::new();
        let mut line_num = 1;
        for line_result in lines {
            line_num += 1;
            let line = line_result.map_err(|e| {
                EstimateError::store_unavailable(name, format!("read line {}: {}", line_num, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            let field = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).map(|s| s.trim());
            let num = |idx: Option<usize>| field(idx).and_then(parse_optional_f64).unwrap_or(0.0);

            let code = field(Some(code_idx)).unwrap_or("");
            if code.is_empty() {
                continue;
            }

            records.push(ReferenceRecord {
                code: code.to_string(),
                description: field(Some(desc_idx)).unwrap_or("").to_string(),
                unit: field(unit_idx).unwrap_or("").to_string(),
                weight_per_unit: num(weight_idx),
                material_cost: num(mat_idx),
                manufacturing_cost: num(mfg_idx),
                overhead_cost: num(oh_idx),
                price: num(price_idx),
                category: field(cat_idx).unwrap_or("").to_string(),
                grade: field(grade_idx)
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string()),
            });
        }

        let count = records.len();
        self.set_records(catalog, records);
        Ok(count)
    }
}

/// Parse an optional f64 from a CSV field.
///
/// Returns None for empty strings, dashes, or invalid numbers.
fn parse_optional_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    f64::from_str(trimmed).ok()
}

// ============================================================================
// Builtin catalog (for tests, demos and the CLI)
// ============================================================================

/// Shorthand record constructor for the builtin catalog.
///
/// Cost components use fixed price fractions (55% material, 25%
/// manufacturing, 8% overhead); real catalogs carry exact figures.
fn rec(
    code: &str,
    description: &str,
    unit: &str,
    weight: f64,
    price: f64,
    category: &str,
) -> ReferenceRecord {
    ReferenceRecord {
        code: code.to_string(),
        description: description.to_string(),
        unit: unit.to_string(),
        weight_per_unit: weight,
        material_cost: price * 0.55,
        manufacturing_cost: price * 0.25,
        overhead_cost: price * 0.08,
        price,
        category: category.to_string(),
        grade: None,
    }
}

/// A store pre-loaded with representative MBSDB/SSDB/raw-material records
/// and the builtin band tables. Enough for the primary engine, all seven
/// subsystem calculators and the CLI demo to run without external data.
pub fn builtin_store() -> ReferenceStore {
    let mbsdb = vec![
        // Cold-formed secondary members
        rec("Z150-15", "Z-purlin 150x65x1.5", "m", 4.2, 19.0, "Secondary"),
        rec("Z200-15", "Z-purlin 200x65x1.5", "m", 5.0, 23.0, "Secondary"),
        rec("Z200-20", "Z-purlin 200x65x2.0", "m", 6.6, 30.0, "Secondary"),
        rec("Z250-18", "Z-purlin 250x75x1.8", "m", 7.2, 33.0, "Secondary"),
        rec("Z250-20", "Z-purlin 250x75x2.0", "m", 8.0, 37.0, "Secondary"),
        rec("BU-PURLIN", "Built-up purlin", "m", 12.0, 54.0, "Secondary"),
        rec("BU-GIRT", "Built-up girt", "m", 12.0, 54.0, "Secondary"),
        rec("J150", "Floor joist 150", "m", 5.5, 25.0, "Secondary"),
        rec("J200", "Floor joist 200", "m", 7.1, 32.0, "Secondary"),
        rec("J250", "Floor joist 250", "m", 9.0, 41.0, "Secondary"),
        rec("BU-JOIST", "Built-up floor joist", "m", 14.0, 63.0, "Secondary"),
        // Panels
        rec("PAN-R-045", "Roof panel 0.45 aluzinc", "sqm", 4.3, 26.0, "Panel"),
        rec("PAN-W-045", "Wall panel 0.45 aluzinc", "sqm", 4.3, 25.0, "Panel"),
        rec("PAN-P-035", "Partition panel 0.35", "sqm", 3.4, 20.0, "Panel"),
        rec("PAN-L-035", "Liner panel 0.35", "sqm", 3.4, 21.0, "Panel"),
        rec("DECK-055", "Floor deck panel 0.55 galvanized", "sqm", 6.2, 31.0, "Panel"),
        rec("PLT-CHQ", "Checkered plate 5mm", "sqm", 40.2, 150.0, "Panel"),
        rec("SKY-PC", "Polycarbonate skylight panel", "sqm", 2.1, 48.0, "Panel"),
        // Trims and flashings
        rec("TRIM-RIDGE", "Ridge flashing", "m", 2.8, 17.0, "Trim"),
        rec("TRIM-EAVE", "Eave flashing", "m", 2.2, 14.0, "Trim"),
        rec("TRIM-GABLE", "Gable flashing", "m", 2.2, 14.0, "Trim"),
        rec("TRIM-CORNER", "Corner flashing", "m", 1.9, 12.0, "Trim"),
        rec("TRIM-LINER", "Liner trim angle", "m", 1.1, 8.0, "Trim"),
        // Fasteners and fixings
        rec("FAST-SDS", "Self-drilling screw with washer", "pcs", 0.02, 0.45, "Fastener"),
        rec("AB-M24", "Anchor bolt M24x600", "pcs", 2.3, 14.0, "Fastener"),
        rec("BR-ROD-16", "Bracing rod 16mm", "m", 1.6, 9.0, "Secondary"),
        // Accessories and crane parts
        rec("DR-PERS", "Personnel door 1.0x2.1", "pcs", 55.0, 900.0, "Accessory"),
        rec("DR-RS", "Rolling shutter door", "sqm", 16.5, 220.0, "Accessory"),
        rec("WIN-AL", "Aluminium window", "sqm", 12.0, 260.0, "Accessory"),
        rec("LOUV-600", "Wall louver 600x600", "pcs", 8.0, 140.0, "Accessory"),
        rec("VENT-300", "Ridge ventilator 300", "pcs", 22.0, 420.0, "Accessory"),
        rec("CRN-BKT-L", "Crane bracket light duty", "pcs", 45.0, 210.0, "Crane"),
        rec("CRN-BKT-M", "Crane bracket medium duty", "pcs", 85.0, 380.0, "Crane"),
        rec("CRN-BKT-H", "Crane bracket heavy duty", "pcs", 140.0, 610.0, "Crane"),
        rec("CRN-STOP", "Crane end stop", "pcs", 18.0, 95.0, "Crane"),
        rec("MON-FRM", "Roof monitor frame", "m", 12.0, 55.0, "Secondary"),
    ];

    let ssdb = vec![
        rec("RFC-BU", "Rigid frame column built-up", "m", 42.0, 189.0, "Primary"),
        rec("RFR-BU", "Rigid frame rafter built-up", "m", 36.0, 162.0, "Primary"),
        rec("IC-HSS200", "Interior column HSS 200x200x6", "m", 36.0, 158.0, "Primary"),
        rec("CAN-RAF", "Canopy rafter built-up", "m", 18.0, 85.0, "Primary"),
        rec("W200X21", "Hot-rolled W200x21", "m", 21.0, 92.0, "HotRolled"),
        rec("W250X33", "Hot-rolled W250x33", "m", 33.0, 145.0, "HotRolled"),
        rec("C200-20", "C-section 200x75x2.0", "m", 7.9, 36.0, "HotRolled"),
        rec("BU-EWC", "Built-up endwall column", "m", 28.0, 126.0, "Primary"),
        rec("ES200", "Eave strut 200", "m", 6.8, 32.0, "Secondary"),
        rec("MB-IPE300", "Mezzanine beam IPE300", "m", 42.2, 185.0, "HotRolled"),
        rec("MC-HSS150", "Mezzanine column HSS 150x150x5", "m", 22.6, 100.0, "HotRolled"),
        rec("CB-W300", "Crane runway beam W300", "m", 41.0, 190.0, "HotRolled"),
        rec("CB-W400", "Crane runway beam W400", "m", 60.0, 270.0, "HotRolled"),
        rec("CB-W500", "Crane runway beam W500", "m", 89.0, 400.0, "HotRolled"),
        rec("CB-BU", "Crane runway beam built-up", "m", 120.0, 540.0, "Primary"),
        rec("RAIL-A55", "Crane rail A55", "m", 31.8, 160.0, "HotRolled"),
        rec("RAIL-A75", "Crane rail A75", "m", 56.2, 270.0, "HotRolled"),
    ];

    let raw_materials = vec![
        rec("PLT-10", "Steel plate 10mm", "sqm", 78.5, 240.0, "Raw"),
        rec("ANG-50", "Angle 50x50x5", "m", 3.77, 16.0, "Raw"),
    ];

    let mut store = ReferenceStore::new();
    store.set_records(Catalog::Mbsdb, mbsdb);
    store.set_records(Catalog::Ssdb, ssdb);
    store.set_records(Catalog::RawMaterials, raw_materials);
    store.set_bands(builtin_bands());
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_case_insensitive() {
        let store = builtin_store();
        assert!(store.find("Z200-15").is_some());
        assert!(store.find("z200-15").is_some());
        assert!(store.find("  Z200-15 ").is_some());
        assert!(store.find("Z999-99").is_none());
    }

    #[test]
    fn test_find_searches_catalogs_in_order() {
        let store = builtin_store();
        // SSDB-only code reachable through the cross-catalog lookup
        assert!(store.find_in(Catalog::Mbsdb, "RFC-BU").is_none());
        assert!(store.find("RFC-BU").is_some());
    }

    #[test]
    fn test_require_missing_is_fatal() {
        let store = builtin_store();
        let err = store.require("NOPE", "purlin selection").unwrap_err();
        assert_eq!(err.error_code(), "MISSING_REFERENCE");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_total_safe_projections() {
        let store = builtin_store();
        assert!(store.weight("Z200-15") > 0.0);
        assert_eq!(store.weight("NOPE"), 0.0);
        assert_eq!(store.price("NOPE"), 0.0);
        assert_eq!(store.material_cost("NOPE"), 0.0);
        assert_eq!(store.description("NOPE"), "");
        assert_eq!(store.unit("NOPE"), "");
    }

    #[test]
    fn test_search_substring() {
        let store = builtin_store();
        let hits = store.search("purlin");
        assert!(hits.len() >= 5);
        assert!(hits.iter().all(|r| {
            r.code.to_uppercase().contains("PURLIN")
                || r.description.to_uppercase().contains("PURLIN")
        }));
        assert!(store.search("").is_empty());
    }

    #[test]
    fn test_code_of_exact_before_substring() {
        let store = builtin_store();
        let m = store.code_of("Crane rail A55");
        assert_eq!(m, CodeMatch::Exact { code: "RAIL-A55".to_string() });
        assert_eq!(m.code(), "RAIL-A55");
    }

    #[test]
    fn test_code_of_substring() {
        let store = builtin_store();
        let m = store.code_of("rail A75");
        assert!(matches!(m, CodeMatch::Substring { .. }));
        assert_eq!(m.code(), "RAIL-A75");
    }

    #[test]
    fn test_code_of_none_special_case() {
        let store = builtin_store();
        assert_eq!(store.code_of("None"), CodeMatch::NoSelection);
        assert_eq!(store.code_of("none").code(), "");
    }

    #[test]
    fn test_code_of_raw_fallback_observable() {
        let store = builtin_store();
        let m = store.code_of("FREE-TEXT-CODE");
        assert_eq!(
            m,
            CodeMatch::Unmatched { input: "FREE-TEXT-CODE".to_string() }
        );
        // Legacy behavior preserved: the raw input comes back as the code
        assert_eq!(m.code(), "FREE-TEXT-CODE");
        assert!(!m.is_resolved());
    }

    #[test]
    fn test_select_by_index() {
        let store = builtin_store();
        let code = store.select_by_index(BandKind::Purlin, 7.0).unwrap();
        assert_eq!(code, "Z200-15");
        // Every builtin band code exists in the builtin catalog
        for kind in BandKind::ALL {
            for entry in store.bands().unwrap().band(kind).entries() {
                assert!(
                    store.find(&entry.code).is_some(),
                    "band code {} missing from catalog",
                    entry.code
                );
            }
        }
    }

    #[test]
    fn test_select_without_bands_fails() {
        let store = ReferenceStore::new();
        let err = store.select_by_index(BandKind::Girt, 1.0).unwrap_err();
        assert_eq!(err.error_code(), "STORE_UNAVAILABLE");
    }

    #[test]
    fn test_invalidate_rebuilds_index() {
        let mut store = builtin_store();
        assert!(store.find("Z200-15").is_some()); // force the index build

        store.set_records(
            Catalog::Mbsdb,
            vec![rec("NEW-1", "New product", "pcs", 1.0, 2.0, "Accessory")],
        );
        store.invalidate(Catalog::Mbsdb);

        assert!(store.find_in(Catalog::Mbsdb, "Z200-15").is_none());
        assert!(store.find("NEW-1").is_some());
    }

    #[test]
    fn test_csv_load() {
        let dir = std::env::temp_dir().join("pemb_refdata_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mbsdb.csv");
        std::fs::write(
            &path,
            "Code,Description,Unit,Weight,MaterialCost,ManufacturingCost,OverheadCost,Price,Category,Grade\n\
             Z150-15,Z-purlin 150x65x1.5,m,4.2,10.45,4.75,1.52,19.0,Secondary,S350\n\
             PAN-R-045,Roof panel 0.45 aluzinc,sqm,4.3,-,,,26.0,Panel,\n",
        )
        .unwrap();

        let mut store = ReferenceStore::new();
        let count = store
            .load_catalog_csv(Catalog::Mbsdb, path.to_str().unwrap())
            .unwrap();
        assert_eq!(count, 2);

        let purlin = store.find("Z150-15").unwrap();
        assert_eq!(purlin.grade.as_deref(), Some("S350"));
        assert_eq!(purlin.price, 19.0);

        let panel = store.find("PAN-R-045").unwrap();
        assert_eq!(panel.material_cost, 0.0); // dash parses as absent
        assert_eq!(panel.grade, None);
    }

    #[test]
    fn test_csv_missing_file_is_store_unavailable() {
        let mut store = ReferenceStore::new();
        let err = store
            .load_catalog_csv(Catalog::Ssdb, "/no/such/file.csv")
            .unwrap_err();
        assert_eq!(err.error_code(), "STORE_UNAVAILABLE");
    }
}
