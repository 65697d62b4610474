//! # Bill of Materials
//!
//! The common output contract of every calculator: an ordered sequence of
//! rows with per-item quantity, weight and price, plus aggregate totals.
//!
//! Rows are a tagged variant so aggregation can pattern-match and skip the
//! presentation rows: [`BomRow::Header`] and [`BomRow::Separator`] exist
//! purely for report sectioning and carry no quantity, weight or price.
//!
//! ## Example
//!
//! ```rust
//! use pemb_core::bom::{BillOfMaterials, CostCategory};
//!
//! let mut bom = BillOfMaterials::new();
//! bom.push_header("SECONDARY MEMBERS");
//! bom.add_item("Z200-15", "Z-purlin 200x65x1.5", 216.0, "m", 5.0, 23.0, CostCategory::Steel);
//! bom.push_separator();
//!
//! assert_eq!(bom.item_count(), 1);
//! assert_eq!(bom.total_weight_kg(), 1080.0);
//! ```

use serde::{Deserialize, Serialize};

/// Cost category tag carried by every data row.
///
/// Aggregation keys its category subtotals and markup application off this
/// tag, so calculators must classify every row they emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CostCategory {
    /// Primary and secondary steel (frames, purlins, girts, bracing)
    Steel,
    /// Sheeting (roof, wall, partition, liner, deck)
    Panels,
    /// Trims and flashings
    Trims,
    /// Fasteners, anchor bolts and fixings
    Fasteners,
    /// Structural steel ledger items (crane runway beams, rails, hot-rolled)
    Ssl,
    /// Bought-out accessories (doors, windows, vents)
    BuyOut,
}

impl CostCategory {
    pub const ALL: [CostCategory; 6] = [
        CostCategory::Steel,
        CostCategory::Panels,
        CostCategory::Trims,
        CostCategory::Fasteners,
        CostCategory::Ssl,
        CostCategory::BuyOut,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CostCategory::Steel => "Steel",
            CostCategory::Panels => "Panels",
            CostCategory::Trims => "Trims & Flashings",
            CostCategory::Fasteners => "Fasteners",
            CostCategory::Ssl => "Structural Steel Ledger",
            CostCategory::BuyOut => "Buy-out Items",
        }
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One priced line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    /// 1-based position among data rows of the owning BOM
    pub line_number: u32,
    /// Reference catalog code
    pub db_code: String,
    pub description: String,
    pub quantity: f64,
    /// Sales unit ("m", "sqm", "pcs")
    pub unit: String,
    pub unit_weight_kg: f64,
    pub total_weight_kg: f64,
    pub unit_price_aed: f64,
    pub total_price_aed: f64,
    pub category: CostCategory,
}

/// A BOM row: real data, or a presentation-only header/separator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "row")]
pub enum BomRow {
    Data(BomItem),
    Header { title: String },
    Separator,
}

impl BomRow {
    /// The data item, if this row carries one
    pub fn item(&self) -> Option<&BomItem> {
        match self {
            BomRow::Data(item) => Some(item),
            _ => None,
        }
    }
}

/// An ordered bill of materials: one per calculator invocation.
///
/// BOMs from different sub-systems are concatenated, never merged
/// row-by-row, preserving each sub-system's internal ordering and headers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BillOfMaterials {
    rows: Vec<BomRow>,
}

impl BillOfMaterials {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows, including headers and separators
    pub fn rows(&self) -> &[BomRow] {
        &self.rows
    }

    /// Data rows only
    pub fn items(&self) -> impl Iterator<Item = &BomItem> {
        self.rows.iter().filter_map(BomRow::item)
    }

    /// Append a section header (presentation-only row)
    pub fn push_header(&mut self, title: impl Into<String>) {
        self.rows.push(BomRow::Header { title: title.into() });
    }

    /// Append a separator (presentation-only row)
    pub fn push_separator(&mut self) {
        self.rows.push(BomRow::Separator);
    }

    /// Append a data row, assigning the next line number and computing the
    /// weight/price totals from quantity.
    #[allow(clippy::too_many_arguments)]
    pub fn add_item(
        &mut self,
        db_code: impl Into<String>,
        description: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        unit_weight_kg: f64,
        unit_price_aed: f64,
        category: CostCategory,
    ) {
        let line_number = self.item_count() as u32 + 1;
        self.rows.push(BomRow::Data(BomItem {
            line_number,
            db_code: db_code.into(),
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_weight_kg,
            total_weight_kg: quantity * unit_weight_kg,
            unit_price_aed,
            total_price_aed: quantity * unit_price_aed,
            category,
        }));
    }

    /// Number of data rows (headers and separators excluded)
    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of data-row weights (kg)
    pub fn total_weight_kg(&self) -> f64 {
        self.items().map(|i| i.total_weight_kg).sum()
    }

    /// Sum of data-row prices (AED)
    pub fn total_price_aed(&self) -> f64 {
        self.items().map(|i| i.total_price_aed).sum()
    }

    /// Concatenate BOMs in order, keeping every source's rows intact
    pub fn concat<'a>(boms: impl IntoIterator<Item = &'a BillOfMaterials>) -> BillOfMaterials {
        let mut out = BillOfMaterials::new();
        for bom in boms {
            out.rows.extend(bom.rows.iter().cloned());
        }
        out
    }
}
