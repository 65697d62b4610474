//! # Aggregation & Report Projections
//!
//! Merges the primary BOM with every active sub-system BOM, applies the
//! per-category markups to the price side (never to weight), and produces
//! the summary figures and per-sheet views the export layer consumes.
//!
//! Aggregation is pure and deterministic: identical BOMs and markups
//! always yield an identical [`EstimationResult`]. Results are created
//! fresh on every calculation and never mutated in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, BomRow, CostCategory};
use crate::building::{Dimensions, Loads};
use crate::subsystems::SubsystemKind;

/// Per-category price multipliers. 0 means no markup; 0.10 adds 10%.
///
/// Markups touch price only - weight is never marked up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Markups {
    pub steel: f64,
    pub panels: f64,
    /// Structural steel ledger (crane beams, rails, hot-rolled)
    pub ssl: f64,
    /// Applied on top of the FOB price to reach the selling total
    pub finance: f64,
}

impl Markups {
    /// Multiplier for a cost category (buy-out items carry no markup)
    pub fn for_category(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Steel | CostCategory::Fasteners => self.steel,
            CostCategory::Panels | CostCategory::Trims => self.panels,
            CostCategory::Ssl => self.ssl,
            CostCategory::BuyOut => 0.0,
        }
    }
}

/// Aggregated figures for one cost category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub weight_kg: f64,
    /// Price before markup
    pub price_aed: f64,
    /// Price after the category markup
    pub marked_price_aed: f64,
}

/// The headline figures every report sheet opens with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_weight_kg: f64,
    pub total_weight_mt: f64,
    /// Selling total: FOB price plus the finance markup
    pub total_price_aed: f64,
    /// 0 when the total weight is zero
    pub price_per_mt: f64,
    /// Sum of marked-up category prices, before finance
    pub fob_price_aed: f64,
}

/// The complete output of one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub dimensions: Dimensions,
    pub loads: Loads,
    pub primary: BillOfMaterials,
    /// Sub-system BOMs keyed by kind; same-kind BOMs arrive concatenated
    pub subsystems: BTreeMap<SubsystemKind, BillOfMaterials>,
    pub markups: Markups,
    pub categories: BTreeMap<CostCategory, CategoryTotal>,
    pub summary: Summary,
}

/// Merge the primary BOM with the sub-system BOMs and compute all totals.
///
/// BOMs are concatenated, never merged row-by-row; each sub-system keeps
/// its internal ordering and headers.
pub fn aggregate(
    dimensions: Dimensions,
    loads: Loads,
    primary: BillOfMaterials,
    subsystem_boms: Vec<(SubsystemKind, BillOfMaterials)>,
    markups: Markups,
) -> EstimationResult {
    let mut subsystems: BTreeMap<SubsystemKind, BillOfMaterials> = BTreeMap::new();
    for (kind, bom) in subsystem_boms {
        let entry = subsystems.entry(kind).or_default();
        *entry = BillOfMaterials::concat([&*entry, &bom]);
    }

    let mut categories: BTreeMap<CostCategory, CategoryTotal> = BTreeMap::new();
    let all_items = primary
        .items()
        .chain(subsystems.values().flat_map(|b| b.items()));
    for item in all_items {
        let total = categories.entry(item.category).or_default();
        total.weight_kg += item.total_weight_kg;
        total.price_aed += item.total_price_aed;
    }
    for (category, total) in categories.iter_mut() {
        total.marked_price_aed = total.price_aed * (1.0 + markups.for_category(*category));
    }

    let total_weight_kg: f64 = categories.values().map(|t| t.weight_kg).sum();
    let fob_price_aed: f64 = categories.values().map(|t| t.marked_price_aed).sum();
    let total_price_aed = fob_price_aed * (1.0 + markups.finance);
    let total_weight_mt = total_weight_kg / 1000.0;
    let price_per_mt = if total_weight_mt > 0.0 {
        total_price_aed / total_weight_mt
    } else {
        0.0
    };

    EstimationResult {
        dimensions,
        loads,
        primary,
        subsystems,
        markups,
        categories,
        summary: Summary {
            total_weight_kg,
            total_weight_mt,
            total_price_aed,
            price_per_mt,
            fob_price_aed,
        },
    }
}

/// The report sheets carved out of one estimation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetKind {
    /// Summary figures only
    Recap,
    /// Full BOM with section headers
    Detail,
    /// Category-grouped cost/price breakdown
    Fcpbs,
    /// Steel abstract list: steel and ledger data rows only
    Sal,
    /// Bill of quantities: all data rows, no presentation rows
    Boq,
    /// Job authorization figures: category weights plus summary
    Jaf,
}

impl SheetKind {
    pub fn title(&self) -> &'static str {
        match self {
            SheetKind::Recap => "Recap",
            SheetKind::Detail => "Detail",
            SheetKind::Fcpbs => "FCPBS",
            SheetKind::Sal => "SAL",
            SheetKind::Boq => "BOQ",
            SheetKind::Jaf => "JAF",
        }
    }
}

/// One category line on a grouped sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLine {
    pub category: CostCategory,
    pub label: String,
    pub weight_kg: f64,
    pub price_aed: f64,
    pub marked_price_aed: f64,
}

/// A sheet-shaped view over an estimation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetView {
    pub sheet: SheetKind,
    pub title: String,
    pub rows: Vec<BomRow>,
    pub categories: Vec<CategoryLine>,
    pub summary: Option<Summary>,
}

impl EstimationResult {
    /// The primary BOM followed by every sub-system BOM, in kind order
    pub fn combined_bom(&self) -> BillOfMaterials {
        BillOfMaterials::concat(
            std::iter::once(&self.primary).chain(self.subsystems.values()),
        )
    }

    fn category_lines(&self) -> Vec<CategoryLine> {
        self.categories
            .iter()
            .map(|(category, total)| CategoryLine {
                category: *category,
                label: category.display_name().to_string(),
                weight_kg: total.weight_kg,
                price_aed: total.price_aed,
                marked_price_aed: total.marked_price_aed,
            })
            .collect()
    }

    /// Project this result onto one report sheet.
    pub fn sheet(&self, kind: SheetKind) -> SheetView {
        let combined = self.combined_bom();
        let data_rows = |filter: &dyn Fn(CostCategory) -> bool| -> Vec<BomRow> {
            combined
                .items()
                .filter(|i| filter(i.category))
                .cloned()
                .map(BomRow::Data)
                .collect()
        };

        match kind {
            SheetKind::Recap => SheetView {
                sheet: kind,
                title: kind.title().to_string(),
                rows: Vec::new(),
                categories: Vec::new(),
                summary: Some(self.summary),
            },
            SheetKind::Detail => SheetView {
                sheet: kind,
                title: kind.title().to_string(),
                rows: combined.rows().to_vec(),
                categories: Vec::new(),
                summary: Some(self.summary),
            },
            SheetKind::Fcpbs => SheetView {
                sheet: kind,
                title: kind.title().to_string(),
                rows: Vec::new(),
                categories: self.category_lines(),
                summary: Some(self.summary),
            },
            SheetKind::Sal => SheetView {
                sheet: kind,
                title: kind.title().to_string(),
                rows: data_rows(&|c| matches!(c, CostCategory::Steel | CostCategory::Ssl)),
                categories: Vec::new(),
                summary: None,
            },
            SheetKind::Boq => SheetView {
                sheet: kind,
                title: kind.title().to_string(),
                rows: data_rows(&|_| true),
                categories: Vec::new(),
                summary: None,
            },
            SheetKind::Jaf => SheetView {
                sheet: kind,
                title: kind.title().to_string(),
                rows: Vec::new(),
                categories: self.category_lines(),
                summary: Some(self.summary),
            },
        }
    }
}
