//! Selection bands: ordered design-index lookup tables
//!
//! A band maps a computed design index (a load/span-derived scalar) to a
//! component code: the first entry whose `max_index` is at or above the
//! given index wins. The last entry of every band is the built-up fallback
//! with an unbounded `max_index`, so selection always succeeds.
//!
//! The threshold/code tables are configuration external to the engine.
//! [`builtin_bands`] ships a representative default; production deployments
//! load their own tables through the same types.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Threshold marking a band entry as unbounded (the built-up fallback).
///
/// `f64::MAX` rather than infinity so band tables survive a JSON round trip.
pub const UNBOUNDED: f64 = f64::MAX;

/// Structural roles selected through index bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BandKind {
    /// Roof purlins (Z-sections)
    Purlin,
    /// Wall girts (Z-sections)
    Girt,
    /// Endwall columns (C-sections / hot-rolled)
    EndwallColumn,
    /// Floor joists (mezzanines)
    Joist,
}

impl BandKind {
    /// All band kinds for iteration
    pub const ALL: [BandKind; 4] = [
        BandKind::Purlin,
        BandKind::Girt,
        BandKind::EndwallColumn,
        BandKind::Joist,
    ];

    /// Human-readable role name (used in error context)
    pub fn display_name(&self) -> &'static str {
        match self {
            BandKind::Purlin => "purlin",
            BandKind::Girt => "girt",
            BandKind::EndwallColumn => "endwall column",
            BandKind::Joist => "joist",
        }
    }
}

impl std::fmt::Display for BandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One band row: indices up to `max_index` select `code`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandEntry {
    /// Upper bound (inclusive) of the design index this entry covers
    pub max_index: f64,
    /// Component code to select
    pub code: String,
}

impl BandEntry {
    pub fn new(max_index: f64, code: impl Into<String>) -> Self {
        BandEntry {
            max_index,
            code: code.into(),
        }
    }
}

/// An ordered selection band.
///
/// Invariant (checked at construction): entries are strictly ascending in
/// `max_index` and the final entry is unbounded (`UNBOUNDED`), making it
/// the built-up fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionBand {
    kind: BandKind,
    entries: Vec<BandEntry>,
}

impl SelectionBand {
    /// Build a band, enforcing the ascending-threshold invariant.
    pub fn new(kind: BandKind, entries: Vec<BandEntry>) -> EstimateResult<Self> {
        if entries.is_empty() {
            return Err(EstimateError::invalid_input(
                format!("band_{}", kind.display_name()),
                "[]",
                "Band must have at least one entry",
            ));
        }
        for pair in entries.windows(2) {
            if pair[1].max_index <= pair[0].max_index {
                return Err(EstimateError::invalid_input(
                    format!("band_{}", kind.display_name()),
                    format!("{} after {}", pair[1].max_index, pair[0].max_index),
                    "Band thresholds must be strictly ascending",
                ));
            }
        }
        if entries.last().map(|e| e.max_index) != Some(UNBOUNDED) {
            return Err(EstimateError::invalid_input(
                format!("band_{}", kind.display_name()),
                entries.last().map(|e| e.max_index.to_string()).unwrap_or_default(),
                "Final band entry must be the unbounded built-up fallback",
            ));
        }
        Ok(SelectionBand { kind, entries })
    }

    pub fn kind(&self) -> BandKind {
        self.kind
    }

    pub fn entries(&self) -> &[BandEntry] {
        &self.entries
    }

    /// Select the component code for a design index: first entry whose
    /// `max_index >= index`. The unbounded fallback guarantees a hit.
    pub fn select(&self, index: f64) -> &str {
        self.entries
            .iter()
            .find(|e| e.max_index >= index)
            .map(|e| e.code.as_str())
            .unwrap_or_else(|| self.entries.last().map(|e| e.code.as_str()).unwrap_or(""))
    }
}

/// The four concrete bands consulted by the calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSet {
    purlin: SelectionBand,
    girt: SelectionBand,
    endwall_column: SelectionBand,
    joist: SelectionBand,
}

impl BandSet {
    pub fn new(
        purlin: SelectionBand,
        girt: SelectionBand,
        endwall_column: SelectionBand,
        joist: SelectionBand,
    ) -> Self {
        BandSet {
            purlin,
            girt,
            endwall_column,
            joist,
        }
    }

    /// The band for a structural role
    pub fn band(&self, kind: BandKind) -> &SelectionBand {
        match kind {
            BandKind::Purlin => &self.purlin,
            BandKind::Girt => &self.girt,
            BandKind::EndwallColumn => &self.endwall_column,
            BandKind::Joist => &self.joist,
        }
    }

    /// Select a component code for a role and design index
    pub fn select(&self, kind: BandKind, index: f64) -> &str {
        self.band(kind).select(index)
    }
}

/// Default threshold/code tables.
///
/// Thresholds are design moments in kN-m; codes resolve against the builtin
/// reference catalog (see `refdata::builtin_store`).
pub fn builtin_bands() -> BandSet {
    let band = |kind, rows: &[(f64, &str)]| {
        let entries = rows
            .iter()
            .map(|(max, code)| BandEntry::new(*max, *code))
            .collect();
        // Builtin tables satisfy the invariant
        SelectionBand::new(kind, entries).unwrap()
    };

    BandSet::new(
        band(
            BandKind::Purlin,
            &[
                (5.0, "Z150-15"),
                (10.0, "Z200-15"),
                (15.0, "Z200-20"),
                (25.0, "Z250-20"),
                (UNBOUNDED, "BU-PURLIN"),
            ],
        ),
        band(
            BandKind::Girt,
            &[
                (5.0, "Z150-15"),
                (12.0, "Z200-15"),
                (20.0, "Z250-18"),
                (UNBOUNDED, "BU-GIRT"),
            ],
        ),
        band(
            BandKind::EndwallColumn,
            &[
                (8.0, "C200-20"),
                (18.0, "W200X21"),
                (30.0, "W250X33"),
                (UNBOUNDED, "BU-EWC"),
            ],
        ),
        band(
            BandKind::Joist,
            &[
                (6.0, "J150"),
                (12.0, "J200"),
                (20.0, "J250"),
                (UNBOUNDED, "BU-JOIST"),
            ],
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_band() -> SelectionBand {
        SelectionBand::new(
            BandKind::Purlin,
            vec![
                BandEntry::new(5.0, "A"),
                BandEntry::new(10.0, "B"),
                BandEntry::new(UNBOUNDED, "FALLBACK"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_select_first_fit() {
        let band = test_band();
        assert_eq!(band.select(0.0), "A");
        assert_eq!(band.select(5.0), "A"); // inclusive upper bound
        assert_eq!(band.select(5.1), "B");
        assert_eq!(band.select(10.0), "B");
        assert_eq!(band.select(1000.0), "FALLBACK");
    }

    #[test]
    fn test_selection_monotonic() {
        let band = test_band();
        let threshold_of = |idx: f64| {
            let code = band.select(idx);
            band.entries()
                .iter()
                .find(|e| e.code == code)
                .map(|e| e.max_index)
                .unwrap()
        };

        let indices = [0.0, 2.5, 5.0, 7.0, 9.9, 10.0, 11.0, 50.0];
        for pair in indices.windows(2) {
            assert!(
                threshold_of(pair[0]) <= threshold_of(pair[1]),
                "selection jumped backward between {} and {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_descending_thresholds_rejected() {
        let result = SelectionBand::new(
            BandKind::Girt,
            vec![
                BandEntry::new(10.0, "A"),
                BandEntry::new(5.0, "B"),
                BandEntry::new(UNBOUNDED, "C"),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let result = SelectionBand::new(
            BandKind::Girt,
            vec![BandEntry::new(5.0, "A"), BandEntry::new(10.0, "B")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_band_rejected() {
        assert!(SelectionBand::new(BandKind::Joist, vec![]).is_err());
    }

    #[test]
    fn test_builtin_bands_cover_all_kinds() {
        let bands = builtin_bands();
        for kind in BandKind::ALL {
            // Every builtin band falls back to a built-up member
            assert!(bands.select(kind, f64::MAX).starts_with("BU-"));
        }
    }

    #[test]
    fn test_band_serialization() {
        let band = test_band();
        let json = serde_json::to_string(&band).unwrap();
        let back: SelectionBand = serde_json::from_str(&json).unwrap();
        assert_eq!(band.kind(), back.kind());
        assert_eq!(back.select(7.0), "B");
    }
}
