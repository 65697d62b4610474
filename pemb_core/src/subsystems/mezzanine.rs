//! Mezzanine floor calculator.
//!
//! A mezzanine brings its own column grid (spans x bays), a deck selection
//! and a floor live load. Joists are selected through the joist band from
//! the floor-load design index; deck type picks the deck product.

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, CostCategory};
use crate::dimlist::DimensionList;
use crate::engine::{emit, round2};
use crate::errors::{EstimateError, EstimateResult};
use crate::refdata::bands::BandKind;
use crate::refdata::ReferenceStore;

use super::{SubsystemCalculator, SubsystemKind};

/// Standard mezzanine joist spacing (m) when the input leaves it unset
const DEFAULT_JOIST_SPACING_M: f64 = 1.5;

/// Deck self-weight allowance (kN/m2) added to the applied dead load
const DECK_DEAD_ALLOWANCE_KNM2: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MezzanineInput {
    pub label: String,
    /// Beam spans across the mezzanine width, compact notation (e.g. "2@6")
    pub spans: String,
    /// Column bays along the mezzanine length, compact notation
    pub bays: String,
    /// Deck selection: "PLATE" for checkered plate, anything else (or
    /// empty) for the standard galvanized deck panel
    pub deck_type: String,
    pub height_m: f64,
    pub live_load_knm2: f64,
    pub dead_load_knm2: f64,
    /// 0 means the standard spacing (1.5 m)
    pub joist_spacing_m: f64,
}

impl MezzanineInput {
    fn joist_spacing(&self) -> f64 {
        if self.joist_spacing_m > 0.0 {
            self.joist_spacing_m
        } else {
            DEFAULT_JOIST_SPACING_M
        }
    }

    fn deck_code(&self) -> &'static str {
        if self.deck_type.trim().eq_ignore_ascii_case("PLATE") {
            "PLT-CHQ"
        } else {
            "DECK-055"
        }
    }
}

impl SubsystemCalculator for MezzanineInput {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Mezzanine
    }

    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials> {
        let spans = DimensionList::parse_named("mezzanine.spans", &self.spans)?;
        let bays = DimensionList::parse_named("mezzanine.bays", &self.bays)?;

        if spans.is_empty()
            || bays.is_empty()
            || spans.total_span() <= 0.0
            || bays.total_span() <= 0.0
        {
            return Err(EstimateError::invalid_input(
                "mezzanine.spans",
                format!("'{}' x '{}'", self.spans, self.bays),
                "Mezzanine needs non-empty spans and bays with positive totals",
            ));
        }
        if self.height_m <= 0.0 {
            return Err(EstimateError::invalid_input(
                "mezzanine.height_m",
                self.height_m.to_string(),
                "Mezzanine height must be positive",
            ));
        }

        let width = spans.total_span();
        let length = bays.total_span();
        let area = width * length;
        let max_span = spans.expand().into_iter().fold(0.0f64, f64::max);

        // Floor-load design index, continuous-span joists
        let floor_load = self.dead_load_knm2 + DECK_DEAD_ALLOWANCE_KNM2 + self.live_load_knm2;
        let joist_index = floor_load * self.joist_spacing() * max_span.powi(2) / 10.0;
        let joist_code = store.select_by_index(BandKind::Joist, joist_index)?;

        let mut bom = BillOfMaterials::new();
        bom.push_header(format!("MEZZANINE - {}", self.label));

        let n_columns = (spans.total_count() + 1) as f64 * (bays.total_count() + 1) as f64;
        emit(
            &mut bom,
            store,
            "MC-HSS150",
            n_columns * self.height_m,
            CostCategory::Ssl,
            "mezzanine column",
        )?;

        // Main beams run along every column line
        let beam_lines = (spans.total_count() + 1) as f64;
        emit(
            &mut bom,
            store,
            "MB-IPE300",
            beam_lines * length,
            CostCategory::Ssl,
            "mezzanine beam",
        )?;

        emit(
            &mut bom,
            store,
            joist_code,
            round2(area / self.joist_spacing()),
            CostCategory::Steel,
            "mezzanine joist selection",
        )?;

        emit(
            &mut bom,
            store,
            self.deck_code(),
            area,
            CostCategory::Panels,
            "mezzanine deck",
        )?;

        emit(
            &mut bom,
            store,
            "C200-20",
            2.0 * (width + length),
            CostCategory::Steel,
            "mezzanine edge channel",
        )?;

        Ok(bom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata::builtin_store;

    fn sample() -> MezzanineInput {
        MezzanineInput {
            label: "MZ-1".to_string(),
            spans: "2@6".to_string(),
            bays: "3@6".to_string(),
            deck_type: String::new(),
            height_m: 3.5,
            live_load_knm2: 3.0,
            dead_load_knm2: 0.3,
            joist_spacing_m: 0.0,
        }
    }

    #[test]
    fn test_mezzanine_bom() {
        let store = builtin_store();
        let bom = sample().calculate(&store).unwrap();

        assert!(bom.item_count() >= 5);
        assert!(bom.total_weight_kg() > 0.0);
        // 12x18 grid: 3x4 columns at 3.5 m
        let columns = bom.items().find(|i| i.db_code == "MC-HSS150").unwrap();
        assert!((columns.quantity - 42.0).abs() < 1e-9);
        // Standard deck over the full area
        let deck = bom.items().find(|i| i.db_code == "DECK-055").unwrap();
        assert!((deck.quantity - 216.0).abs() < 1e-9);
    }

    #[test]
    fn test_deck_type_selects_plate() {
        let store = builtin_store();
        let bom = MezzanineInput {
            deck_type: "PLATE".to_string(),
            ..sample()
        }
        .calculate(&store)
        .unwrap();
        assert!(bom.items().any(|i| i.db_code == "PLT-CHQ"));
        assert!(!bom.items().any(|i| i.db_code == "DECK-055"));
    }

    #[test]
    fn test_joist_band_reacts_to_load() {
        let store = builtin_store();
        let light = sample().calculate(&store).unwrap();
        let heavy = MezzanineInput {
            live_load_knm2: 10.0,
            ..sample()
        }
        .calculate(&store)
        .unwrap();

        let code = |bom: &BillOfMaterials| {
            bom.items()
                .find(|i| i.db_code.starts_with('J') || i.db_code == "BU-JOIST")
                .map(|i| i.db_code.clone())
                .unwrap()
        };
        assert_ne!(code(&light), code(&heavy));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let store = builtin_store();
        let err = MezzanineInput {
            spans: String::new(),
            ..sample()
        }
        .calculate(&store)
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_negative_span_rejected() {
        let store = builtin_store();
        let err = MezzanineInput {
            spans: "1@-6".to_string(),
            ..sample()
        }
        .calculate(&store)
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_format_error_names_owning_field() {
        let store = builtin_store();
        let err = MezzanineInput {
            spans: "bad@span".to_string(),
            ..sample()
        }
        .calculate(&store)
        .unwrap_err();
        assert!(
            matches!(err, EstimateError::FormatError { ref field, .. } if field == "mezzanine.spans")
        );
    }

    #[test]
    fn test_zero_height_rejected() {
        let store = builtin_store();
        let err = MezzanineInput {
            height_m: 0.0,
            ..sample()
        }
        .calculate(&store)
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
