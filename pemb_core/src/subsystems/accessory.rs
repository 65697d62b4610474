//! Accessory and framed-opening calculator.
//!
//! Accessories (doors, windows, louvers, vents, skylights) are bought-out
//! items resolved to catalog codes; framed openings add the cold-formed
//! framing around each hole. Unknown accessory kinds fall back to the
//! store's permissive description-to-code resolution, so a free-text kind
//! that happens to name a real product still prices.

use serde::{Deserialize, Serialize};

use crate::bom::{BillOfMaterials, CostCategory};
use crate::engine::emit;
use crate::errors::EstimateResult;
use crate::refdata::{CodeMatch, ReferenceStore};

use super::{SubsystemCalculator, SubsystemKind};

/// One accessory request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessoryItem {
    /// Accessory kind: "PERSONNEL_DOOR", "ROLLING_SHUTTER", "WINDOW",
    /// "LOUVER", "RIDGE_VENT", "SKYLIGHT", or free text resolved against
    /// the catalog
    pub kind: String,
    pub width_m: f64,
    pub height_m: f64,
    pub count: u32,
}

/// One framed wall opening (no infill, framing only).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningInput {
    pub label: String,
    pub width_m: f64,
    pub height_m: f64,
    pub count: u32,
}

/// Combined input block for the accessory calculator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessoriesInput {
    pub items: Vec<AccessoryItem>,
    pub openings: Vec<OpeningInput>,
}

/// Known accessory kinds: (catalog code, priced per area?)
fn known_kind(kind: &str) -> Option<(&'static str, bool)> {
    match kind.trim().to_uppercase().as_str() {
        "PERSONNEL_DOOR" => Some(("DR-PERS", false)),
        "ROLLING_SHUTTER" => Some(("DR-RS", true)),
        "WINDOW" => Some(("WIN-AL", true)),
        "LOUVER" => Some(("LOUV-600", false)),
        "RIDGE_VENT" => Some(("VENT-300", false)),
        "SKYLIGHT" => Some(("SKY-PC", true)),
        _ => None,
    }
}

impl SubsystemCalculator for AccessoriesInput {
    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Accessory
    }

    fn calculate(&self, store: &ReferenceStore) -> EstimateResult<BillOfMaterials> {
        let mut bom = BillOfMaterials::new();

        if !self.items.is_empty() {
            bom.push_header("ACCESSORIES");
            for item in &self.items {
                let count = item.count.max(1) as f64;

                let (code, per_area) = match known_kind(&item.kind) {
                    Some(pair) => (pair.0.to_string(), pair.1),
                    None => match store.code_of(&item.kind) {
                        CodeMatch::NoSelection => continue,
                        // Unmatched passes the raw text through; require()
                        // below turns it into MissingReference unless it
                        // happens to be a real code
                        m => (m.code().to_string(), false),
                    },
                };

                let quantity = if per_area {
                    count * item.width_m * item.height_m
                } else {
                    count
                };
                emit(&mut bom, store, &code, quantity, CostCategory::BuyOut, "accessory")?;
            }
        }

        if !self.openings.is_empty() {
            bom.push_header("OPENINGS");
            for opening in &self.openings {
                let count = opening.count.max(1) as f64;
                let framing_m = count * 2.0 * (opening.width_m + opening.height_m);
                emit(
                    &mut bom,
                    store,
                    "C200-20",
                    framing_m,
                    CostCategory::Steel,
                    "opening framing",
                )?;
            }
        }

        Ok(bom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata::builtin_store;

    #[test]
    fn test_known_accessories() {
        let store = builtin_store();
        let input = AccessoriesInput {
            items: vec![
                AccessoryItem {
                    kind: "PERSONNEL_DOOR".to_string(),
                    width_m: 1.0,
                    height_m: 2.1,
                    count: 2,
                },
                AccessoryItem {
                    kind: "ROLLING_SHUTTER".to_string(),
                    width_m: 4.0,
                    height_m: 4.5,
                    count: 1,
                },
            ],
            openings: vec![],
        };

        let bom = input.calculate(&store).unwrap();
        let doors = bom.items().find(|i| i.db_code == "DR-PERS").unwrap();
        assert!((doors.quantity - 2.0).abs() < 1e-9);
        // Shutters price per square meter
        let shutter = bom.items().find(|i| i.db_code == "DR-RS").unwrap();
        assert!((shutter.quantity - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_openings_framing() {
        let store = builtin_store();
        let input = AccessoriesInput {
            items: vec![],
            openings: vec![OpeningInput {
                label: "O-1".to_string(),
                width_m: 3.0,
                height_m: 4.0,
                count: 2,
            }],
        };
        let bom = input.calculate(&store).unwrap();
        let framing = bom.items().find(|i| i.db_code == "C200-20").unwrap();
        assert!((framing.quantity - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_free_text_kind_resolves_through_catalog() {
        let store = builtin_store();
        let input = AccessoriesInput {
            items: vec![AccessoryItem {
                kind: "Wall louver 600x600".to_string(),
                count: 3,
                ..Default::default()
            }],
            openings: vec![],
        };
        let bom = input.calculate(&store).unwrap();
        assert!(bom.items().any(|i| i.db_code == "LOUV-600"));
    }

    #[test]
    fn test_none_kind_skipped() {
        let store = builtin_store();
        let input = AccessoriesInput {
            items: vec![AccessoryItem {
                kind: "None".to_string(),
                count: 1,
                ..Default::default()
            }],
            openings: vec![],
        };
        let bom = input.calculate(&store).unwrap();
        assert_eq!(bom.item_count(), 0);
    }

    #[test]
    fn test_unmatched_kind_is_missing_reference() {
        let store = builtin_store();
        let input = AccessoriesInput {
            items: vec![AccessoryItem {
                kind: "FLYING_BUTTRESS".to_string(),
                count: 1,
                ..Default::default()
            }],
            openings: vec![],
        };
        let err = input.calculate(&store).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_REFERENCE");
    }
}
