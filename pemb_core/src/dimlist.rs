//! # Dimension List Parser
//!
//! Parses the compact dimension notation used throughout building input
//! sheets: `"2@24,3@18"` means two groups, the first repeating the value 24
//! twice and the second repeating 18 three times. Used for spans, bays,
//! column spacing, crane rail runs and similar repeated dimensions.
//!
//! Accepted notation is deliberately loose: `@`, `x`, `X` and `:` all work
//! as the count/value delimiter, and `+`, `;`, `/`, `\`, `'`, `&` and `,`
//! all work as group separators. Everything is normalized to the canonical
//! `count@value` comma-joined form before splitting. A bare value with no
//! count implies a count of 1.
//!
//! ## Example
//!
//! ```rust
//! use pemb_core::dimlist::DimensionList;
//!
//! let spans = DimensionList::parse("2@24,3@18").unwrap();
//! assert_eq!(spans.total_count(), 5);
//! assert_eq!(spans.total_span(), 102.0);
//! assert_eq!(spans.expand(), vec![24.0, 24.0, 18.0, 18.0, 18.0]);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// One parsed group: `count` repetitions of `value`, with an optional
/// per-group roof slope override (sloped variant only, defaults to 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimGroup {
    /// Number of repetitions (always >= 1)
    pub count: u32,
    /// Dimension value in meters
    pub value: f64,
    /// Slope override (rise/10 convention), 0 when not given
    pub slope: f64,
}

/// An immutable, ordered sequence of dimension groups.
///
/// Once parsed a list never changes; when the source string changes the
/// caller re-parses and replaces the whole list, so aggregate queries need
/// no cache invalidation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionList {
    groups: Vec<DimGroup>,
}

/// Characters treated as group separators, normalized to `,`
const GROUP_SEPARATORS: [char; 6] = ['+', ';', '/', '\\', '\'', '&'];

/// Characters treated as count/value delimiters, normalized to `@`
const PAIR_SEPARATORS: [char; 3] = ['x', 'X', ':'];

impl DimensionList {
    /// Parse the standard two-segment notation (`count@value`).
    ///
    /// Fails with `FormatError` only on tokens that cannot be read at all;
    /// empty tokens (doubled separators, trailing commas) are skipped.
    pub fn parse(text: &str) -> EstimateResult<Self> {
        Self::parse_inner("dimension_list", text, false)
    }

    /// Parse with the owning field's name carried into any `FormatError`,
    /// so a caller holding several dimension lists can tell which one
    /// failed (e.g. `"crane.rail_runs"` vs `"mezzanine.spans"`).
    pub fn parse_named(field: &str, text: &str) -> EstimateResult<Self> {
        Self::parse_inner(field, text, false)
    }

    /// Parse the slope-aware three-segment notation (`count@value@slope`).
    ///
    /// The third segment is optional per group; absent slope defaults to 0.
    pub fn parse_sloped(text: &str) -> EstimateResult<Self> {
        Self::parse_inner("dimension_list", text, true)
    }

    /// Slope-aware variant of [`DimensionList::parse_named`]
    pub fn parse_sloped_named(field: &str, text: &str) -> EstimateResult<Self> {
        Self::parse_inner(field, text, true)
    }

    fn parse_inner(field: &str, text: &str, allow_slope: bool) -> EstimateResult<Self> {
        let canonical = normalize(text);
        let mut groups = Vec::new();

        for token in canonical.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            let segments: Vec<&str> = token.split('@').map(str::trim).collect();
            let group = match segments.as_slice() {
                // Bare value: count = 1
                [value] => DimGroup {
                    count: 1,
                    value: parse_value(field, token, value)?,
                    slope: 0.0,
                },
                [count, value] => DimGroup {
                    count: parse_count(field, token, count)?,
                    value: parse_value(field, token, value)?,
                    slope: 0.0,
                },
                [count, value, slope] if allow_slope => DimGroup {
                    count: parse_count(field, token, count)?,
                    value: parse_value(field, token, value)?,
                    slope: parse_value(field, token, slope)?,
                },
                _ => {
                    return Err(EstimateError::format_error(
                        field,
                        token,
                        "too many '@' segments",
                    ))
                }
            };
            groups.push(group);
        }

        Ok(DimensionList { groups })
    }

    /// Build a list directly from groups (used by tests and fixtures)
    pub fn from_groups(groups: Vec<DimGroup>) -> Self {
        DimensionList { groups }
    }

    /// The parsed groups, in input order
    pub fn groups(&self) -> &[DimGroup] {
        &self.groups
    }

    /// True when no groups were parsed
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of individual units: sum of group counts
    pub fn total_count(&self) -> u32 {
        self.groups.iter().map(|g| g.count).sum()
    }

    /// Total dimension covered: sum of count * value over all groups
    pub fn total_span(&self) -> f64 {
        self.groups.iter().map(|g| g.count as f64 * g.value).sum()
    }

    /// Materialize one value per unit, e.g. `2@24` -> `[24, 24]`.
    ///
    /// Pure and restartable: calling twice yields identical output.
    pub fn expand(&self) -> Vec<f64> {
        self.groups
            .iter()
            .flat_map(|g| std::iter::repeat(g.value).take(g.count as usize))
            .collect()
    }

    /// Materialize one slope per unit, parallel to `expand()`
    pub fn expand_slopes(&self) -> Vec<f64> {
        self.groups
            .iter()
            .flat_map(|g| std::iter::repeat(g.slope).take(g.count as usize))
            .collect()
    }
}

impl std::fmt::Display for DimensionList {
    /// Renders the canonical `count@value` comma-joined form
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .groups
            .iter()
            .map(|g| format!("{}@{}", g.count, g.value))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Normalize all accepted separators to the canonical `count@value,...` form
fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if GROUP_SEPARATORS.contains(&c) {
                ','
            } else if PAIR_SEPARATORS.contains(&c) {
                '@'
            } else {
                c
            }
        })
        .collect()
}

fn parse_count(field: &str, token: &str, s: &str) -> EstimateResult<u32> {
    // Counts sometimes arrive as "2.0" from spreadsheet exports
    let n: f64 = s
        .parse()
        .map_err(|_| EstimateError::format_error(field, token, "count is not a number"))?;
    if n < 1.0 || n.fract() != 0.0 {
        return Err(EstimateError::format_error(
            field,
            token,
            "count must be a positive whole number",
        ));
    }
    Ok(n as u32)
}

fn parse_value(field: &str, token: &str, s: &str) -> EstimateResult<f64> {
    s.parse()
        .map_err(|_| EstimateError::format_error(field, token, "value is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let list = DimensionList::parse("2@24").unwrap();
        assert_eq!(list.groups().len(), 1);
        assert_eq!(list.groups()[0].count, 2);
        assert_eq!(list.groups()[0].value, 24.0);
        assert_eq!(list.total_span(), 48.0);
    }

    #[test]
    fn test_parse_six_bays() {
        let list = DimensionList::parse("6@6").unwrap();
        assert_eq!(list.total_count(), 6);
        assert_eq!(list.total_span(), 36.0);
    }

    #[test]
    fn test_parse_multiple_groups() {
        let list = DimensionList::parse("2@24,3@18").unwrap();
        assert_eq!(list.total_count(), 5);
        assert_eq!(list.total_span(), 102.0);
    }

    #[test]
    fn test_bare_value_implies_count_one() {
        let list = DimensionList::parse("24").unwrap();
        assert_eq!(list.total_count(), 1);
        assert_eq!(list.total_span(), 24.0);
    }

    #[test]
    fn test_alternate_separators() {
        // All of these mean the same list
        for text in ["2@24+3@18", "2x24;3x18", "2X24/3X18", "2:24&3:18"] {
            let list = DimensionList::parse(text).unwrap();
            assert_eq!(list.total_count(), 5, "failed for {:?}", text);
            assert_eq!(list.total_span(), 102.0, "failed for {:?}", text);
        }
    }

    #[test]
    fn test_empty_tokens_skipped() {
        let list = DimensionList::parse("2@24,,3@18,").unwrap();
        assert_eq!(list.groups().len(), 2);
    }

    #[test]
    fn test_empty_string_gives_empty_list() {
        let list = DimensionList::parse("").unwrap();
        assert!(list.is_empty());
        assert_eq!(list.total_count(), 0);
        assert_eq!(list.total_span(), 0.0);
    }

    #[test]
    fn test_unparseable_token_is_format_error() {
        let err = DimensionList::parse("abc@24").unwrap_err();
        assert_eq!(err.error_code(), "FORMAT_ERROR");

        let err = DimensionList::parse("2@wide").unwrap_err();
        assert_eq!(err.error_code(), "FORMAT_ERROR");
    }

    #[test]
    fn test_parse_named_carries_owning_field() {
        let err = DimensionList::parse_named("crane.rail_runs", "bad@run").unwrap_err();
        assert!(
            matches!(err, EstimateError::FormatError { ref field, .. } if field == "crane.rail_runs")
        );

        let err = DimensionList::parse_sloped_named("spans", "2@24@x").unwrap_err();
        assert!(matches!(err, EstimateError::FormatError { ref field, .. } if field == "spans"));
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(DimensionList::parse("0@24").is_err());
    }

    #[test]
    fn test_expand_matches_totals() {
        let list = DimensionList::parse("2@24,3@18").unwrap();
        let expanded = list.expand();
        assert_eq!(expanded.len(), list.total_count() as usize);
        let sum: f64 = expanded.iter().sum();
        assert!((sum - list.total_span()).abs() < 1e-9);
    }

    #[test]
    fn test_expand_idempotent() {
        let list = DimensionList::parse("2@24").unwrap();
        assert_eq!(list.expand(), list.expand());
        assert_eq!(list.expand(), vec![24.0, 24.0]);
    }

    #[test]
    fn test_sloped_variant() {
        let list = DimensionList::parse_sloped("2@24@1.5,1@18").unwrap();
        assert_eq!(list.groups()[0].slope, 1.5);
        assert_eq!(list.groups()[1].slope, 0.0);
        assert_eq!(list.expand_slopes(), vec![1.5, 1.5, 0.0]);
    }

    #[test]
    fn test_slope_rejected_in_standard_parse() {
        assert!(DimensionList::parse("2@24@1.5").is_err());
    }

    #[test]
    fn test_display_canonical_form() {
        let list = DimensionList::parse("2x24;3x18").unwrap();
        assert_eq!(list.to_string(), "2@24,3@18");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let list = DimensionList::parse("2@24,3@18").unwrap();
        let json = serde_json::to_string(&list).unwrap();
        let back: DimensionList = serde_json::from_str(&json).unwrap();
        assert_eq!(list, back);
    }
}
