//! Display classes, tooltips and summary counts derived from a
//! [`ComparisonResult`]. Nothing here feeds back into classification.

mod text;

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::cli::Quantization;
use crate::commands::capture::index_name;
use crate::comparison::{Classification, ComparisonResult, RankedItem, Side};

pub use text::write_comparison_text;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DisplayClass {
    GreenMatch,
    YellowMatch,
    RedMissing,
    RedExtra,
    Unclassified,
}

impl DisplayClass {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::GreenMatch => "green-match",
            Self::YellowMatch => "yellow-match",
            Self::RedMissing => "red-missing",
            Self::RedExtra => "red-extra",
            Self::Unclassified => "result",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub position: usize,
    pub title: String,
    pub class: DisplayClass,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSummary {
    pub perfect_matches: usize,
    pub position_mismatches: usize,
    pub missing_results: usize,
    pub extra_results: usize,
    pub matches_found: usize,
    pub total_baseline: usize,
    pub recall: Option<f64>,
}

impl ComparisonSummary {
    pub fn recall_ratio(&self) -> String {
        format!("{}/{}", self.matches_found, self.total_baseline)
    }
}

impl From<&ComparisonResult> for ComparisonSummary {
    fn from(result: &ComparisonResult) -> Self {
        Self {
            perfect_matches: result.green_matches.len(),
            position_mismatches: result.yellow_matches.len(),
            missing_results: result.red_missing.len(),
            extra_results: result.red_extra.len(),
            matches_found: result.matches_found(),
            total_baseline: result.baseline_total(),
            recall: result.recall(),
        }
    }
}

/// Annotates one side's list, in its own order. A repeated title keeps its
/// label only on the row the comparison kept; later repeats are unclassified.
pub fn classify_rows(
    items: &[RankedItem],
    result: &ComparisonResult,
    side: Side,
) -> Vec<DisplayRow> {
    let lookup: HashMap<&str, Classification<'_>> = result
        .classifications()
        .map(|entry| (entry.title(), entry))
        .collect();

    items
        .iter()
        .map(|item| {
            let (class, tooltip) = match lookup.get(item.title.as_str()) {
                Some(entry) => match kept_position(*entry, side) {
                    Some(kept) if kept != item.position => (
                        DisplayClass::Unclassified,
                        Some(format!("Duplicate of position {kept}")),
                    ),
                    _ => annotate(*entry, side),
                },
                None => (DisplayClass::Unclassified, None),
            };
            DisplayRow {
                position: item.position,
                title: item.title.clone(),
                class,
                tooltip,
            }
        })
        .collect()
}

/// Position the comparison recorded for this title on `side`.
fn kept_position(entry: Classification<'_>, side: Side) -> Option<usize> {
    match (entry, side) {
        (Classification::Green(record) | Classification::Yellow(record), Side::Baseline) => {
            Some(record.full_fidelity_position)
        }
        (Classification::Green(record) | Classification::Yellow(record), Side::Quantized) => {
            Some(record.quantized_position)
        }
        (Classification::Missing(record), Side::Baseline)
        | (Classification::Extra(record), Side::Quantized) => Some(record.position),
        (Classification::Missing(_), Side::Quantized)
        | (Classification::Extra(_), Side::Baseline) => None,
    }
}

fn annotate(entry: Classification<'_>, side: Side) -> (DisplayClass, Option<String>) {
    let other = side.opposite();
    match (entry, side) {
        (Classification::Green(_), _) => (
            DisplayClass::GreenMatch,
            Some(format!("Perfect match with {other} results")),
        ),
        (Classification::Yellow(record), Side::Baseline) => (
            DisplayClass::YellowMatch,
            Some(format!(
                "Position mismatch: found at position {} in {other} results",
                record.quantized_position
            )),
        ),
        (Classification::Yellow(record), Side::Quantized) => (
            DisplayClass::YellowMatch,
            Some(format!(
                "Position mismatch: found at position {} in {other} results",
                record.full_fidelity_position
            )),
        ),
        (Classification::Missing(_), Side::Baseline) => (
            DisplayClass::RedMissing,
            Some("Missing from quantized results".to_string()),
        ),
        (Classification::Extra(_), Side::Quantized) => (
            DisplayClass::RedExtra,
            Some("Extra result not found in baseline".to_string()),
        ),
        (Classification::Missing(_), Side::Quantized)
        | (Classification::Extra(_), Side::Baseline) => (DisplayClass::Unclassified, None),
    }
}

pub fn quantized_heading(quantization: Quantization) -> String {
    format!("{} Results", quantization.label())
}

/// Both request bodies as shown next to the result lists.
pub fn query_display(
    baseline_query: &serde_json::Value,
    quantized_query: &serde_json::Value,
    quantization: Quantization,
) -> Result<String> {
    let baseline = serde_json::to_string_pretty(baseline_query)
        .context("failed to render baseline query")?;
    let quantized = serde_json::to_string_pretty(quantized_query)
        .context("failed to render quantized query")?;

    Ok(format!(
        "Baseline Query ({} index):\n{baseline}\n\nQuantized Query ({} index):\n{quantized}",
        index_name(None),
        index_name(Some(quantization)),
    ))
}
