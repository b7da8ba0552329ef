//! Ranked-list agreement between a full-fidelity baseline and a quantized run.
//!
//! Items are keyed by title. Every title seen on either side lands in exactly
//! one bucket: green (same position), yellow (both sides, shifted), red
//! missing (baseline only) or red extra (quantized only). Buckets follow the
//! baseline order first, then the quantized order for the quantized-only
//! remainder.

mod stats;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// One hit in a ranked result list. `position` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub title: String,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RankedItem {
    pub fn new(title: impl Into<String>, position: usize) -> Self {
        Self {
            title: title.into(),
            position,
            score: None,
            id: None,
        }
    }

    #[cfg(test)]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub title: String,
    pub full_fidelity_position: usize,
    pub quantized_position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_fidelity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantized_score: Option<f64>,
}

impl MatchRecord {
    fn from_pair(baseline: &RankedItem, quantized: &RankedItem) -> Self {
        Self {
            title: baseline.title.clone(),
            full_fidelity_position: baseline.position,
            quantized_position: quantized.position,
            full_fidelity_score: baseline.score,
            quantized_score: quantized.score,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.full_fidelity_position == self.quantized_position
    }
}

/// A title present on one side only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecord {
    pub title: String,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl From<&RankedItem> for PositionRecord {
    fn from(item: &RankedItem) -> Self {
        Self {
            title: item.title.clone(),
            position: item.position,
            score: item.score,
        }
    }
}

pub type MissingRecord = PositionRecord;
pub type ExtraRecord = PositionRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub green_matches: Vec<MatchRecord>,
    pub yellow_matches: Vec<MatchRecord>,
    pub red_missing: Vec<MissingRecord>,
    pub red_extra: Vec<ExtraRecord>,
}

/// Bucket membership of a single title.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification<'a> {
    Green(&'a MatchRecord),
    Yellow(&'a MatchRecord),
    Missing(&'a MissingRecord),
    Extra(&'a ExtraRecord),
}

impl<'a> Classification<'a> {
    pub fn title(&self) -> &'a str {
        match *self {
            Self::Green(record) | Self::Yellow(record) => &record.title,
            Self::Missing(record) | Self::Extra(record) => &record.title,
        }
    }
}

impl ComparisonResult {
    /// Every classified title, bucket by bucket.
    pub fn classifications(&self) -> impl Iterator<Item = Classification<'_>> {
        self.green_matches
            .iter()
            .map(Classification::Green)
            .chain(self.yellow_matches.iter().map(Classification::Yellow))
            .chain(self.red_missing.iter().map(Classification::Missing))
            .chain(self.red_extra.iter().map(Classification::Extra))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Baseline,
    Quantized,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Quantized => "quantized",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Baseline => Self::Quantized,
            Self::Quantized => Self::Baseline,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DuplicatePolicy {
    /// Later repeats of a title are ignored.
    #[default]
    KeepFirst,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error(
        "duplicate title '{title}' in {side} results: first at position {first_position}, repeated at position {duplicate_position}"
    )]
    DuplicateKey {
        side: Side,
        title: String,
        first_position: usize,
        duplicate_position: usize,
    },
}

struct KeyIndex<'a> {
    ordered: Vec<&'a RankedItem>,
    lookup: HashMap<&'a str, &'a RankedItem>,
}

fn first_occurrences(items: &[RankedItem], side: Side) -> KeyIndex<'_> {
    let mut ordered = Vec::with_capacity(items.len());
    let mut lookup = HashMap::with_capacity(items.len());

    for item in items {
        match lookup.entry(item.title.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(item);
                ordered.push(item);
            }
            Entry::Occupied(slot) => {
                debug!(
                    side = %side,
                    title = %item.title,
                    kept_position = slot.get().position,
                    ignored_position = item.position,
                    "ignoring repeated title"
                );
            }
        }
    }

    KeyIndex { ordered, lookup }
}

fn reject_duplicates(items: &[RankedItem], side: Side) -> Result<(), ComparisonError> {
    let mut seen = HashMap::<&str, usize>::with_capacity(items.len());
    for item in items {
        if let Some(first_position) = seen.insert(item.title.as_str(), item.position) {
            return Err(ComparisonError::DuplicateKey {
                side,
                title: item.title.clone(),
                first_position,
                duplicate_position: item.position,
            });
        }
    }
    Ok(())
}

/// Classifies both lists. Never fails; repeated titles keep their first
/// position.
pub fn compare(baseline: &[RankedItem], quantized: &[RankedItem]) -> ComparisonResult {
    let baseline_index = first_occurrences(baseline, Side::Baseline);
    let quantized_index = first_occurrences(quantized, Side::Quantized);

    let mut result = ComparisonResult::default();

    for item in &baseline_index.ordered {
        match quantized_index.lookup.get(item.title.as_str()) {
            Some(counterpart) => {
                let record = MatchRecord::from_pair(item, counterpart);
                if record.is_exact() {
                    result.green_matches.push(record);
                } else {
                    result.yellow_matches.push(record);
                }
            }
            None => result.red_missing.push(PositionRecord::from(*item)),
        }
    }

    for item in &quantized_index.ordered {
        if !baseline_index.lookup.contains_key(item.title.as_str()) {
            result.red_extra.push(PositionRecord::from(*item));
        }
    }

    result
}

pub fn compare_with_policy(
    baseline: &[RankedItem],
    quantized: &[RankedItem],
    policy: DuplicatePolicy,
) -> Result<ComparisonResult, ComparisonError> {
    if policy == DuplicatePolicy::Reject {
        reject_duplicates(baseline, Side::Baseline)?;
        reject_duplicates(quantized, Side::Quantized)?;
    }

    Ok(compare(baseline, quantized))
}
