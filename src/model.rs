use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::comparison::{ComparisonResult, RankedItem};

/// Body returned for one comparison request.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResponse {
    pub query_text: String,
    pub full_fidelity: Vec<RankedItem>,
    pub quantized: Vec<RankedItem>,
    pub comparison: ComparisonResult,
    pub baseline_query: serde_json::Value,
    pub quantized_query: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapturedHit {
    pub title: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Either shape a capture file may take on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CaptureFile {
    Response(SearchResponse),
    Hits(Vec<CapturedHit>),
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captures: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub quantization: String,
    pub index: String,
    pub baseline_results: usize,
    pub quantized_results: usize,
    pub perfect_matches: usize,
    pub position_mismatches: usize,
    pub missing_results: usize,
    pub extra_results: usize,
    pub recall: Option<f64>,
    pub recall_ratio: String,
}
