use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::Quantization;
use crate::comparison::RankedItem;
use crate::model::{CaptureFile, SearchHit};
use crate::util::sha256_hex;

const MISSING_TITLE: &str = "No title";

/// Index a ranking was retrieved from; `None` is the full-fidelity baseline.
pub fn index_name(quantization: Option<Quantization>) -> &'static str {
    match quantization {
        None => "properties",
        Some(Quantization::Int8) => "properties_int8",
        Some(Quantization::Int4) => "properties_int4",
        Some(Quantization::Bbq) => "properties_bbq",
    }
}

pub fn default_capture_path(capture_root: &Path, quantization: Option<Quantization>) -> PathBuf {
    capture_root.join(format!("{}.json", index_name(quantization)))
}

pub fn load_ranked_list(path: &Path) -> Result<Vec<RankedItem>> {
    if !path.is_file() {
        bail!("search capture not found: {}", path.display());
    }

    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let capture: CaptureFile = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse search capture {}", path.display()))?;

    let items = ranked_from_capture(capture);

    info!(
        path = %path.display(),
        sha256 = %sha256_hex(&raw),
        hits = items.len(),
        "loaded search capture"
    );

    Ok(items)
}

fn ranked_from_capture(capture: CaptureFile) -> Vec<RankedItem> {
    match capture {
        CaptureFile::Response(response) => response
            .hits
            .hits
            .into_iter()
            .enumerate()
            .map(|(index, hit)| RankedItem {
                title: hit_title(&hit),
                position: index + 1,
                score: hit.score,
                id: hit.id,
            })
            .collect(),
        CaptureFile::Hits(hits) => hits
            .into_iter()
            .enumerate()
            .map(|(index, hit)| RankedItem {
                title: hit.title,
                position: index + 1,
                score: hit.score,
                id: hit.id,
            })
            .collect(),
    }
}

fn hit_title(hit: &SearchHit) -> String {
    hit.fields
        .get("title")
        .and_then(|values| values.first())
        .and_then(|value| value.as_str())
        .unwrap_or(MISSING_TITLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{default_capture_path, index_name, load_ranked_list};
    use crate::cli::Quantization;

    #[test]
    fn index_names_follow_variant() {
        assert_eq!(index_name(None), "properties");
        assert_eq!(index_name(Some(Quantization::Int8)), "properties_int8");
        assert_eq!(index_name(Some(Quantization::Int4)), "properties_int4");
        assert_eq!(index_name(Some(Quantization::Bbq)), "properties_bbq");

        let path = default_capture_path(std::path::Path::new("/tmp/captures"), None);
        assert_eq!(path, std::path::PathBuf::from("/tmp/captures/properties.json"));
    }

    #[test]
    fn raw_search_response_is_ranked_in_hit_order() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("properties_int8.json");
        fs::write(
            &path,
            r#"{
              "took": 4,
              "hits": {
                "total": { "value": 3 },
                "hits": [
                  { "_id": "p-9", "_score": 0.93, "fields": { "title": ["Lakefront villa"] } },
                  { "_id": "p-2", "_score": 0.91, "fields": {} },
                  { "_id": "p-4", "_score": 0.90, "fields": { "title": ["Downtown loft"] } }
                ]
              }
            }"#,
        )
        .expect("capture should be written");

        let items = load_ranked_list(&path).expect("capture should load");
        let summary: Vec<(&str, usize)> = items
            .iter()
            .map(|item| (item.title.as_str(), item.position))
            .collect();
        assert_eq!(
            summary,
            vec![("Lakefront villa", 1), ("No title", 2), ("Downtown loft", 3)]
        );
        assert_eq!(items[0].id.as_deref(), Some("p-9"));
        assert_eq!(items[2].score, Some(0.90));
    }

    #[test]
    fn plain_hit_array_is_accepted() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("properties.json");
        fs::write(
            &path,
            r#"[{ "title": "A", "score": 1.0 }, { "title": "B" }]"#,
        )
        .expect("capture should be written");

        let items = load_ranked_list(&path).expect("capture should load");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "B");
        assert_eq!(items[1].position, 2);
        assert!(items[1].score.is_none());
    }

    #[test]
    fn missing_capture_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let error = load_ranked_list(&dir.path().join("properties.json"))
            .expect_err("missing capture should fail");
        assert!(
            error.to_string().contains("search capture not found"),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn malformed_capture_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("properties.json");
        fs::write(&path, r#"{ "error": "index_not_found_exception" }"#)
            .expect("capture should be written");

        let error = load_ranked_list(&path).expect_err("malformed capture should fail");
        assert!(
            error.to_string().contains("failed to parse search capture"),
            "unexpected error: {error}"
        );
    }
}
