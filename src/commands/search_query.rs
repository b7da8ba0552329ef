use serde_json::{Value, json};

use crate::cli::{KnnArgs, Quantization};

const GEO_DISTANCE: &str = "25mi";
const GEO_LAT: f64 = 28.5383;
const GEO_LON: f64 = -81.3792;

/// kNN request body for one index. Only `int4` gets a rescore pass.
pub fn build_search_query(knn: &KnnArgs, quantization: Option<Quantization>) -> Value {
    let mut body = json!({
        "_source": false,
        "fields": ["title"],
        "query": {
            "knn": {
                "field": knn.vector_field,
                "k": knn.k,
                "num_candidates": knn.num_candidates,
                "filter": {
                    "geo_distance": {
                        "distance": GEO_DISTANCE,
                        "location": {
                            "lat": GEO_LAT,
                            "lon": GEO_LON
                        }
                    }
                },
                "query_vector_builder": {
                    "text_embedding": {
                        "model_id": knn.model_id,
                        "model_text": knn.query_text.trim()
                    }
                }
            }
        }
    });

    if quantization == Some(Quantization::Int4) {
        body["query"]["knn"]["rescore_vector"] = json!({ "oversample": knn.int4_oversample });
    }

    body
}

#[cfg(test)]
mod tests {
    use super::build_search_query;
    use crate::cli::{DEFAULT_QUERY_TEXT, KnnArgs, Quantization};

    fn knn_args() -> KnnArgs {
        KnnArgs {
            query_text: DEFAULT_QUERY_TEXT.to_string(),
            k: 10,
            num_candidates: 100,
            vector_field: "body_content_e5".to_string(),
            model_id: ".multilingual-e5-small-elasticsearch".to_string(),
            int4_oversample: 2.0,
        }
    }

    #[test]
    fn baseline_query_targets_vector_field_without_rescore() {
        let body = build_search_query(&knn_args(), None);
        let knn = &body["query"]["knn"];

        assert_eq!(body["_source"], false);
        assert_eq!(body["fields"], serde_json::json!(["title"]));
        assert_eq!(knn["field"], "body_content_e5");
        assert_eq!(knn["k"], 10);
        assert_eq!(knn["num_candidates"], 100);
        assert_eq!(knn["filter"]["geo_distance"]["distance"], "25mi");
        assert_eq!(
            knn["query_vector_builder"]["text_embedding"]["model_text"],
            DEFAULT_QUERY_TEXT
        );
        assert!(knn.get("rescore_vector").is_none());
    }

    #[test]
    fn only_int4_requests_rescoring() {
        let args = knn_args();

        let int4 = build_search_query(&args, Some(Quantization::Int4));
        assert_eq!(int4["query"]["knn"]["rescore_vector"]["oversample"], 2.0);

        for quantization in [Quantization::Int8, Quantization::Bbq] {
            let body = build_search_query(&args, Some(quantization));
            assert!(
                body["query"]["knn"].get("rescore_vector").is_none(),
                "{} should not rescore",
                quantization.as_str()
            );
        }
    }
}
