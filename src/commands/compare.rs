use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::cli::{CompareArgs, DuplicateMode, Quantization};
use crate::commands::capture::{default_capture_path, load_ranked_list};
use crate::commands::search_query::build_search_query;
use crate::comparison::{ComparisonResult, DuplicatePolicy, RankedItem, compare_with_policy};
use crate::model::ComparisonResponse;
use crate::presentation::write_comparison_text;
use crate::util::{export_timestamp, write_json_pretty, write_json_stdout};

pub fn run(args: CompareArgs) -> Result<()> {
    let query_text = args.knn.query_text.trim();
    if query_text.is_empty() {
        bail!("query text must not be empty");
    }

    let baseline_path = args
        .baseline_path
        .clone()
        .unwrap_or_else(|| default_capture_path(&args.capture_root, None));
    let quantized_path = args
        .quantized_path
        .clone()
        .unwrap_or_else(|| default_capture_path(&args.capture_root, Some(args.quantization)));

    let full_fidelity = load_ranked_list(&baseline_path)
        .context("failed to retrieve full-fidelity results")?;
    let (quantized, comparison) = compare_capture(
        &full_fidelity,
        &quantized_path,
        args.quantization,
        duplicate_policy(args.duplicates),
    )?;

    let response = ComparisonResponse {
        query_text: query_text.to_string(),
        full_fidelity,
        quantized,
        comparison,
        baseline_query: build_search_query(&args.knn, None),
        quantized_query: build_search_query(&args.knn, Some(args.quantization)),
    };

    if args.export {
        let export_path = export_path(&args.capture_root, Utc::now());
        write_json_pretty(&export_path, &response)?;
        info!(path = %export_path.display(), "exported comparison");
    }

    if args.json {
        write_json_stdout(&response)
    } else {
        let mut output = io::BufWriter::new(io::stdout().lock());
        write_comparison_text(&mut output, &response, args.quantization)
    }
}

/// Loads one quantized capture and classifies it against the baseline.
pub(super) fn compare_capture(
    full_fidelity: &[RankedItem],
    quantized_path: &Path,
    quantization: Quantization,
    policy: DuplicatePolicy,
) -> Result<(Vec<RankedItem>, ComparisonResult)> {
    let quantized = load_ranked_list(quantized_path)
        .with_context(|| format!("failed to retrieve {} results", quantization.as_str()))?;

    let comparison = compare_with_policy(full_fidelity, &quantized, policy)
        .with_context(|| format!("failed to compare {} results", quantization.as_str()))?;

    info!(
        quantization = quantization.as_str(),
        baseline = full_fidelity.len(),
        quantized = quantized.len(),
        green = comparison.green_matches.len(),
        yellow = comparison.yellow_matches.len(),
        missing = comparison.red_missing.len(),
        extra = comparison.red_extra.len(),
        recall = %comparison.recall_ratio(),
        "comparison completed"
    );

    Ok((quantized, comparison))
}

pub(super) fn duplicate_policy(mode: DuplicateMode) -> DuplicatePolicy {
    match mode {
        DuplicateMode::KeepFirst => DuplicatePolicy::KeepFirst,
        DuplicateMode::Reject => DuplicatePolicy::Reject,
    }
}

fn export_path(capture_root: &Path, ts: DateTime<Utc>) -> PathBuf {
    capture_root.join("reports").join(format!(
        "quantization_comparison_{}.json",
        export_timestamp(ts)
    ))
}
