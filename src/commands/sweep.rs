use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::{Quantization, SweepArgs};
use crate::commands::capture::{default_capture_path, index_name, load_ranked_list};
use crate::commands::compare::{compare_capture, duplicate_policy};
use crate::comparison::ComparisonResult;
use crate::model::SweepRow;
use crate::util::write_json_stdout;

pub fn run(args: SweepArgs) -> Result<()> {
    let baseline_path = default_capture_path(&args.capture_root, None);
    let full_fidelity = load_ranked_list(&baseline_path)
        .context("failed to retrieve full-fidelity results")?;
    let policy = duplicate_policy(args.duplicates);

    let mut rows = Vec::with_capacity(Quantization::ALL.len());
    for quantization in Quantization::ALL {
        let quantized_path = default_capture_path(&args.capture_root, Some(quantization));
        if !quantized_path.is_file() {
            warn!(
                quantization = quantization.as_str(),
                path = %quantized_path.display(),
                "skipping variant without capture"
            );
            continue;
        }

        let (_, comparison) =
            compare_capture(&full_fidelity, &quantized_path, quantization, policy)?;
        rows.push(sweep_row(quantization, &comparison));
    }

    if rows.is_empty() {
        bail!(
            "no quantized captures found in {}",
            args.capture_root.display()
        );
    }

    info!(variants = rows.len(), "sweep completed");

    if args.json {
        write_json_stdout(&rows)
    } else {
        write_sweep_table(&rows)
    }
}

fn sweep_row(quantization: Quantization, comparison: &ComparisonResult) -> SweepRow {
    SweepRow {
        quantization: quantization.as_str().to_string(),
        index: index_name(Some(quantization)).to_string(),
        baseline_results: comparison.baseline_total(),
        quantized_results: comparison.quantized_total(),
        perfect_matches: comparison.green_matches.len(),
        position_mismatches: comparison.yellow_matches.len(),
        missing_results: comparison.red_missing.len(),
        extra_results: comparison.red_extra.len(),
        recall: comparison.recall(),
        recall_ratio: comparison.recall_ratio(),
    }
}

fn write_sweep_table(rows: &[SweepRow]) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "variant\tindex\tperfect\tshifted\tmissing\textra\trecall")?;
    for row in rows {
        writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.quantization,
            row.index,
            row.perfect_matches,
            row.position_mismatches,
            row.missing_results,
            row.extra_results,
            row.recall_ratio,
        )?;
    }

    output.flush()?;
    Ok(())
}
