use std::io::Write;

use anyhow::Result;

use super::{ComparisonSummary, DisplayRow, classify_rows, quantized_heading};
use crate::cli::Quantization;
use crate::commands::capture::index_name;
use crate::comparison::Side;
use crate::model::ComparisonResponse;

pub fn write_comparison_text<W: Write>(
    output: &mut W,
    response: &ComparisonResponse,
    quantization: Quantization,
) -> Result<()> {
    let comparison = &response.comparison;
    let summary = ComparisonSummary::from(comparison);

    writeln!(output, "Query: {}", response.query_text)?;
    writeln!(
        output,
        "Indices: baseline={} quantized={}",
        index_name(None),
        index_name(Some(quantization)),
    )?;
    writeln!(
        output,
        "Summary: perfect={} shifted={} missing={} extra={} recall={}{}",
        summary.perfect_matches,
        summary.position_mismatches,
        summary.missing_results,
        summary.extra_results,
        summary.recall_ratio(),
        summary
            .recall
            .map(|recall| format!(" ({:.1}%)", recall * 100.0))
            .unwrap_or_default(),
    )?;

    let baseline_rows = classify_rows(&response.full_fidelity, comparison, Side::Baseline);
    write_rows(output, "Full Fidelity Results", &baseline_rows)?;

    let quantized_rows = classify_rows(&response.quantized, comparison, Side::Quantized);
    write_rows(output, &quantized_heading(quantization), &quantized_rows)?;

    if !comparison.yellow_matches.is_empty() {
        writeln!(
            output,
            "Position shifts (max {}):",
            comparison.max_position_shift()
        )?;
        for record in &comparison.yellow_matches {
            writeln!(
                output,
                "\t{}\tbaseline={} quantized={} delta={:+}",
                record.title,
                record.full_fidelity_position,
                record.quantized_position,
                record.position_delta(),
            )?;
        }
    }

    output.flush()?;
    Ok(())
}

fn write_rows<W: Write>(output: &mut W, heading: &str, rows: &[DisplayRow]) -> Result<()> {
    writeln!(output, "{heading} ({})", rows.len())?;
    for row in rows {
        writeln!(
            output,
            "{}.\t[{}]\t{}",
            row.position,
            row.class.css_class(),
            row.title
        )?;
        if let Some(tooltip) = &row.tooltip {
            writeln!(output, "\t{tooltip}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_comparison_text;
    use crate::cli::Quantization;
    use crate::comparison::{RankedItem, compare};
    use crate::model::ComparisonResponse;

    fn ranked(titles: &[&str]) -> Vec<RankedItem> {
        titles
            .iter()
            .enumerate()
            .map(|(index, title)| RankedItem::new(*title, index + 1))
            .collect()
    }

    #[test]
    fn text_report_lists_summary_rows_and_shifts() {
        let full_fidelity = ranked(&["X", "Y", "Z"]);
        let quantized = ranked(&["Y", "X", "W"]);
        let response = ComparisonResponse {
            query_text: "pool near downtown".to_string(),
            comparison: compare(&full_fidelity, &quantized),
            full_fidelity,
            quantized,
            baseline_query: serde_json::json!({}),
            quantized_query: serde_json::json!({}),
        };

        let mut buffer = Vec::new();
        write_comparison_text(&mut buffer, &response, Quantization::Int8)
            .expect("text report should render");
        let text = String::from_utf8(buffer).expect("report should be utf-8");

        assert!(text.contains("Indices: baseline=properties quantized=properties_int8"));
        assert!(text.contains("Summary: perfect=0 shifted=2 missing=1 extra=1 recall=2/3 (66.7%)"));
        assert!(text.contains("Full Fidelity Results (3)"));
        assert!(text.contains("INT8 Results (3)"));
        assert!(text.contains("3.\t[red-missing]\tZ"));
        assert!(text.contains("3.\t[red-extra]\tW"));
        assert!(text.contains("\tX\tbaseline=1 quantized=2 delta=+1"));
        assert!(text.contains("\tY\tbaseline=2 quantized=1 delta=-1"));
    }
}
