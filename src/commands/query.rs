use std::io::{self, Write};

use anyhow::{Result, bail};
use tracing::info;

use crate::cli::QueryArgs;
use crate::commands::capture::index_name;
use crate::commands::search_query::build_search_query;
use crate::presentation::query_display;

pub fn run(args: QueryArgs) -> Result<()> {
    if args.knn.query_text.trim().is_empty() {
        bail!("query text must not be empty");
    }

    let baseline_query = build_search_query(&args.knn, None);
    let quantized_query = build_search_query(&args.knn, Some(args.quantization));

    info!(
        baseline_index = index_name(None),
        quantized_index = index_name(Some(args.quantization)),
        "rendering search queries"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    writeln!(
        output,
        "{}",
        query_display(&baseline_query, &quantized_query, args.quantization)?
    )?;
    output.flush()?;
    Ok(())
}
