use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_QUERY_TEXT: &str =
    "Luxury waterfront property with pool and garage near downtown Orlando";

#[derive(Parser, Debug)]
#[command(
    name = "quantcmp",
    version,
    about = "Compare full-fidelity and quantized vector search rankings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Compare(CompareArgs),
    Sweep(SweepArgs),
    Query(QueryArgs),
    Health(HealthArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Quantization {
    Int8,
    Int4,
    Bbq,
}

impl Quantization {
    pub const ALL: [Quantization; 3] = [Self::Int8, Self::Int4, Self::Bbq];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int4 => "int4",
            Self::Bbq => "bbq",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Int8 => "INT8",
            Self::Int4 => "INT4",
            Self::Bbq => "BBQ",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DuplicateMode {
    KeepFirst,
    Reject,
}

#[derive(Args, Debug, Clone)]
pub struct KnnArgs {
    #[arg(long, default_value = DEFAULT_QUERY_TEXT)]
    pub query_text: String,

    #[arg(long, default_value_t = 10)]
    pub k: u32,

    #[arg(long, default_value_t = 100)]
    pub num_candidates: u32,

    #[arg(long, default_value = "body_content_e5")]
    pub vector_field: String,

    #[arg(long, default_value = ".multilingual-e5-small-elasticsearch")]
    pub model_id: String,

    #[arg(long, default_value_t = 2.0)]
    pub int4_oversample: f64,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(long, default_value = ".cache/quantcmp")]
    pub capture_root: PathBuf,

    #[arg(long)]
    pub baseline_path: Option<PathBuf>,

    #[arg(long)]
    pub quantized_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Quantization::Int8)]
    pub quantization: Quantization,

    #[arg(long, value_enum, default_value_t = DuplicateMode::KeepFirst)]
    pub duplicates: DuplicateMode,

    #[command(flatten)]
    pub knn: KnnArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub export: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    #[arg(long, default_value = ".cache/quantcmp")]
    pub capture_root: PathBuf,

    #[arg(long, value_enum, default_value_t = DuplicateMode::KeepFirst)]
    pub duplicates: DuplicateMode,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[arg(long, value_enum, default_value_t = Quantization::Int8)]
    pub quantization: Quantization,

    #[command(flatten)]
    pub knn: KnnArgs,
}

#[derive(Args, Debug, Clone)]
pub struct HealthArgs {
    #[arg(long, default_value = ".cache/quantcmp")]
    pub capture_root: PathBuf,
}
