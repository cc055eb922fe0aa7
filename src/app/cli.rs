use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Generate many randomly-sized dummy files in a single folder"
)]
pub struct Cli {
    /// Output folder (created if absent)
    pub output: Option<PathBuf>,

    /// Use a named preset (built-in: 100mb, 500mb, 1gb, 2gb, or one from presets.toml)
    #[arg(long)]
    pub preset: Option<String>,

    /// Read presets from this file instead of ~/.config/dummy_data/presets.toml
    #[arg(long)]
    pub presets_file: Option<PathBuf>,

    /// Total size to generate, in MB
    #[arg(long)]
    pub target_mb: Option<f64>,

    /// Approximate number of files; tunes the size range around target / count
    #[arg(long)]
    pub approx_files: Option<u64>,

    /// Comma-separated extensions, e.g. 'txt,pdf,png'
    #[arg(long, value_delimiter = ',')]
    pub ext: Option<Vec<String>>,

    /// Minimum file size in KB
    #[arg(long)]
    pub min_size_kb: Option<f64>,

    /// Maximum file size in KB
    #[arg(long)]
    pub max_size_kb: Option<f64>,

    /// Random seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Plan and print stats without creating any files
    #[arg(long)]
    pub dry_run: bool,

    /// Number of writer threads
    #[arg(long)]
    pub jobs: Option<usize>,
}
