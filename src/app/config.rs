use crate::app::cli::Cli;
use crate::app::errors::GenError;
use crate::app::models::{GenerationConfig, BYTES_PER_KB, BYTES_PER_MB};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSIONS: [&str; 8] = ["txt", "log", "csv", "json", "xml", "png", "pdf", "zip"];
pub const DEFAULT_TARGET_MB: f64 = 1024.0;
pub const DEFAULT_OUTPUT_DIR: &str = "dummy_data_output";
const DEFAULT_PRESET: &str = "default";

/// Floor for auto-tuned sizes when only a file count is given.
pub const GLOBAL_MIN_FILE_SIZE: u64 = 2 * BYTES_PER_KB;
const FALLBACK_SIZE_RANGE: (u64, u64) = (4 * BYTES_PER_KB, 64 * BYTES_PER_KB);

/// Typical size range for files of a known extension.
pub fn default_size_range(ext: &str) -> Option<(u64, u64)> {
    let kb = BYTES_PER_KB;
    match ext {
        "txt" | "log" | "csv" => Some((4 * kb, 64 * kb)),
        "json" | "xml" => Some((2 * kb, 32 * kb)),
        "png" | "pdf" => Some((32 * kb, 256 * kb)),
        "zip" => Some((64 * kb, 512 * kb)),
        _ => None,
    }
}

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PresetConfig {
    pub target_mb: Option<f64>,
    pub approx_files: Option<u64>,
    pub ext: Option<Vec<String>>,
    pub min_size_kb: Option<f64>,
    pub max_size_kb: Option<f64>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub jobs: Option<usize>,
}

/// The sizes the interactive menu of older versions offered.
fn builtin_presets() -> HashMap<String, PresetConfig> {
    [("100mb", 100.0), ("500mb", 500.0), ("1gb", 1024.0), ("2gb", 2048.0)]
        .into_iter()
        .map(|(name, mb)| {
            (
                name.to_string(),
                PresetConfig {
                    target_mb: Some(mb),
                    ..Default::default()
                },
            )
        })
        .collect()
}

fn default_presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("dummy_data").join("presets.toml"))
}

/// Reads user presets. A missing default file is fine, a missing explicit one is not.
pub fn load_presets_file(explicit: Option<&Path>) -> Result<HashMap<String, PresetConfig>> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_presets_path()?;
            if !path.exists() {
                return Ok(HashMap::new());
            }
            path
        }
    };

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read presets at {:?}", config_path))?;

    let parsed: PresetsFile = toml::from_str(&content)
        .context(format!("Failed to parse {:?}", config_path))?;

    Ok(parsed.presets)
}

/// Lowercases, strips leading dots and drops duplicates while keeping order.
fn normalize_extensions(raw: Vec<String>) -> Result<Vec<String>, GenError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in raw {
        let ext = item.trim().trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            continue;
        }
        if ext.contains(['/', '\\', '\0']) {
            return Err(GenError::invalid(format!("invalid extension {:?}", item)));
        }
        if seen.insert(ext.clone()) {
            out.push(ext);
        }
    }

    let unknown: Vec<&str> = out
        .iter()
        .map(String::as_str)
        .filter(|e| default_size_range(e).is_none())
        .collect();
    if !unknown.is_empty() {
        log::warn!(
            "No size profile for {}; using {}-{} KB",
            unknown.join(", "),
            FALLBACK_SIZE_RANGE.0 / BYTES_PER_KB,
            FALLBACK_SIZE_RANGE.1 / BYTES_PER_KB
        );
    }
    Ok(out)
}

/// Widest range covering every enabled extension's typical sizes.
fn bounds_for_extensions(extensions: &[String]) -> (u64, u64) {
    extensions
        .iter()
        .map(|e| default_size_range(e).unwrap_or(FALLBACK_SIZE_RANGE))
        .fold((u64::MAX, 0), |(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
}

fn scaled_bytes(value: f64, unit: u64, flag: &str) -> Result<u64, GenError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GenError::invalid(format!("{} must be a positive number", flag)));
    }
    let bytes = (value * unit as f64).round();
    if bytes < 1.0 || bytes >= u64::MAX as f64 {
        return Err(GenError::invalid(format!("{} is out of range", flag)));
    }
    Ok(bytes as u64)
}

pub fn resolve_config(cli: Cli) -> Result<GenerationConfig> {
    let presets = load_presets_file(cli.presets_file.as_deref())?;
    resolve_with_presets(cli, presets)
}

/// Layers CLI flags over the selected preset over built-in defaults.
pub fn resolve_with_presets(
    cli: Cli,
    user_presets: HashMap<String, PresetConfig>,
) -> Result<GenerationConfig> {
    let mut presets = builtin_presets();
    presets.extend(user_presets);

    // Determine preset to use: CLI flag > "default" entry > none
    let preset = match cli.preset.as_deref() {
        Some(name) => match presets.get(name) {
            Some(preset) => preset.clone(),
            None => bail!(GenError::invalid(format!("unknown preset {:?}", name))),
        },
        None => presets.remove(DEFAULT_PRESET).unwrap_or_default(),
    };

    let target_mb = cli.target_mb.or(preset.target_mb).unwrap_or(DEFAULT_TARGET_MB);
    let target_total_bytes = scaled_bytes(target_mb, BYTES_PER_MB, "--target-mb")?;

    let raw_ext = cli
        .ext
        .or(preset.ext)
        .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect());
    let extensions = normalize_extensions(raw_ext)?;

    let approx_file_count = cli.approx_files.or(preset.approx_files);

    let min_kb = cli.min_size_kb.or(preset.min_size_kb);
    let max_kb = cli.max_size_kb.or(preset.max_size_kb);
    let min_explicit = min_kb
        .map(|kb| scaled_bytes(kb, BYTES_PER_KB, "--min-size-kb"))
        .transpose()?;
    let max_explicit = max_kb
        .map(|kb| scaled_bytes(kb, BYTES_PER_KB, "--max-size-kb"))
        .transpose()?;

    // A requested file count replaces the per-type profiles with a wide range
    // the planner narrows around target / count.
    let (default_min, default_max) = if approx_file_count.is_some() {
        (GLOBAL_MIN_FILE_SIZE, target_total_bytes.max(GLOBAL_MIN_FILE_SIZE))
    } else {
        bounds_for_extensions(&extensions)
    };

    let (min_size_bytes, max_size_bytes) = match (min_explicit, max_explicit) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, default_max.max(min)),
        (None, Some(max)) => (default_min.min(max), max),
        (None, None) => (default_min, default_max),
    };

    let config = GenerationConfig {
        target_total_bytes,
        approx_file_count,
        min_size_bytes,
        max_size_bytes,
        extensions,
        seed: cli.seed.or(preset.seed),
        dry_run: cli.dry_run,
        output_directory: cli
            .output
            .or(preset.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        jobs: cli.jobs.or(preset.jobs).unwrap_or(1),
    };
    config.validate()?;

    Ok(config)
}
