use crate::app::errors::GenError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const BYTES_PER_KB: u64 = 1024;
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub target_total_bytes: u64,
    pub approx_file_count: Option<u64>,
    pub min_size_bytes: u64,
    pub max_size_bytes: u64,
    pub extensions: Vec<String>,
    pub seed: Option<u64>,
    pub dry_run: bool,
    pub output_directory: PathBuf,
    pub jobs: usize,
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        if self.target_total_bytes == 0 {
            return Err(GenError::invalid("target size must be positive"));
        }
        if self.min_size_bytes == 0 || self.max_size_bytes == 0 {
            return Err(GenError::invalid("file size bounds must be positive"));
        }
        if self.min_size_bytes > self.max_size_bytes {
            return Err(GenError::invalid(format!(
                "minimum file size ({} bytes) exceeds maximum ({} bytes)",
                self.min_size_bytes, self.max_size_bytes
            )));
        }
        if self.extensions.is_empty() {
            return Err(GenError::invalid("no extensions to generate"));
        }
        if self.approx_file_count == Some(0) {
            return Err(GenError::invalid("approximate file count must be positive"));
        }
        if self.jobs == 0 {
            return Err(GenError::invalid("jobs must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlanEntry {
    pub extension: String,
    pub size_bytes: u64,
}

/// The resolved list of files to materialize, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub entries: Vec<FilePlanEntry>,
    /// Seed the plan was drawn from; file contents derive their streams from it.
    pub seed: u64,
}

impl GenerationPlan {
    pub fn planned_file_count(&self) -> usize {
        self.entries.len()
    }

    pub fn planned_total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size_bytes).sum()
    }

    pub fn count_by_extension(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.extension.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// A plan entry that could not be written.
#[derive(Debug)]
pub struct FileFailure {
    pub index: usize,
    pub error: GenError,
}

#[derive(Debug)]
pub struct WriteReport {
    pub dry_run: bool,
    pub planned_file_count: usize,
    pub planned_total_bytes: u64,
    pub files_written: usize,
    pub bytes_written: u64,
    pub per_extension: BTreeMap<String, usize>,
    pub failures: Vec<FileFailure>,
    pub elapsed: Duration,
}
