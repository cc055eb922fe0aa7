use crate::app::errors::GenError;
use crate::app::models::{FileFailure, FilePlanEntry, GenerationPlan, WriteReport};
use crate::app::rng::{content_rng, SeededRng};
use rand::RngCore;
use rayon::prelude::*;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

const CHUNK_SIZE: usize = 64 * 1024;

/// Destination for planned files.
pub trait FileSink: Sync {
    fn write_file(&self, path: &Path, size_bytes: u64, rng: SeededRng) -> io::Result<()>;

    /// Fails when files cannot be created in `dir` at all.
    fn check_dir(&self, dir: &Path) -> io::Result<()> {
        tempfile::NamedTempFile::new_in(dir).map(drop)
    }
}

/// Creates the file exclusively and streams `size_bytes` random bytes into it.
pub struct RandomContentSink;

impl FileSink for RandomContentSink {
    fn write_file(&self, path: &Path, size_bytes: u64, mut rng: SeededRng) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let result = fill_random(&mut file, size_bytes, &mut rng);
        if result.is_err() {
            discard_partial(path);
        }
        result
    }
}

/// Removes a truncated file so it can't pass for a finished one.
fn discard_partial(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("Could not remove partial file {}: {}", path.display(), err);
            false
        }
    }
}

fn fill_random(out: &mut impl Write, size_bytes: u64, rng: &mut SeededRng) -> io::Result<()> {
    let mut buf = vec![0u8; (size_bytes as usize).min(CHUNK_SIZE)];
    let mut left = size_bytes;
    while left > 0 {
        let n = (left as usize).min(buf.len());
        rng.fill_bytes(&mut buf[..n]);
        out.write_all(&buf[..n])?;
        left -= n as u64;
    }
    out.flush()
}

pub struct Writer<S = RandomContentSink> {
    output_dir: PathBuf,
    dry_run: bool,
    jobs: usize,
    sink: S,
}

impl Writer<RandomContentSink> {
    pub fn new(output_dir: impl Into<PathBuf>, dry_run: bool, jobs: usize) -> Self {
        Self::with_sink(output_dir, dry_run, jobs, RandomContentSink)
    }
}

impl<S: FileSink> Writer<S> {
    pub fn with_sink(output_dir: impl Into<PathBuf>, dry_run: bool, jobs: usize, sink: S) -> Self {
        Self {
            output_dir: output_dir.into(),
            dry_run,
            jobs: jobs.max(1),
            sink,
        }
    }

    pub fn write(&self, plan: &GenerationPlan) -> Result<WriteReport, GenError> {
        let started = Instant::now();

        if self.dry_run {
            return Ok(WriteReport {
                dry_run: true,
                planned_file_count: plan.planned_file_count(),
                planned_total_bytes: plan.planned_total_bytes(),
                files_written: 0,
                bytes_written: 0,
                per_extension: plan.count_by_extension(),
                failures: Vec::new(),
                elapsed: started.elapsed(),
            });
        }

        fs::create_dir_all(&self.output_dir)
            .and_then(|()| self.sink.check_dir(&self.output_dir))
            .map_err(|source| GenError::FatalIo {
                path: self.output_dir.clone(),
                source,
            })?;

        let paths = assign_paths(&self.output_dir, plan);
        let progress = Progress::new(plan.planned_total_bytes());
        let work: Vec<(usize, PathBuf)> = paths.into_iter().enumerate().collect();

        let run = |(index, path): &(usize, PathBuf)| {
            self.write_entry(plan.seed, *index, &plan.entries[*index], path, &progress)
        };

        let outcomes: Vec<Result<usize, FileFailure>> = if self.jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .build()?;
            pool.install(|| work.par_iter().map(run).collect())
        } else {
            work.iter().map(run).collect()
        };

        let mut report = WriteReport {
            dry_run: false,
            planned_file_count: plan.planned_file_count(),
            planned_total_bytes: plan.planned_total_bytes(),
            files_written: 0,
            bytes_written: 0,
            per_extension: Default::default(),
            failures: Vec::new(),
            elapsed: Default::default(),
        };
        for outcome in outcomes {
            match outcome {
                Ok(index) => {
                    let entry = &plan.entries[index];
                    report.files_written += 1;
                    report.bytes_written += entry.size_bytes;
                    *report
                        .per_extension
                        .entry(entry.extension.clone())
                        .or_insert(0) += 1;
                }
                Err(failure) => report.failures.push(failure),
            }
        }
        report.elapsed = started.elapsed();

        if report.files_written == 0 && !report.failures.is_empty() {
            return Err(GenError::NoFilesWritten {
                failed: report.failures.len(),
            });
        }
        Ok(report)
    }

    fn write_entry(
        &self,
        seed: u64,
        index: usize,
        entry: &FilePlanEntry,
        path: &Path,
        progress: &Progress,
    ) -> Result<usize, FileFailure> {
        match self
            .sink
            .write_file(path, entry.size_bytes, content_rng(seed, index))
        {
            Ok(()) => {
                log::debug!("Wrote {} ({} bytes)", path.display(), entry.size_bytes);
                progress.advance(entry.size_bytes);
                Ok(index)
            }
            Err(source) => {
                let error = GenError::FileWrite {
                    path: path.to_path_buf(),
                    source,
                };
                log::warn!("{}", error);
                Err(FileFailure { index, error })
            }
        }
    }
}

/// Numbers files from a run-wide counter, stepping over names that already exist.
fn assign_paths(dir: &Path, plan: &GenerationPlan) -> Vec<PathBuf> {
    let mut counter: u64 = 0;
    let mut skipped = 0usize;

    let paths = plan
        .entries
        .iter()
        .map(|entry| loop {
            counter += 1;
            let path = dir.join(format!("file_{:06}.{}", counter, entry.extension));
            if fs::symlink_metadata(&path).is_err() {
                break path;
            }
            skipped += 1;
        })
        .collect();

    if skipped > 0 {
        log::warn!(
            "Skipped {} file names already present in {}",
            skipped,
            dir.display()
        );
    }
    paths
}

struct Progress {
    total: u64,
    done: AtomicU64,
}

impl Progress {
    fn new(total: u64) -> Self {
        Self {
            total: total.max(1),
            done: AtomicU64::new(0),
        }
    }

    /// Logs each time the written share crosses another 10%.
    fn advance(&self, bytes: u64) {
        let before = self.done.fetch_add(bytes, Ordering::Relaxed);
        let after = before + bytes;
        let step_before = before as u128 * 10 / self.total as u128;
        let step_after = after as u128 * 10 / self.total as u128;
        if step_after > step_before {
            log::info!(
                "[{:3}%] {:.2} MB written",
                step_after * 10,
                after as f64 / (1024.0 * 1024.0)
            );
        }
    }
}
