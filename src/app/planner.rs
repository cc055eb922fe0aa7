use crate::app::errors::GenError;
use crate::app::models::{FilePlanEntry, GenerationConfig, GenerationPlan, BYTES_PER_KB};
use crate::app::rng::{plan_rng, resolve_seed, SeededRng};
use rand::Rng;

/// Inclusive range sizes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRange {
    pub min: u64,
    pub max: u64,
}

/// Narrows the configured bounds to +-50% around `target / approx_files`
/// when a file count was requested.
pub fn effective_range(config: &GenerationConfig) -> SizeRange {
    let (min, max) = (config.min_size_bytes, config.max_size_bytes);
    let Some(count) = config.approx_file_count else {
        return SizeRange { min, max };
    };

    let average = config.target_total_bytes / count.max(1);
    if average < min {
        log::warn!(
            "~{} files of {} bytes each would fall below the {} byte minimum; generating fewer, minimum-sized files",
            count,
            average,
            min
        );
    } else if average > max {
        log::warn!(
            "~{} files would need {} bytes each, above the {} byte maximum; generating more, maximum-sized files",
            count,
            average,
            max
        );
    }

    let center = average.clamp(min, max);
    let spread = center / 2;
    let range = SizeRange {
        min: (center - spread).max(min),
        max: center.saturating_add(spread).min(max),
    };
    log::info!(
        "Auto-tuning size range for ~{} files: min ≈ {} KB, max ≈ {} KB",
        count,
        range.min / BYTES_PER_KB,
        range.max / BYTES_PER_KB
    );
    range
}

/// Resolves a validated config into the ordered list of files to create.
pub fn plan(config: &GenerationConfig) -> Result<GenerationPlan, GenError> {
    config.validate()?;

    let seed = resolve_seed(config.seed);
    log::info!("Using random seed {}", seed);
    let mut rng = plan_rng(seed);
    let range = effective_range(config);

    let mut entries = Vec::new();
    let mut remaining = config.target_total_bytes;

    // Any draw that would reach the target is cut to the exact gap, which
    // still lies within the range because the gap is at least `range.min`.
    while remaining >= range.min {
        let extension = pick_extension(&mut rng, &config.extensions);
        let size = rng.random_range(range.min..=range.max).min(remaining);
        entries.push(FilePlanEntry {
            extension,
            size_bytes: size,
        });
        remaining -= size;
    }

    if remaining > 0 {
        close_gap(&mut entries, remaining, config, &mut rng);
    }

    log::debug!(
        "Planned {} files, {} bytes (target {})",
        entries.len(),
        entries.iter().map(|e| e.size_bytes).sum::<u64>(),
        config.target_total_bytes
    );

    Ok(GenerationPlan { entries, seed })
}

fn pick_extension(rng: &mut SeededRng, extensions: &[String]) -> String {
    extensions[rng.random_range(0..extensions.len())].clone()
}

/// Absorbs a leftover smaller than the draw range without emitting a tiny
/// file when the bounds allow it.
fn close_gap(
    entries: &mut Vec<FilePlanEntry>,
    gap: u64,
    config: &GenerationConfig,
    rng: &mut SeededRng,
) {
    let (min, max) = (config.min_size_bytes, config.max_size_bytes);

    if gap >= min {
        let extension = pick_extension(rng, &config.extensions);
        entries.push(FilePlanEntry {
            extension,
            size_bytes: gap,
        });
        return;
    }

    if let Some(last) = entries.last_mut() {
        // Bounds may sit near u64::MAX, so never form last + gap directly.
        if gap <= max.saturating_sub(last.size_bytes) {
            last.size_bytes += gap;
            return;
        }
        // gap < min, so rest + gap cannot overflow.
        let split = last
            .size_bytes
            .checked_sub(min)
            .map(|rest| rest + gap)
            .filter(|&rest| rest >= min);
        if let Some(rest) = split {
            last.size_bytes = rest;
            let extension = pick_extension(rng, &config.extensions);
            entries.push(FilePlanEntry {
                extension,
                size_bytes: min,
            });
            return;
        }
    }

    // Tiny target, or bounds too tight to redistribute.
    let extension = pick_extension(rng, &config.extensions);
    entries.push(FilePlanEntry {
        extension,
        size_bytes: gap,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::BYTES_PER_MB;
    use std::path::PathBuf;

    fn config(target: u64, min: u64, max: u64) -> GenerationConfig {
        GenerationConfig {
            target_total_bytes: target,
            approx_file_count: None,
            min_size_bytes: min,
            max_size_bytes: max,
            extensions: ["txt", "log", "csv", "json", "xml", "png", "pdf", "zip"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            seed: Some(1234),
            dry_run: true,
            output_directory: PathBuf::from("unused"),
            jobs: 1,
        }
    }

    fn out_of_bounds(plan: &GenerationPlan, cfg: &GenerationConfig) -> Vec<usize> {
        plan.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.size_bytes < cfg.min_size_bytes || e.size_bytes > cfg.max_size_bytes)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn same_seed_gives_identical_plan() {
        let cfg = config(20 * BYTES_PER_MB, 2 * BYTES_PER_KB, 512 * BYTES_PER_KB);
        let first = plan(&cfg).unwrap();
        let second = plan(&cfg).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.seed, 1234);
    }

    #[test]
    fn different_seeds_give_different_plans() {
        let cfg = config(20 * BYTES_PER_MB, 2 * BYTES_PER_KB, 512 * BYTES_PER_KB);
        let mut other = cfg.clone();
        other.seed = Some(4321);
        assert_ne!(plan(&cfg).unwrap().entries, plan(&other).unwrap().entries);
    }

    #[test]
    fn total_stays_within_one_max_file_of_target() {
        let shapes = [
            (10 * BYTES_PER_MB, 2 * BYTES_PER_KB, 64 * BYTES_PER_KB, None),
            (3 * BYTES_PER_MB + 17, 4 * BYTES_PER_KB, 5 * BYTES_PER_KB, None),
            (1_000_003, 1000, 1500, None),
            (50 * BYTES_PER_MB, 2 * BYTES_PER_KB, 512 * BYTES_PER_KB, Some(321)),
            (7 * BYTES_PER_MB, 2 * BYTES_PER_KB, 512 * BYTES_PER_KB, Some(100_000)),
        ];
        for seed in 0..8 {
            for &(target, min, max, count) in &shapes {
                let mut cfg = config(target, min, max);
                cfg.seed = Some(seed);
                cfg.approx_file_count = count;
                let plan = plan(&cfg).unwrap();
                let total = plan.planned_total_bytes();
                assert!(
                    total.abs_diff(target) <= max,
                    "seed {} target {} got {}",
                    seed,
                    target,
                    total
                );

                let outliers = out_of_bounds(&plan, &cfg);
                assert!(outliers.len() <= 1, "outliers {:?}", outliers);
                if let Some(&idx) = outliers.first() {
                    assert_eq!(idx, plan.entries.len() - 1);
                }
            }
        }
    }

    #[test]
    fn tiny_target_yields_single_exact_file() {
        let cfg = config(500, 1024, 64 * BYTES_PER_KB);
        let plan = plan(&cfg).unwrap();
        assert_eq!(plan.planned_file_count(), 1);
        assert_eq!(plan.entries[0].size_bytes, 500);
    }

    #[test]
    fn approx_count_drives_file_count() {
        let mut cfg = config(10 * BYTES_PER_MB, 2 * BYTES_PER_KB, 512 * BYTES_PER_KB);
        cfg.approx_file_count = Some(100);

        let range = effective_range(&cfg);
        assert_eq!(range.min, 52_429);
        assert_eq!(range.max, 157_285);

        let plan = plan(&cfg).unwrap();
        let count = plan.planned_file_count();
        assert!((90..=110).contains(&count), "got {} files", count);
        let outliers = out_of_bounds(&plan, &cfg);
        assert!(outliers.len() <= 1);
        for entry in &plan.entries[..count - 1] {
            assert!(entry.size_bytes >= range.min && entry.size_bytes <= range.max);
        }
    }

    #[test]
    fn oversized_count_falls_back_to_minimum_sized_files() {
        let mut cfg = config(BYTES_PER_MB, 2 * BYTES_PER_KB, 512 * BYTES_PER_KB);
        cfg.approx_file_count = Some(10_000);

        let range = effective_range(&cfg);
        assert_eq!(range.min, 2 * BYTES_PER_KB);
        assert_eq!(range.max, 3 * BYTES_PER_KB);

        let plan = plan(&cfg).unwrap();
        // Every file is at least the minimum, so the count cannot reach 10k.
        assert!(plan.planned_file_count() < 10_000);
        assert!(plan.planned_file_count() >= (BYTES_PER_MB / (3 * BYTES_PER_KB)) as usize);
        assert_eq!(plan.planned_total_bytes(), BYTES_PER_MB);
    }

    #[test]
    fn entries_use_configured_extensions_only() {
        let mut cfg = config(4 * BYTES_PER_MB, 2 * BYTES_PER_KB, 64 * BYTES_PER_KB);
        cfg.extensions = vec!["bin".to_string(), "dat".to_string()];
        let plan = plan(&cfg).unwrap();
        assert!(plan
            .entries
            .iter()
            .all(|e| e.extension == "bin" || e.extension == "dat"));
        let counts = plan.count_by_extension();
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn gap_below_minimum_is_split_off_last_entry() {
        let cfg = config(10_000, 1000, 1000);
        let mut entries = vec![FilePlanEntry {
            extension: "txt".into(),
            size_bytes: 1000,
        }];
        let mut rng = plan_rng(0);
        close_gap(&mut entries, 300, &cfg, &mut rng);
        // 1300 cannot fit one file and cannot split into two of >= 1000.
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].size_bytes, 300);

        let cfg = config(10_000, 1000, 2500);
        let mut entries = vec![FilePlanEntry {
            extension: "txt".into(),
            size_bytes: 2400,
        }];
        close_gap(&mut entries, 300, &cfg, &mut rng);
        assert_eq!(
            entries.iter().map(|e| e.size_bytes).collect::<Vec<_>>(),
            vec![1700, 1000]
        );
    }

    #[test]
    fn bounds_near_u64_max_do_not_overflow() {
        let huge = (1u64 << 63) + 10;
        let cfg = config(huge + 1000, huge, huge);
        assert!(cfg.validate().is_ok());

        let split = plan(&cfg).unwrap();
        assert_eq!(
            split.entries.iter().map(|e| e.size_bytes).collect::<Vec<_>>(),
            vec![huge, 1000]
        );
        assert_eq!(split.planned_total_bytes(), huge + 1000);

        let cfg = config(u64::MAX, u64::MAX - 5, u64::MAX);
        let grown = plan(&cfg).unwrap();
        assert_eq!(grown.planned_file_count(), 1);
        assert_eq!(grown.planned_total_bytes(), u64::MAX);
    }

    #[test]
    fn invalid_config_is_rejected_before_planning() {
        let cfg = config(BYTES_PER_MB, 10, 5);
        assert!(matches!(plan(&cfg), Err(GenError::InvalidConfig(_))));
    }
}
