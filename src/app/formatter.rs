use crate::app::models::{GenerationConfig, WriteReport, BYTES_PER_KB, BYTES_PER_MB};

pub struct OutputGenerator;

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB as f64
}

impl OutputGenerator {
    pub fn format_config(config: &GenerationConfig) -> String {
        let mut lines = vec![
            "Configuration:".to_string(),
            format!("  Output directory : {}", config.output_directory.display()),
            format!(
                "  Target size      : {:.2} MB ({} bytes)",
                megabytes(config.target_total_bytes),
                config.target_total_bytes
            ),
            format!("  Extensions       : {}", config.extensions.join(", ")),
        ];
        if let Some(count) = config.approx_file_count {
            lines.push(format!("  Approx. files    : {}", count));
        }
        lines.push(format!(
            "  File size (KB)   : {} - {}",
            config.min_size_bytes / BYTES_PER_KB,
            config.max_size_bytes / BYTES_PER_KB
        ));
        if let Some(seed) = config.seed {
            lines.push(format!("  Random seed      : {}", seed));
        }
        if config.jobs > 1 {
            lines.push(format!("  Writer threads   : {}", config.jobs));
        }
        lines.push(format!("  Dry run          : {}", config.dry_run));

        lines.join("\n")
    }

    pub fn format_report(report: &WriteReport) -> String {
        let mut out = String::from("Done!\n");

        if report.dry_run {
            out.push_str(&format!(
                "Would create {} files ({:.2} MB). Dry run: nothing was written.\n",
                report.planned_file_count,
                megabytes(report.planned_total_bytes)
            ));
        } else {
            let secs = report.elapsed.as_secs_f64().max(0.001);
            out.push_str(&format!(
                "Created {} of {} files.\n",
                report.files_written, report.planned_file_count
            ));
            out.push_str(&format!(
                "Total size: {:.2} MB\n",
                megabytes(report.bytes_written)
            ));
            out.push_str(&format!(
                "Time taken: {:.2} seconds (~{:.2} MB/s)\n",
                secs,
                megabytes(report.bytes_written) / secs
            ));
        }

        out.push_str("\nFile count by extension:");
        for (ext, count) in &report.per_extension {
            out.push_str(&format!("\n  .{}: {} files", ext, count));
        }

        if !report.failures.is_empty() {
            out.push_str(&format!("\n\n{} files failed:", report.failures.len()));
            for failure in &report.failures {
                out.push_str(&format!("\n  #{}: {}", failure.index + 1, failure.error));
            }
        }

        out
    }
}
