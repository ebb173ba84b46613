//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Compress
//!
//! ```text
//! photo.jpg → photo.png
//!     Size: 483.2 KB (target 500 KB, met)
//!     Dimensions: 3240x2430 (2 downscale steps)
//! ```
//!
//! ## Batch
//!
//! ```text
//! 001 meters/reading-1.jpg → meters/reading-1.png
//!     Size: 112.4 KB (target 500 KB, met)
//! 002 meters/reading-2.jpg
//!     Error: Decode failed: ...
//!
//! Batch: 1 met, 0 best-effort, 1 failed
//! ```

use crate::compress::CompressReport;
use crate::pipeline::BatchManifest;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format a size-versus-target line.
///
/// ```text
/// Size: 483.2 KB (target 500 KB, met)
/// Size: 812.7 KB (target 500 KB, best effort)
/// ```
fn size_line(report: &CompressReport) -> String {
    let verdict = if report.met_target {
        "met"
    } else {
        "best effort"
    };
    format!(
        "    Size: {:.1} KB (target {} KB, {})",
        report.size_kb, report.target_kb, verdict
    )
}

/// Format the result of a single compress command.
pub fn format_compress_output(source: &str, output: &str, report: &CompressReport) -> Vec<String> {
    let steps = match report.attempts {
        0 => "no downscaling".to_string(),
        1 => "1 downscale step".to_string(),
        n => format!("{} downscale steps", n),
    };
    vec![
        format!("{} → {}", source, output),
        size_line(report),
        format!(
            "    Dimensions: {}x{} ({})",
            report.width, report.height, steps
        ),
    ]
}

/// Format a batch manifest: one block per entry plus a summary line.
pub fn format_batch_output(manifest: &BatchManifest) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, entry) in manifest.entries.iter().enumerate() {
        match (&entry.output, &entry.report, &entry.error) {
            (Some(output), Some(report), _) => {
                lines.push(format!(
                    "{} {} → {}",
                    format_index(i + 1),
                    entry.source,
                    output
                ));
                lines.push(size_line(report));
            }
            (_, _, Some(error)) => {
                lines.push(format!("{} {}", format_index(i + 1), entry.source));
                lines.push(format!("    Error: {}", error));
            }
            _ => {
                lines.push(format!("{} {}", format_index(i + 1), entry.source));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Batch: {} met, {} best-effort, {} failed",
        manifest.met, manifest.missed, manifest.failed
    ));
    lines
}

pub fn print_compress_output(source: &str, output: &str, report: &CompressReport) {
    for line in format_compress_output(source, output, report) {
        println!("{}", line);
    }
}

pub fn print_batch_output(manifest: &BatchManifest) {
    for line in format_batch_output(manifest) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BatchEntry;

    fn sample_report(met: bool, attempts: u32) -> CompressReport {
        CompressReport {
            target_kb: 500,
            size_kb: 483.2,
            width: 3240,
            height: 2430,
            met_target: met,
            attempts,
        }
    }

    #[test]
    fn compress_output_met_target() {
        let lines = format_compress_output("photo.jpg", "photo.png", &sample_report(true, 2));
        assert_eq!(lines[0], "photo.jpg → photo.png");
        assert_eq!(lines[1], "    Size: 483.2 KB (target 500 KB, met)");
        assert_eq!(lines[2], "    Dimensions: 3240x2430 (2 downscale steps)");
    }

    #[test]
    fn compress_output_zero_attempts() {
        let lines = format_compress_output("a.png", "b.png", &sample_report(true, 0));
        assert!(lines[2].contains("no downscaling"));
    }

    #[test]
    fn compress_output_best_effort() {
        let lines = format_compress_output("a.png", "b.png", &sample_report(false, 10));
        assert!(lines[1].contains("best effort"));
    }

    #[test]
    fn batch_output_mixes_results_and_errors() {
        let manifest = BatchManifest {
            entries: vec![
                BatchEntry {
                    source: "good.jpg".into(),
                    output: Some("good.png".into()),
                    report: Some(sample_report(true, 1)),
                    error: None,
                },
                BatchEntry {
                    source: "bad.jpg".into(),
                    output: None,
                    report: None,
                    error: Some("Decode failed: bad magic".into()),
                },
            ],
            met: 1,
            missed: 0,
            failed: 1,
        };

        let lines = format_batch_output(&manifest);
        assert_eq!(lines[0], "001 good.jpg → good.png");
        assert_eq!(lines[2], "002 bad.jpg");
        assert_eq!(lines[3], "    Error: Decode failed: bad magic");
        assert_eq!(lines.last().unwrap(), "Batch: 1 met, 0 best-effort, 1 failed");
    }
}
