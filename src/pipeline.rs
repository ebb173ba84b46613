//! Batch compression of whole directories.
//!
//! Walks an input directory, compresses every decodable image toward
//! the configured budget in parallel, and writes the results plus a
//! `manifest.json` describing each file's outcome.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! ├── manifest.json       # Per-file reports + batch totals
//! ├── photo-1.png         # Compressed outputs, mirroring the input
//! └── meters/reading.png  # tree, always .png
//! ```
//!
//! Per-file failures (undecodable input, encoder errors) are recorded
//! in the manifest and do not abort the batch. Every compression runs
//! independently with no shared state, so files are processed in
//! parallel with [rayon](https://docs.rs/rayon).

use crate::compress::{CompressError, CompressOptions, CompressReport, compress_to_target};
use crate::imaging::load_image;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid options: {0}")]
    Options(#[from] CompressError),
    #[error("no images found under {0}")]
    NoImages(PathBuf),
}

/// Extensions the batch walker picks up (decoders compiled in).
const INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// Outcome of one file in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Source path relative to the input directory.
    pub source: String,
    /// Output path relative to the output directory, when produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<CompressReport>,
    /// Decode/encode failure message; the batch continues past it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full batch result, serialized as `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    pub entries: Vec<BatchEntry>,
    /// Files that met the byte budget.
    pub met: usize,
    /// Files compressed best-effort without meeting the budget.
    pub missed: usize,
    /// Files that failed to decode or encode.
    pub failed: usize,
}

/// Collect batch input files under `input_dir`, sorted for stable
/// manifest order.
fn collect_inputs(input_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| {
                    INPUT_EXTENSIONS
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(ext))
                })
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// One batch input with its resolved output path.
struct PlannedFile {
    source: PathBuf,
    /// Source path relative to the input directory.
    relative: PathBuf,
    /// Output path relative to the output directory.
    output: PathBuf,
}

/// Map each input to its output path, disambiguating stem collisions.
///
/// `a.jpg` and `a.png` in the same directory would both map to `a.png`,
/// and the parallel writes would silently overwrite one result.
/// Colliding inputs keep their original extension in the stem instead
/// (`a.jpg` → `a.jpg.png`), so every input gets a distinct output.
fn plan_outputs(files: Vec<PathBuf>, input_dir: &Path) -> Vec<PlannedFile> {
    let relatives: Vec<PathBuf> = files
        .iter()
        .map(|f| f.strip_prefix(input_dir).unwrap_or(f).to_path_buf())
        .collect();

    let mut claims: HashMap<PathBuf, usize> = HashMap::new();
    for relative in &relatives {
        *claims.entry(relative.with_extension("png")).or_default() += 1;
    }

    files
        .into_iter()
        .zip(relatives)
        .map(|(source, relative)| {
            let plain = relative.with_extension("png");
            let output = if claims[&plain] > 1 {
                let mut name = relative.file_name().unwrap_or_default().to_os_string();
                name.push(".png");
                relative.with_file_name(name)
            } else {
                plain
            };
            PlannedFile {
                source,
                relative,
                output,
            }
        })
        .collect()
}

/// Compress one file; failures become manifest entries, not panics.
fn compress_one(file: &PlannedFile, output_dir: &Path, opts: &CompressOptions) -> BatchEntry {
    let source_name = file.relative.to_string_lossy().into_owned();

    let result = load_image(&file.source)
        .map_err(CompressError::from)
        .and_then(|img| compress_to_target(&img, opts))
        .and_then(|compressed| {
            let out_path = output_dir.join(&file.output);
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CompressError::Codec(crate::imaging::CodecError::Io(e))
                })?;
            }
            std::fs::write(&out_path, &compressed.bytes)
                .map_err(|e| CompressError::Codec(crate::imaging::CodecError::Io(e)))?;
            Ok((file.output.to_string_lossy().into_owned(), compressed.report))
        });

    match result {
        Ok((output, report)) => BatchEntry {
            source: source_name,
            output: Some(output),
            report: Some(report),
            error: None,
        },
        Err(e) => BatchEntry {
            source: source_name,
            output: None,
            report: None,
            error: Some(e.to_string()),
        },
    }
}

/// Compress every image under `input_dir` into `output_dir`.
///
/// Writes compressed PNGs mirroring the input tree plus a
/// `manifest.json`, and returns the manifest.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    opts: &CompressOptions,
) -> Result<BatchManifest, PipelineError> {
    opts.validate()?;

    let files = collect_inputs(input_dir);
    if files.is_empty() {
        return Err(PipelineError::NoImages(input_dir.to_path_buf()));
    }

    std::fs::create_dir_all(output_dir)?;

    let planned = plan_outputs(files, input_dir);
    let entries: Vec<BatchEntry> = planned
        .par_iter()
        .map(|file| compress_one(file, output_dir, opts))
        .collect();

    let met = entries
        .iter()
        .filter(|e| e.report.is_some_and(|r| r.met_target))
        .count();
    let missed = entries
        .iter()
        .filter(|e| e.report.is_some_and(|r| !r.met_target))
        .count();
    let failed = entries.iter().filter(|e| e.error.is_some()).count();

    let manifest = BatchManifest {
        entries,
        met,
        missed,
        failed,
    };

    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(output_dir.join("manifest.json"), json)?;

    Ok(manifest)
}
