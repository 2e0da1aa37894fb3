//! Merge several JSONL outputs into one corpus file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Inputs merged when none are given on the command line.
pub const DEFAULT_MERGE_INPUTS: [&str; 5] = [
    "dataset_soccer_top_all_250.jsonl",
    "dataset_soccer_top_year_250.jsonl",
    "dataset_soccercirclejerk_top_all_250.jsonl",
    "dataset_soccercirclejerk_top_month_250.jsonl",
    "dataset_soccercirclejerk_top_year_250.jsonl",
];

pub const DEFAULT_MERGE_OUTPUT: &str = "merged_datasets.jsonl";

/// Append each input verbatim to `out_path`, in order, each followed by one `\n`.
/// Inputs are not validated or deduplicated. Any unreadable input fails the
/// whole merge. Returns the number of files merged.
pub fn merge_jsonl_files<P: AsRef<Path>>(inputs: &[P], out_path: &Path) -> Result<usize> {
    let mut out = BufWriter::new(File::create(out_path).with_context(|| format!("create {}", out_path.display()))?);
    for p in inputs {
        let p = p.as_ref();
        let mut r = BufReader::new(File::open(p).with_context(|| format!("open merge input {}", p.display()))?);
        std::io::copy(&mut r, &mut out).with_context(|| format!("copy {}", p.display()))?;
        out.write_all(b"\n")?;
        tracing::debug!(input = %p.display(), "Merged");
    }
    out.flush().with_context(|| format!("flush {}", out_path.display()))?;
    Ok(inputs.len())
}
