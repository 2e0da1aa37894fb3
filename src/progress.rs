//! Progress reporting for the submission loop.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Count-style bar when the total is known, a spinner with a running count otherwise.
pub fn make_count_progress(total: Option<u64>, label: &str) -> ProgressBar {
    let (pb, template) = match total {
        Some(n) => (
            ProgressBar::new(n),
            "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
             it/s: {per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}",
        ),
        None => (ProgressBar::new_spinner(), "{spinner:.green} {msg} {pos}  it/s: {per_sec}  elapsed: {elapsed_precise}"),
    };
    let style = ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
