use crate::api::Provider;
use crate::comments::extract_top_comments;
use crate::config::{Credentials, PostErrorPolicy, ScrapeOptions, TimeWindow};
use crate::listing::select_posts;
use crate::progress::make_count_progress;
use crate::record::normalize_post;
use crate::sanitize::Sanitizer;
use crate::session::Session;
use crate::sink::RecordSinks;
use crate::util::init_tracing_once;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Scrape one community into `{stem}.jsonl` and `{stem}.csv`.
#[derive(Clone, Debug, Default)]
pub struct Scraper {
    pub(crate) opts: ScrapeOptions,
}

/// What a completed run wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub jsonl_path: PathBuf,
    pub csv_path: PathBuf,
    pub written: u64,
    pub failed: u64,
}

impl Scraper {
    pub fn new() -> Self {
        Self { opts: ScrapeOptions::default() }
    }

    pub fn from_options(opts: ScrapeOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn subreddit(mut self, sub: impl AsRef<str>) -> Self { self.opts = self.opts.with_subreddit(sub); self }
    pub fn sort(mut self, sort: impl AsRef<str>) -> Self { self.opts = self.opts.with_sort(sort); self }
    pub fn time_filter(mut self, window: TimeWindow) -> Self { self.opts = self.opts.with_time_filter(window); self }
    pub fn limit(mut self, limit: Option<u32>) -> Self { self.opts = self.opts.with_limit(limit); self }
    pub fn top_comments(mut self, n: usize) -> Self { self.opts = self.opts.with_top_comments(n); self }
    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self { self.opts = self.opts.with_output_prefix(prefix); self }
    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_out_dir(dir); self }
    pub fn on_error(mut self, policy: PostErrorPolicy) -> Self { self.opts = self.opts.with_error_policy(policy); self }
    pub fn redact_pii(mut self, yes: bool) -> Self { self.opts = self.opts.with_redact_pii(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn io_write_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_write_buffer(bytes); self }
    pub fn timestamps_human_readable(mut self, yes: bool) -> Self { self.opts = self.opts.with_human_timestamps(yes); self }

    pub fn options(&self) -> &ScrapeOptions {
        &self.opts
    }

    /// Open a session from `creds` and run against the live API.
    /// Missing credentials fail here, before any output file exists.
    pub fn run_with_credentials(&self, creds: &Credentials) -> Result<ScrapeSummary> {
        init_tracing_once();
        let session = Session::connect(creds).context("session initialization failed")?;
        self.run(&session)
    }

    /// Run against any provider.
    ///
    /// Per-post failures follow the configured `PostErrorPolicy`. A failed
    /// listing page ends the run with an error. In every case the sinks are
    /// finalized first, so the JSONL and CSV outputs hold the same records.
    pub fn run<P: Provider + ?Sized>(&self, provider: &P) -> Result<ScrapeSummary> {
        init_tracing_once();
        let o = &self.opts;

        let cleaner = Sanitizer::new(o.redact_pii)?;
        let listing = select_posts(provider, &o.subreddit, &o.sort, o.time_filter, o.limit)?;
        info!(
            "Scraping r/{} | sort={} time_filter={} limit={} top_comments={}",
            listing.community(),
            listing.sort(),
            o.time_filter,
            o.limit.map(|n| n.to_string()).unwrap_or_else(|| "all".to_string()),
            o.top_comments
        );

        fs::create_dir_all(&o.out_dir).with_context(|| format!("create {}", o.out_dir.display()))?;
        let jsonl_path = o.jsonl_path();
        let csv_path = o.csv_path();
        let mut sinks = RecordSinks::create(&jsonl_path, &csv_path, o.write_buffer_bytes)?;

        let pb = if o.progress { Some(make_count_progress(o.limit.map(u64::from), "submissions")) } else { None };

        let mut failed = 0u64;
        let mut outcome: Result<()> = Ok(());

        for item in listing {
            if let Some(pb) = &pb { pb.inc(1); }
            match item {
                Ok(mut post) => {
                    let comments = extract_top_comments(provider, &mut post, o.top_comments, &cleaner, o.human_readable_timestamps);
                    if let Some(rec) = normalize_post(&post, comments, &cleaner, o.human_readable_timestamps) {
                        if let Err(e) = sinks.write(&rec) {
                            outcome = Err(e);
                            break;
                        }
                    }
                }
                Err(e) if e.is_per_post() => {
                    failed += 1;
                    error!(post_id = e.post_id().unwrap_or("?"), error = %e, "Error processing submission");
                    if o.on_error == PostErrorPolicy::Abort {
                        outcome = Err(anyhow!(e).context("aborting after a per-submission error"));
                        break;
                    }
                }
                Err(e) => {
                    error!(error = %e, "Listing request failed; stopping");
                    outcome = Err(anyhow!(e).context(format!("listing r/{} failed", o.subreddit)));
                    break;
                }
            }
        }

        if let Some(pb) = pb { pb.finish_with_message("done"); }

        let summary = sinks.finish()?;
        info!(
            "Saved {} submissions to {} and {}",
            summary.jsonl_lines,
            jsonl_path.display(),
            csv_path.display()
        );
        outcome?;

        Ok(ScrapeSummary { jsonl_path, csv_path, written: summary.jsonl_lines, failed })
    }
}
