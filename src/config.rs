use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::util::normalize_community;

/// User agent used when none is configured.
pub const DEFAULT_USER_AGENT: &str = "soccercirclejerk_llm_scraper/0.1";

/// Configuration problems detected before any network or file I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing Reddit credential {0}; set it in the environment or .env")]
    MissingCredential(&'static str),
    #[error("community name must not be empty")]
    EmptyCommunity,
}

/// Client credentials for the application-only OAuth flow.
///
/// Values are carried as given; validation happens when a session is built,
/// so a missing id or secret fails at session initialization.
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: String,
}

impl Credentials {
    pub fn new(client_id: Option<String>, client_secret: Option<String>, user_agent: Option<String>) -> Self {
        let blank_to_none = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            client_id: blank_to_none(client_id),
            client_secret: blank_to_none(client_secret),
            user_agent: blank_to_none(user_agent).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Returns `(client_id, client_secret)` or the first missing field.
    pub fn require(&self) -> Result<(&str, &str), ConfigError> {
        let id = self.client_id.as_deref().ok_or(ConfigError::MissingCredential("REDDIT_CLIENT_ID"))?;
        let secret = self.client_secret.as_deref().ok_or(ConfigError::MissingCredential("REDDIT_CLIENT_SECRET"))?;
        Ok((id, secret))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Listing order requested from the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
    Top,
    Hot,
    New,
    Rising,
}

impl SortMode {
    /// Lenient parse: anything unrecognized becomes `Top` with a warning.
    pub fn resolve(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "top" => SortMode::Top,
            "hot" => SortMode::Hot,
            "new" => SortMode::New,
            "rising" => SortMode::Rising,
            other => {
                tracing::warn!("Unknown sort '{}', defaulting to top", other);
                SortMode::Top
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Top => "top",
            SortMode::Hot => "hot",
            SortMode::New => "new",
            SortMode::Rising => "rising",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window for `top` listings; ignored by the other sorts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    All,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::All => "all",
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TimeWindow::All),
            "hour" => Ok(TimeWindow::Hour),
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            "year" => Ok(TimeWindow::Year),
            other => Err(format!("invalid time filter '{other}' (expected all, hour, day, week, month, year)")),
        }
    }
}

/// What to do when a single submission cannot be processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PostErrorPolicy {
    /// Log, keep the sinks open, move on to the next submission.
    #[default]
    Skip,
    /// Log, finalize the sinks with what was written so far, fail the run.
    Abort,
}

impl FromStr for PostErrorPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(PostErrorPolicy::Skip),
            "abort" => Ok(PostErrorPolicy::Abort),
            other => Err(format!("invalid error policy '{other}' (expected skip or abort)")),
        }
    }
}

/// User-facing scrape options with defaults matching the original CLI.
#[derive(Clone, Debug)]
pub struct ScrapeOptions {
    pub subreddit: String,            // trimmed, no "r/"
    pub sort: String,                 // as requested, lowercased; resolved leniently at run time
    pub time_filter: TimeWindow,
    pub limit: Option<u32>,           // None = unbounded
    pub top_comments: usize,
    pub output_prefix: String,
    pub out_dir: PathBuf,
    pub on_error: PostErrorPolicy,
    pub redact_pii: bool,
    pub progress: bool,

    pub write_buffer_bytes: usize,

    // output formatting
    pub human_readable_timestamps: bool, // RFC3339 strings instead of epoch seconds
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            subreddit: "soccercirclejerk".to_string(),
            sort: "top".to_string(),
            time_filter: TimeWindow::All,
            limit: Some(250),
            top_comments: crate::comments::DEFAULT_TOP_COMMENTS,
            output_prefix: "dataset".to_string(),
            out_dir: PathBuf::from("."),
            on_error: PostErrorPolicy::Skip,
            redact_pii: false,
            progress: true,
            write_buffer_bytes: 64 * 1024,
            human_readable_timestamps: false,
        }
    }
}

impl ScrapeOptions {
    pub fn with_subreddit(mut self, sub: impl AsRef<str>) -> Self {
        self.subreddit = normalize_community(sub.as_ref());
        self
    }
    pub fn with_sort(mut self, sort: impl AsRef<str>) -> Self {
        self.sort = sort.as_ref().trim().to_lowercase();
        self
    }
    pub fn with_time_filter(mut self, window: TimeWindow) -> Self {
        self.time_filter = window;
        self
    }
    /// `Some(0)` is treated as unbounded.
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit.filter(|n| *n > 0);
        self
    }
    pub fn with_top_comments(mut self, n: usize) -> Self {
        self.top_comments = n;
        self
    }
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }
    pub fn with_out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_error_policy(mut self, policy: PostErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }
    pub fn with_redact_pii(mut self, yes: bool) -> Self {
        self.redact_pii = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_human_timestamps(mut self, yes: bool) -> Self {
        self.human_readable_timestamps = yes;
        self
    }

    /// `{prefix}_{community}_{sort}_{window}_{cap}`; cap is `all` when unbounded.
    pub fn output_stem(&self) -> String {
        let cap = self.limit.map(|n| n.to_string()).unwrap_or_else(|| "all".to_string());
        format!("{}_{}_{}_{}_{}", self.output_prefix, self.subreddit, self.sort, self.time_filter, cap)
    }

    pub fn jsonl_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.jsonl", self.output_stem()))
    }

    pub fn csv_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.csv", self.output_stem()))
    }
}
