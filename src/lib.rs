mod api;
mod config;
mod session;
mod listing;

mod comments;
mod sanitize;
mod timestamps;
mod record;

mod sink;
mod progress;
mod util;
mod pipeline;
mod merge;

pub use crate::config::{ConfigError, Credentials, PostErrorPolicy, ScrapeOptions, SortMode, TimeWindow, DEFAULT_USER_AGENT};
pub use crate::pipeline::{ScrapeSummary, Scraper};
pub use crate::session::Session;

// Provider seam: implement `Provider` to feed the pipeline from anything other than the live API.
pub use crate::api::{
    decode_comment_forest, decode_listing_page, CommentNode, ListingPage, PageRequest, Post, PostData, Provider,
    ProviderError, RawComment, PAGE_SIZE,
};
pub use crate::listing::{select_posts, Listing};

// Extraction, cleanup and normalization steps, usable on their own.
pub use crate::comments::{extract_top_comments, rank_comments, DEFAULT_TOP_COMMENTS};
pub use crate::sanitize::{is_placeholder_body, redact_text, Redactor, Sanitizer};
pub use crate::record::{flatten_comments, normalize_post, CommentRecord, CsvRow, NormalizedRecord, COMMENT_SEPARATOR};
pub use crate::timestamps::Timestamp;

// Sinks and merge.
pub use crate::sink::{CsvTable, JsonlSink, RecordSinks, SinkSummary, CSV_HEADER};
pub use crate::merge::{merge_jsonl_files, DEFAULT_MERGE_INPUTS, DEFAULT_MERGE_OUTPUT};

pub use crate::progress::make_count_progress;
pub use crate::util::{init_tracing_once, normalize_community};
