//! Normalized records and their flattened CSV projection.

use crate::api::Post;
use crate::sanitize::Sanitizer;
use crate::timestamps::Timestamp;
use serde::{Deserialize, Serialize};

/// Separator between comment bodies in the CSV `top_comments` cell.
pub const COMMENT_SEPARATOR: &str = " ||| ";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub body: String,
    pub score: i64,
    pub created_utc: Option<Timestamp>,
    pub is_submitter: bool,
}

/// One submission with its top comments, as written to the JSONL sink.
/// Field order is the JSON key order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub score: Option<i64>,
    pub created_utc: Option<Timestamp>,
    pub num_comments: Option<u64>,
    pub permalink: Option<String>,
    pub top_comments: Vec<CommentRecord>,
}

/// Build the record for `post`. Returns `None` when the sanitized title is empty;
/// such posts are dropped without a trace.
pub fn normalize_post(
    post: &Post,
    top_comments: Vec<CommentRecord>,
    cleaner: &Sanitizer,
    human_ts: bool,
) -> Option<NormalizedRecord> {
    let d = &post.data;
    let title = cleaner.clean(d.title.as_deref());
    if title.is_empty() {
        return None;
    }
    Some(NormalizedRecord {
        id: d.id.clone(),
        title,
        selftext: cleaner.clean(d.selftext.as_deref()),
        score: d.score,
        created_utc: d.created_utc.map(|ts| Timestamp::from_epoch(ts, human_ts)),
        num_comments: d.num_comments,
        permalink: d.permalink.clone(),
        top_comments,
    })
}

/// CSV row; column order is the header order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CsvRow {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub top_comments: String,
    pub score: Option<i64>,
    pub num_comments: Option<u64>,
    pub created_utc: Option<Timestamp>,
    pub permalink: Option<String>,
}

impl From<&NormalizedRecord> for CsvRow {
    fn from(r: &NormalizedRecord) -> Self {
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            selftext: r.selftext.clone(),
            top_comments: flatten_comments(&r.top_comments),
            score: r.score,
            num_comments: r.num_comments,
            created_utc: r.created_utc.clone(),
            permalink: r.permalink.clone(),
        }
    }
}

/// Join comment bodies with ` ||| ` after stripping line breaks from each.
pub fn flatten_comments(comments: &[CommentRecord]) -> String {
    comments
        .iter()
        .map(|c| c.body.replace(['\n', '\r'], ""))
        .collect::<Vec<_>>()
        .join(COMMENT_SEPARATOR)
}
