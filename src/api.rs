//! Provider seam: the wire shapes returned by the Reddit API, the decoded
//! `Post`/`CommentNode` views the pipeline works on, and the `Provider` trait
//! that a live `Session` (or a test double) implements.

use crate::config::{SortMode, TimeWindow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Largest page the listing endpoints will return.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected payload from {endpoint}: {details}")]
    Decode { endpoint: String, details: String },

    #[error("unexpected submission shape (id={}): {details}", .id.as_deref().unwrap_or("?"))]
    Shape { id: Option<String>, details: String },
}

impl ProviderError {
    /// True when the failure concerns one submission rather than the listing.
    pub fn is_per_post(&self) -> bool {
        matches!(self, ProviderError::Shape { .. })
    }

    pub fn post_id(&self) -> Option<&str> {
        match self {
            ProviderError::Shape { id, .. } => id.as_deref(),
            _ => None,
        }
    }
}

// ----------------------------- Wire shapes ------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Thing {
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub kind: String,
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    pub after: Option<String>,
}

/// Submission fields we keep. Only `id` is mandatory; everything else may be
/// absent or null in the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    pub id: String,
    pub title: Option<String>,
    pub selftext: Option<String>,
    pub score: Option<i64>,
    pub created_utc: Option<f64>,
    pub num_comments: Option<u64>,
    pub permalink: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    pub id: String,
    pub body: Option<String>,
    pub score: Option<i64>,
    pub created_utc: Option<f64>,
    pub is_submitter: Option<bool>,
}

/// A top-level node of a submission's comment forest.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentNode {
    Comment(RawComment),
    /// "load more comments" placeholder; never expanded.
    More { count: u64 },
}

// ----------------------------- Post handle ------------------------------------

/// A submission plus its lazily materialized comment forest.
#[derive(Debug, Clone)]
pub struct Post {
    pub data: PostData,
    comments: Option<Vec<CommentNode>>,
}

impl Post {
    pub fn new(data: PostData) -> Self {
        Self { data, comments: None }
    }

    /// A post whose comment forest is already known (no fetch needed).
    pub fn with_comments(data: PostData, comments: Vec<CommentNode>) -> Self {
        Self { data, comments: Some(comments) }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn is_materialized(&self) -> bool {
        self.comments.is_some()
    }

    /// Top-level nodes materialized so far; empty if nothing was loaded.
    pub fn comments(&self) -> &[CommentNode] {
        self.comments.as_deref().unwrap_or(&[])
    }

    /// Fetch the first level of comments once. "More" placeholders are kept
    /// as-is, which is the zero-depth expansion the extractor wants.
    pub fn load_comments<P: Provider + ?Sized>(&mut self, provider: &P) -> Result<(), ProviderError> {
        if self.comments.is_some() {
            return Ok(());
        }
        let nodes = provider.comment_forest(&self.data.id)?;
        self.comments = Some(nodes);
        Ok(())
    }
}

// ----------------------------- Provider ------------------------------------

/// One listing page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub community: &'a str,
    pub sort: SortMode,
    pub window: TimeWindow,
    pub limit: u32,
    pub after: Option<&'a str>,
}

/// A decoded listing page. Children that fail to decode are kept in place as
/// per-submission errors so the caller can log them and move on.
#[derive(Debug)]
pub struct ListingPage {
    pub items: Vec<Result<PostData, ProviderError>>,
    pub after: Option<String>,
}

/// Source of submissions and comments. Implemented by `Session`; tests use an
/// in-memory double.
pub trait Provider {
    fn listing_page(&self, req: &PageRequest<'_>) -> Result<ListingPage, ProviderError>;

    /// Top-level comments of a submission, placeholders included.
    fn comment_forest(&self, post_id: &str) -> Result<Vec<CommentNode>, ProviderError>;
}

// ----------------------------- Decoding ------------------------------------

/// Decode a `/r/{sub}/{sort}` response body.
pub fn decode_listing_page(endpoint: &str, body: Value) -> Result<ListingPage, ProviderError> {
    let listing: Listing = serde_json::from_value(body).map_err(|e| ProviderError::Decode {
        endpoint: endpoint.to_string(),
        details: e.to_string(),
    })?;

    let items = listing
        .data
        .children
        .into_iter()
        .map(|child| {
            let id = child.data.get("id").and_then(|v| v.as_str()).map(str::to_string);
            if child.kind != "t3" {
                return Err(ProviderError::Shape { id, details: format!("listing child of kind '{}'", child.kind) });
            }
            serde_json::from_value::<PostData>(child.data)
                .map_err(|e| ProviderError::Shape { id, details: e.to_string() })
        })
        .collect();

    Ok(ListingPage { items, after: listing.data.after.filter(|a| !a.is_empty()) })
}

/// Decode a `/comments/{id}` response body: `[submission listing, comment listing]`.
/// Comment children that do not decode are dropped with a warning.
pub fn decode_comment_forest(endpoint: &str, body: Value) -> Result<Vec<CommentNode>, ProviderError> {
    let decode_err = |details: String| ProviderError::Decode { endpoint: endpoint.to_string(), details };

    let mut parts = match body {
        Value::Array(parts) => parts,
        other => return Err(decode_err(format!("expected a two-element array, got {}", type_name(&other)))),
    };
    if parts.len() < 2 {
        return Err(decode_err(format!("expected a two-element array, got {} element(s)", parts.len())));
    }
    let listing: Listing = serde_json::from_value(parts.swap_remove(1)).map_err(|e| decode_err(e.to_string()))?;

    let mut nodes = Vec::with_capacity(listing.data.children.len());
    for child in listing.data.children {
        match child.kind.as_str() {
            "t1" => match serde_json::from_value::<RawComment>(child.data) {
                Ok(c) => nodes.push(CommentNode::Comment(c)),
                Err(e) => tracing::warn!(endpoint, error = %e, "Skipping undecodable comment"),
            },
            "more" => {
                let count = child.data.get("count").and_then(|v| v.as_u64()).unwrap_or(0);
                nodes.push(CommentNode::More { count });
            }
            other => tracing::debug!(endpoint, kind = other, "Ignoring comment child"),
        }
    }
    Ok(nodes)
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
