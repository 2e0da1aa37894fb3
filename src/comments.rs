//! Top-comment extraction: load the first level of a post's comments, drop
//! placeholders and deleted bodies, rank by score.

use crate::api::{CommentNode, Post, Provider};
use crate::record::CommentRecord;
use crate::sanitize::{is_placeholder_body, Sanitizer};
use crate::timestamps::Timestamp;

pub const DEFAULT_TOP_COMMENTS: usize = 5;

/// Return up to `top_n` top-level comments of `post`, highest score first.
///
/// Never fails: if the comments cannot be loaded the failure is logged and
/// whatever is already materialized (possibly nothing) is ranked.
pub fn extract_top_comments<P: Provider + ?Sized>(
    provider: &P,
    post: &mut Post,
    top_n: usize,
    cleaner: &Sanitizer,
    human_ts: bool,
) -> Vec<CommentRecord> {
    if let Err(e) = post.load_comments(provider) {
        tracing::warn!(post_id = post.id(), error = %e, "Loading comments failed; continuing with partial data");
    }
    rank_comments(post.comments(), top_n, cleaner, human_ts)
}

/// Rank already-materialized nodes. Ties keep provider order.
pub fn rank_comments(nodes: &[CommentNode], top_n: usize, cleaner: &Sanitizer, human_ts: bool) -> Vec<CommentRecord> {
    let mut out: Vec<CommentRecord> = nodes
        .iter()
        .filter_map(|node| match node {
            CommentNode::Comment(c) => Some(c),
            CommentNode::More { .. } => None,
        })
        .filter(|c| match c.body.as_deref() {
            Some(body) => !body.is_empty() && !is_placeholder_body(body),
            None => false,
        })
        .map(|c| CommentRecord {
            id: c.id.clone(),
            body: cleaner.clean(c.body.as_deref()),
            score: c.score.unwrap_or(0),
            created_utc: c.created_utc.map(|ts| Timestamp::from_epoch(ts, human_ts)),
            is_submitter: c.is_submitter.unwrap_or(false),
        })
        .collect();

    // sort_by is stable
    out.sort_by(|a, b| b.score.cmp(&a.score));
    out.truncate(top_n);
    out
}
