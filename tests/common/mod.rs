#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use subscrape::{CommentNode, ListingPage, PageRequest, PostData, Provider, ProviderError, RawComment};

/// A listing child as the fake provider serves it.
#[derive(Clone, Debug)]
pub enum FakeChild {
    Post(PostData),
    /// A child that fails to decode; carries the id the payload had, if any.
    Broken(Option<String>),
}

/// Observed listing request (owned copy of `PageRequest`).
#[derive(Clone, Debug, PartialEq)]
pub struct SeenRequest {
    pub community: String,
    pub sort: String,
    pub window: String,
    pub limit: u32,
    pub after: Option<String>,
}

/// In-memory `Provider`. The `after` cursor is the index of the next child.
#[derive(Default)]
pub struct FakeProvider {
    pub children: Vec<FakeChild>,
    pub comments: HashMap<String, Vec<CommentNode>>,
    pub failing_comments: HashSet<String>,
    /// Fail the listing request made with this cursor index.
    pub fail_page_at: Option<usize>,
    pub requests: RefCell<Vec<SeenRequest>>,
    pub comment_calls: RefCell<Vec<String>>,
}

impl FakeProvider {
    pub fn with_posts(posts: Vec<PostData>) -> Self {
        Self { children: posts.into_iter().map(FakeChild::Post).collect(), ..Default::default() }
    }

    pub fn comments_for(mut self, post_id: &str, nodes: Vec<CommentNode>) -> Self {
        self.comments.insert(post_id.to_string(), nodes);
        self
    }
}

impl Provider for FakeProvider {
    fn listing_page(&self, req: &PageRequest<'_>) -> Result<ListingPage, ProviderError> {
        self.requests.borrow_mut().push(SeenRequest {
            community: req.community.to_string(),
            sort: req.sort.to_string(),
            window: req.window.to_string(),
            limit: req.limit,
            after: req.after.map(str::to_string),
        });

        let start: usize = req.after.map(|a| a.parse().unwrap()).unwrap_or(0);
        if self.fail_page_at == Some(start) {
            return Err(ProviderError::Status { status: 503, endpoint: format!("/r/{}/{}", req.community, req.sort) });
        }
        let end = (start + req.limit as usize).min(self.children.len());
        let items = self.children[start.min(end)..end]
            .iter()
            .map(|c| match c {
                FakeChild::Post(p) => Ok(p.clone()),
                FakeChild::Broken(id) => Err(ProviderError::Shape { id: id.clone(), details: "missing field `id`".into() }),
            })
            .collect();
        let after = if end < self.children.len() { Some(end.to_string()) } else { None };
        Ok(ListingPage { items, after })
    }

    fn comment_forest(&self, post_id: &str) -> Result<Vec<CommentNode>, ProviderError> {
        self.comment_calls.borrow_mut().push(post_id.to_string());
        if self.failing_comments.contains(post_id) {
            return Err(ProviderError::Status { status: 500, endpoint: format!("/comments/{post_id}") });
        }
        Ok(self.comments.get(post_id).cloned().unwrap_or_default())
    }
}

pub fn post(id: &str, title: &str, score: i64) -> PostData {
    PostData {
        id: id.to_string(),
        title: Some(title.to_string()),
        selftext: Some(String::new()),
        score: Some(score),
        created_utc: Some(1_700_000_000.0),
        num_comments: Some(3),
        permalink: Some(format!("/r/soccer/comments/{id}/")),
    }
}

pub fn comment(id: &str, body: &str, score: i64) -> CommentNode {
    CommentNode::Comment(RawComment {
        id: id.to_string(),
        body: Some(body.to_string()),
        score: Some(score),
        created_utc: Some(1_700_000_100.0),
        is_submitter: Some(false),
    })
}

pub fn many_posts(n: usize) -> Vec<PostData> {
    (0..n).map(|i| post(&format!("p{i}"), &format!("Post number {i}"), i as i64)).collect()
}

/// Read a JSONL file into a vector of `serde_json::Value` (skips empty lines).
pub fn read_jsonl_values(path: &Path) -> Vec<serde_json::Value> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines()
        .map(|l| l.unwrap())
        .filter(|s| !s.is_empty())
        .map(|s| serde_json::from_str(&s).unwrap())
        .collect()
}

/// Read a CSV file: (header, rows).
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let header = rdr.headers().unwrap().iter().map(str::to_string).collect();
    let rows = rdr.records().map(|r| r.unwrap().iter().map(str::to_string).collect()).collect();
    (header, rows)
}
