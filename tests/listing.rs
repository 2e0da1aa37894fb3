#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::json;
use subscrape::{decode_comment_forest, decode_listing_page, select_posts, CommentNode, ConfigError, SortMode, TimeWindow};

/// cap=3 with sort "bogus": falls back to top and yields at most 3 posts.
#[test]
fn unknown_sort_falls_back_to_top_and_respects_cap() {
    let provider = FakeProvider::with_posts(many_posts(10));
    let listing = select_posts(&provider, "soccer", "bogus", TimeWindow::All, Some(3)).unwrap();
    assert_eq!(listing.sort(), SortMode::Top);

    let posts: Vec<_> = listing.map(|r| r.unwrap()).collect();
    assert_eq!(posts.len(), 3);

    let reqs = provider.requests.borrow();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].sort, "top");
    assert_eq!(reqs[0].limit, 3);
}

/// The cap holds across page boundaries and the cursor is forwarded.
#[test]
fn pagination_honours_cap_across_pages() {
    let provider = FakeProvider::with_posts(many_posts(250));
    let ids: Vec<String> = select_posts(&provider, "r/soccer", "new", TimeWindow::Week, Some(230))
        .unwrap()
        .map(|r| r.unwrap().data.id)
        .collect();

    assert_eq!(ids.len(), 230);
    assert_eq!(ids.first().map(String::as_str), Some("p0"));
    assert_eq!(ids.last().map(String::as_str), Some("p229"));

    let reqs = provider.requests.borrow();
    let limits: Vec<u32> = reqs.iter().map(|r| r.limit).collect();
    assert_eq!(limits, vec![100, 100, 30]);
    assert_eq!(reqs[0].after, None);
    assert_eq!(reqs[1].after.as_deref(), Some("100"));
    assert!(reqs.iter().all(|r| r.community == "soccer" && r.sort == "new"));
}

/// Unbounded listing stops when the provider stops returning a cursor.
#[test]
fn unbounded_listing_stops_without_cursor() {
    let provider = FakeProvider::with_posts(many_posts(120));
    let n = select_posts(&provider, "soccer", "hot", TimeWindow::All, None).unwrap().count();
    assert_eq!(n, 120);
    assert_eq!(provider.requests.borrow().len(), 2);
}

/// A page failure is yielded once and ends the iteration.
#[test]
fn page_failure_is_yielded_once_then_ends() {
    let mut provider = FakeProvider::with_posts(many_posts(150));
    provider.fail_page_at = Some(100);

    let items: Vec<_> = select_posts(&provider, "soccer", "top", TimeWindow::All, Some(150)).unwrap().collect();
    assert_eq!(items.len(), 101);
    assert!(items[..100].iter().all(|r| r.is_ok()));
    let err = items[100].as_ref().unwrap_err();
    assert!(!err.is_per_post());
}

/// Empty community names are rejected.
#[test]
fn empty_community_rejected() {
    let provider = FakeProvider::default();
    let err = select_posts(&provider, "  r/ ", "top", TimeWindow::All, Some(1)).err().unwrap();
    assert_eq!(err, ConfigError::EmptyCommunity);
}

/// Listing payload decoding: good posts decode, a child without id becomes a
/// per-post error, the cursor is carried through.
#[test]
fn decode_listing_payload() {
    let body = json!({
        "kind": "Listing",
        "data": {
            "after": "t3_b2",
            "children": [
                {"kind": "t3", "data": {
                    "id": "a1", "title": "Hello ⚽", "selftext": "", "score": 42,
                    "created_utc": 1700000000.0, "num_comments": 7,
                    "permalink": "/r/soccer/comments/a1/hello/", "author": "someone"
                }},
                {"kind": "t3", "data": {"title": "no id here", "score": 1}},
                {"kind": "t3", "data": {"id": "b2", "title": null, "score": null}}
            ]
        }
    });
    let page = decode_listing_page("/r/soccer/top", body).unwrap();
    assert_eq!(page.after.as_deref(), Some("t3_b2"));
    assert_eq!(page.items.len(), 3);

    let a1 = page.items[0].as_ref().unwrap();
    assert_eq!(a1.id, "a1");
    assert_eq!(a1.title.as_deref(), Some("Hello ⚽"));
    assert_eq!(a1.score, Some(42));
    assert_eq!(a1.num_comments, Some(7));

    let broken = page.items[1].as_ref().unwrap_err();
    assert!(broken.is_per_post());

    let b2 = page.items[2].as_ref().unwrap();
    assert_eq!(b2.title, None);
    assert_eq!(b2.score, None);
}

/// Comment payload decoding: t1 children become comments, "more" becomes a placeholder.
#[test]
fn decode_comment_payload() {
    let body = json!([
        {"kind": "Listing", "data": {"children": [{"kind": "t3", "data": {"id": "a1"}}], "after": null}},
        {"kind": "Listing", "data": {"after": null, "children": [
            {"kind": "t1", "data": {"id": "c1", "body": "nice", "score": 3, "created_utc": 1700000001.0, "is_submitter": true}},
            {"kind": "t1", "data": {"id": "c2", "body": "[deleted]", "score": 1}},
            {"kind": "more", "data": {"count": 40, "children": ["x", "y"]}}
        ]}}
    ]);
    let nodes = decode_comment_forest("/comments/a1", body).unwrap();
    assert_eq!(nodes.len(), 3);
    match &nodes[0] {
        CommentNode::Comment(c) => {
            assert_eq!(c.id, "c1");
            assert_eq!(c.is_submitter, Some(true));
        }
        other => panic!("expected comment, got {other:?}"),
    }
    assert_eq!(nodes[2], CommentNode::More { count: 40 });
}

/// Anything other than the two-listing array is a decode error.
#[test]
fn decode_comment_payload_rejects_wrong_shape() {
    assert!(decode_comment_forest("/comments/a1", json!({"kind": "Listing"})).is_err());
    assert!(decode_comment_forest("/comments/a1", json!([])).is_err());
}
