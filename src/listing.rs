//! Collection selection: a lazy, capped, paginated iterator over a community's posts.

use crate::api::{PageRequest, Post, PostData, Provider, ProviderError, PAGE_SIZE};
use crate::config::{ConfigError, SortMode, TimeWindow};
use crate::util::normalize_community;
use std::collections::VecDeque;

/// Posts of one community in provider order, at most `cap` of them.
///
/// Pages are fetched on demand. A failed page fetch is yielded once as an
/// error and ends the iteration; an undecodable child is yielded as a
/// per-post error and iteration continues.
pub struct Listing<'p, P: Provider + ?Sized> {
    provider: &'p P,
    community: String,
    sort: SortMode,
    window: TimeWindow,
    cap: Option<u32>,
    yielded: u32,
    after: Option<String>,
    buffer: VecDeque<Result<PostData, ProviderError>>,
    exhausted: bool,
}

/// Start a listing. `sort` is parsed leniently (unknown → top, with a warning).
pub fn select_posts<'p, P: Provider + ?Sized>(
    provider: &'p P,
    community: &str,
    sort: &str,
    window: TimeWindow,
    cap: Option<u32>,
) -> Result<Listing<'p, P>, ConfigError> {
    let community = normalize_community(community);
    if community.is_empty() {
        return Err(ConfigError::EmptyCommunity);
    }
    Ok(Listing {
        provider,
        community,
        sort: SortMode::resolve(sort),
        window,
        cap: cap.filter(|n| *n > 0),
        yielded: 0,
        after: None,
        buffer: VecDeque::new(),
        exhausted: false,
    })
}

impl<'p, P: Provider + ?Sized> Listing<'p, P> {
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn community(&self) -> &str {
        &self.community
    }

    fn remaining(&self) -> Option<u32> {
        self.cap.map(|c| c.saturating_sub(self.yielded))
    }

    fn fetch_page(&mut self) -> Result<(), ProviderError> {
        let limit = self.remaining().map(|r| r.min(PAGE_SIZE)).unwrap_or(PAGE_SIZE);
        let req = PageRequest {
            community: &self.community,
            sort: self.sort,
            window: self.window,
            limit,
            after: self.after.as_deref(),
        };
        let page = self.provider.listing_page(&req)?;
        tracing::debug!(count = page.items.len(), after = ?page.after, "Fetched listing page");

        if page.items.is_empty() || page.after.is_none() {
            self.exhausted = true;
        }
        self.after = page.after;
        self.buffer.extend(page.items);
        Ok(())
    }
}

impl<'p, P: Provider + ?Sized> Iterator for Listing<'p, P> {
    type Item = Result<Post, ProviderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining() == Some(0) {
                return None;
            }
            if let Some(item) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(item.map(Post::new));
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
    }
}
