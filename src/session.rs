//! Authenticated Reddit session (application-only OAuth) and its `Provider` impl.

use crate::api::{
    decode_comment_forest, decode_listing_page, CommentNode, ListingPage, PageRequest, Provider, ProviderError,
};
use crate::config::{Credentials, SortMode};
use anyhow::Result;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

// Refresh a little before the server-side expiry.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug)]
struct BearerToken {
    value: String,
    expires_at: Option<Instant>,
}

impl BearerToken {
    fn is_stale(&self) -> bool {
        self.expires_at.map(|t| Instant::now() >= t).unwrap_or(false)
    }
}

/// Blocking API session. Created once per run from explicit `Credentials`.
pub struct Session {
    http: Client,
    client_id: String,
    client_secret: String,
    token: RefCell<BearerToken>,
}

impl Session {
    /// Validate credentials and obtain a bearer token.
    ///
    /// Missing credentials fail with [`crate::ConfigError`] before any request is made.
    pub fn connect(creds: &Credentials) -> Result<Self> {
        let (id, secret) = creds.require()?;

        let http = Client::builder().user_agent(creds.user_agent.as_str()).build()?;
        let token = request_token(&http, id, secret)?;
        info!(user_agent = %creds.user_agent, "Authenticated against the Reddit API");

        Ok(Self {
            http,
            client_id: id.to_string(),
            client_secret: secret.to_string(),
            token: RefCell::new(token),
        })
    }

    fn bearer(&self) -> Result<String, ProviderError> {
        if self.token.borrow().is_stale() {
            debug!("Bearer token expired; requesting a new one");
            let fresh = request_token(&self.http, &self.client_id, &self.client_secret)?;
            *self.token.borrow_mut() = fresh;
        }
        Ok(self.token.borrow().value.clone())
    }

    fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ProviderError> {
        let token = self.bearer()?;
        let url = format!("{API_BASE}{endpoint}");
        debug!(endpoint, ?params, "GET");

        let resp = self.http.get(&url).bearer_auth(token).query(params).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status { status: status.as_u16(), endpoint: endpoint.to_string() });
        }
        resp.json::<Value>().map_err(|e| ProviderError::Decode { endpoint: endpoint.to_string(), details: e.to_string() })
    }
}

impl Provider for Session {
    fn listing_page(&self, req: &PageRequest<'_>) -> Result<ListingPage, ProviderError> {
        let endpoint = format!("/r/{}/{}", req.community, req.sort);
        let mut params = vec![("limit", req.limit.to_string()), ("raw_json", "1".to_string())];
        if req.sort == SortMode::Top {
            params.push(("t", req.window.to_string()));
        }
        if let Some(after) = req.after {
            params.push(("after", after.to_string()));
        }
        let body = self.get_json(&endpoint, &params)?;
        decode_listing_page(&endpoint, body)
    }

    fn comment_forest(&self, post_id: &str) -> Result<Vec<CommentNode>, ProviderError> {
        let endpoint = format!("/comments/{post_id}");
        let params = [("depth", "1".to_string()), ("raw_json", "1".to_string())];
        let body = self.get_json(&endpoint, &params)?;
        decode_comment_forest(&endpoint, body)
    }
}

fn request_token(http: &Client, client_id: &str, client_secret: &str) -> Result<BearerToken, ProviderError> {
    let resp = http
        .post(TOKEN_URL)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ProviderError::Auth(format!("token endpoint returned {status}")));
    }
    let tok: TokenResponse = resp
        .json()
        .map_err(|e| ProviderError::Auth(format!("token response did not decode: {e}")))?;

    let expires_at = tok
        .expires_in
        .map(|secs| Instant::now() + Duration::from_secs(secs).saturating_sub(TOKEN_SLACK));
    Ok(BearerToken { value: tok.access_token, expires_at })
}
