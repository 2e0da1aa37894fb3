//! Text cleanup applied to titles, selftext and comment bodies before they are written.

use anyhow::Result;
use regex::Regex;

const PLACEHOLDERS: [&str; 2] = ["[deleted]", "[removed]"];

/// Remove the `[deleted]` / `[removed]` placeholders anywhere in the text and trim.
/// Missing text becomes an empty string.
pub fn redact_text(text: Option<&str>) -> String {
    let Some(text) = text else { return String::new() };
    let mut out = text.to_string();
    // Removing one placeholder can splice together another ("[dele[removed]ted]").
    loop {
        let before = out.len();
        for p in PLACEHOLDERS {
            out = out.replace(p, "");
        }
        if out.len() == before {
            break;
        }
    }
    out.trim().to_string()
}

/// True when a comment body is nothing but a deletion marker (case-insensitive).
pub fn is_placeholder_body(body: &str) -> bool {
    let b = body.trim().to_lowercase();
    PLACEHOLDERS.contains(&b.as_str())
}

/// Optional PII pass: masks URLs, e-mail addresses and `u/name` mentions.
#[derive(Clone, Debug)]
pub struct Redactor {
    url: Regex,
    email: Regex,
    user: Regex,
}

impl Redactor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            url: Regex::new(r"https?://\S+")?,
            email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,
            user: Regex::new(r"/?\bu/[A-Za-z0-9_-]{3,20}\b")?,
        })
    }

    /// URLs first so that a `/u/...` path inside a link is masked as a link.
    pub fn apply(&self, text: &str) -> String {
        let text = self.url.replace_all(text, "[URL]");
        let text = self.email.replace_all(&text, "[EMAIL]");
        self.user.replace_all(&text, "[USER]").into_owned()
    }
}

/// The cleanup used by the pipeline: placeholder removal, plus PII masking
/// when a `Redactor` is installed.
#[derive(Clone, Debug, Default)]
pub struct Sanitizer {
    redactor: Option<Redactor>,
}

impl Sanitizer {
    pub fn new(redact_pii: bool) -> Result<Self> {
        let redactor = if redact_pii { Some(Redactor::new()?) } else { None };
        Ok(Self { redactor })
    }

    pub fn clean(&self, text: Option<&str>) -> String {
        let cleaned = redact_text(text);
        match &self.redactor {
            Some(r) => r.apply(&cleaned).trim().to_string(),
            None => cleaned,
        }
    }
}
