use serde::{Deserialize, Serialize};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// A creation time as written to the outputs: epoch seconds as delivered by the
/// API, or an RFC3339 string when human-readable timestamps are requested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(f64),
    Rfc3339(String),
}

impl Timestamp {
    /// Falls back to the numeric form if the value is out of range for `time`.
    pub fn from_epoch(secs: f64, human: bool) -> Self {
        if human {
            if let Some(s) = format_rfc3339(secs) {
                return Timestamp::Rfc3339(s);
            }
        }
        Timestamp::Epoch(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Epoch(secs) => write!(f, "{secs}"),
            Timestamp::Rfc3339(s) => f.write_str(s),
        }
    }
}

fn format_rfc3339(secs: f64) -> Option<String> {
    if !secs.is_finite() {
        return None;
    }
    let dt = OffsetDateTime::from_unix_timestamp(secs.trunc() as i64).ok()?;
    dt.format(&Rfc3339).ok()
}
