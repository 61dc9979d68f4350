use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The time at which a page edit was recorded.
///
/// Combines a wall-clock component with a sequence number so that two edits
/// landing in the same millisecond still get distinct, ordered timestamps.
/// Within one page's history a timestamp is both the identity and the sort
/// key of an entry.
///
/// Ordering: `millis` → `seq` (total order).
///
/// The textual form is `"{millis}.{seq}"`; a bare `"{millis}"` parses with
/// `seq = 0`. Serde uses the same textual form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EditTimestamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub millis: u64,
    /// Sequence counter for edits within the same millisecond.
    pub seq: u32,
}

impl EditTimestamp {
    /// The largest timestamp. Nothing can be recorded after it.
    pub const MAX: Self = Self::new(u64::MAX, u32::MAX);

    /// Create a timestamp with explicit values.
    pub const fn new(millis: u64, seq: u32) -> Self {
        Self { millis, seq }
    }

    /// Create a timestamp for the current wall-clock time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self { millis, seq: 0 }
    }

    /// A timestamp for a new edit that is strictly after `previous`.
    ///
    /// Uses the wall clock when it has moved past `previous`; otherwise bumps
    /// the sequence counter so a stalled or skewed clock never produces a
    /// colliding key. Returns `None` if `previous` is [`EditTimestamp::MAX`].
    pub fn next_after(previous: Option<&Self>) -> Option<Self> {
        let now = Self::now();
        match previous {
            Some(prev) if now <= *prev => match prev.seq.checked_add(1) {
                Some(seq) => Some(Self {
                    millis: prev.millis,
                    seq,
                }),
                None => prev.millis.checked_add(1).map(|millis| Self { millis, seq: 0 }),
            },
            _ => Some(now),
        }
    }

    /// The wall-clock component as a UTC date-time, if it is representable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.millis)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}

impl PartialOrd for EditTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EditTimestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.millis
            .cmp(&other.millis)
            .then(self.seq.cmp(&other.seq))
    }
}

impl fmt::Debug for EditTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EditTimestamp({}ms.{})", self.millis, self.seq)
    }
}

impl fmt::Display for EditTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.millis, self.seq)
    }
}

impl FromStr for EditTimestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypeError::InvalidTimestamp {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (millis, seq) = match s.split_once('.') {
            Some((millis, seq)) => (millis, Some(seq)),
            None => (s, None),
        };
        let millis = millis
            .parse::<u64>()
            .map_err(|_| invalid("milliseconds must be an unsigned integer"))?;
        let seq = match seq {
            Some(seq) => seq
                .parse::<u32>()
                .map_err(|_| invalid("sequence must be an unsigned integer"))?,
            None => 0,
        };
        Ok(Self { millis, seq })
    }
}

impl From<EditTimestamp> for String {
    fn from(ts: EditTimestamp) -> Self {
        ts.to_string()
    }
}

impl TryFrom<String> for EditTimestamp {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
