use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ISSUED: AtomicI64 = AtomicI64::new(0);

/// Identifier of a generated artifact.
///
/// Ids are the creation time in milliseconds since the Unix epoch, rendered
/// as decimal. When two ids are issued within the same millisecond the later
/// one is bumped past the earlier, so ids issued by one process are strictly
/// increasing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Issue a fresh id
    pub fn generate() -> Self {
        let now = Utc::now().timestamp_millis();
        let mut last = LAST_ISSUED.load(Ordering::Relaxed);
        loop {
            let next = if now > last { now } else { last + 1 };
            match LAST_ISSUED.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return Self(next.to_string()),
                Err(observed) => last = observed,
            }
        }
    }

    /// Record an id issued by an earlier run so later ids sort after it.
    /// Ids that are not millisecond timestamps are ignored.
    pub fn observe(&self) {
        if let Ok(value) = self.0.parse::<i64>() {
            LAST_ISSUED.fetch_max(value, Ordering::Relaxed);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ArtifactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
