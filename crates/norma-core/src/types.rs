//! Shared value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unix epoch seconds.
///
/// All persisted timestamps use this representation so that documents
/// written by the engine stay comparable with a plain integer sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_now_is_recent() {
        let ts = Timestamp::now();
        let now = Utc::now().timestamp();
        assert!((now - ts.0).abs() < 5);
    }

    #[test]
    fn test_timestamp_datetime_round_trip() {
        let ts = Timestamp(1700000000);
        let dt = ts.to_datetime();
        assert_eq!(Timestamp::from_datetime(dt), ts);
    }

    #[test]
    fn test_timestamp_ordering() {
        assert!(Timestamp(100) < Timestamp(200));
        assert_eq!(Timestamp(100), Timestamp(100));
    }

    #[test]
    fn test_timestamp_serde_round_trip() {
        let ts = Timestamp(1700000000);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "1700000000");
        let rt: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, rt);
    }
}
