use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

pub type Timestamp = DateTime<FixedOffset>;

/// Membership interval. `begin <= end` is not enforced; an inverted range
/// never overlaps anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Range {
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub begin: Timestamp,
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub end: Timestamp,
}

impl Range {
    pub fn new(begin: Timestamp, end: Timestamp) -> Self {
        Self { begin, end }
    }

    /// Half-open overlap against an optional query window. Touching
    /// boundaries do not overlap.
    pub fn overlaps(&self, begin: Option<Timestamp>, end: Option<Timestamp>) -> bool {
        begin.is_none_or(|begin| self.end > begin) && end.is_none_or(|end| self.begin < end)
    }
}

pub fn format_date(date: &Timestamp) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Empty input means "no bound".
pub fn parse_date(date: &str) -> Result<Option<Timestamp>, chrono::ParseError> {
    if date.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(date).map(Some)
}

fn serialize_timestamp<S: Serializer>(date: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(date))
}

// Same strict parser as the query bounds; chrono's own Deserialize is lenient.
fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Timestamp, D::Error> {
    let value = <String as Deserialize>::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&value)
        .map_err(|e| de::Error::custom(format!("invalid RFC3339 timestamp {:?}: {}", value, e)))
}
