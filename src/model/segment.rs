use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Which vlrggapi match feed to read.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SegmentQuery {
    Upcoming,
    Results,
}

/// A score or timestamp as the source sends it: sometimes a number, sometimes text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Numeric value, `NaN` when the text is not a number. Blank text counts as zero.
    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Scalar::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One match record ("segment") from the `/match` feed.
///
/// Every field is optional and deserialized leniently: a field with an
/// unexpected JSON type is read as absent instead of rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMatchRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub match_event: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tournament_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub team1: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub team2: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub flag1: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub flag2: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub score1: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub score2: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub unix_timestamp: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time_until_match: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time_completed: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub match_page: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub match_series: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub round_info: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tournament_icon: Option<String>,
}

impl RawMatchRecord {
    /// Read a `segments` payload. Anything but an array yields an empty list,
    /// and array elements that are not objects are skipped.
    pub fn list_from_value(value: &Value) -> Vec<RawMatchRecord> {
        let Some(items) = value.as_array() else {
            warn!(kind = json_kind(value), "segments payload is not an array");
            return Vec::new();
        };
        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                if !item.is_object() {
                    warn!(index, kind = json_kind(item), "skipping non-object segment");
                    return None;
                }
                match RawMatchRecord::deserialize(item) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(index, error = %e, "skipping unreadable segment");
                        None
                    }
                }
            })
            .collect()
    }

    /// Event key used to group records into tournaments.
    pub fn event_key(&self) -> Option<&str> {
        self.match_event.as_deref()
    }

    /// Whether the record belongs to the tournament `id` by event or tournament name.
    pub fn belongs_to(&self, id: &str) -> bool {
        self.match_event.as_deref() == Some(id) || self.tournament_name.as_deref() == Some(id)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(Scalar::Text(s)),
        Value::Number(n) => Some(Scalar::Number(n)),
        _ => None,
    })
}
