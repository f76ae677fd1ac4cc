///! AirLabs response schema
///!
///! First stage of payload handling: checks the response envelope and decodes
///! each record into a raw, fully optional struct. Nothing here decides whether
///! a record becomes a `Flight`; that is the mapper's job.
///!
///! Almost every upstream field can be `null`, missing, or of the wrong type.
///! The lenient deserializers below collapse all three into `None`, so a single
///! odd record never fails the batch.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::TowerError;

/// Strings only; blank strings and other JSON types read as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    })
}

/// Integers, finite floats (truncated) and numeric strings; anything else is absent
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Schedule entry from `/schedules`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSchedule {
    #[serde(default, deserialize_with = "lenient_string")]
    pub airline_iata: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub airline_icao: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub flight_iata: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub flight_icao: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub flight_number: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub dep_iata: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dep_icao: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dep_terminal: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dep_gate: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dep_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dep_time_utc: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub dep_time_ts: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dep_estimated: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dep_estimated_utc: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub dep_delayed: Option<i64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub arr_iata: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub arr_icao: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub arr_time: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

impl RawSchedule {
    /// UTC departure string, preferring the explicit UTC field
    pub fn scheduled_departure(&self) -> Option<&str> {
        self.dep_time_utc.as_deref().or(self.dep_time.as_deref())
    }

    pub fn estimated_departure(&self) -> Option<&str> {
        self.dep_estimated_utc
            .as_deref()
            .or(self.dep_estimated.as_deref())
    }
}

/// Schedule records that passed the envelope check
#[derive(Debug, Default)]
pub struct ScheduleBatch {
    pub records: Vec<RawSchedule>,
    /// Array elements that were not objects
    pub malformed: usize,
}

/// Airport entry from `/suggest`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSuggestion {
    #[serde(default, deserialize_with = "lenient_string")]
    pub iata_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub icao_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country_code: Option<String>,
}

/// The three suggestion categories, highest priority first
#[derive(Debug, Default)]
pub struct SuggestionGroups {
    pub airports: Vec<RawSuggestion>,
    pub airports_by_cities: Vec<RawSuggestion>,
    pub airports_by_countries: Vec<RawSuggestion>,
}

/// Airport entry from `/airports`, used to name an airport given by code.
/// Other fields in the record are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AirportInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub iata_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Parse the body and return the value under `response`.
///
/// AirLabs reports some failures (bad key, exhausted quota) as HTTP 200 with an
/// `error` object, which becomes [`TowerError::Api`].
fn envelope_response(body: &[u8]) -> Result<Value, TowerError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| TowerError::Format(format!("response is not valid JSON: {}", e)))?;

    let Value::Object(mut envelope) = value else {
        return Err(TowerError::Format("response is not a JSON object".to_string()));
    };

    if let Some(Value::Object(error)) = envelope.get("error") {
        let field = |name: &str| {
            error
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string()
        };
        return Err(TowerError::Api {
            code: field("code"),
            message: field("message"),
        });
    }

    envelope
        .remove("response")
        .filter(|response| !response.is_null())
        .ok_or_else(|| TowerError::Format("missing `response` field".to_string()))
}

fn decode_records<T>(items: Vec<Value>) -> (Vec<T>, usize)
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::with_capacity(items.len());
    let mut malformed = 0;

    for item in items {
        if !item.is_object() {
            malformed += 1;
            continue;
        }
        match serde_json::from_value(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!("Skipping undecodable record: {}", e);
                malformed += 1;
            }
        }
    }

    (records, malformed)
}

/// Check the `/schedules` envelope and decode its records
pub fn parse_schedules(body: &[u8]) -> Result<ScheduleBatch, TowerError> {
    let Value::Array(items) = envelope_response(body)? else {
        return Err(TowerError::Format("`response` is not an array".to_string()));
    };

    let (records, malformed) = decode_records(items);
    Ok(ScheduleBatch { records, malformed })
}

/// Check the `/suggest` envelope and decode the three categories.
/// A missing category is empty.
pub fn parse_suggestions(body: &[u8]) -> Result<SuggestionGroups, TowerError> {
    let Value::Object(mut response) = envelope_response(body)? else {
        return Err(TowerError::Format("`response` is not an object".to_string()));
    };

    let mut group = |name: &str| match response.remove(name) {
        Some(Value::Array(items)) => decode_records(items).0,
        _ => Vec::new(),
    };

    Ok(SuggestionGroups {
        airports: group("airports"),
        airports_by_cities: group("airports_by_cities"),
        airports_by_countries: group("airports_by_countries"),
    })
}

/// Check the `/airports` envelope and return the first entry, if any
pub fn parse_airports(body: &[u8]) -> Result<Option<AirportInfo>, TowerError> {
    let Value::Array(items) = envelope_response(body)? else {
        return Err(TowerError::Format("`response` is not an array".to_string()));
    };

    let (airports, _) = decode_records::<AirportInfo>(items);
    Ok(airports.into_iter().next())
}
