//! Location records and their validation from untyped JSON.
//!
//! The location endpoint is loosely typed: coordinates arrive as numbers or
//! numeric strings, zip codes sometimes as numbers, machine counts as either.
//! Everything is coerced here so the rest of the crate only sees
//! [`LocationRecord`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::geo::Coordinate;

/// One vending location admitted into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub name: String,
    pub name_sub: Option<String>,
    pub city: String,
    pub zipcode: String,
    pub address: String,
    pub country: String,
    pub coordinate: Coordinate,
    pub machine_count: u32,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub opening_hours: OpeningHours,
    /// Raw timestamp string as delivered; see [`LocationRecord::last_updated_at`].
    pub last_updated: Option<String>,
}

/// Why a raw record was not admitted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectReason {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("missing coordinate field `{field}`")]
    MissingCoordinate { field: &'static str },
    #[error("coordinate field `{field}` is not a finite number: {raw}")]
    InvalidCoordinate { field: &'static str, raw: String },
}

impl LocationRecord {
    /// Validate one raw record.
    ///
    /// Only the coordinates decide admission. A missing name becomes an empty
    /// string rather than a rejection.
    ///
    /// # Errors
    ///
    /// Returns a [`RejectReason`] when the value is not an object or either
    /// coordinate is absent or does not parse to a finite number.
    pub fn from_raw(raw: &Value) -> Result<Self, RejectReason> {
        let obj = raw.as_object().ok_or(RejectReason::NotAnObject)?;

        let lat = coordinate_field(raw, "lat", "latitude")?;
        let lon = coordinate_field(raw, "lon", "longitude")?;
        let coordinate = Coordinate { lat, lon };

        let text = |key: &str| obj.get(key).and_then(json_text);

        let from = text("working_from");
        let till = text("working_till");

        Ok(Self {
            name: text("name").unwrap_or_default(),
            name_sub: text("nameSub"),
            city: text("city").unwrap_or_default(),
            zipcode: text("zipcode").unwrap_or_default(),
            address: text("address").unwrap_or_default(),
            country: text("country").unwrap_or_default(),
            coordinate,
            machine_count: obj.get("machines").map_or(0, json_count),
            phone: text("phone"),
            email: text("email"),
            opening_hours: OpeningHours::parse(from.as_deref(), till.as_deref()),
            last_updated: text("last_updated").or_else(|| text("lastUpdated")),
        })
    }

    /// Parse [`Self::last_updated`] as RFC 3339, `YYYY-MM-DD HH:MM:SS` or a
    /// bare date.
    #[must_use]
    pub fn last_updated_at(&self) -> Option<NaiveDateTime> {
        let raw = self.last_updated.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

fn coordinate_field(
    raw: &Value,
    field: &'static str,
    alias: &'static str,
) -> Result<f64, RejectReason> {
    let value = raw
        .get(field)
        .or_else(|| raw.get(alias))
        .filter(|v| !v.is_null())
        .ok_or(RejectReason::MissingCoordinate { field })?;

    let parsed = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()));

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(RejectReason::InvalidCoordinate {
            field,
            raw: value.to_string(),
        }),
    }
}

/// Trimmed, non-empty text from a string or number value.
fn json_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn json_count(value: &Value) -> u32 {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningHours {
    AlwaysOpen,
    Range { from: NaiveTime, till: NaiveTime },
    Unknown,
}

impl OpeningHours {
    /// Interpret the raw `working_from` / `working_till` pair.
    ///
    /// `HH:MM:SS` values are shortened to `HH:MM`. `00:00` to `23:59`, `24:00`
    /// or `00:00` counts as always open, as does `24/7` in either field.
    #[must_use]
    pub fn parse(from: Option<&str>, till: Option<&str>) -> Self {
        let from = from.map(str::trim).unwrap_or_default();
        let till = till.map(str::trim).unwrap_or_default();

        if from.eq_ignore_ascii_case("24/7") || till.eq_ignore_ascii_case("24/7") {
            return Self::AlwaysOpen;
        }

        let from = shorten_time(from);
        let till = shorten_time(till);

        if from == "00:00" && matches!(till, "23:59" | "24:00" | "00:00") {
            return Self::AlwaysOpen;
        }

        let parse = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").ok();
        match (parse(from), parse(till)) {
            (Some(from), Some(till)) => Self::Range { from, till },
            _ => Self::Unknown,
        }
    }
}

fn shorten_time(time: &str) -> &str {
    if time.len() == 8 {
        time.get(..5).unwrap_or(time)
    } else {
        time
    }
}

impl std::fmt::Display for OpeningHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpeningHours::AlwaysOpen => write!(f, "24/7"),
            OpeningHours::Range { from, till } => {
                write!(f, "{} - {}", from.format("%H:%M"), till.format("%H:%M"))
            }
            OpeningHours::Unknown => write!(f, "no opening hours available"),
        }
    }
}
