mod analytics;
mod coords;
mod filter;
mod style;

pub use analytics::{aggregate, AnalyticsSnapshot, CategoryCount, DayCount, RegionCount};
pub use coords::extract_coordinates;
pub use filter::{filter_reports, FilterCriteria};
pub use style::{chart_color, resolve_style, DisasterStyle, Rgb, Rgba, LEGEND};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Image reference shown when a report was submitted without a photo
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

/// A single disaster observation submitted by a field user.
/// Records arrive as a backend JSON export; `location` is free text that
/// may or may not embed coordinates, and `prediction` is the classifier's
/// category label (lower case with underscores, but not guaranteed).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub prediction: String,
    pub note: String,
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "de_created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Report {
    /// Image reference for display; absent images degrade to a placeholder
    pub fn image_url(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Category label for list display: underscores become spaces,
    /// first character upper-cased
    pub fn display_category(&self) -> String {
        capitalize(&self.prediction.replace('_', " "))
    }
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a report timestamp. The upstream pipeline is loosely validated,
/// so accept RFC 3339 as well as bare dates and space-separated datetimes
/// (interpreted as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    None
}

fn de_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unparseable createdAt {raw:?}")))
}

#[cfg(test)]
pub(crate) fn sample(id: &str, prediction: &str, note: &str, location: &str, created_at: &str) -> Report {
    Report {
        id: id.to_string(),
        prediction: prediction.to_string(),
        note: note.to_string(),
        location: location.to_string(),
        image_url: None,
        created_at: parse_timestamp(created_at).expect("valid test timestamp"),
        confidence: None,
    }
}
