use crate::report::{capitalize, Report};
use chrono::{DateTime, Local, NaiveDate, Utc};

pub const NO_DATA: &str = "No Data";
pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_REGION: &str = "Unknown Region";
pub const TOP_REGION_LIMIT: usize = 5;

/// One slice of the category distribution. The grouping key is the
/// lower-cased category so "Fire" and "fire" count together; the display
/// label capitalizes only at presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub key: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn label(&self) -> String {
        capitalize(&self.key)
    }
}

/// One calendar-day bucket of the report time series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u64,
}

impl DayCount {
    /// Short numeric date label for chart axes
    pub fn label(&self) -> String {
        self.date.format("%-m/%-d/%Y").to_string()
    }
}

/// One entry of the top-affected-regions ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCount {
    pub region: String,
    pub count: u64,
}

/// Aggregate view of a report collection. Purely derived: recomputing
/// from the same collection yields the same snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsSnapshot {
    pub total: usize,
    pub category_counts: Vec<CategoryCount>,
    pub series: Vec<DayCount>,
    pub most_common: Option<CategoryCount>,
    pub latest: Option<DateTime<Utc>>,
    pub top_regions: Vec<RegionCount>,
}

impl AnalyticsSnapshot {
    /// Display label of the most common category, or a sentinel when the
    /// collection is empty
    pub fn most_common_label(&self) -> String {
        self.most_common
            .as_ref()
            .map_or_else(|| NOT_AVAILABLE.to_string(), CategoryCount::label)
    }

    /// Local-time display of the most recent report, or a sentinel when
    /// the collection is empty
    pub fn latest_label(&self) -> String {
        self.latest.map_or_else(
            || NO_DATA.to_string(),
            |ts| {
                ts.with_timezone(&Local)
                    .format("%-m/%-d/%Y, %-I:%M:%S %p")
                    .to_string()
            },
        )
    }
}

/// Compute the aggregate snapshot for a report collection.
///
/// Ordering notes: category, day, and region buckets accumulate in
/// first-seen input order (linear find-or-push). The day series is
/// deliberately not re-sorted, so it is chronological only when the
/// input is; rankings sort on count alone (stable), so equal counts
/// keep first-seen order.
pub fn aggregate(reports: &[Report]) -> AnalyticsSnapshot {
    let mut category_counts: Vec<CategoryCount> = Vec::new();
    let mut series: Vec<DayCount> = Vec::new();
    let mut regions: Vec<RegionCount> = Vec::new();
    let mut latest: Option<DateTime<Utc>> = None;

    for report in reports {
        let key = report.prediction.to_lowercase();
        match category_counts.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.count += 1,
            None => category_counts.push(CategoryCount { key, count: 1 }),
        }

        let date = report.created_at.with_timezone(&Local).date_naive();
        match series.iter_mut().find(|e| e.date == date) {
            Some(entry) => entry.count += 1,
            None => series.push(DayCount { date, count: 1 }),
        }

        let region = report.location.split(',').next().unwrap_or("").trim();
        let region = if region.is_empty() { UNKNOWN_REGION } else { region };
        match regions.iter_mut().find(|e| e.region == region) {
            Some(entry) => entry.count += 1,
            None => regions.push(RegionCount {
                region: region.to_string(),
                count: 1,
            }),
        }

        if latest.is_none_or(|ts| report.created_at > ts) {
            latest = Some(report.created_at);
        }
    }

    let most_common = {
        let mut ranked = category_counts.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count)); // stable
        ranked.into_iter().next()
    };

    regions.sort_by(|a, b| b.count.cmp(&a.count)); // stable
    regions.truncate(TOP_REGION_LIMIT);

    AnalyticsSnapshot {
        total: reports.len(),
        category_counts,
        series,
        most_common,
        latest,
        top_regions: regions,
    }
}
