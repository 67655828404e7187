use crate::report::Report;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rayon::prelude::*;

/// User-entered filter state. Empty/absent criteria are always-true
/// predicates; the three predicates compose with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.start_date.is_none() && self.end_date.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A date bound compares against midnight UTC at the start of the named
/// day, matching how the upstream date inputs behave.
fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Apply the criteria to a report collection. The search term matches
/// case-insensitively against either the category or the note; date
/// bounds are inclusive. The filter is stable: survivors keep their
/// input order.
pub fn filter_reports(reports: &[Report], criteria: &FilterCriteria) -> Vec<Report> {
    let needle = criteria.search_term.to_lowercase();
    let start = criteria.start_date.map(midnight_utc);
    let end = criteria.end_date.map(midnight_utc);

    // Collections can be arbitrarily large; rayon keeps input order
    // through the filtered collect.
    reports
        .par_iter()
        .filter(|r| {
            let matches_search = needle.is_empty()
                || r.prediction.to_lowercase().contains(&needle)
                || r.note.to_lowercase().contains(&needle);
            matches_search
                && start.is_none_or(|s| r.created_at >= s)
                && end.is_none_or(|e| r.created_at <= e)
        })
        .cloned()
        .collect()
}
