//! Human-readable relative times ("3 hours ago").
//!
//! A delta in milliseconds is bucketed into the largest unit it reaches;
//! months are four weeks and years twelve such months.

use std::time::Duration;

use crate::messages::MessageCatalog;

pub const SECOND: i64 = 1000;
pub const MINUTE: i64 = 60 * SECOND;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;
pub const WEEK: i64 = 7 * DAY;
pub const MONTH: i64 = 4 * WEEK;
pub const YEAR: i64 = 12 * MONTH;

/// Wording for each bucket, given the whole number of units elapsed.
pub trait DeltaMessages {
    /// Called for deltas under a minute; `seconds` may be zero.
    fn seconds_ago(&self, seconds: i64) -> String;
    fn minutes_ago(&self, minutes: i64) -> String;
    fn hours_ago(&self, hours: i64) -> String;
    fn days_ago(&self, days: i64) -> String;
    fn weeks_ago(&self, weeks: i64) -> String;
    fn months_ago(&self, months: i64) -> String;
    fn years_ago(&self, years: i64) -> String;
}

/// Built-in English wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnglishMessages;

fn ago(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("One {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

impl DeltaMessages for EnglishMessages {
    fn seconds_ago(&self, seconds: i64) -> String {
        match seconds {
            0 => "Just now".to_string(),
            1 => "One second ago".to_string(),
            _ => "Less than a minute ago".to_string(),
        }
    }
    fn minutes_ago(&self, minutes: i64) -> String {
        ago(minutes, "minute")
    }
    fn hours_ago(&self, hours: i64) -> String {
        ago(hours, "hour")
    }
    fn days_ago(&self, days: i64) -> String {
        ago(days, "day")
    }
    fn weeks_ago(&self, weeks: i64) -> String {
        ago(weeks, "week")
    }
    fn months_ago(&self, months: i64) -> String {
        ago(months, "month")
    }
    fn years_ago(&self, years: i64) -> String {
        ago(years, "year")
    }
}

/// Wording looked up in a [`MessageCatalog`] under the `delta.*` keys.
///
/// ```
/// use strparse_core::delta::{CatalogMessages, DeltaFormatter, HOUR};
/// use strparse_core::messages::MessageCatalog;
///
/// let mut catalog = MessageCatalog::with_defaults();
/// catalog.insert("fr", "delta.hours", "il y a {0} heures");
/// let formatter = DeltaFormatter::with_messages(CatalogMessages::new(&catalog, "fr-FR"));
/// assert_eq!(formatter.format(5 * HOUR).as_deref(), Some("il y a 5 heures"));
/// assert_eq!(formatter.format(0).as_deref(), Some("Just now"));
/// ```
#[derive(Debug, Clone)]
pub struct CatalogMessages<'c> {
    catalog: &'c MessageCatalog,
    locale: String,
}

impl<'c> CatalogMessages<'c> {
    pub fn new(catalog: &'c MessageCatalog, locale: impl Into<String>) -> Self {
        Self { catalog, locale: locale.into() }
    }

    fn counted(&self, count: i64, one: &str, many: &str) -> String {
        let key = if count == 1 { one } else { many };
        self.catalog.message(&self.locale, key, &[&count])
    }
}

impl DeltaMessages for CatalogMessages<'_> {
    fn seconds_ago(&self, seconds: i64) -> String {
        let key = match seconds {
            0 => "delta.just_now",
            1 => "delta.one_second",
            _ => "delta.seconds",
        };
        self.catalog.message(&self.locale, key, &[&seconds])
    }
    fn minutes_ago(&self, minutes: i64) -> String {
        self.counted(minutes, "delta.one_minute", "delta.minutes")
    }
    fn hours_ago(&self, hours: i64) -> String {
        self.counted(hours, "delta.one_hour", "delta.hours")
    }
    fn days_ago(&self, days: i64) -> String {
        self.counted(days, "delta.one_day", "delta.days")
    }
    fn weeks_ago(&self, weeks: i64) -> String {
        self.counted(weeks, "delta.one_week", "delta.weeks")
    }
    fn months_ago(&self, months: i64) -> String {
        self.counted(months, "delta.one_month", "delta.months")
    }
    fn years_ago(&self, years: i64) -> String {
        self.counted(years, "delta.one_year", "delta.years")
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeltaFormatter<M = EnglishMessages> {
    messages: M,
}

impl DeltaFormatter<EnglishMessages> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: DeltaMessages> DeltaFormatter<M> {
    pub fn with_messages(messages: M) -> Self {
        Self { messages }
    }

    /// Describe a delta of `millis` milliseconds. Negative deltas (times in
    /// the future) have no description.
    pub fn format(&self, millis: i64) -> Option<String> {
        let m = &self.messages;
        let text = match millis {
            i64::MIN..=-1 => return None,
            d if d < MINUTE => m.seconds_ago(d / SECOND),
            d if d < HOUR => m.minutes_ago(d / MINUTE),
            d if d < DAY => m.hours_ago(d / HOUR),
            d if d < WEEK => m.days_ago(d / DAY),
            d if d < MONTH => m.weeks_ago(d / WEEK),
            d if d < YEAR => m.months_ago(d / MONTH),
            d => m.years_ago(d / YEAR),
        };
        Some(text)
    }

    /// Describe an elapsed [`Duration`].
    pub fn format_duration(&self, elapsed: Duration) -> String {
        let millis = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
        self.format(millis).unwrap_or_default()
    }
}
