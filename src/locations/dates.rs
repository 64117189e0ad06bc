use chrono::{Local, NaiveDate};
use juniper::GraphQLObject;

/// How many days ahead the site publishes menus, today included.
pub const PUBLISHED_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDate {
    /// `MM%2fDD%2fYYYY`, the form the site expects in `dtdate`.
    pub formatted: String,
    /// `MM/DD/YYYY`
    pub display: String,
    pub day_name: String,
}

impl From<NaiveDate> for AvailableDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            formatted: escape_date(date),
            display: date.format("%m/%d/%Y").to_string(),
            day_name: date.format("%A").to_string(),
        }
    }
}

/// The current date in the server's local time zone, which is the zone the
/// dining halls publish menus in.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn escape_date(date: NaiveDate) -> String {
    date.format("%m%%2f%d%%2f%Y").to_string()
}

pub fn unescape_date(date: &str) -> String {
    date.replace("%2f", "/").replace("%2F", "/")
}

pub fn date_iter(start: NaiveDate, count: i64) -> impl Iterator<Item = NaiveDate> {
    (0..count).map(move |x| start + chrono::Duration::days(x))
}

pub fn available_dates(today: NaiveDate) -> Vec<AvailableDate> {
    date_iter(today, PUBLISHED_DAYS).map(AvailableDate::from).collect()
}
