use chrono::DateTime;
use chrono::Days;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{0}' is not a recognised date")]
pub struct InvalidDate(pub String);

/// Parses the date encodings found in the input tables. Any time of day is
/// discarded.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate>
{
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Some(date_time.date_naive());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|date_time| date_time.date())
}

/// Anything a caller may hand in as a window boundary.
pub trait IntoCalendarDate
{
    fn into_calendar_date(self) -> Result<NaiveDate, InvalidDate>;
}

impl IntoCalendarDate for NaiveDate
{
    fn into_calendar_date(self) -> Result<NaiveDate, InvalidDate>
    {
        Ok(self)
    }
}

impl IntoCalendarDate for NaiveDateTime
{
    fn into_calendar_date(self) -> Result<NaiveDate, InvalidDate>
    {
        Ok(self.date())
    }
}

impl<Tz: TimeZone> IntoCalendarDate for DateTime<Tz>
{
    fn into_calendar_date(self) -> Result<NaiveDate, InvalidDate>
    {
        Ok(self.date_naive())
    }
}

impl IntoCalendarDate for &str
{
    fn into_calendar_date(self) -> Result<NaiveDate, InvalidDate>
    {
        parse_calendar_date(self).ok_or_else(|| InvalidDate(self.to_string()))
    }
}

impl IntoCalendarDate for String
{
    fn into_calendar_date(self) -> Result<NaiveDate, InvalidDate>
    {
        self.as_str().into_calendar_date()
    }
}

impl IntoCalendarDate for &String
{
    fn into_calendar_date(self) -> Result<NaiveDate, InvalidDate>
    {
        self.as_str().into_calendar_date()
    }
}

/// Inclusive range of calendar days requested for an allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow
{
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow
{
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self
    {
        Self { start, end }
    }

    /// Partial overlap counts. Touching on a single day counts.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool
    {
        !(end < self.start || start > self.end)
    }

    /// Every day from `start` through `end`. Empty when the window is
    /// inverted.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_
    {
        std::iter::successors(Some(self.start), |day| day.checked_add_days(Days::new(1)))
            .take_while(|day| *day <= self.end)
    }
}
