use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01, for Arrow `Date32` encoding.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// One accepted spelling of a date cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateFormat {
    pattern: &'static str,
    with_time: bool,
}

const fn date(pattern: &'static str) -> DateFormat {
    DateFormat {
        pattern,
        with_time: false,
    }
}

const fn datetime(pattern: &'static str) -> DateFormat {
    DateFormat {
        pattern,
        with_time: true,
    }
}

/// Candidate formats in priority order. Day-first spellings come before any
/// month-first one so `"05/03/2024"` is 5 March, and `%y` is tried before `%Y`
/// because chrono's `%Y` would happily read `"24"` as the year 24.
const FORMATS: &[DateFormat] = &[
    datetime("%d/%m/%Y %H:%M:%S"),
    datetime("%d/%m/%Y %H:%M"),
    date("%d/%m/%y"),
    date("%d/%m/%Y"),
    date("%d-%m-%y"),
    date("%d-%m-%Y"),
    datetime("%d-%m-%Y %H:%M:%S"),
    date("%d.%m.%Y"),
    datetime("%Y-%m-%d %H:%M:%S"),
    datetime("%Y-%m-%dT%H:%M:%S"),
    date("%Y-%m-%d"),
    date("%Y/%m/%d"),
    date("%d %b %Y"),
    date("%d %B %Y"),
    date("%d-%b-%Y"),
    date("%b %d, %Y"),
    date("%B %d, %Y"),
    datetime("%m/%d/%Y %H:%M:%S"),
    date("%m/%d/%Y"),
];

impl DateFormat {
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Parse `s` with exactly this format; a time component is dropped.
    pub fn parse(&self, s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if self.with_time {
            NaiveDateTime::parse_from_str(s, self.pattern)
                .ok()
                .map(|dt| dt.date())
        } else {
            NaiveDate::parse_from_str(s, self.pattern).ok()
        }
    }
}

/// Try every known format, day-first before month-first.
pub fn parse_day_first(s: &str) -> Option<NaiveDate> {
    FORMATS.iter().find_map(|f| f.parse(s))
}

/// Pick the column's format from the first non-empty value that any known
/// format accepts.
pub fn infer_format<'a, I>(values: I) -> Option<DateFormat>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .find_map(|v| FORMATS.iter().copied().find(|f| f.parse(v).is_some()))
}

/// Parse a whole column under one format policy: the inferred format applies
/// to every value and misses become `None`. Without an inferable format every
/// value is tried on its own.
pub fn parse_column(values: &[&str]) -> Vec<Option<NaiveDate>> {
    match infer_format(values.iter().copied()) {
        Some(fmt) => values.iter().map(|v| fmt.parse(v)).collect(),
        None => values.iter().map(|v| parse_day_first(v)).collect(),
    }
}

/// `NaiveDate` → days since 1970-01-01 (Arrow `Date32`).
pub fn to_date32(d: NaiveDate) -> i32 {
    d.num_days_from_ce() - UNIX_EPOCH_FROM_CE
}

/// Days since 1970-01-01 (Arrow `Date32`) → `NaiveDate`.
pub fn from_date32(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_FROM_CE)?)
}
