use crate::error::{DashboardError, Result};
use chrono::{Datelike, Local, NaiveDate};

/// First year the dashboard can be browsed at.
pub const START_YEAR: i32 = 2018;

const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

// Intl's French currency output uses a narrow no-break space between digit
// groups and a no-break space before the symbol.
const GROUP_SEPARATOR: char = '\u{202F}';
const SYMBOL_SEPARATOR: char = '\u{00A0}';

pub fn current_year() -> i32 {
    Local::now().year()
}

pub fn validate_quarter(quarter: u32) -> Result<()> {
    if !(1..=4).contains(&quarter) {
        return Err(DashboardError::InvalidQuarter(quarter));
    }
    Ok(())
}

/// Returns the half-open `[start, end)` window of a quarter.
///
/// Quarters are 1-indexed. The window of Q4 ends on January 1st of the
/// following year.
pub fn quarter_date_range(quarter: u32, year: i32) -> Result<(NaiveDate, NaiveDate)> {
    validate_quarter(quarter)?;

    let start_month = (quarter - 1) * 3 + 1;
    let start = NaiveDate::from_ymd_opt(year, start_month, 1).ok_or_else(|| {
        DashboardError::DateError(format!("Quarter {} of {} is out of range", quarter, year))
    })?;

    let (end_year, end_month) = if quarter == 4 {
        (year + 1, 1)
    } else {
        (year, quarter * 3 + 1)
    };
    let end = NaiveDate::from_ymd_opt(end_year, end_month, 1).ok_or_else(|| {
        DashboardError::DateError(format!("Quarter {} of {} is out of range", quarter, year))
    })?;

    Ok((start, end))
}

pub fn is_in_range(date: Option<NaiveDate>, start: NaiveDate, end: NaiveDate) -> bool {
    date.is_some_and(|d| start <= d && d < end)
}

/// Checks whether `date` falls inside the given quarter. `year` defaults to
/// the current year. An invalid quarter contains no date.
pub fn is_in_quarter(date: Option<NaiveDate>, quarter: u32, year: Option<i32>) -> bool {
    let year = year.unwrap_or_else(current_year);
    quarter_date_range(quarter, year)
        .map(|(start, end)| is_in_range(date, start, end))
        .unwrap_or(false)
}

pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Years offered for browsing, newest first.
pub fn years_to_fetch(current_year: i32) -> Vec<i32> {
    (START_YEAR..=current_year).rev().collect()
}

/// French month name for a 0-based month index.
pub fn month_name(month0: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month0 as usize).copied()
}

pub fn month_name_short(month0: u32) -> Option<String> {
    month_name(month0).map(|name| name.chars().take(4).collect())
}

/// Formats a date as `05 Mars 2022`. A missing date renders as an empty string.
pub fn format_date_fr(date: Option<NaiveDate>) -> String {
    let Some(date) = date else {
        return String::new();
    };

    format!(
        "{:02} {} {}",
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year()
    )
}

/// Formats an amount in euros the French way, with no decimals for whole
/// amounts and at most two otherwise (`1 234 €`, `1 234,5 €`).
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let fraction = cents % 100;

    let mut out = String::new();
    if amount < 0.0 && cents > 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(units));

    if fraction > 0 {
        out.push(',');
        let digits = format!("{:02}", fraction);
        out.push_str(digits.trim_end_matches('0'));
    }

    out.push(SYMBOL_SEPARATOR);
    out.push('€');
    out
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }

    grouped
}

/// Parses a record store date: either a plain `YYYY-MM-DD` or an RFC 3339
/// date-time, in which case only the calendar date is kept.
pub fn parse_store_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    chrono::DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| {
            DashboardError::DateError(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD or an RFC 3339 date-time",
                raw
            ))
        })
}
