use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::process::utils::clean_str;

/// Timestamp layouts, tried before the date-only ones so a trailing time
/// never makes a date format fail.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

/// Month-first wins for slash dates, matching how US retail exports are written.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d/%m/%Y", "%d.%m.%Y", "%d-%b-%Y",
    "%d %b %Y", "%b %d, %Y", "%B %d, %Y", "%Y%m%d",
];

/// Permissive Order Date parser. A value that fits no format is `None`,
/// never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParser {
    formats: Vec<String>,
}

impl Default for DateParser {
    fn default() -> Self {
        let formats = DATETIME_FORMATS
            .iter()
            .chain(DATE_FORMATS)
            .map(|f| f.to_string())
            .collect();
        Self { formats }
    }
}

impl DateParser {
    /// Use only `formats` (chrono strftime syntax), in order.
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let s = clean_str(raw);
        if s.is_empty() {
            return None;
        }
        for fmt in &self.formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&s, fmt) {
                return Some(dt.date());
            }
            if let Ok(d) = NaiveDate::parse_from_str(&s, fmt) {
                return Some(d);
            }
        }
        DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.date_naive())
    }
}

/// Days since 1970-01-01, the Arrow `Date32` representation.
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

pub fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::default().checked_add_signed(chrono::Duration::days(days as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_layouts() {
        let p = DateParser::default();
        assert_eq!(p.parse("11/8/2016"), Some(ymd(2016, 11, 8)));
        assert_eq!(p.parse("2016-11-08"), Some(ymd(2016, 11, 8)));
        assert_eq!(p.parse("2016/11/08 13:45:00"), Some(ymd(2016, 11, 8)));
        assert_eq!(p.parse("\"2016-11-08 00:00:00\""), Some(ymd(2016, 11, 8)));
        assert_eq!(p.parse("2016-11-08T10:00:00+02:00"), Some(ymd(2016, 11, 8)));
        assert_eq!(p.parse("8-Nov-2016"), Some(ymd(2016, 11, 8)));
        assert_eq!(p.parse("25/12/2016"), Some(ymd(2016, 12, 25)));
    }

    #[test]
    fn garbage_is_none() {
        let p = DateParser::default();
        assert_eq!(p.parse(""), None);
        assert_eq!(p.parse("not a date"), None);
        assert_eq!(p.parse("13/45/2016"), None);
    }

    #[test]
    fn custom_formats_restrict_parsing() {
        let p = DateParser::with_formats(["%d.%m.%Y"]);
        assert_eq!(p.parse("08.11.2016"), Some(ymd(2016, 11, 8)));
        assert_eq!(p.parse("2016-11-08"), None);
    }

    #[test]
    fn epoch_days_round_trip() {
        assert_eq!(to_epoch_days(ymd(1970, 1, 2)), 1);
        assert_eq!(from_epoch_days(to_epoch_days(ymd(2017, 3, 1))), Some(ymd(2017, 3, 1)));
    }
}
