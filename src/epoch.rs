//! Decimal year conversion and date parsing.
use hifitime::{Epoch, Unit};

use crate::error::Error;

/// Date format used whenever a plain string is given.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Proleptic Gregorian leap year rule.
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_year(year: i32) -> f64 {
    if is_leap_year(year) {
        366.0
    } else {
        365.0
    }
}

/// Converts a decimal year (e.g. 2020.5) to UTC [Epoch].
/// The fractional part is scaled by the exact day count of that
/// calendar year and rounded to the nearest whole second.
pub fn decimal_year_to_epoch(decimal_year: f64) -> Epoch {
    let year = decimal_year.floor() as i32;
    let seconds = ((decimal_year - year as f64) * days_in_year(year) * SECONDS_PER_DAY).round();
    Epoch::from_gregorian_utc_at_midnight(year, 1, 1) + seconds * Unit::Second
}

/// Converts a UTC [Epoch] to a decimal year.
pub fn epoch_to_decimal_year(t: Epoch) -> f64 {
    let (year, ..) = t.to_gregorian_utc();
    let jan_1st = Epoch::from_gregorian_utc_at_midnight(year, 1, 1);
    year as f64 + (t - jan_1st).to_seconds() / (days_in_year(year) * SECONDS_PER_DAY)
}

/// A date given either as an already parsed [Epoch], or as text with
/// an explicit or [DEFAULT_DATE_FORMAT] format. All window operations
/// accept any of the three forms.
#[derive(Debug, Clone, Copy)]
pub enum DateSpec<'a> {
    /// Already parsed [Epoch]
    Parsed(Epoch),
    /// Text in [DEFAULT_DATE_FORMAT]
    Text(&'a str),
    /// (text, format) pair
    TextFormat(&'a str, &'a str),
}

impl From<Epoch> for DateSpec<'_> {
    fn from(t: Epoch) -> Self {
        Self::Parsed(t)
    }
}

impl<'a> From<&'a str> for DateSpec<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<(&'a str, &'a str)> for DateSpec<'a> {
    fn from((s, format): (&'a str, &'a str)) -> Self {
        Self::TextFormat(s, format)
    }
}

impl DateSpec<'_> {
    /// Resolves self to an [Epoch].
    pub fn resolve(&self) -> Result<Epoch, Error> {
        match self {
            Self::Parsed(t) => Ok(*t),
            Self::Text(s) => parse_date(s, DEFAULT_DATE_FORMAT),
            Self::TextFormat(s, format) => parse_date(s, format),
        }
    }
}

fn parse_date(s: &str, format: &str) -> Result<Epoch, Error> {
    Epoch::from_format_str(s, format).map_err(|_| Error::DateParsing(s.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2000, true)]
    #[case(2020, true)]
    #[case(2021, false)]
    #[case(1900, false)]
    #[case(2100, false)]
    fn test_leap_years(#[case] year: i32, #[case] leap: bool) {
        assert_eq!(is_leap_year(year), leap);
    }

    #[test]
    fn test_decimal_year_to_epoch() {
        assert_eq!(
            decimal_year_to_epoch(2020.0),
            Epoch::from_gregorian_utc_at_midnight(2020, 1, 1),
        );
        // 2020 is leap: 0.5 * 366 days = 183 days
        assert_eq!(
            decimal_year_to_epoch(2020.5),
            Epoch::from_gregorian_utc_at_midnight(2020, 7, 2),
        );
        // 2021 is not: 0.5 * 365 days = 182 days 12 h
        assert_eq!(
            decimal_year_to_epoch(2021.5),
            Epoch::from_gregorian_utc(2021, 7, 2, 12, 0, 0, 0),
        );
    }

    #[rstest]
    #[case(2019.25)]
    #[case(2020.123456)]
    #[case(2024.9999)]
    fn test_decimal_year_roundtrip(#[case] decimal_year: f64) {
        let roundtrip = epoch_to_decimal_year(decimal_year_to_epoch(decimal_year));
        // rounded to 1 s on the way in
        assert!((roundtrip - decimal_year).abs() < 1.0 / (365.0 * SECONDS_PER_DAY));
    }

    #[test]
    fn test_date_spec() {
        let t = Epoch::from_gregorian_utc_at_midnight(2020, 3, 15);
        assert_eq!(DateSpec::from(t).resolve().unwrap(), t);
        assert_eq!(DateSpec::from("2020-03-15").resolve().unwrap(), t);
        assert_eq!(DateSpec::from(("15/03/2020", "%d/%m/%Y")).resolve().unwrap(), t);
        assert!(DateSpec::from("15/03/2020").resolve().is_err());
    }
}
