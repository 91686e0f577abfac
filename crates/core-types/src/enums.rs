use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A named trailing calendar window.
///
/// Parsing never fails: any token that is not one of the named windows is
/// treated as `Max`, which leaves a series untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Window {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    ThreeYears,
    FiveYears,
    Max,
}

impl Window {
    pub const ALL: [Window; 7] = [
        Window::OneMonth,
        Window::ThreeMonths,
        Window::SixMonths,
        Window::OneYear,
        Window::ThreeYears,
        Window::FiveYears,
        Window::Max,
    ];

    /// Maps a token such as `"3M"` to a window. Unknown tokens map to `Max`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "1M" => Window::OneMonth,
            "3M" => Window::ThreeMonths,
            "6M" => Window::SixMonths,
            "1Y" => Window::OneYear,
            "3Y" => Window::ThreeYears,
            "5Y" => Window::FiveYears,
            _ => Window::Max,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Window::OneMonth => "1M",
            Window::ThreeMonths => "3M",
            Window::SixMonths => "6M",
            Window::OneYear => "1Y",
            Window::ThreeYears => "3Y",
            Window::FiveYears => "5Y",
            Window::Max => "Max",
        }
    }

    /// The calendar length of the window in months, `None` for `Max`.
    pub fn months(&self) -> Option<u32> {
        match self {
            Window::OneMonth => Some(1),
            Window::ThreeMonths => Some(3),
            Window::SixMonths => Some(6),
            Window::OneYear => Some(12),
            Window::ThreeYears => Some(36),
            Window::FiveYears => Some(60),
            Window::Max => None,
        }
    }

    /// The first calendar day included by this window when the series ends on `end`.
    ///
    /// The day of month is kept while the month steps back. A day past the end
    /// of the target month rolls forward into the next one, so 31 March minus
    /// one month is 3 March and 29 February minus a year is 1 March.
    pub fn cutoff(&self, end: NaiveDate) -> Option<NaiveDate> {
        let months = i32::try_from(self.months()?).ok()?;
        let index = end.year() * 12 + end.month0() as i32 - months;
        let (year, month0) = (index.div_euclid(12), index.rem_euclid(12) as u32);
        let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
        first.checked_add_days(Days::new(u64::from(end.day0())))
    }
}

impl FromStr for Window {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Window::from_token(s))
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for Window {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for Window {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Window::from_token(&token))
    }
}
