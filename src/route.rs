//! Route parsing
//!
//! Turns free text such as `Москва - Дубай 25.08.2025` into a [`RouteQuery`].
//! The grammar is one anchored pattern: no fuzzy city matching and no
//! calendar validation of the date, only its 2-2-4 digit shape.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static ROUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<origin>[A-Za-zА-Яа-яЁё\s\-]{4,}) - (?P<destination>[A-Za-zА-Яа-яЁё\s\-]{4,}) (?P<day>[0-9]{2})\.(?P<month>[0-9]{2})\.(?P<year>[0-9]{4})$",
    )
    .expect("route pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route text does not match `City1 - City2 DD.MM.YYYY`")]
    InvalidFormat,
}

/// Travel date as typed by the user. Only the digit shape is checked, so
/// `31.02.2025` is accepted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TravelDate {
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl TravelDate {
    /// Calendar date, if the digits name a real one
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
    }
}

impl fmt::Display for TravelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

/// A parsed (origin, destination, date) request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    pub date: TravelDate,
}

/// Parse a route message.
pub fn parse(text: &str) -> Result<RouteQuery, RouteError> {
    let caps = ROUTE_PATTERN
        .captures(text.trim())
        .ok_or(RouteError::InvalidFormat)?;

    // The pattern guarantees ASCII digits of fixed width, so these only
    // fail if the pattern itself changes.
    let number = |name: &str| {
        caps[name]
            .parse::<u16>()
            .map_err(|_| RouteError::InvalidFormat)
    };
    let day = u8::try_from(number("day")?).map_err(|_| RouteError::InvalidFormat)?;
    let month = u8::try_from(number("month")?).map_err(|_| RouteError::InvalidFormat)?;
    let year = number("year")?;

    Ok(RouteQuery {
        origin: caps["origin"].trim().to_string(),
        destination: caps["destination"].trim().to_string(),
        date: TravelDate { day, month, year },
    })
}
