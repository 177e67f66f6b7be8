//! Day/night determination from the bundled sunrise/sunset table.
//!
//! The table is static data: one entry per sunrise-table location, one
//! `{dataTime, sunrise, sunset}` row per calendar date it covers. The
//! calculator is a pure function over the table and a wall-clock instant;
//! anything it cannot answer (unknown location, uncovered date) is `None`
//! rather than an error.

use std::sync::OnceLock;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

/// Whether an instant falls between sunrise and sunset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    Day,
    Night,
}

impl Moment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Moment::Day => "day",
            Moment::Night => "night",
        }
    }
}

impl std::fmt::Display for Moment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sunrise and sunset for one calendar date, as local-time strings.
#[derive(Debug, Clone, Deserialize)]
pub struct SunTimes {
    #[serde(rename = "dataTime")]
    pub data_time: NaiveDate,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SunriseEntry {
    #[serde(rename = "locationName")]
    pub location_name: String,
    pub time: Vec<SunTimes>,
}

/// The full read-only table. At most one row per date per location.
#[derive(Debug, Clone)]
pub struct SunriseTable {
    entries: Vec<SunriseEntry>,
}

impl SunriseTable {
    /// Parse a table from its JSON representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// The table bundled with the crate, parsed once on first use.
    pub fn bundled() -> &'static SunriseTable {
        static TABLE: OnceLock<SunriseTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            SunriseTable::from_json(include_str!("../data/sunrise-sunset.json"))
                .expect("bundled sunrise table is valid JSON")
        })
    }

    /// Day/night at `now` for a sunrise-table location.
    ///
    /// `None` when the location is not in the table, the table has no row
    /// for `now`'s calendar date, or a row's time strings do not parse.
    pub fn moment_at(&self, sunrise_city_name: &str, now: NaiveDateTime) -> Option<Moment> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.location_name == sunrise_city_name)?;

        let today = now.date();
        let row = entry.time.iter().find(|t| t.data_time == today)?;

        let sunrise = today.and_time(parse_clock(&row.sunrise)?);
        let sunset = today.and_time(parse_clock(&row.sunset)?);

        if sunrise <= now && now <= sunset {
            Some(Moment::Day)
        } else {
            Some(Moment::Night)
        }
    }
}

/// Day/night right now, against the bundled table.
///
/// `now` and the table rows are both treated as implicit local time; the
/// bundled data is Taiwan-local.
pub fn determine_moment(sunrise_city_name: &str) -> Option<Moment> {
    SunriseTable::bundled().moment_at(sunrise_city_name, Local::now().naive_local())
}

fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}
