//! Display-ready time fields

use chrono::{DateTime, Datelike, Timelike};
use core::fmt::Write;
use heapless::String;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Wall-clock time decomposed into formatted display fields
///
/// Built once per distinct epoch second and reused until the second
/// changes, so string formatting does not run every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeFields {
    /// Local epoch seconds these fields were derived from
    pub epoch: i64,
    /// "00".."23"
    pub hour: String<2>,
    /// "00".."59"
    pub minute: String<2>,
    /// "00".."59"
    pub second: String<2>,
    /// "01".."31"
    pub day: String<2>,
    /// "Jan".."Dec"
    pub month: String<3>,
    /// "1970".."9999"
    pub year: String<4>,
    /// "Monday".."Sunday"
    pub weekday_name: String<9>,
}

impl TimeFields {
    /// Decompose local epoch seconds
    ///
    /// Returns `None` for instants outside years 0..=9999.
    pub fn from_epoch(epoch: i64) -> Option<Self> {
        let dt = DateTime::from_timestamp(epoch, 0)?.naive_utc();
        if !(0..=9999).contains(&dt.year()) {
            return None;
        }

        let mut fields = Self {
            epoch,
            hour: String::new(),
            minute: String::new(),
            second: String::new(),
            day: String::new(),
            month: String::new(),
            year: String::new(),
            weekday_name: String::new(),
        };

        write!(fields.hour, "{:02}", dt.hour()).ok()?;
        write!(fields.minute, "{:02}", dt.minute()).ok()?;
        write!(fields.second, "{:02}", dt.second()).ok()?;
        write!(fields.day, "{:02}", dt.day()).ok()?;
        write!(fields.year, "{:04}", dt.year()).ok()?;
        fields.month.push_str(MONTHS[dt.month0() as usize]).ok()?;
        fields
            .weekday_name
            .push_str(WEEKDAYS[dt.weekday().num_days_from_monday() as usize])
            .ok()?;

        Some(fields)
    }

    /// "HH:MM", 24-hour
    pub fn clock_text(&self) -> String<5> {
        let mut text = String::new();
        let _ = write!(text, "{}:{}", self.hour, self.minute);
        text
    }

    /// "DD Mon 'YY"
    pub fn date_text(&self) -> String<10> {
        let mut text = String::new();
        let yy = self.year.get(2..).unwrap_or("");
        let _ = write!(text, "{} {} '{}", self.day, self.month, yy);
        text
    }

    /// First three letters of the weekday, upper-cased ("MON")
    pub fn weekday_badge(&self) -> String<3> {
        let mut badge = String::new();
        for c in self.weekday_name.chars().take(3) {
            let _ = badge.push(c.to_ascii_uppercase());
        }
        badge
    }
}
