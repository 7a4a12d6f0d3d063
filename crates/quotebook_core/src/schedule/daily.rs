//! Daily fire-time computation.
//!
//! # Invariants
//! - The scheduler fires at most once per local calendar day.
//! - Changing the time re-arms the scheduler for the current day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static TIME_OF_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})\s*$").expect("valid time-of-day regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Input is not in `HH:MM` form.
    Format(String),
    OutOfRange { hour: u32, minute: u32 },
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(input) => write!(f, "expected time as HH:MM, got `{input}`"),
            Self::OutOfRange { hour, minute } => {
                write!(f, "time {hour:02}:{minute:02} is out of range")
            }
        }
    }
}

impl Error for ScheduleError {}

/// Validated wall-clock time of day, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DailyTime {
    hour: u32,
    minute: u32,
}

impl DailyTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::OutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Parses `H:MM` or `HH:MM` (24-hour clock).
    pub fn parse(input: &str) -> Result<Self, ScheduleError> {
        let captures = TIME_OF_DAY_RE
            .captures(input)
            .ok_or_else(|| ScheduleError::Format(input.to_string()))?;
        let hour = captures[1]
            .parse()
            .map_err(|_| ScheduleError::Format(input.to_string()))?;
        let minute = captures[2]
            .parse()
            .map_err(|_| ScheduleError::Format(input.to_string()))?;
        Self::new(hour, minute)
    }

    pub fn hour(self) -> u32 {
        self.hour
    }

    pub fn minute(self) -> u32 {
        self.minute
    }

    pub fn as_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }

    fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.as_naive_time())
    }
}

impl Default for DailyTime {
    fn default() -> Self {
        Self { hour: 9, minute: 0 }
    }
}

impl Display for DailyTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for DailyTime {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DailyTime> for String {
    fn from(value: DailyTime) -> Self {
        value.to_string()
    }
}

/// Armed / fired-today state machine for one daily notification.
#[derive(Debug, Clone, Default)]
pub struct DailyScheduler {
    time: DailyTime,
    fired_on: Option<NaiveDate>,
}

impl DailyScheduler {
    pub fn new(time: DailyTime) -> Self {
        Self {
            time,
            fired_on: None,
        }
    }

    pub fn time(&self) -> DailyTime {
        self.time
    }

    /// Sets a new daily time and re-arms the scheduler.
    pub fn set_daily_time(&mut self, hour: u32, minute: u32) -> Result<(), ScheduleError> {
        self.time = DailyTime::new(hour, minute)?;
        self.fired_on = None;
        Ok(())
    }

    /// Treats a slot already passed at `now` as spent, so a scheduler
    /// started late waits for tomorrow instead of firing at once.
    pub fn arm_from(&mut self, now: NaiveDateTime) {
        self.fired_on = if now > self.time.on(now.date()) {
            Some(now.date())
        } else {
            None
        };
    }

    pub fn fired_today(&self, now: NaiveDateTime) -> bool {
        self.fired_on == Some(now.date())
    }

    /// Next moment the notification is due, never earlier than `now`.
    pub fn next_fire_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        if self.fired_today(now) {
            return self.time.on(now.date() + Duration::days(1));
        }
        // A missed slot today is still due.
        self.time.on(now.date()).max(now)
    }

    /// Returns `true` once per day, at or after the configured time.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        if self.fired_today(now) || now < self.time.on(now.date()) {
            return false;
        }
        self.fired_on = Some(now.date());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{DailyScheduler, DailyTime, ScheduleError};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn parse_accepts_short_and_padded_hours() {
        assert_eq!(DailyTime::parse("9:05").unwrap(), DailyTime::new(9, 5).unwrap());
        assert_eq!(DailyTime::parse(" 21:30 ").unwrap().to_string(), "21:30");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(DailyTime::parse("nine"), Err(ScheduleError::Format(_))));
        assert!(matches!(DailyTime::parse("9:5"), Err(ScheduleError::Format(_))));
        assert_eq!(
            DailyTime::parse("24:00").unwrap_err(),
            ScheduleError::OutOfRange { hour: 24, minute: 0 }
        );
    }

    #[test]
    fn daily_time_serializes_as_string() {
        let json = serde_json::to_string(&DailyTime::new(7, 15).unwrap()).unwrap();
        assert_eq!(json, "\"07:15\"");
        let decoded: DailyTime = serde_json::from_str("\"7:15\"").unwrap();
        assert_eq!(decoded, DailyTime::new(7, 15).unwrap());
        assert!(serde_json::from_str::<DailyTime>("\"99:99\"").is_err());
    }

    #[test]
    fn poll_fires_once_per_day() {
        let mut scheduler = DailyScheduler::new(DailyTime::new(9, 0).unwrap());
        assert!(!scheduler.poll(at(1, 8, 59)));
        assert!(scheduler.poll(at(1, 9, 0)));
        assert!(!scheduler.poll(at(1, 9, 1)));
        assert!(!scheduler.poll(at(1, 23, 59)));
        assert!(!scheduler.poll(at(2, 8, 0)));
        assert!(scheduler.poll(at(2, 9, 30)));
    }

    #[test]
    fn next_fire_after_rolls_to_tomorrow_once_fired() {
        let mut scheduler = DailyScheduler::new(DailyTime::new(9, 0).unwrap());
        assert_eq!(scheduler.next_fire_after(at(1, 8, 0)), at(1, 9, 0));
        assert!(scheduler.poll(at(1, 9, 0)));
        assert_eq!(scheduler.next_fire_after(at(1, 9, 0)), at(2, 9, 0));
    }

    #[test]
    fn arm_from_skips_a_slot_already_passed() {
        let mut late = DailyScheduler::new(DailyTime::new(9, 0).unwrap());
        late.arm_from(at(1, 15, 0));
        assert!(!late.poll(at(1, 15, 0)));
        assert_eq!(late.next_fire_after(at(1, 15, 0)), at(2, 9, 0));

        let mut early = DailyScheduler::new(DailyTime::new(9, 0).unwrap());
        early.arm_from(at(1, 8, 0));
        assert!(early.poll(at(1, 9, 0)));
    }

    #[test]
    fn set_daily_time_rearms() {
        let mut scheduler = DailyScheduler::new(DailyTime::new(9, 0).unwrap());
        assert!(scheduler.poll(at(1, 9, 0)));
        scheduler.set_daily_time(18, 0).unwrap();
        assert!(!scheduler.fired_today(at(1, 10, 0)));
        assert!(!scheduler.poll(at(1, 17, 0)));
        assert!(scheduler.poll(at(1, 18, 0)));
        assert!(scheduler.set_daily_time(25, 0).is_err());
        assert_eq!(scheduler.time(), DailyTime::new(18, 0).unwrap());
    }
}
