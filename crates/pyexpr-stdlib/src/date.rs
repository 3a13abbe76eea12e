//! Date-like host values: `date`, `datetime`, `time` and `relativedelta`,
//! plus the [`Constructor`]s that create them from call arguments.
//!
//! Values wrap naive `chrono` types: expressions never carry a timezone.
//! Relative delta arithmetic follows `dateutil.relativedelta`: absolute
//! fields replace, years and months shift with the day clamped to the end of
//! the month, then the remaining offset is added as a plain duration.

use crate::args::{parse_args, CallArgs};
use crate::error::{StdlibError, StdlibResult};
use crate::value::{PyFunction, Value};
use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

const MIN_YEAR: i64 = 1;
const MAX_YEAR: i64 = 9999;

// ══════════════════════════════════════════════════════════════════════════════
// Constructors
// ══════════════════════════════════════════════════════════════════════════════

/// The four callables whose calls go through `create` rather than a plain
/// function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constructor {
    Date,
    DateTime,
    Time,
    RelativeDelta,
}

impl Constructor {
    pub fn name(&self) -> &'static str {
        match self {
            Constructor::Date => "date",
            Constructor::DateTime => "datetime",
            Constructor::Time => "time",
            Constructor::RelativeDelta => "relativedelta",
        }
    }

    /// Build a value from positional and keyword arguments.
    pub fn create(&self, args: CallArgs) -> StdlibResult<Value> {
        match self {
            Constructor::Date => PyDate::create(args).map(Value::Date),
            Constructor::DateTime => PyDateTime::create(args).map(Value::DateTime),
            Constructor::Time => PyTime::create(args).map(Value::Time),
            Constructor::RelativeDelta => PyRelativeDelta::create(args).map(Value::RelativeDelta),
        }
    }

    /// Class-level members: `date.today()`, `datetime.now()` and
    /// `datetime.today()`, all reporting `now`. Other names are `None`.
    pub fn attr(&self, name: &str, now: NaiveDateTime) -> Value {
        let callee = name.to_string();
        match (self, name) {
            (Constructor::Date, "today") => method(name, move |args| {
                no_args(&callee, args)?;
                Ok(Value::Date(PyDate(now.date())))
            }),
            (Constructor::DateTime, "now" | "today") => method(name, move |args| {
                no_args(&callee, args)?;
                Ok(Value::DateTime(PyDateTime(now)))
            }),
            _ => Value::None,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// date
// ══════════════════════════════════════════════════════════════════════════════

/// `datetime.date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PyDate(pub NaiveDate);

impl PyDate {
    /// `date(year, month, day)`
    pub fn create(args: CallArgs) -> StdlibResult<Self> {
        let mut bound = parse_args("date", args, &["year", "month", "day"])?;
        let year = bound.require_int("year")?;
        let month = bound.require_int("month")?;
        let day = bound.require_int("day")?;
        bound.finish()?;
        ymd(year, month, day).map(PyDate)
    }

    pub fn attr(&self, name: &str) -> Value {
        let date = self.0;
        match name {
            "year" => int(date.year()),
            "month" => int(date.month()),
            "day" => int(date.day()),
            "strftime" => method(name, move |args| {
                let format = format_arg(args)?;
                strftime(midnight(date), &format).map(Value::String)
            }),
            "isoformat" => method(name, move |args| {
                no_args("isoformat", args)?;
                Ok(Value::String(date.format("%Y-%m-%d").to_string()))
            }),
            "weekday" => method(name, move |args| {
                no_args("weekday", args)?;
                Ok(int(date.weekday().num_days_from_monday()))
            }),
            "isoweekday" => method(name, move |args| {
                no_args("isoweekday", args)?;
                Ok(int(date.weekday().number_from_monday()))
            }),
            _ => Value::None,
        }
    }
}

impl fmt::Display for PyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// datetime
// ══════════════════════════════════════════════════════════════════════════════

/// `datetime.datetime` (naive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PyDateTime(pub NaiveDateTime);

impl PyDateTime {
    /// `datetime(year, month, day, hour=0, minute=0, second=0, microsecond=0)`
    pub fn create(args: CallArgs) -> StdlibResult<Self> {
        let mut bound = parse_args(
            "datetime",
            args,
            &["year", "month", "day", "hour", "minute", "second", "microsecond"],
        )?;
        let date = ymd(
            bound.require_int("year")?,
            bound.require_int("month")?,
            bound.require_int("day")?,
        )?;
        let time = hms(
            bound.int_or("hour", 0)?,
            bound.int_or("minute", 0)?,
            bound.int_or("second", 0)?,
            bound.int_or("microsecond", 0)?,
        )?;
        bound.finish()?;
        Ok(PyDateTime(date.and_time(time)))
    }

    pub fn attr(&self, name: &str) -> Value {
        let dt = self.0;
        match name {
            "year" => int(dt.year()),
            "month" => int(dt.month()),
            "day" => int(dt.day()),
            "hour" => int(dt.hour()),
            "minute" => int(dt.minute()),
            "second" => int(dt.second()),
            "microsecond" => int(dt.nanosecond() / 1_000),
            "strftime" => method(name, move |args| {
                let format = format_arg(args)?;
                strftime(dt, &format).map(Value::String)
            }),
            "isoformat" => method(name, move |args| {
                no_args("isoformat", args)?;
                let pattern = if dt.nanosecond() == 0 {
                    "%Y-%m-%dT%H:%M:%S"
                } else {
                    "%Y-%m-%dT%H:%M:%S%.6f"
                };
                Ok(Value::String(dt.format(pattern).to_string()))
            }),
            "date" => method(name, move |args| {
                no_args("date", args)?;
                Ok(Value::Date(PyDate(dt.date())))
            }),
            "weekday" => method(name, move |args| {
                no_args("weekday", args)?;
                Ok(int(dt.weekday().num_days_from_monday()))
            }),
            "isoweekday" => method(name, move |args| {
                no_args("isoweekday", args)?;
                Ok(int(dt.weekday().number_from_monday()))
            }),
            _ => Value::None,
        }
    }
}

impl fmt::Display for PyDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// time
// ══════════════════════════════════════════════════════════════════════════════

/// `datetime.time` (naive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PyTime(pub NaiveTime);

impl PyTime {
    /// `time(hour=0, minute=0, second=0, microsecond=0)`
    pub fn create(args: CallArgs) -> StdlibResult<Self> {
        let mut bound = parse_args("time", args, &["hour", "minute", "second", "microsecond"])?;
        let time = hms(
            bound.int_or("hour", 0)?,
            bound.int_or("minute", 0)?,
            bound.int_or("second", 0)?,
            bound.int_or("microsecond", 0)?,
        )?;
        bound.finish()?;
        Ok(PyTime(time))
    }

    pub fn attr(&self, name: &str) -> Value {
        let time = self.0;
        match name {
            "hour" => int(time.hour()),
            "minute" => int(time.minute()),
            "second" => int(time.second()),
            "microsecond" => int(time.nanosecond() / 1_000),
            // Python formats a bare time on 1900-01-01.
            "strftime" => method(name, move |args| {
                let format = format_arg(args)?;
                let epoch = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default();
                strftime(epoch.and_time(time), &format).map(Value::String)
            }),
            "isoformat" => method(name, move |args| {
                no_args("isoformat", args)?;
                Ok(Value::String(time.format("%H:%M:%S").to_string()))
            }),
            _ => Value::None,
        }
    }
}

impl fmt::Display for PyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// relativedelta
// ══════════════════════════════════════════════════════════════════════════════

/// `dateutil.relativedelta.relativedelta`
///
/// Plural fields are relative offsets, singular fields are absolute
/// replacements (`None` when unset). `weeks` folds into `days`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PyRelativeDelta {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
    pub hour: Option<i64>,
    pub minute: Option<i64>,
    pub second: Option<i64>,
}

impl PyRelativeDelta {
    /// `relativedelta(years=, months=, weeks=, days=, hours=, minutes=,
    /// seconds=, year=, month=, day=, hour=, minute=, second=)`
    ///
    /// The two-date form `relativedelta(dt1, dt2)` is not supported.
    pub fn create(args: CallArgs) -> StdlibResult<Self> {
        let mut bound = parse_args("relativedelta", args, &["dt1", "dt2"])?;
        if bound.contains("dt1") || bound.contains("dt2") {
            return Err(StdlibError::NotSupported(
                "relativedelta(dt1, dt2) is not supported".into(),
            ));
        }
        let weeks = bound.int_or("weeks", 0)?;
        let days = bound.int_or("days", 0)?;
        let mut delta = Self {
            years: bound.int_or("years", 0)?,
            months: bound.int_or("months", 0)?,
            days: weeks
                .checked_mul(7)
                .and_then(|w| w.checked_add(days))
                .ok_or_else(out_of_range)?,
            hours: bound.int_or("hours", 0)?,
            minutes: bound.int_or("minutes", 0)?,
            seconds: bound.int_or("seconds", 0)?,
            year: bound.int("year")?,
            month: bound.int("month")?,
            day: bound.int("day")?,
            hour: bound.int("hour")?,
            minute: bound.int("minute")?,
            second: bound.int("second")?,
        };
        bound.finish()?;
        delta.normalize();
        Ok(delta)
    }

    /// True when adding this delta changes nothing.
    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
            && self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.hour.is_none()
            && self.minute.is_none()
            && self.second.is_none()
    }

    /// Flip the relative offsets; absolute fields are kept.
    pub fn negate(&self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
            ..*self
        }
    }

    /// `date + delta` for a `date` or `datetime` value.
    pub fn add_to(&self, value: &Value) -> StdlibResult<Value> {
        match value {
            Value::Date(date) => self.add_to_date(date.0).map(|d| Value::Date(PyDate(d))),
            Value::DateTime(dt) => self
                .add_to_datetime(dt.0)
                .map(|dt| Value::DateTime(PyDateTime(dt))),
            other => Err(StdlibError::TypeError(format!(
                "unsupported operand type(s) for +: '{}' and 'relativedelta'",
                other.type_name()
            ))),
        }
    }

    /// Only whole days of the time offset apply to a plain date.
    pub fn add_to_date(&self, date: NaiveDate) -> StdlibResult<NaiveDate> {
        let shifted = self.shift_calendar(date)?;
        let days = self.offset_seconds()?.div_euclid(86_400);
        let result = Duration::try_days(days)
            .and_then(|offset| shifted.checked_add_signed(offset))
            .ok_or_else(out_of_range)?;
        check_year(result.year())?;
        Ok(result)
    }

    pub fn add_to_datetime(&self, dt: NaiveDateTime) -> StdlibResult<NaiveDateTime> {
        let date = self.shift_calendar(dt.date())?;
        let time = hms(
            self.hour.unwrap_or(i64::from(dt.hour())),
            self.minute.unwrap_or(i64::from(dt.minute())),
            self.second.unwrap_or(i64::from(dt.second())),
            i64::from(dt.nanosecond() / 1_000),
        )?;
        let result = Duration::try_seconds(self.offset_seconds()?)
            .and_then(|offset| date.and_time(time).checked_add_signed(offset))
            .ok_or_else(out_of_range)?;
        check_year(result.year())?;
        Ok(result)
    }

    /// The set fields, by attribute name. Relative fields are always present.
    pub fn fields(&self) -> BTreeMap<String, Value> {
        let mut fields = BTreeMap::new();
        for (name, value) in self.relative_fields() {
            fields.insert(name.to_string(), Value::from(value));
        }
        for (name, value) in self.absolute_fields() {
            if let Some(v) = value {
                fields.insert(name.to_string(), Value::from(v));
            }
        }
        fields
    }

    pub fn attr(&self, name: &str) -> Value {
        if let Some((_, v)) = self.relative_fields().into_iter().find(|(n, _)| *n == name) {
            return Value::from(v);
        }
        match self.absolute_fields().into_iter().find(|(n, _)| *n == name) {
            Some((_, Some(v))) => Value::from(v),
            _ => Value::None,
        }
    }

    fn relative_fields(&self) -> [(&'static str, i64); 6] {
        [
            ("years", self.years),
            ("months", self.months),
            ("days", self.days),
            ("hours", self.hours),
            ("minutes", self.minutes),
            ("seconds", self.seconds),
        ]
    }

    fn absolute_fields(&self) -> [(&'static str, Option<i64>); 6] {
        [
            ("year", self.year),
            ("month", self.month),
            ("day", self.day),
            ("hour", self.hour),
            ("minute", self.minute),
            ("second", self.second),
        ]
    }

    /// Carry overflowing units upward, keeping the sign: `months=14` becomes
    /// `years=1, months=2`. Days never carry.
    fn normalize(&mut self) {
        carry(&mut self.seconds, &mut self.minutes, 60);
        carry(&mut self.minutes, &mut self.hours, 60);
        carry(&mut self.hours, &mut self.days, 24);
        carry(&mut self.months, &mut self.years, 12);
    }

    /// Apply absolute year/month/day, then the year and month offsets.
    fn shift_calendar(&self, date: NaiveDate) -> StdlibResult<NaiveDate> {
        let year = self
            .year
            .unwrap_or(i64::from(date.year()))
            .checked_add(self.years)
            .ok_or_else(out_of_range)?;
        let month = self.month.unwrap_or(i64::from(date.month()));
        if !(1..=12).contains(&month) {
            return Err(StdlibError::ValueError(format!(
                "month must be in 1..12, got {month}"
            )));
        }
        let total = year
            .checked_mul(12)
            .and_then(|t| t.checked_add(month - 1 + self.months))
            .ok_or_else(out_of_range)?;
        let (year, month) = (total.div_euclid(12), total.rem_euclid(12) + 1);
        check_year(year)?;
        let day = self
            .day
            .unwrap_or(i64::from(date.day()))
            .min(days_in_month(year, month));
        ymd(year, month, day)
    }

    /// Days, hours, minutes and seconds as one offset in seconds.
    fn offset_seconds(&self) -> StdlibResult<i64> {
        let parts = [
            self.days.checked_mul(86_400),
            self.hours.checked_mul(3_600),
            self.minutes.checked_mul(60),
            Some(self.seconds),
        ];
        parts
            .into_iter()
            .try_fold(0i64, |acc, part| part.and_then(|p| acc.checked_add(p)))
            .ok_or_else(out_of_range)
    }
}

impl fmt::Display for PyRelativeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for (name, value) in self.relative_fields() {
            if value != 0 {
                parts.push(format!("{name}={value:+}"));
            }
        }
        for (name, value) in self.absolute_fields() {
            if let Some(v) = value {
                parts.push(format!("{name}={v}"));
            }
        }
        write!(f, "relativedelta({})", parts.join(", "))
    }
}

fn carry(low: &mut i64, high: &mut i64, base: i64) {
    if low.abs() >= base {
        let sign = low.signum();
        let magnitude = low.abs();
        *high += magnitude / base * sign;
        *low = magnitude % base * sign;
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Format with Python `strftime` directives. Unknown directives are a
/// `ValueError` rather than a panic.
pub fn strftime(dt: NaiveDateTime, format: &str) -> StdlibResult<String> {
    let directives = chrono_directives(format);
    if StrftimeItems::new(&directives).any(|item| matches!(item, Item::Error)) {
        return Err(StdlibError::ValueError(format!(
            "invalid format string '{format}'"
        )));
    }
    let mut out = String::new();
    write!(out, "{}", dt.format_with_items(StrftimeItems::new(&directives))).map_err(|_| {
        StdlibError::ValueError(format!("cannot format with '{format}'"))
    })?;
    Ok(out)
}

/// Python's `%f` is zero-padded microseconds; chrono spells it `%6f`.
fn chrono_directives(format: &str) -> Cow<'_, str> {
    if !format.contains("%f") {
        return Cow::Borrowed(format);
    }
    let mut out = String::with_capacity(format.len() + 4);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '%' {
            match chars.next() {
                Some('f') => out.push_str("6f"),
                Some(next) => out.push(next),
                None => {}
            }
        }
    }
    Cow::Owned(out)
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn ymd(year: i64, month: i64, day: i64) -> StdlibResult<NaiveDate> {
    check_year(year)?;
    let date = match (i32::try_from(year), u32::try_from(month), u32::try_from(day)) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };
    date.ok_or_else(|| {
        if !(1..=12).contains(&month) {
            StdlibError::ValueError(format!("month must be in 1..12, got {month}"))
        } else {
            StdlibError::ValueError(format!("day {day} is out of range for month {year}-{month:02}"))
        }
    })
}

fn hms(hour: i64, minute: i64, second: i64, microsecond: i64) -> StdlibResult<NaiveTime> {
    let in_range = |value: i64, max: i64, name: &str| {
        if (0..max).contains(&value) {
            Ok(value as u32)
        } else {
            Err(StdlibError::ValueError(format!(
                "{name} must be in 0..{}, got {value}",
                max - 1
            )))
        }
    };
    let h = in_range(hour, 24, "hour")?;
    let m = in_range(minute, 60, "minute")?;
    let s = in_range(second, 60, "second")?;
    let us = in_range(microsecond, 1_000_000, "microsecond")?;
    NaiveTime::from_hms_micro_opt(h, m, s, us).ok_or_else(out_of_range)
}

fn check_year(year: impl Into<i64>) -> StdlibResult<()> {
    let year = year.into();
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(StdlibError::ValueError(format!("year {year} is out of range")))
    }
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn out_of_range() -> StdlibError {
    StdlibError::ValueError("date value out of range".into())
}

fn int(n: impl Into<i64>) -> Value {
    Value::from(n.into())
}

/// A method already bound to its receiver.
fn method(
    name: &str,
    body: impl Fn(CallArgs) -> StdlibResult<Value> + Send + Sync + 'static,
) -> Value {
    Value::Function(PyFunction::new(name, body))
}

fn format_arg(args: CallArgs) -> StdlibResult<String> {
    let mut bound = parse_args("strftime", args, &["format"])?;
    let format = bound.require("format")?;
    bound.finish()?;
    match format {
        Value::String(s) => Ok(s),
        other => Err(StdlibError::TypeError(format!(
            "strftime() argument must be str, not {}",
            other.type_name()
        ))),
    }
}

fn no_args(callee: &str, args: CallArgs) -> StdlibResult<()> {
    parse_args(callee, args, &[])?.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn delta(kwargs: &[(&str, f64)]) -> PyRelativeDelta {
        let args = kwargs.iter().fold(CallArgs::default(), |args, (k, v)| {
            args.with_keyword(*k, Value::Number(*v))
        });
        PyRelativeDelta::create(args).unwrap()
    }

    #[test]
    fn test_month_end_clamps() {
        let d = delta(&[("months", 1.0)]);
        assert_eq!(d.add_to_date(date(2024, 1, 31)).unwrap(), date(2024, 2, 29));
        assert_eq!(d.add_to_date(date(2023, 1, 31)).unwrap(), date(2023, 2, 28));
    }

    #[test]
    fn test_negative_months_cross_year() {
        let d = delta(&[("months", -2.0)]);
        assert_eq!(d.add_to_date(date(2024, 1, 15)).unwrap(), date(2023, 11, 15));
    }

    #[test]
    fn test_absolute_day_then_relative_days() {
        let d = delta(&[("day", 1.0), ("days", -1.0)]);
        // first of the month, then back one day: end of previous month
        assert_eq!(d.add_to_date(date(2024, 3, 17)).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_weeks_fold_into_days() {
        let d = delta(&[("weeks", 2.0), ("days", 1.0)]);
        assert_eq!(d.days, 15);
    }

    #[test]
    fn test_normalize_carries_with_sign() {
        let d = delta(&[("months", 14.0)]);
        assert_eq!((d.years, d.months), (1, 2));
        let d = delta(&[("months", -14.0)]);
        assert_eq!((d.years, d.months), (-1, -2));
        let d = delta(&[("hours", 25.0)]);
        assert_eq!((d.days, d.hours), (1, 1));
    }

    #[test]
    fn test_hours_on_plain_date_floor_to_days() {
        let d = delta(&[("hours", -1.0)]);
        assert_eq!(d.add_to_date(date(2024, 3, 1)).unwrap(), date(2024, 2, 29));
        let d = delta(&[("hours", 23.0)]);
        assert_eq!(d.add_to_date(date(2024, 3, 1)).unwrap(), date(2024, 3, 1));
    }

    #[test]
    fn test_datetime_absolute_time_fields() {
        let d = delta(&[("hour", 0.0), ("minute", 0.0), ("second", 0.0), ("days", 1.0)]);
        let start = date(2024, 5, 10).and_hms_opt(15, 42, 7).unwrap();
        assert_eq!(
            d.add_to_datetime(start).unwrap(),
            date(2024, 5, 11).and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_negate_keeps_absolute_fields() {
        let d = delta(&[("months", 1.0), ("day", 5.0)]).negate();
        assert_eq!(d.months, -1);
        assert_eq!(d.day, Some(5));
    }

    #[test]
    fn test_two_date_form_rejected() {
        let args = CallArgs::positional(vec![Value::None, Value::None]);
        let err = PyRelativeDelta::create(args).unwrap_err();
        assert!(matches!(err, StdlibError::NotSupported(_)));
    }

    #[test]
    fn test_invalid_dates() {
        let args = CallArgs::positional(vec![
            Value::Number(2024.0),
            Value::Number(2.0),
            Value::Number(30.0),
        ]);
        assert!(matches!(PyDate::create(args), Err(StdlibError::ValueError(_))));
        let args = CallArgs::positional(vec![Value::Number(0.0), Value::Number(1.0), Value::Number(1.0)]);
        assert!(matches!(PyDate::create(args), Err(StdlibError::ValueError(_))));
        let args = CallArgs::default().with_keyword("hour", Value::Number(24.0));
        assert!(matches!(PyTime::create(args), Err(StdlibError::ValueError(_))));
    }

    #[test]
    fn test_strftime_directives() {
        let dt = date(2024, 7, 4).and_hms_opt(9, 5, 0).unwrap();
        assert_eq!(strftime(dt, "%Y-%m-%d %H:%M").unwrap(), "2024-07-04 09:05");
        assert!(strftime(dt, "%Q").is_err());
        // timezone directives have nothing to format on a naive value
        assert!(strftime(dt, "%z").is_err());
    }

    #[test]
    fn test_strftime_microseconds() {
        let dt = date(2024, 1, 2).and_hms_micro_opt(0, 0, 0, 5).unwrap();
        assert_eq!(strftime(dt, "%f").unwrap(), "000005");
        assert_eq!(strftime(dt, "%S.%f").unwrap(), "00.000005");
        assert_eq!(strftime(dt, "%%f").unwrap(), "%f");
        assert_eq!(strftime(dt, "%%%f").unwrap(), "%000005");

        let args = CallArgs::positional(vec![
            Value::Number(2024.0),
            Value::Number(1.0),
            Value::Number(2.0),
        ])
        .with_keyword("microsecond", Value::Number(5.0));
        let Value::Function(format) = PyDateTime::create(args).unwrap().attr("strftime") else {
            panic!("strftime should be a bound method");
        };
        let out = format
            .call(CallArgs::positional(vec![Value::String("%f".into())]))
            .unwrap();
        assert_eq!(out, Value::String("000005".into()));
    }

    #[test]
    fn test_class_members_report_the_given_clock() {
        let now = date(2024, 7, 4).and_hms_opt(9, 5, 0).unwrap();
        let call = |value: Value| match value {
            Value::Function(f) => f.call(CallArgs::default()).unwrap(),
            other => panic!("not a function: {other}"),
        };
        assert_eq!(
            call(Constructor::Date.attr("today", now)),
            Value::Date(PyDate(date(2024, 7, 4)))
        );
        assert_eq!(
            call(Constructor::DateTime.attr("now", now)),
            Value::DateTime(PyDateTime(now))
        );
        assert_eq!(
            call(Constructor::DateTime.attr("today", now)),
            Value::DateTime(PyDateTime(now))
        );
        assert_eq!(Constructor::Date.attr("now", now), Value::None);
        assert_eq!(Constructor::RelativeDelta.attr("today", now), Value::None);
    }

    #[test]
    fn test_date_attributes() {
        let d = PyDate(date(2024, 7, 4));
        assert_eq!(d.attr("year"), Value::Number(2024.0));
        assert_eq!(d.attr("unknown"), Value::None);
        let Value::Function(weekday) = d.attr("weekday") else {
            panic!("weekday should be a bound method");
        };
        assert_eq!(weekday.call(CallArgs::default()).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_relativedelta_display() {
        let d = delta(&[("months", 1.0), ("days", -2.0), ("day", 31.0)]);
        assert_eq!(d.to_string(), "relativedelta(months=+1, days=-2, day=31)");
    }
}
