//! Date and timestamp parsing for date-typed fields.
//!
//! Blank input parses to nil. Well-formed text parses to a value.
//! Anything else is a malformed-input error.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

/// Formats and defaults used by a [`DateParser`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateConfig {
    /// `chrono` formats tried for timestamps after RFC 3339.
    ///
    /// Formats containing an offset specifier produce that offset; the rest
    /// are read as naive and placed at `naive_offset_seconds`.
    pub datetime_formats: Vec<String>,
    /// `chrono` formats tried for calendar dates.
    pub date_formats: Vec<String>,
    /// UTC offset, in seconds east, assumed for naive timestamps and dates.
    pub naive_offset_seconds: i32,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            datetime_formats: vec![
                "%Y-%m-%dT%H:%M:%S%.f%z".to_string(),
                "%Y-%m-%d %H:%M:%S%.f%:z".to_string(),
                "%Y-%m-%d %H:%M:%S%.f%z".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
            ],
            date_formats: vec!["%Y-%m-%d".to_string(), "%Y%m%d".to_string()],
            naive_offset_seconds: 0,
        }
    }
}

impl DateConfig {
    /// Creates a configuration with no formats beyond RFC 3339.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            datetime_formats: Vec::new(),
            date_formats: Vec::new(),
            naive_offset_seconds: 0,
        }
    }

    /// Adds a timestamp format.
    #[must_use]
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_formats.push(format.into());
        self
    }

    /// Adds a date format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_formats.push(format.into());
        self
    }

    /// Sets the offset assumed for naive input.
    #[must_use]
    pub fn with_naive_offset(mut self, seconds_east: i32) -> Self {
        self.naive_offset_seconds = seconds_east;
        self
    }
}

/// Parses raw values into [`Value::DateTime`] and [`Value::Date`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateParser {
    config: DateConfig,
}

impl DateParser {
    /// Creates a parser from a configuration.
    #[must_use]
    pub fn new(config: DateConfig) -> Self {
        Self { config }
    }

    /// Returns the parser configuration.
    #[must_use]
    pub fn config(&self) -> &DateConfig {
        &self.config
    }

    /// Parses a timestamp.
    ///
    /// Falsy input yields nil. Timestamps pass through and dates become
    /// midnight at the naive offset.
    pub fn parse_datetime(&self, value: &Value) -> Result<Value> {
        if !value.is_truthy() {
            return Ok(Value::Nil);
        }
        match value {
            Value::DateTime(_) => Ok(value.clone()),
            Value::Date(d) => self.midnight(*d).map(Value::DateTime),
            Value::Text(s) => self.datetime_from_text(s).map(Value::DateTime),
            other => Err(Error::type_mismatch("datetime", other, "datetime")),
        }
    }

    /// Parses a calendar date.
    ///
    /// Falsy input yields nil. Dates pass through and timestamps keep their
    /// local calendar date.
    pub fn parse_date(&self, value: &Value) -> Result<Value> {
        if !value.is_truthy() {
            return Ok(Value::Nil);
        }
        match value {
            Value::Date(_) => Ok(value.clone()),
            Value::DateTime(dt) => Ok(Value::Date(dt.date_naive())),
            Value::Text(s) => self.date_from_text(s).map(Value::Date),
            other => Err(Error::type_mismatch("date", other, "date")),
        }
    }

    fn naive_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.config.naive_offset_seconds).ok_or_else(|| {
            Error::malformed("utc offset", self.config.naive_offset_seconds.to_string())
        })
    }

    fn localize(&self, naive: &NaiveDateTime) -> Result<DateTime<FixedOffset>> {
        self.naive_offset()?
            .from_local_datetime(naive)
            .single()
            .ok_or_else(|| Error::malformed("datetime", naive.to_string()))
    }

    fn midnight(&self, date: NaiveDate) -> Result<DateTime<FixedOffset>> {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::malformed("date", date.to_string()))?;
        self.localize(&naive)
    }

    fn datetime_from_text(&self, text: &str) -> Result<DateTime<FixedOffset>> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(dt);
        }
        for format in &self.config.datetime_formats {
            if let Ok(dt) = DateTime::parse_from_str(text, format) {
                return Ok(dt);
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return self.localize(&naive);
            }
        }
        if let Some(date) = self.parse_date_formats(text) {
            return self.midnight(date);
        }
        Err(Error::malformed("datetime", text))
    }

    fn date_from_text(&self, text: &str) -> Result<NaiveDate> {
        let text = text.trim();
        if let Some(date) = self.parse_date_formats(text) {
            return Ok(date);
        }
        self.datetime_from_text(text)
            .map(|dt| dt.date_naive())
            .map_err(|_| Error::malformed("date", text))
    }

    fn parse_date_formats(&self, text: &str) -> Option<NaiveDate> {
        self.config
            .date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    }
}

/// Parses a timestamp with the default configuration.
pub fn parse_datetime(value: &Value) -> Result<Value> {
    DateParser::default().parse_datetime(value)
}

/// Parses a calendar date with the default configuration.
pub fn parse_date(value: &Value) -> Result<Value> {
    DateParser::default().parse_date(value)
}
