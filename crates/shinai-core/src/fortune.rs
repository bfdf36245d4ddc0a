//! Request and response records exchanged with the fortune analysis backend.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::branch::Branch;
use crate::error::InputError;

/// Timezone every birth date/time is interpreted in.
pub const TIMEZONE: &str = "Asia/Seoul";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    #[default]
    Solar,
    Lunar,
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CalendarType::Solar => "solar",
            CalendarType::Lunar => "lunar",
        })
    }
}

impl FromStr for CalendarType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solar" | "양력" => Ok(CalendarType::Solar),
            "lunar" | "음력" => Ok(CalendarType::Lunar),
            other => Err(InputError::UnknownCalendar(other.to_string())),
        }
    }
}

/// Body of `POST /fortune/analyze`.
///
/// Built only by [`FortuneForm::submit`](crate::FortuneForm::submit), so
/// `birthTime` is always one of the 13 branch table times. Serialise-only:
/// there is no path from JSON back to a request. Immutable once built; it
/// lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneRequest {
    name: String,
    /// Serialised as `YYYY-MM-DD`.
    birth_date: NaiveDate,
    /// Serialised as `HH:mm`.
    birth_time: String,
    timezone: String,
    calendar_type: CalendarType,
    is_leap_month: bool,
    concern: String,
}

impl FortuneRequest {
    pub(crate) fn new(
        name: String,
        birth_date: NaiveDate,
        branch: Branch,
        calendar_type: CalendarType,
        is_leap_month: bool,
        concern: String,
    ) -> Self {
        Self {
            name,
            birth_date,
            birth_time: branch.clock_time().to_string(),
            timezone: TIMEZONE.to_string(),
            calendar_type,
            is_leap_month,
            concern,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn birth_time(&self) -> &str {
        &self.birth_time
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn calendar_type(&self) -> CalendarType {
        self.calendar_type
    }

    pub fn is_leap_month(&self) -> bool {
        self.is_leap_month
    }

    /// Concern text, annotated with the birth branch range when known.
    pub fn concern(&self) -> &str {
        &self.concern
    }
}

/// Per-topic narrative sections of a reading.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FortuneSections {
    pub overview: String,
    pub love: String,
    pub career: String,
    pub health: String,
}

/// Structured reading returned by the backend.
///
/// Rendered verbatim. Missing fields deserialize to empty values rather than
/// failing, so a partial reading still displays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FortuneResponse {
    /// 띠
    pub zodiac: String,
    /// Birth hour branch as the backend names it (자/축/…).
    pub earthly_branch_hour: String,
    /// One-line summary.
    pub summary: String,
    pub sections: FortuneSections,
    /// Suggested actions, in order.
    pub recommendations: Vec<String>,
}
