//! Birth time-branch table.
//!
//! The day is divided into twelve two-hour branches (지지, "earthly
//! branches"). A user who doesn't know their exact birth time picks a branch,
//! or the 모름 ("unknown") sentinel. The backend only ever sees one of the 13
//! representative clock times in this table.
//!
//! # Conventions
//!
//! - Each branch starts on the half hour: 축시 is 01:30~03:29.
//! - 자시 wraps midnight and is listed as 23:00~01:29.
//! - The representative time is the even hour inside the branch.
//! - 모름 maps to noon, the same clock time as 오시, with 시간 미상 as its range.

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// A birth time-branch selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Branch {
    #[default]
    Unknown,
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
}

/// One row of the branch table.
struct Entry {
    label: &'static str,
    roman: &'static str,
    clock_time: &'static str,
    range: &'static str,
}

// Indexed by `Branch as usize`.
static TABLE: [Entry; 13] = [
    Entry { label: "모름", roman: "unknown", clock_time: "12:00", range: "시간 미상" },
    Entry { label: "자시", roman: "ja", clock_time: "00:00", range: "23:00~01:29" },
    Entry { label: "축시", roman: "chuk", clock_time: "02:00", range: "01:30~03:29" },
    Entry { label: "인시", roman: "in", clock_time: "04:00", range: "03:30~05:29" },
    Entry { label: "묘시", roman: "myo", clock_time: "06:00", range: "05:30~07:29" },
    Entry { label: "진시", roman: "jin", clock_time: "08:00", range: "07:30~09:29" },
    Entry { label: "사시", roman: "sa", clock_time: "10:00", range: "09:30~11:29" },
    Entry { label: "오시", roman: "o", clock_time: "12:00", range: "11:30~13:29" },
    Entry { label: "미시", roman: "mi", clock_time: "14:00", range: "13:30~15:29" },
    Entry { label: "신시", roman: "sin", clock_time: "16:00", range: "15:30~17:29" },
    Entry { label: "유시", roman: "yu", clock_time: "18:00", range: "17:30~19:29" },
    Entry { label: "술시", roman: "sul", clock_time: "20:00", range: "19:30~21:29" },
    Entry { label: "해시", roman: "hae", clock_time: "22:00", range: "21:30~23:29" },
];

impl Branch {
    /// All selections in picker order, the unknown sentinel first.
    pub const ALL: [Branch; 13] = [
        Branch::Unknown,
        Branch::Ja,
        Branch::Chuk,
        Branch::In,
        Branch::Myo,
        Branch::Jin,
        Branch::Sa,
        Branch::O,
        Branch::Mi,
        Branch::Sin,
        Branch::Yu,
        Branch::Sul,
        Branch::Hae,
    ];

    fn entry(self) -> &'static Entry {
        &TABLE[self as usize]
    }

    /// Korean label, e.g. `"자시"`.
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    /// Representative 24-hour `HH:mm` clock time sent to the backend.
    pub fn clock_time(self) -> &'static str {
        self.entry().clock_time
    }

    /// Human-readable two-hour range, e.g. `"23:00~01:29"`.
    ///
    /// The unknown sentinel returns `"시간 미상"`.
    pub fn range(self) -> &'static str {
        self.entry().range
    }

    pub fn is_known(self) -> bool {
        self != Branch::Unknown
    }

    /// Label used when listing choices: `"자시 (23:00~01:29)"`, or just
    /// `"모름"` for the sentinel.
    pub fn picker_label(self) -> String {
        if self.is_known() {
            format!("{} ({})", self.label(), self.range())
        } else {
            self.label().to_string()
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Branch {
    type Err = InputError;

    /// Accepts `"자시"`, `"자"`, `"ja"` (any case) or `"모름"`/`"unknown"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        let lower = needle.to_lowercase();
        Branch::ALL
            .into_iter()
            .find(|b| {
                let e = b.entry();
                needle == e.label
                    || lower == e.roman
                    || (b.is_known() && e.label.strip_suffix('시') == Some(needle))
            })
            .ok_or_else(|| InputError::UnknownBranch(needle.to_string()))
    }
}
