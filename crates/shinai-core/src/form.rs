//! Input form validation and fortune request assembly.

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::branch::Branch;
use crate::error::InputError;
use crate::fortune::{CalendarType, FortuneRequest};

/// Longest concern the input box accepts, in characters.
pub const MAX_CONCERN_CHARS: usize = 600;

/// Raw values as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct FortuneForm {
    pub name: String,
    pub birth_date: NaiveDate,
    pub branch: Branch,
    pub calendar: CalendarType,
    pub leap_month: bool,
    pub concern: String,
}

/// Append the birth branch note to a concern for the backend's benefit.
///
/// The concern is trimmed. An unknown branch leaves it untouched.
pub fn annotate_concern(concern: &str, branch: Branch) -> String {
    let concern = concern.trim();
    if !branch.is_known() {
        return concern.to_string();
    }
    format!(
        "{concern}\n[참고] 출생 시간대: {} · {}",
        branch.label(),
        branch.range()
    )
}

impl FortuneForm {
    /// Validate the form against today's local date and build the request.
    pub fn submit(&self) -> Result<FortuneRequest, InputError> {
        self.submit_on(Local::now().date_naive())
    }

    /// Validate the form and build the request.
    ///
    /// Name is checked before concern; the first failure is returned. No
    /// request exists unless every check passes.
    pub fn submit_on(&self, today: NaiveDate) -> Result<FortuneRequest, InputError> {
        let name = self.name.trim();
        let concern = self.concern.trim();

        if name.is_empty() {
            return Err(InputError::MissingName);
        }
        if concern.is_empty() {
            return Err(InputError::MissingConcern);
        }
        let len = concern.chars().count();
        if len > MAX_CONCERN_CHARS {
            return Err(InputError::ConcernTooLong {
                len,
                max: MAX_CONCERN_CHARS,
            });
        }
        if self.birth_date > today {
            return Err(InputError::FutureBirthDate(self.birth_date));
        }
        if self.leap_month && self.calendar != CalendarType::Lunar {
            return Err(InputError::LeapMonthRequiresLunar);
        }

        debug!(branch = %self.branch, time = self.branch.clock_time(), "resolved birth time");
        Ok(FortuneRequest::new(
            name.to_string(),
            self.birth_date,
            self.branch,
            self.calendar,
            self.leap_month,
            annotate_concern(concern, self.branch),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn form(name: &str, concern: &str, branch: Branch) -> FortuneForm {
        FortuneForm {
            name: name.into(),
            birth_date: NaiveDate::from_ymd_opt(1992, 3, 14).unwrap(),
            branch,
            concern: concern.into(),
            ..Default::default()
        }
    }

    #[test]
    fn known_branch_appends_range_note() {
        for branch in Branch::ALL.into_iter().filter(|b| b.is_known()) {
            let req = form("홍길동", "  연애운이 궁금해요 ", branch)
                .submit_on(today())
                .unwrap();
            let note = format!("[참고] 출생 시간대: {} · {}", branch.label(), branch.range());
            assert!(req.concern().starts_with("연애운이 궁금해요\n"));
            assert!(req.concern().ends_with(&note), "{}", req.concern());
            assert_eq!(req.birth_time(), branch.clock_time());
        }
    }

    #[test]
    fn unknown_branch_passes_concern_through() {
        let req = form("홍길동", "  연애운이 궁금해요 ", Branch::Unknown)
            .submit_on(today())
            .unwrap();
        assert_eq!(req.concern(), "연애운이 궁금해요");
        assert_eq!(req.birth_time(), "12:00");
    }

    #[test]
    fn every_submitted_request_uses_a_table_time() {
        let table_times: Vec<&str> = Branch::ALL.iter().map(|b| b.clock_time()).collect();
        for branch in Branch::ALL {
            for (calendar, leap_month) in [
                (CalendarType::Solar, false),
                (CalendarType::Lunar, false),
                (CalendarType::Lunar, true),
            ] {
                let mut f = form("홍길동", "고민", branch);
                f.calendar = calendar;
                f.leap_month = leap_month;
                let req = f.submit_on(today()).unwrap();
                assert!(
                    table_times.contains(&req.birth_time()),
                    "{branch}: {} not a table time",
                    req.birth_time()
                );
                assert_eq!(req.birth_time(), branch.clock_time());
                assert_eq!(req.timezone(), crate::TIMEZONE);
            }
        }
    }

    #[test]
    fn annotate_exact_text() {
        assert_eq!(
            annotate_concern("건강", Branch::Ja),
            "건강\n[참고] 출생 시간대: 자시 · 23:00~01:29"
        );
        assert_eq!(annotate_concern(" 건강 ", Branch::Unknown), "건강");
    }

    #[test]
    fn name_and_fields_are_trimmed() {
        let req = form("  홍길동 ", "고민", Branch::Unknown)
            .submit_on(today())
            .unwrap();
        assert_eq!(req.name(), "홍길동");
        assert_eq!(req.birth_date().to_string(), "1992-03-14");
        assert_eq!(req.calendar_type(), CalendarType::Solar);
        assert!(!req.is_leap_month());
    }

    #[test]
    fn blank_name_blocks_submission() {
        assert_eq!(
            form("", "고민", Branch::Ja).submit_on(today()),
            Err(InputError::MissingName)
        );
        assert_eq!(
            form(" \t\n", "고민", Branch::Ja).submit_on(today()),
            Err(InputError::MissingName)
        );
    }

    #[test]
    fn blank_concern_blocks_submission() {
        assert_eq!(
            form("홍길동", "", Branch::Ja).submit_on(today()),
            Err(InputError::MissingConcern)
        );
        assert_eq!(
            form("홍길동", "   ", Branch::Unknown).submit_on(today()),
            Err(InputError::MissingConcern)
        );
    }

    #[test]
    fn both_blank_reports_name_first() {
        assert_eq!(
            form(" ", " ", Branch::Ja).submit_on(today()),
            Err(InputError::MissingName)
        );
    }

    #[test]
    fn concern_length_counts_characters() {
        let at_limit = "운".repeat(MAX_CONCERN_CHARS);
        assert!(form("홍길동", &at_limit, Branch::Unknown).submit_on(today()).is_ok());

        let over = "운".repeat(MAX_CONCERN_CHARS + 1);
        assert_eq!(
            form("홍길동", &over, Branch::Unknown).submit_on(today()),
            Err(InputError::ConcernTooLong {
                len: MAX_CONCERN_CHARS + 1,
                max: MAX_CONCERN_CHARS
            })
        );
    }

    #[test]
    fn future_birth_date_rejected() {
        let mut f = form("홍길동", "고민", Branch::Unknown);
        f.birth_date = today();
        assert!(f.submit_on(today()).is_ok());

        f.birth_date = today().succ_opt().unwrap();
        assert_eq!(
            f.submit_on(today()),
            Err(InputError::FutureBirthDate(f.birth_date))
        );
    }

    #[test]
    fn leap_month_needs_lunar_calendar() {
        let mut f = form("홍길동", "고민", Branch::Unknown);
        f.leap_month = true;
        assert_eq!(f.submit_on(today()), Err(InputError::LeapMonthRequiresLunar));

        f.calendar = CalendarType::Lunar;
        let req = f.submit_on(today()).unwrap();
        assert!(req.is_leap_month());
        assert_eq!(req.calendar_type(), CalendarType::Lunar);
    }
}
