use thiserror::Error;

/// Client-side validation failures. Messages are shown to the user as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("이름을 입력하세요.")]
    MissingName,

    #[error("고민을 입력하세요.")]
    MissingConcern,

    #[error("고민은 {max}자 이내로 입력하세요. (현재 {len}자)")]
    ConcernTooLong { len: usize, max: usize },

    #[error("생년월일은 오늘 이후일 수 없습니다: {0}")]
    FutureBirthDate(chrono::NaiveDate),

    #[error("윤달은 음력에서만 선택할 수 있습니다.")]
    LeapMonthRequiresLunar,

    #[error("알 수 없는 출생 시간대: {0:?}")]
    UnknownBranch(String),

    #[error("알 수 없는 달력 종류: {0:?} (solar 또는 lunar)")]
    UnknownCalendar(String),
}
