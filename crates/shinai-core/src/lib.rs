pub mod branch;
pub mod error;
pub mod form;
pub mod fortune;

pub use branch::Branch;
pub use error::InputError;
pub use form::{FortuneForm, MAX_CONCERN_CHARS, annotate_concern};
pub use fortune::{CalendarType, FortuneRequest, FortuneResponse, FortuneSections, TIMEZONE};
