//! Client layer: the fortune analysis and gongsu HTTP endpoints, plus base URL resolution.

pub mod config;
pub mod http;

pub use config::{ApiEnvironment, BuildProfile, DevTarget, resolve_base_url};
pub use http::{ApiError, FortuneClient, GongsuOptions, GongsuReply};
