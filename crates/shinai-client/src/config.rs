//! Backend base URL resolution.
//!
//! Precedence: an explicit override, then the production host for release
//! builds, then a development host derived from where the build is running.

use tracing::debug;

/// Host used by release builds when no override is configured.
pub const PRODUCTION_BASE_URL: &str = "https://api.shinai.example";

/// Port the development backend listens on.
pub const DEV_PORT: u16 = 8000;

/// Address the Android emulator uses to reach the host machine's loopback.
const ANDROID_EMULATOR_HOST: &str = "10.0.2.2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildProfile {
    #[default]
    Development,
    Release,
}

impl BuildProfile {
    /// Profile of the running binary.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildProfile::Development
        } else {
            BuildProfile::Release
        }
    }
}

/// Where a development build runs relative to the backend host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevTarget {
    /// Same machine or LAN; use the dev server's host address.
    #[default]
    Host,
    /// Android emulator; the host is only reachable through a fixed alias.
    AndroidEmulator,
}

/// Inputs to base URL resolution.
#[derive(Debug, Clone, Default)]
pub struct ApiEnvironment {
    pub profile: BuildProfile,
    pub target: DevTarget,
    /// Dev server address as `host:port`, e.g. `192.168.0.12:19000`.
    pub host_uri: Option<String>,
    /// Configured base URL; wins over everything else when non-empty.
    pub override_url: Option<String>,
}

/// Resolve the backend base URL, without a trailing slash.
pub fn resolve_base_url(env: &ApiEnvironment) -> String {
    let url = if let Some(url) = env
        .override_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    {
        debug!(url, "using configured base URL");
        url.to_string()
    } else {
        match (env.profile, env.target) {
            (BuildProfile::Release, _) => PRODUCTION_BASE_URL.to_string(),
            (BuildProfile::Development, DevTarget::AndroidEmulator) => {
                format!("http://{ANDROID_EMULATOR_HOST}:{DEV_PORT}")
            }
            (BuildProfile::Development, DevTarget::Host) => {
                let host = env.host_uri.as_deref().and_then(lan_host);
                debug!(host = ?host, "resolved dev host");
                match host {
                    Some(h) if h != "localhost" && h != "127.0.0.1" => {
                        format!("http://{h}:{DEV_PORT}")
                    }
                    _ => format!("http://localhost:{DEV_PORT}"),
                }
            }
        }
    };
    url.trim_end_matches('/').to_string()
}

/// Host part of a `host:port` dev server address.
fn lan_host(host_uri: &str) -> Option<&str> {
    let host = host_uri.split(':').next()?.trim();
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(host_uri: Option<&str>) -> ApiEnvironment {
        ApiEnvironment {
            host_uri: host_uri.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn override_always_wins() {
        let mut env = dev(Some("192.168.0.12:19000"));
        env.override_url = Some("https://staging.example/".into());
        assert_eq!(resolve_base_url(&env), "https://staging.example");

        env.profile = BuildProfile::Release;
        assert_eq!(resolve_base_url(&env), "https://staging.example");
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut env = dev(None);
        env.override_url = Some("  ".into());
        assert_eq!(resolve_base_url(&env), "http://localhost:8000");
    }

    #[test]
    fn release_uses_production_host() {
        let env = ApiEnvironment {
            profile: BuildProfile::Release,
            host_uri: Some("192.168.0.12:19000".into()),
            ..Default::default()
        };
        assert_eq!(resolve_base_url(&env), PRODUCTION_BASE_URL);
    }

    #[test]
    fn dev_uses_lan_host() {
        assert_eq!(
            resolve_base_url(&dev(Some("192.168.0.12:19000"))),
            "http://192.168.0.12:8000"
        );
    }

    #[test]
    fn dev_loopback_and_missing_host_use_localhost() {
        assert_eq!(resolve_base_url(&dev(Some("127.0.0.1:19000"))), "http://localhost:8000");
        assert_eq!(resolve_base_url(&dev(Some("localhost:8081"))), "http://localhost:8000");
        assert_eq!(resolve_base_url(&dev(Some(":19000"))), "http://localhost:8000");
        assert_eq!(resolve_base_url(&dev(None)), "http://localhost:8000");
    }

    #[test]
    fn android_emulator_uses_host_alias() {
        let mut env = dev(Some("192.168.0.12:19000"));
        env.target = DevTarget::AndroidEmulator;
        assert_eq!(resolve_base_url(&env), "http://10.0.2.2:8000");
    }
}
