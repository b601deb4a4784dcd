//! Runtime configuration for the arena server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Seconds since last activity within which an account counts as online.
    pub online_window: i64,
    /// Secret used to sign session tokens.
    pub session_secret: String,
    /// Access-token lifetime (minutes).
    pub token_ttl_minutes: i64,
    /// Directory that holds uploaded avatars.
    pub avatar_dir: String,
    /// Upload size cap for avatars (bytes).
    pub avatar_max_bytes: usize,
}

impl Settings {
    fn from_env() -> Self {
        let online_window = env::var("ONLINE_WINDOW")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(60);

        let session_secret =
            env::var("SESSION_SECRET").unwrap_or_else(|_| "dev-secret-key".into());

        let token_ttl_minutes = env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(1440); // 24 h default

        let avatar_dir = env::var("AVATAR_DIR").unwrap_or_else(|_| "static/avatars".into());

        let avatar_max_bytes = env::var("AVATAR_MAX_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Settings {
            online_window,
            session_secret,
            token_ttl_minutes,
            avatar_dir,
            avatar_max_bytes,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
