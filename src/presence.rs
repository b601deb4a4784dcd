//! Online/offline derivation from the activity timestamp.
//!
//! The timestamp itself is refreshed by the identity extractor on every
//! authenticated request; there is no explicit heartbeat call.

use chrono::Utc;

use crate::config::settings;

/// True iff the account was active within the configured window.
pub fn is_online(last_active: Option<i64>) -> bool {
    is_online_at(last_active, Utc::now().timestamp(), settings().online_window)
}

/// Clock-free core so the window logic is testable.
fn is_online_at(last_active: Option<i64>, now: i64, window: i64) -> bool {
    match last_active {
        Some(ts) => now - ts < window,
        None => false,
    }
}
