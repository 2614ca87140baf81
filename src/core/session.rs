//! # Session
//!
//! A session is nothing more than the thread identifier the backend uses to
//! scope its conversation memory. It lives only in memory for the lifetime
//! of the process.
//!
//! Sessions are replaced, never mutated: clearing the chat swaps in a
//! [`Session::fresh`] value whose id is time-based (`thread_<unix-millis>`).

use chrono::Utc;

/// Thread id used until the user clears the chat or switches threads.
pub const DEFAULT_THREAD_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    thread_id: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_thread_id(DEFAULT_THREAD_ID)
    }
}

impl Session {
    /// A session bound to an explicit thread id (e.g. from config or `/thread <id>`).
    pub fn with_thread_id(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
        }
    }

    /// A brand-new session whose id differs from `previous`.
    ///
    /// Ids are derived from the wall clock in milliseconds. Two resets inside
    /// the same millisecond would collide, so the counter is bumped past the
    /// previous id when needed.
    pub fn fresh(previous: &Session) -> Self {
        let now = Utc::now().timestamp_millis();
        let millis = match previous.millis().and_then(|prev| prev.checked_add(1)) {
            Some(next) => now.max(next),
            None => now,
        };
        let mut thread_id = thread_id_for(millis);
        if thread_id == previous.thread_id {
            thread_id.push_str("_1");
        }
        Self { thread_id }
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Millisecond stamp encoded in a generated id, if this is one.
    fn millis(&self) -> Option<i64> {
        self.thread_id
            .strip_prefix("thread_")
            .and_then(|s| s.parse().ok())
    }
}

fn thread_id_for(millis: i64) -> String {
    format!("thread_{millis}")
}
