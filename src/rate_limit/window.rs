//! Fixed-Window Counter
//!
//! The pure admission state machine: one `{count, window_start}` pair per
//! identity, reset atomically when the window elapses. Fixed-window counting
//! can admit up to 2x the limit across a window boundary; that is the
//! accepted trade-off for O(1) memory.

use serde::{Deserialize, Serialize};

/// Windowed counter state for one identity.
///
/// Times are epoch milliseconds, matching the wire `resetAt` unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    /// Requests admitted in the current window
    pub count: u32,

    /// Window start, epoch milliseconds
    pub window_start: i64,
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the request is admitted
    pub allowed: bool,

    /// Admissions left in the window after this request
    pub remaining: u32,

    /// When the current window resets, epoch milliseconds
    #[serde(rename = "resetAt")]
    pub reset_at: i64,
}

impl WindowState {
    /// Fresh window starting at `now_ms` with nothing counted.
    pub fn new(now_ms: i64) -> Self {
        Self {
            count: 0,
            window_start: now_ms,
        }
    }

    /// Run one admission check, mutating the window in place.
    ///
    /// State only changes on admission; a denied request leaves the window
    /// untouched, so callers skip the durable write on rejection.
    pub fn check(&mut self, now_ms: i64, limit: u32, window_ms: i64) -> Decision {
        if now_ms - self.window_start >= window_ms {
            self.count = 0;
            self.window_start = now_ms;
        }

        if self.count < limit {
            self.count += 1;
            Decision {
                allowed: true,
                remaining: limit - self.count,
                reset_at: self.window_start + window_ms,
            }
        } else {
            Decision {
                allowed: false,
                remaining: 0,
                reset_at: self.window_start + window_ms,
            }
        }
    }
}
