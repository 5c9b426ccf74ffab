//! Rate Admission
//!
//! Per-identity fixed-window admission control with durable state. Each
//! identity gets its own serialized actor-style entry; different identities
//! are fully independent. The fixed window trades boundary precision
//! (up to 2x the limit straddling a reset) for O(1) memory per identity.

pub mod error;
pub mod limiter;
pub mod store;
pub mod window;

pub use error::RateLimitError;
pub use limiter::RateLimiter;
pub use store::{FileRateStore, MemoryRateStore, RateStateStore};
pub use window::{Decision, WindowState};
