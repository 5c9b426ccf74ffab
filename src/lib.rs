//! Searchgate Core Library
//!
//! Admission control and credential management for a gateway fronting
//! third-party search providers. The crate provides per-identity
//! fixed-window rate limiting with durable state, a rotating pool of
//! encrypted provider credentials with an active/cooldown/invalid
//! lifecycle, and the cipher/digest primitives both lean on.

pub mod config;
pub mod crypto;
pub mod keypool;
pub mod rate_limit;
pub mod server;
pub mod store;
