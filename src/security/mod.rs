//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (URL length, declared body size)
//!     → Pass to dispatcher
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any limit violation
//! - Rejections use the same structured error body as the dispatcher

pub mod limits;

pub use limits::{enforce_limits, RequestLimits};
