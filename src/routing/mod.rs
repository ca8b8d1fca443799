//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path)
//!     → router.rs (ordered route scan)
//!     → matcher.rs (method check, pattern match, bind named segments)
//!     → Return: Matched(action, path args) or NoMatch
//!
//! Route registration (at startup):
//!     register(pattern, method, action)
//!     → Parse pattern into segments
//!     → Append to table (order preserved)
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod matcher;
pub mod router;

pub use matcher::{PathArgs, PathPattern, PatternError};
pub use router::{Resolution, Route, RouteMatch, RouteTable};
