//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig (listen_ip, listen_port)
//!     → listener.rs (parse, bind one socket)
//!     → shared by every runtime worker via axum::serve
//! ```

pub mod listener;

pub use listener::{bind, ListenerError};
