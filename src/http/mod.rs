//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout, limits)
//!     → request.rs (buffer body, parse query and Content-Type)
//!     → [resource dispatcher resolves and runs the action]
//!     → response.rs (encode reply or error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Request, RequestBuilder, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
