//! Resource dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request (method, path, query, headers, body)
//!     → dispatcher.rs (resolve route via RouteTable)
//!     → codec.rs (decode body by Content-Type)
//!     → action.rs (typed handler call)
//!     → dispatcher.rs (encode Reply or ApiError as the response)
//! ```
//!
//! # Design Decisions
//! - Handlers declare their shape through [`Handler`], never by introspection
//! - Only codecs registered ahead of time are used; nothing is auto-discovered
//! - The dispatcher is the single place where errors become responses

pub mod action;
pub mod codec;
pub mod dispatcher;

pub use action::{Action, ActionResult, Handler, RawResponse, Reply};
pub use codec::{Codec, CodecError, CodecRegistry, JsonCodec, MediaType, TextCodec};
pub use dispatcher::Dispatcher;
