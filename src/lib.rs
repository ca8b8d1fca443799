//! Resource server library.
//!
//! A small HTTP service whose requests flow through a generic resource
//! dispatcher: an ordered route table picks a typed action, the body is
//! decoded by its declared content type, and the action's reply or typed
//! error is encoded as the response.

pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resource;
pub mod routing;
pub mod security;
pub mod store;

pub use config::schema::ServerConfig;
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resource::Dispatcher;
