//! Controllers and their route registration.
//!
//! # Data Flow
//! ```text
//! routes(store)
//!     → DataController::new(store)
//!     → RouteTable: GET /get_data, POST /set_data
//!     → Dispatcher::new(table)
//! ```

pub mod data;

use std::sync::Arc;

use crate::resource::Dispatcher;
use crate::routing::{PatternError, RouteTable};
use crate::store::DataStore;

pub use data::DataController;

/// Route table for the data endpoints.
pub fn routes(store: Arc<dyn DataStore>) -> Result<RouteTable, PatternError> {
    let mut table = RouteTable::new();
    DataController::new(store).register(&mut table)?;
    Ok(table)
}

/// Dispatcher serving the data endpoints with the default codecs.
pub fn dispatcher(store: Arc<dyn DataStore>) -> Result<Dispatcher, PatternError> {
    Ok(Dispatcher::new(routes(store)?))
}
