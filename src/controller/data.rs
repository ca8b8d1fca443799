//! The data controller: `get_data` and `set_data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::http::Request;
use crate::resource::{Action, ActionResult, Reply};
use crate::routing::{PatternError, RouteTable};
use crate::store::DataStore;

/// Body accepted by `set_data`.
#[derive(Debug, Deserialize)]
pub struct SetDataBody {
    pub data: String,
}

/// Reply of `set_data`.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: u64,
}

/// Reads and writes records in a [`DataStore`].
#[derive(Debug, Clone)]
pub struct DataController {
    store: Arc<dyn DataStore>,
}

impl DataController {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Bind this controller's actions into `table`.
    pub fn register(&self, table: &mut RouteTable) -> Result<(), PatternError> {
        let get = self.clone();
        let set = self.clone();
        table
            .get(
                "/get_data",
                Action::plain("get_data", move |req, _| get.get_data(req)),
            )?
            .post(
                "/set_data",
                Action::with_body("set_data", move |req, _, body| set.set_data(req, body)),
            )?;
        Ok(())
    }

    /// `GET /get_data?id=<int>` → `{"id", "data"}`.
    pub fn get_data(&self, req: &Request) -> ActionResult {
        let raw = req
            .query("id")
            .ok_or_else(|| ApiError::bad_request("missing query parameter 'id'"))?;
        let id = raw.trim();
        let digits = id.strip_prefix(['+', '-']).unwrap_or(id);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApiError::bad_request(format!(
                "'id' must be an integer, got '{raw}'"
            )));
        }

        // Integers that are negative or beyond u64 can never name a record.
        let record = (!id.starts_with('-'))
            .then(|| digits.parse::<u64>().ok())
            .flatten()
            .and_then(|id| self.store.get_data(id))
            .ok_or_else(|| ApiError::not_found(format!("no record with id {id}")))?;

        Reply::json(&record)
    }

    /// `POST /set_data` with `{"data": <string>}` → `{"id"}`.
    pub fn set_data(&self, _req: &Request, body: Value) -> ActionResult {
        let body: SetDataBody = serde_json::from_value(body)
            .map_err(|e| ApiError::bad_request(format!("invalid set_data body: {e}")))?;

        let record = self.store.set_data(body.data);
        tracing::info!(id = record.id, "Data stored");
        Reply::json(&Created { id: record.id })
    }
}
