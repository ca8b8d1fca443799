//! Route table lookup.
//!
//! # Responsibilities
//! - Store registered routes in order
//! - Look up the first route matching method and path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in registration order (acceptable for typical route counts)
//! - Explicit NoMatch rather than silent default

use axum::http::Method;
use std::sync::Arc;

use crate::resource::Action;
use crate::routing::matcher::{PathArgs, PathPattern, PatternError};

/// A single `(pattern, method) → action` binding.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: PathPattern,
    pub method: Method,
    pub action: Arc<Action>,
}

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub action: Arc<Action>,
    pub path_args: PathArgs,
}

/// Outcome of [`RouteTable::resolve`].
#[derive(Debug, Clone)]
pub enum Resolution {
    Matched(RouteMatch),
    NoMatch,
}

/// Ordered list of route bindings.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding. Earlier registrations take precedence.
    pub fn register(
        &mut self,
        pattern: &str,
        method: Method,
        action: Action,
    ) -> Result<&mut Self, PatternError> {
        let pattern = PathPattern::parse(pattern)?;
        tracing::debug!(
            pattern = %pattern,
            method = %method,
            action = action.name(),
            "Route registered"
        );
        self.routes.push(Route {
            pattern,
            method,
            action: Arc::new(action),
        });
        Ok(self)
    }

    /// Register a `GET` binding.
    pub fn get(&mut self, pattern: &str, action: Action) -> Result<&mut Self, PatternError> {
        self.register(pattern, Method::GET, action)
    }

    /// Register a `POST` binding.
    pub fn post(&mut self, pattern: &str, action: Action) -> Result<&mut Self, PatternError> {
        self.register(pattern, Method::POST, action)
    }

    /// Find the first route whose method and pattern both match.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route.pattern.matches(path).map(|path_args| RouteMatch {
                    action: Arc::clone(&route.action),
                    path_args,
                })
            })
            .map_or(Resolution::NoMatch, Resolution::Matched)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
