//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse route patterns into literal and named segments
//! - Match request paths segment by segment (case-sensitive)
//! - Bind named segments into [`PathArgs`]
//!
//! # Design Decisions
//! - Named segments use `:name` or `{name}` syntax
//! - A named segment matches exactly one non-empty path segment
//! - Bound values are percent-decoded; literals compare raw
//! - A trailing slash on the request path is ignored

use thiserror::Error;

/// Error returned for malformed route patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("pattern '{0}' has an unnamed parameter segment")]
    EmptyParameter(String),

    #[error("pattern '{pattern}' binds '{name}' more than once")]
    DuplicateParameter { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern such as `/items/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        }

        let mut segments = Vec::new();
        for part in split_path(pattern) {
            let name = part
                .strip_prefix(':')
                .or_else(|| part.strip_prefix('{').and_then(|p| p.strip_suffix('}')));

            match name {
                Some("") => return Err(PatternError::EmptyParameter(pattern.to_string())),
                Some(name) => {
                    if segments.iter().any(|s| matches!(s, Segment::Param(n) if n == name)) {
                        return Err(PatternError::DuplicateParameter {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                        });
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written at registration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameters this pattern binds, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a request path, returning the bound arguments on success.
    pub fn matches(&self, path: &str) -> Option<PathArgs> {
        let mut args = PathArgs::default();
        let mut parts = split_path(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = urlencoding::decode(part).ok()?;
                    args.push(name.clone(), value.into_owned());
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(args)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a path into segments, ignoring the leading and a single trailing slash.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}

/// Arguments bound from named path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    args: Vec<(String, String)>,
}

impl PathArgs {
    fn push(&mut self, name: String, value: String) {
        self.args.push((name, value));
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
