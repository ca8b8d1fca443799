//! Body codecs and media types.
//!
//! # Responsibilities
//! - Parse `Content-Type` into a normalized media type
//! - Hold the codecs registered per media type
//! - Decode request bodies into structured values
//!
//! # Design Decisions
//! - JSON and text/plain ship as defaults; XML is recognised but needs a
//!   codec registered before XML bodies are accepted
//! - Media type parameters (`charset=...`) are ignored for lookup

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml";

/// Media types a request body may declare without extra registration.
pub const RECOGNISED: [&str; 3] = [TEXT_PLAIN, APPLICATION_JSON, APPLICATION_XML];

/// A normalized media type essence such as `application/json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(String);

impl MediaType {
    /// Parse a `Content-Type` header value. Returns `None` for blank or
    /// structurally invalid values.
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value.split(';').next()?.trim().to_ascii_lowercase();
        let (kind, subtype) = essence.split_once('/')?;
        if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return None;
        }
        Some(Self(essence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the built-in recognised types.
    pub fn is_recognised(&self) -> bool {
        RECOGNISED.contains(&self.0.as_str())
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error raised by a codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("body is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("{0}")]
    Other(String),
}

/// Converts between wire bytes and structured values for one media type.
pub trait Codec: Send + Sync {
    fn decode(&self, body: &[u8]) -> Result<Value, CodecError>;

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;
}

/// `application/json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        Ok(serde_json::from_slice(body)?)
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }
}

/// `text/plain`: the body becomes a JSON string value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
        Ok(Value::String(std::str::from_utf8(body)?.to_string()))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        Ok(match value {
            Value::String(s) => s.clone().into_bytes(),
            other => other.to_string().into_bytes(),
        })
    }
}

/// Codecs keyed by media type.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: HashMap<MediaType, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// A registry with no codecs at all.
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register (or replace) the codec for `media_type`.
    ///
    /// Returns `false` if `media_type` is not a valid media type.
    pub fn register(&mut self, media_type: &str, codec: impl Codec + 'static) -> bool {
        match MediaType::parse(media_type) {
            Some(media_type) => {
                self.codecs.insert(media_type, Arc::new(codec));
                true
            }
            None => false,
        }
    }

    pub fn get(&self, media_type: &MediaType) -> Option<&dyn Codec> {
        self.codecs.get(media_type).map(|c| c.as_ref())
    }

    pub fn contains(&self, media_type: &MediaType) -> bool {
        self.codecs.contains_key(media_type)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(APPLICATION_JSON, JsonCodec);
        registry.register(TEXT_PLAIN, TextCodec);
        registry
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.codecs.keys().map(MediaType::as_str).collect();
        types.sort_unstable();
        f.debug_struct("CodecRegistry").field("media_types", &types).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_parse() {
        let mt = MediaType::parse("Application/JSON; charset=utf-8").unwrap();
        assert_eq!(mt.as_str(), "application/json");
        assert!(mt.is_recognised());

        assert!(MediaType::parse("application/x-www-form-urlencoded")
            .map(|m| !m.is_recognised())
            .unwrap());
        assert!(MediaType::parse("").is_none());
        assert!(MediaType::parse("json").is_none());
        assert!(MediaType::parse("a/b/c").is_none());
    }

    #[test]
    fn test_default_registry() {
        let registry = CodecRegistry::default();
        assert!(registry.contains(&MediaType::parse(APPLICATION_JSON).unwrap()));
        assert!(registry.contains(&MediaType::parse(TEXT_PLAIN).unwrap()));
        assert!(!registry.contains(&MediaType::parse(APPLICATION_XML).unwrap()));
    }

    #[test]
    fn test_json_codec() {
        let value = JsonCodec.decode(br#"{"data": "test_data"}"#).unwrap();
        assert_eq!(value["data"], "test_data");
        assert!(matches!(JsonCodec.decode(b"{not json"), Err(CodecError::Json(_))));
        assert_eq!(JsonCodec.encode(&value).unwrap(), br#"{"data":"test_data"}"#);
    }

    #[test]
    fn test_text_codec() {
        assert_eq!(TextCodec.decode(b"hello").unwrap(), Value::String("hello".into()));
        assert!(matches!(TextCodec.decode(&[0xff, 0xfe]), Err(CodecError::Utf8(_))));
        assert_eq!(TextCodec.encode(&Value::String("hi".into())).unwrap(), b"hi");
        assert_eq!(TextCodec.encode(&serde_json::json!(5)).unwrap(), b"5");
    }

    #[test]
    fn test_register_custom() {
        let mut registry = CodecRegistry::empty();
        assert!(!registry.register("not a media type", JsonCodec));
        assert!(registry.register("application/vnd.custom+json", JsonCodec));
        let mt = MediaType::parse("application/vnd.custom+json").unwrap();
        assert!(registry.get(&mt).is_some());
    }
}
