use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// Encoding object for multipart requests.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Encoding {
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A media type object. `item_schema` is the OpenAPI 3.2 per-event schema
/// of a streaming (`text/event-stream`) response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(rename = "itemSchema", skip_serializing_if = "Option::is_none")]
    pub item_schema: Option<SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub encoding: IndexMap<String, Encoding>,
}

pub const JSON: &str = "application/json";
pub const EVENT_STREAM: &str = "text/event-stream";

/// Pick the primary media type: any JSON flavour, then an event stream,
/// then whatever comes first.
pub fn select_media_type(content: &IndexMap<String, MediaType>) -> Option<(&String, &MediaType)> {
    content
        .get_key_value(JSON)
        .or_else(|| content.iter().find(|(ct, _)| ct.contains("json")))
        .or_else(|| content.get_key_value(EVENT_STREAM))
        .or_else(|| content.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(types: &[&str]) -> IndexMap<String, MediaType> {
        types
            .iter()
            .map(|t| (t.to_string(), MediaType::default()))
            .collect()
    }

    #[test]
    fn prefers_json() {
        let c = content(&["text/plain", "text/event-stream", "application/json"]);
        assert_eq!(select_media_type(&c).unwrap().0, "application/json");
    }

    #[test]
    fn accepts_vendor_json() {
        let c = content(&["text/plain", "application/vnd.api+json"]);
        assert_eq!(select_media_type(&c).unwrap().0, "application/vnd.api+json");
    }

    #[test]
    fn falls_back_to_event_stream_then_first() {
        let c = content(&["text/plain", "text/event-stream"]);
        assert_eq!(select_media_type(&c).unwrap().0, "text/event-stream");
        let c = content(&["text/plain"]);
        assert_eq!(select_media_type(&c).unwrap().0, "text/plain");
        assert!(select_media_type(&content(&[])).is_none());
    }
}
