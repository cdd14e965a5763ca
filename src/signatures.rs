//! Signature store: loads the user's named signature fragments once per mount.
//!
//! The source hands back `{ data: { signatures: { <name>: <html>, ... } } }`.
//! If `signatures` is not an object the store stays empty. Entries themselves
//! are always adopted, with non-text content coerced to text.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

/// A named HTML fragment the user can append to a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// 1-based position in the source payload.
    pub id: u32,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature source failed: {0}")]
    Source(String),
    #[error("'signatures' is missing from the payload")]
    Missing,
    #[error("'signatures' is not a valid object (found {found})")]
    NotAnObject { found: &'static str },
}

/// Something that can produce the raw signatures payload.
#[allow(async_fn_in_trait)]
pub trait SignatureSource {
    async fn fetch(&self) -> Result<Value, SignatureError>;
}

/// Reads signatures through the Tauri `get_user_signatures` command.
#[derive(Clone, Copy, Debug, Default)]
pub struct TauriSignatureSource;

impl SignatureSource for TauriSignatureSource {
    async fn fetch(&self) -> Result<Value, SignatureError> {
        let raw = invoke("get_user_signatures", JsValue::NULL)
            .await
            .map_err(|e| SignatureError::Source(describe_js_error(&e)))?;
        serde_wasm_bindgen::from_value::<Value>(raw)
            .map_err(|e| SignatureError::Source(e.to_string()))
    }
}

fn describe_js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Turn a raw payload into the ordered signature list.
pub fn parse_payload(payload: &Value) -> Result<Vec<Signature>, SignatureError> {
    let raw = payload
        .get("data")
        .and_then(|data| data.get("signatures"))
        .ok_or(SignatureError::Missing)?;

    let Value::Object(entries) = raw else {
        return Err(SignatureError::NotAnObject {
            found: kind_of(raw),
        });
    };

    Ok(entries
        .iter()
        .zip(1u32..)
        .map(|((name, content), id)| Signature {
            id,
            name: name.clone(),
            content: content_text(name, content),
        })
        .collect())
}

/// `null` is an empty signature; other non-string values keep their JSON text.
fn content_text(name: &str, content: &Value) -> String {
    match content {
        Value::String(html) => html.clone(),
        Value::Null => String::new(),
        other => {
            debug!(name, found = kind_of(other), "coercing non-text signature content");
            other.to_string()
        }
    }
}

/// Fetch and parse signatures. Failures are logged and yield an empty list so
/// the editor keeps working without the signature feature.
pub async fn load_signatures<S: SignatureSource>(source: &S) -> Vec<Signature> {
    let parsed = match source.fetch().await {
        Ok(payload) => parse_payload(&payload),
        Err(err) => Err(err),
    };
    match parsed {
        Ok(list) => {
            info!(count = list.len(), "loaded signatures");
            debug!(names = ?list.iter().map(|s| s.name.as_str()).collect::<Vec<_>>());
            list
        }
        Err(err) => {
            error!(%err, "signatures unavailable");
            Vec::new()
        }
    }
}

/// Look up a signature by id.
pub fn find(signatures: &[Signature], id: u32) -> Option<&Signature> {
    signatures.iter().find(|sig| sig.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_entries_in_source_order() {
        let payload = json!({
            "data": { "signatures": {
                "Work": "<br/>Regards,Alice",
                "Casual": "<p>cheers</p>",
                "Alpha": "<p>a</p>"
            }}
        });
        let list = parse_payload(&payload).unwrap();
        let summary: Vec<_> = list.iter().map(|s| (s.id, s.name.as_str())).collect();
        assert_eq!(summary, vec![(1, "Work"), (2, "Casual"), (3, "Alpha")]);
        assert_eq!(list[0].content, "<br/>Regards,Alice");
    }

    #[test]
    fn rejects_array_signatures() {
        let payload = json!({ "data": { "signatures": ["<p>a</p>"] } });
        assert_eq!(
            parse_payload(&payload),
            Err(SignatureError::NotAnObject { found: "array" })
        );
    }

    #[test]
    fn rejects_missing_and_null_signatures() {
        assert_eq!(
            parse_payload(&json!({ "data": {} })),
            Err(SignatureError::Missing)
        );
        assert_eq!(parse_payload(&json!(null)), Err(SignatureError::Missing));
        assert_eq!(
            parse_payload(&json!({ "data": { "signatures": null } })),
            Err(SignatureError::NotAnObject { found: "null" })
        );
        assert_eq!(
            parse_payload(&json!({ "data": { "signatures": "nope" } })),
            Err(SignatureError::NotAnObject { found: "string" })
        );
    }

    #[test]
    fn non_text_entries_are_adopted_as_text() {
        let payload = json!({ "data": { "signatures": {
            "Work": "<p>w</p>",
            "Count": 3,
            "Flag": true,
            "Nested": { "a": [1, 2] }
        } } });
        let list = parse_payload(&payload).unwrap();
        let contents: Vec<_> = list.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["<p>w</p>", "3", "true", r#"{"a":[1,2]}"#]);
        assert_eq!(list[1].id, 2);
    }

    #[test]
    fn null_entry_becomes_empty_content() {
        let payload = json!({ "data": { "signatures": { "Blank": null } } });
        let list = parse_payload(&payload).unwrap();
        assert_eq!(list[0].content, "");
    }

    #[test]
    fn empty_object_is_valid_and_empty() {
        let payload = json!({ "data": { "signatures": {} } });
        assert_eq!(parse_payload(&payload), Ok(Vec::new()));
    }

    #[test]
    fn finds_by_id() {
        let payload = json!({ "data": { "signatures": { "A": "a", "B": "b" } } });
        let list = parse_payload(&payload).unwrap();
        assert_eq!(find(&list, 2).map(|s| s.name.as_str()), Some("B"));
        assert!(find(&list, 3).is_none());
    }
}
