//! JSON encoding of a [`TaggedValueStore`].
//!
//! A document has one root key, the store name, mapping each tag to its latest reading:
//!
//! ```json
//! { "NAME": { "heartrate": { "ts": 1000, "val": "72" }, "battery": { "ts": 1000, "val": "88" } } }
//! ```
//!
//! Encoding writes only the tags that have a reading. Decoding is lenient: it never fails, it falls back to an
//! empty store when the root object is missing and to [`Reading::default`] for every tag whose entry is missing or
//! malformed. A decoded store therefore always holds all six tags once its root object was found.

use serde_json::{Map, Value, json};

use crate::{Reading, Tag, TaggedValueStore, Timestamp};

/// A serialized telemetry document.
pub type Document = Value;

const TIMESTAMP_KEY: &str = "ts";
const VALUE_KEY: &str = "val";

/// Failure to parse document text, see [`parse`].
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// The text is not valid JSON.
    #[error("telemetry document is not valid JSON")]
    Json(#[from] serde_json::Error),
}

/// Encodes the store's current readings.
///
/// Does not consult any clock, the output depends only on the store contents.
pub fn encode(store: &TaggedValueStore) -> Document {
    let snapshot = store.snapshot();
    let entries: Map<String, Value> = snapshot
        .iter()
        .map(|(tag, reading)| {
            (
                tag.as_str().to_owned(),
                json!({
                    TIMESTAMP_KEY: reading.timestamp().as_secs(),
                    VALUE_KEY: reading.value(),
                }),
            )
        })
        .collect();

    let mut root = Map::with_capacity(1);
    root.insert(store.name().to_owned(), Value::Object(entries));
    Value::Object(root)
}

/// Encodes the store's current readings as compact JSON text.
pub fn encode_to_string(store: &TaggedValueStore) -> String {
    encode(store).to_string()
}

/// Parses document text.
pub fn parse(text: &str) -> Result<Document, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Rebuilds the store called `name` from `document`.
///
/// See the [module documentation](self) for the fallback rules.
pub fn decode(name: &str, document: &Document) -> TaggedValueStore {
    let store = TaggedValueStore::with_name(name);

    let Some(entries) = document.get(name).and_then(Value::as_object) else {
        tracing::debug!(name, "document has no object for the store, decoding as empty");
        return store;
    };

    for tag in Tag::ALL {
        let reading = entries
            .get(tag.as_str())
            .and_then(decode_reading)
            .unwrap_or_else(|| {
                tracing::debug!(name, %tag, "missing or malformed reading, using default");
                Reading::default()
            });
        store.replace(tag, reading);
    }

    store
}

/// Parses `text` and rebuilds the store called `name`, decoding unparseable text as an empty store.
pub fn decode_str(name: &str, text: &str) -> TaggedValueStore {
    match parse(text) {
        Ok(document) => decode(name, &document),
        Err(error) => {
            tracing::warn!(name, %error, "discarding unparseable telemetry document");
            TaggedValueStore::with_name(name)
        }
    }
}

/// Reads a `{"ts": <number>, "val": <string>}` entry.
///
/// Fractional timestamps are truncated toward zero, out of range ones saturate.
fn decode_reading(entry: &Value) -> Option<Reading> {
    let entry = entry.as_object()?;
    let timestamp = entry.get(TIMESTAMP_KEY)?;
    let value = entry.get(VALUE_KEY)?.as_str()?;

    let secs = timestamp
        .as_i64()
        .or_else(|| timestamp.as_f64().map(|secs| secs as i64))?;

    Some(Reading::new(Timestamp::from_secs(secs), value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    fn store_with(entries: &[(Tag, i64, &str)]) -> TaggedValueStore {
        let store = TaggedValueStore::with_name("NAME");
        for &(tag, secs, value) in entries {
            store.insert_at(tag, Timestamp::from_secs(secs), value);
        }
        store
    }

    #[test]
    fn encode_empty_store() {
        assert_eq!(encode(&TaggedValueStore::new()), json!({ "UNKNOWN": {} }));
    }

    #[test]
    fn encode_omits_tags_without_reading() {
        let store = store_with(&[(Tag::Heartrate, 1000, "72"), (Tag::Battery, 1000, "88")]);

        assert_eq!(
            encode(&store),
            json!({
                "NAME": {
                    "heartrate": { "ts": 1000, "val": "72" },
                    "battery": { "ts": 1000, "val": "88" },
                }
            })
        );
    }

    #[test]
    fn encode_to_string_is_compact_json() {
        let store = store_with(&[(Tag::Steps, 5, "10")]);
        assert_eq!(
            encode_to_string(&store),
            r#"{"NAME":{"steps":{"ts":5,"val":"10"}}}"#
        );
    }

    #[test]
    fn decode_fills_every_tag() {
        let document = json!({
            "NAME": {
                "heartrate": { "ts": 1000, "val": "72" },
                "battery": { "ts": 1000, "val": "88" },
            }
        });

        let snapshot = decode("NAME", &document).snapshot();

        assert_eq!(snapshot.len(), Tag::COUNT);
        assert_eq!(
            snapshot.get(Tag::Heartrate),
            Some(&Reading::new(Timestamp::from_secs(1000), "72"))
        );
        assert_eq!(
            snapshot.get(Tag::Battery),
            Some(&Reading::new(Timestamp::from_secs(1000), "88"))
        );
        for tag in [Tag::Pace, Tag::Speed, Tag::Climb, Tag::Steps] {
            assert_eq!(snapshot.get(tag), Some(&Reading::default()));
        }
    }

    #[test_case(json!({}) ; "empty document")]
    #[test_case(json!({ "OTHER": {} }) ; "different store")]
    #[test_case(json!({ "NAME": "not an object" }) ; "root is a string")]
    #[test_case(json!({ "NAME": [1, 2, 3] }) ; "root is an array")]
    #[test_case(json!([{ "NAME": {} }]) ; "document is an array")]
    #[test_case(Value::Null ; "null document")]
    fn decode_without_root_object_is_empty(document: Document) {
        let store = decode("NAME", &document);
        assert!(store.is_empty());
        assert_eq!(store.name(), "NAME");
    }

    #[test_case(json!({ "ts": 1000 }) ; "missing val")]
    #[test_case(json!({ "val": "72" }) ; "missing ts")]
    #[test_case(json!({ "ts": 1000, "val": 72 }) ; "numeric val")]
    #[test_case(json!({ "ts": 1000, "val": null }) ; "null val")]
    #[test_case(json!({ "ts": "1000", "val": "72" }) ; "string ts")]
    #[test_case(json!({ "ts": null, "val": "72" }) ; "null ts")]
    #[test_case(json!("72") ; "entry is a string")]
    #[test_case(json!([1000, "72"]) ; "entry is an array")]
    fn malformed_entry_defaults_only_that_tag(entry: Value) {
        let document = json!({
            "NAME": {
                "heartrate": entry,
                "steps": { "ts": 7, "val": "900" },
            }
        });

        let store = decode("NAME", &document);

        assert_eq!(store.get(Tag::Heartrate), Some(Reading::default()));
        assert_eq!(
            store.get(Tag::Steps),
            Some(Reading::new(Timestamp::from_secs(7), "900"))
        );
    }

    #[test_case(json!(1000.9), 1000 ; "fraction truncated")]
    #[test_case(json!(-2.7), -2 ; "negative fraction truncated toward zero")]
    #[test_case(json!(1e300), i64::MAX ; "too large saturates")]
    #[test_case(json!(u64::MAX), i64::MAX ; "unsigned beyond i64 saturates")]
    #[test_case(json!(-42), -42 ; "negative integer")]
    fn timestamps_are_truncated(ts: Value, expected: i64) {
        let document = json!({ "NAME": { "climb": { "ts": ts, "val": "3" } } });

        let store = decode("NAME", &document);

        assert_eq!(
            store.get(Tag::Climb).map(|reading| reading.timestamp()),
            Some(Timestamp::from_secs(expected))
        );
    }

    #[test]
    fn decode_ignores_unknown_keys() {
        let document = json!({
            "NAME": {
                "temperature": { "ts": 1, "val": "21" },
                "pace": { "ts": 2, "val": "5:00", "unit": "min/km" },
            }
        });

        let snapshot = decode("NAME", &document).snapshot();

        assert_eq!(snapshot.len(), Tag::COUNT);
        assert_eq!(snapshot.get(Tag::Pace).map(Reading::value), Some("5:00"));
    }

    #[test]
    fn decode_str_degrades_on_invalid_json() {
        let store = decode_str("NAME", r#"{"NAME": {"heartrate": "#);
        assert!(store.is_empty());
        assert_eq!(store.name(), "NAME");
    }

    #[test]
    fn parse_reports_invalid_json() {
        assert!(matches!(parse("{"), Err(CodecError::Json(_))));
        assert_eq!(parse("{}").unwrap(), json!({}));
    }
}
