//! Document key sanitization for MongoDB compatibility.
//!
//! MongoDB restricts what may appear in field names: dots address nested
//! fields, dollar signs introduce operators, and NUL bytes terminate keys.
//! Raw field maps can carry arbitrary keys, so problematic characters are
//! escaped on the way into the store and restored on the way out. Values
//! are left untouched; only keys are rewritten.

use bson::{Bson, Document};

const ESCAPES: [(&str, &str); 3] = [
    (".", "__dot__"),
    ("$", "__dollar__"),
    ("\0", "__null__"),
];

/// Escapes restricted characters in one key (or collection name).
pub(crate) fn sanitize_key(key: &str) -> String {
    let mut out = key.to_string();
    for (target, replacement) in ESCAPES {
        out = out.replace(target, replacement);
    }

    out
}

/// Reverts [`sanitize_key`].
pub(crate) fn restore_key(key: &str) -> String {
    let mut out = key.to_string();
    for (target, replacement) in ESCAPES.iter().rev() {
        out = out.replace(replacement, target);
    }

    out
}

/// Recursively escapes the keys of a document, including documents nested
/// in values and arrays.
pub(crate) fn sanitize_document(data: &Document) -> Document {
    data.iter()
        .map(|(key, value)| (sanitize_key(key), sanitize_bson(value)))
        .collect()
}

/// Reverts [`sanitize_document`] on a document read back from the store.
pub(crate) fn restore_document(data: &Document) -> Document {
    data.iter()
        .map(|(key, value)| (restore_key(key), restore_bson(value)))
        .collect()
}

fn sanitize_bson(value: &Bson) -> Bson {
    match value {
        Bson::Document(data) => Bson::Document(sanitize_document(data)),
        Bson::Array(items) => Bson::Array(items.iter().map(sanitize_bson).collect()),
        other => other.clone(),
    }
}

fn restore_bson(value: &Bson) -> Bson {
    match value {
        Bson::Document(data) => Bson::Document(restore_document(data)),
        Bson::Array(items) => Bson::Array(items.iter().map(restore_bson).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn keys_round_trip() {
        for key in ["plain", "dotted.key", "$operator", "mix.$\0ed"] {
            assert_eq!(restore_key(&sanitize_key(key)), key);
        }
    }

    #[test]
    fn nested_keys_are_escaped_but_values_kept() {
        let data = doc! {
            "a.b": "x.y",
            "nested": { "$gt": 1i64 },
            "items": [ { "k.v": true } ],
        };

        let sanitized = sanitize_document(&data);
        assert!(sanitized.contains_key("a__dot__b"));
        assert_eq!(sanitized.get_str("a__dot__b").unwrap(), "x.y");
        assert!(
            sanitized
                .get_document("nested")
                .unwrap()
                .contains_key("__dollar__gt")
        );

        assert_eq!(restore_document(&sanitized), data);
    }
}
