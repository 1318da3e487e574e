//! Party meta document: a typed key/value store with per-key codecs.
//!
//! Every party and every party member carries a flat "meta" document mapping
//! string keys to encoded string values. The key name carries a type tag as a
//! suffix (`_b` boolean, `_i`/`_U` integer, `_j` JSON object, `_s` or no
//! suffix raw string). [`MetaStore`] encodes on write and decodes on read
//! through a [`CodecRegistry`] resolved once at construction, so the suffix
//! table is never re-parsed per call.
//!
//! Iteration order is insertion order (`IndexMap`), which the remote service
//! relies on when a full schema is resent.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::trace;

/// Flat mapping of meta keys to their encoded string values.
///
/// This is the shape the remote service produces and consumes: values are
/// always pre-encoded strings, never decoded structures.
pub type Schema = IndexMap<String, String>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Decode failures for meta values.
///
/// Encoding cannot fail; decoding fails hard when a stored value does not
/// match its key's type tag. Malformed remote data is surfaced, never
/// silently swallowed.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    #[error("meta key {key:?} holds malformed JSON")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("meta key {key:?} holds a non-integer value {value:?}")]
    Int { key: String, value: String },
    #[error("meta key {key:?} holds a non-boolean value {value:?}")]
    Bool { key: String, value: String },
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A decoded meta value.
///
/// The variant is determined by the key's type tag on decode, and by the
/// caller-supplied value on encode.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Json(JsonValue),
    Text(String),
}

impl MetaValue {
    /// Returns the boolean payload, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a reference to the JSON payload, if this is a `Json`.
    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the value, returning the JSON payload if this is a `Json`.
    #[must_use]
    pub fn into_json(self) -> Option<JsonValue> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<JsonValue> for MetaValue {
    fn from(v: JsonValue) -> Self {
        Self::Json(v)
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// CodecRegistry
// ---------------------------------------------------------------------------

/// The type tag of a meta key, inferred from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTag {
    Bool,
    Int,
    Json,
    Text,
}

/// Suffix-rule table mapping key name patterns to codecs.
///
/// Built once per [`MetaStore`]; `tag_for` walks the rule list in order and
/// falls back to [`KeyTag::Text`] for untagged keys.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    rules: &'static [(&'static str, KeyTag)],
}

impl CodecRegistry {
    /// The standard party meta suffix conventions.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: &[
                ("_b", KeyTag::Bool),
                ("_i", KeyTag::Int),
                ("_U", KeyTag::Int),
                ("_j", KeyTag::Json),
                ("_s", KeyTag::Text),
            ],
        }
    }

    /// Resolves the type tag for a key name.
    #[must_use]
    pub fn tag_for(&self, key: &str) -> KeyTag {
        self.rules
            .iter()
            .find(|(suffix, _)| key.ends_with(suffix))
            .map_or(KeyTag::Text, |(_, tag)| *tag)
    }

    /// Encodes a value to its wire string form.
    ///
    /// Encoding is driven by the value variant and is infallible; round-trip
    /// holds whenever the variant matches the key's tag.
    #[must_use]
    pub fn encode(value: &MetaValue) -> String {
        match value {
            MetaValue::Bool(b) => b.to_string(),
            MetaValue::Int(i) => i.to_string(),
            MetaValue::Json(v) => v.to_string(),
            MetaValue::Text(s) => s.clone(),
        }
    }

    /// Decodes a stored string per the key's type tag.
    ///
    /// # Errors
    ///
    /// Fails when the stored value does not parse under the key's tag:
    /// malformed JSON, non-integer digits, or a boolean that is neither
    /// `"true"` nor `"false"`.
    pub fn decode(&self, key: &str, encoded: &str) -> Result<MetaValue, MetaError> {
        match self.tag_for(key) {
            KeyTag::Bool => match encoded {
                "true" => Ok(MetaValue::Bool(true)),
                "false" => Ok(MetaValue::Bool(false)),
                other => Err(MetaError::Bool {
                    key: key.to_string(),
                    value: other.to_string(),
                }),
            },
            KeyTag::Int => encoded
                .parse::<i64>()
                .map(MetaValue::Int)
                .map_err(|_| MetaError::Int {
                    key: key.to_string(),
                    value: encoded.to_string(),
                }),
            KeyTag::Json => serde_json::from_str(encoded)
                .map(MetaValue::Json)
                .map_err(|source| MetaError::Json {
                    key: key.to_string(),
                    source,
                }),
            KeyTag::Text => Ok(MetaValue::Text(encoded.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MetaStore
// ---------------------------------------------------------------------------

/// Origin of a bulk `update` call.
///
/// `Remote` marks reconciliation of authoritative state pushed by the
/// service; `Local` marks a batch of already-encoded local writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    Remote,
    Local,
}

/// The meta key/value document held by a party or party member.
///
/// Stores encoded string values keyed by name, preserving insertion order.
/// `set` encodes, `get` decodes, `update`/`remove` apply pre-encoded partial
/// state from the remote layer. A failed decode never mutates the store.
#[derive(Debug, Clone)]
pub struct MetaStore {
    registry: CodecRegistry,
    schema: Schema,
}

impl MetaStore {
    /// Creates an empty store with the standard codec registry.
    #[must_use]
    pub fn new() -> Self {
        Self::from_schema(Schema::new())
    }

    /// Hydrates a store from a remote snapshot of already-encoded pairs.
    #[must_use]
    pub fn from_schema(schema: Schema) -> Self {
        Self {
            registry: CodecRegistry::standard(),
            schema,
        }
    }

    /// Returns the decoded value for a key, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored value does not decode under the
    /// key's type tag. The store is left untouched.
    pub fn get(&self, key: &str) -> Result<Option<MetaValue>, MetaError> {
        match self.schema.get(key) {
            Some(encoded) => self.registry.decode(key, encoded).map(Some),
            None => Ok(None),
        }
    }

    /// Encodes and stores a value, returning the encoded form.
    ///
    /// The returned string is exactly what must be forwarded into a patch;
    /// callers never re-encode. Overwrites silently if the key exists.
    pub fn set(&mut self, key: &str, value: impl Into<MetaValue>) -> String {
        let encoded = CodecRegistry::encode(&value.into());
        self.schema.insert(key.to_string(), encoded.clone());
        encoded
    }

    /// Bulk-merges already-encoded pairs, bypassing the encode step.
    ///
    /// Values arrive pre-encoded from the remote layer (or a local batch);
    /// they are stored verbatim.
    pub fn update<I>(&mut self, entries: I, source: UpdateSource)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0usize;
        for (key, value) in entries {
            self.schema.insert(key, value);
            applied += 1;
        }
        trace!(?source, applied, "meta update merged");
    }

    /// Deletes each listed key. Removing an absent key is a no-op.
    pub fn remove<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            self.schema.shift_remove(key.as_ref());
        }
    }

    /// Snapshot of all keys and their encoded values, in insertion order.
    #[must_use]
    pub fn schema(&self) -> Schema {
        self.schema.clone()
    }

    /// Whether the store currently holds the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.schema.contains_key(key)
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schema.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
    }
}

impl Default for MetaStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
